use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How a number is read out of an upstream body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Extractor {
    /// The whole body is a number.
    Integer,
    /// JSON pointer into the decoded body, e.g. `/total_count`.
    JsonField { pointer: String },
    /// Text of the element following the first `<tag>` whose text is `label`.
    LabelledSibling { tag: String, label: String },
    /// `attribute` of the first `<target>` after the `<tag>` whose text is `label`.
    LabelledAttribute {
        tag: String,
        label: String,
        target: String,
        attribute: String,
    },
    /// One number per `<tag>` carrying `attribute`.
    AttributeSeries { tag: String, attribute: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Count(u64),
    Series(Vec<u64>),
}

impl Extracted {
    pub fn into_counts(self) -> Vec<u64> {
        match self {
            Extracted::Count(count) => vec![count],
            Extracted::Series(series) => series,
        }
    }
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("InvalidSelector: {selector}: {message}")]
    InvalidSelector { selector: String, message: String },

    #[error("NotFound: {what}")]
    NotFound { what: String },

    #[error("NotANumber: {value:?}")]
    NotANumber { value: String },

    #[error("InvalidJson: {source}")]
    InvalidJson {
        #[from]
        source: serde_json::Error,
    },
}

impl Extractor {
    pub fn extract(&self, body: &str) -> Result<Extracted, ExtractError> {
        match self {
            Extractor::Integer => parse_count(body).map(Extracted::Count),
            Extractor::JsonField { pointer } => extract_json_field(body, pointer).map(Extracted::Count),
            Extractor::LabelledSibling { tag, label } => {
                extract_labelled_sibling(body, tag, label).map(Extracted::Count)
            }
            Extractor::LabelledAttribute {
                tag,
                label,
                target,
                attribute,
            } => extract_labelled_attribute(body, tag, label, target, attribute).map(Extracted::Count),
            Extractor::AttributeSeries { tag, attribute } => {
                extract_attribute_series(body, tag, attribute).map(Extracted::Series)
            }
        }
    }
}

/// Parses counts as they appear on pages: `1,234`, `98.8K`, `1.2M`.
/// A fraction is only accepted in front of a suffix.
pub fn parse_count(text: &str) -> Result<u64, ExtractError> {
    let not_a_number = || ExtractError::NotANumber {
        value: text.to_string(),
    };

    let cleaned: String = text.trim().chars().filter(|ch| *ch != ',').collect();
    if cleaned.is_empty() {
        return Err(not_a_number());
    }

    if let Ok(count) = cleaned.parse::<u64>() {
        return Ok(count);
    }

    let (number, multiplier) = match cleaned.char_indices().last() {
        Some((index, 'k' | 'K')) => (&cleaned[..index], 1e3),
        Some((index, 'M')) => (&cleaned[..index], 1e6),
        Some((index, 'B')) => (&cleaned[..index], 1e9),
        _ => return Err(not_a_number()),
    };

    // digits[.digits]
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|byte| byte.is_ascii_digit());
    let well_formed = match number.split_once('.') {
        Some((whole, fraction)) => all_digits(whole) && all_digits(fraction),
        None => all_digits(number),
    };
    if !well_formed {
        return Err(not_a_number());
    }

    let value: f64 = number.parse().map_err(|_| not_a_number())?;
    Ok((value * multiplier).round() as u64)
}

fn extract_json_field(body: &str, pointer: &str) -> Result<u64, ExtractError> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let field = value.pointer(pointer).ok_or_else(|| ExtractError::NotFound {
        what: format!("json field {pointer}"),
    })?;

    match field {
        serde_json::Value::Number(number) => number.as_u64().ok_or_else(|| ExtractError::NotANumber {
            value: number.to_string(),
        }),
        serde_json::Value::String(text) => parse_count(text),
        other => Err(ExtractError::NotANumber {
            value: other.to_string(),
        }),
    }
}

fn selector(tag: &str) -> Result<Selector, ExtractError> {
    Selector::parse(tag).map_err(|err| ExtractError::InvalidSelector {
        selector: tag.to_string(),
        message: err.to_string(),
    })
}

fn find_labelled<'a>(document: &'a Html, tag: &str, label: &str) -> Result<ElementRef<'a>, ExtractError> {
    let tag_selector = selector(tag)?;
    document
        .select(&tag_selector)
        .find(|element| element.text().collect::<String>() == label)
        .ok_or_else(|| ExtractError::NotFound {
            what: format!("<{tag}> labelled {label:?}"),
        })
}

fn extract_labelled_sibling(body: &str, tag: &str, label: &str) -> Result<u64, ExtractError> {
    let document = Html::parse_document(body);
    let labelled = find_labelled(&document, tag, label)?;

    let sibling = labelled
        .next_siblings()
        .find_map(ElementRef::wrap)
        .ok_or_else(|| ExtractError::NotFound {
            what: format!("element after <{tag}> labelled {label:?}"),
        })?;

    parse_count(&sibling.text().collect::<String>())
}

fn extract_labelled_attribute(
    body: &str,
    tag: &str,
    label: &str,
    target: &str,
    attribute: &str,
) -> Result<u64, ExtractError> {
    let document = Html::parse_document(body);
    let labelled = find_labelled(&document, tag, label)?;

    // Descendants walk the tree in document order.
    let value = document
        .root_element()
        .descendants()
        .skip_while(|node| *node != *labelled)
        .skip(1)
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == target)
        .ok_or_else(|| ExtractError::NotFound {
            what: format!("<{target}> after <{tag}> labelled {label:?}"),
        })?
        .value()
        .attr(attribute)
        .ok_or_else(|| ExtractError::NotFound {
            what: format!("attribute {attribute} on <{target}>"),
        })?;

    parse_count(value)
}

fn extract_attribute_series(body: &str, tag: &str, attribute: &str) -> Result<Vec<u64>, ExtractError> {
    let document = Html::parse_document(body);
    let tag_selector = selector(tag)?;

    let series = document
        .select(&tag_selector)
        .filter_map(|element| element.value().attr(attribute))
        .map(parse_count)
        .collect::<Result<Vec<_>, _>>()?;

    if series.is_empty() {
        return Err(ExtractError::NotFound {
            what: format!("<{tag}> with attribute {attribute}"),
        });
    }

    Ok(series)
}
