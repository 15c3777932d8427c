use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// JSON pointer of the hit count in a code search response.
pub const TOTAL_COUNT_POINTER: &str = "/total_count";

const QUERY_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'/')
    .add(b':')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Code search URL counting workflow files that mention `needle`.
///
/// The query is `"<needle>" path:.github/workflows/ language:YAML`.
pub fn workflow_search_url(api_base: &str, needle: &str) -> String {
    format!(
        "{}/search/code?q=%22{}%22+path%3A.github%2Fworkflows%2F+language%3AYAML&type=Code",
        api_base.trim_end_matches('/'),
        utf8_percent_encode(needle, QUERY_SET)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test]
    fn builds_workflow_search_url() {
        assert_eq!(
            workflow_search_url("https://api.github.com", "publish-unit-test-result-action"),
            "https://api.github.com/search/code?q=%22publish-unit-test-result-action%22+path%3A.github%2Fworkflows%2F+language%3AYAML&type=Code"
        );
    }

    #[test_case("a b&c/d", "a%20b%26c%2Fd" ; "reserved characters")]
    #[test_case("100%-action", "100%25-action" ; "percent sign")]
    #[test_case("x=1?", "x%3D1%3F" ; "equals and question mark")]
    #[test_case("aktion-é", "aktion-%C3%A9" ; "non ascii")]
    fn escapes_needle(needle: &str, encoded: &str) {
        let url = workflow_search_url("https://api.github.com", needle);
        assert!(
            url.contains(&format!("q=%22{encoded}%22+path")),
            "{url} does not carry {encoded}"
        );
    }
}
