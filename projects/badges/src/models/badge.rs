use serde::Serialize;

/// JSON object consumed by the shield rendering service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BadgeDescriptor {
    pub subject: String,
    pub status: Status,
    pub color: String,
}

/// Raw counts serialize as JSON numbers, formatted values as strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Status {
    Count(u64),
    Text(String),
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Count(count) => write!(f, "{count}"),
            Status::Text(text) => f.write_str(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_fields_in_badge_order() {
        let badge = BadgeDescriptor {
            subject: "Docker pulls".to_string(),
            status: Status::Text("12.3k/month".to_string()),
            color: "blue".to_string(),
        };

        assert_eq!(
            serde_json::to_string(&badge).unwrap(),
            r#"{"subject":"Docker pulls","status":"12.3k/month","color":"blue"}"#
        );
    }

    #[test]
    fn count_status_is_a_json_number() {
        let badge = BadgeDescriptor {
            subject: "GitHub Workflows".to_string(),
            status: Status::Count(7),
            color: "blue".to_string(),
        };

        assert_eq!(
            serde_json::to_string(&badge).unwrap(),
            r#"{"subject":"GitHub Workflows","status":7,"color":"blue"}"#
        );
    }
}
