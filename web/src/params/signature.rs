use serde::Deserialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Request body for generating a meeting join signature.
///
/// Both fields accept a JSON string or number, matching what meeting SDK
/// clients actually send; presence is validated in the domain layer so that a
/// role of `0` (participant) is accepted.
#[derive(Debug, Deserialize, ToSchema)]
pub struct GenerateParams {
    #[serde(rename = "meetingNumber")]
    pub meeting_number: Option<Value>,
    pub role: Option<Value>,
}

/// Render a string-or-number JSON value as the text that gets embedded in the
/// signature. Anything else (including null) counts as absent.
pub fn text_value(value: &Option<Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_value_accepts_strings_and_numbers() {
        assert_eq!(text_value(&Some(json!("123"))), Some("123".to_string()));
        assert_eq!(text_value(&Some(json!(123))), Some("123".to_string()));
        assert_eq!(text_value(&Some(json!(0))), Some("0".to_string()));
    }

    #[test]
    fn test_text_value_rejects_absent_and_null() {
        assert_eq!(text_value(&None), None);
        assert_eq!(text_value(&Some(Value::Null)), None);
        assert_eq!(text_value(&Some(json!(["1"]))), None);
    }
}
