//! Structural validation of tool-call arguments.
//!
//! These checks only cover presence and JSON types. Range and format
//! constraints on meeting filters are enforced by the client itself.

use crate::api::{MeetingsParams, Violations};
use rmcp::model::JsonObject;
use serde_json::Value;

/// Collects typed fields out of an argument object, recording every mismatch
struct ArgReader<'a> {
    args: &'a JsonObject,
    violations: Violations,
}

impl<'a> ArgReader<'a> {
    fn new(args: &'a JsonObject) -> Self {
        Self {
            args,
            violations: Violations::new(),
        }
    }

    /// Absent and explicit `null` are treated the same
    fn get(&self, key: &str) -> Option<&'a Value> {
        self.args.get(key).filter(|v| !v.is_null())
    }

    fn required_str(&mut self, key: &str) -> Option<String> {
        match self.get(key) {
            None => {
                self.violations.push(key, "is required");
                None
            }
            Some(_) => self.optional_str(key),
        }
    }

    fn optional_str(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?;
        match value.as_str() {
            Some(s) => Some(s.to_string()),
            None => {
                self.violations
                    .push(key, format!("expected string, got {}", type_name(value)));
                None
            }
        }
    }

    fn optional_int(&mut self, key: &str) -> Option<i64> {
        let value = self.get(key)?;
        match value.as_i64() {
            Some(n) => Some(n),
            None => {
                self.violations
                    .push(key, format!("expected integer, got {}", type_name(value)));
                None
            }
        }
    }

    fn optional_bool(&mut self, key: &str) -> Option<bool> {
        let value = self.get(key)?;
        match value.as_bool() {
            Some(b) => Some(b),
            None => {
                self.violations
                    .push(key, format!("expected boolean, got {}", type_name(value)));
                None
            }
        }
    }

    fn finish<T>(self, value: T) -> Result<T, Violations> {
        self.violations.into_result(value)
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A single required string field, e.g. `id` or `meetingId`
pub fn required_string(args: &JsonObject, key: &str) -> Result<String, Violations> {
    let mut reader = ArgReader::new(args);
    let value = reader.required_str(key);
    reader.finish(value.unwrap_or_default())
}

pub fn meetings_params(args: &JsonObject) -> Result<MeetingsParams, Violations> {
    let mut reader = ArgReader::new(args);
    let params = MeetingsParams {
        query: reader.optional_str("query"),
        page: reader.optional_int("page"),
        limit: reader.optional_int("limit"),
        from: reader.optional_str("from"),
        to: reader.optional_str("to"),
        only_participated: reader.optional_bool("onlyParticipated"),
        meeting_type: reader.optional_str("meetingType"),
    };
    reader.finish(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_required_string_present() {
        let args = obj(json!({"id": "m1"}));
        assert_eq!(required_string(&args, "id").unwrap(), "m1");
    }

    #[test]
    fn test_required_string_missing_or_null() {
        for args in [json!({}), json!({"id": null})] {
            let violations = required_string(&obj(args), "id").unwrap_err();
            assert_eq!(violations.to_string(), "id: is required");
        }
    }

    #[test]
    fn test_required_string_wrong_type() {
        let violations = required_string(&obj(json!({"meetingId": 42})), "meetingId").unwrap_err();
        assert_eq!(
            violations.to_string(),
            "meetingId: expected string, got integer"
        );
    }

    #[test]
    fn test_meetings_params_from_args() {
        let args = obj(json!({
            "query": "retro",
            "limit": 5,
            "onlyParticipated": false,
            "meetingType": "external"
        }));
        let params = meetings_params(&args).unwrap();
        assert_eq!(params.query.as_deref(), Some("retro"));
        assert_eq!(params.limit, Some(5));
        assert_eq!(params.page, None);
        assert_eq!(params.only_participated, Some(false));
        assert_eq!(params.meeting_type.as_deref(), Some("external"));
    }

    #[test]
    fn test_meetings_params_keeps_negative_page_for_client() {
        let params = meetings_params(&obj(json!({"page": -1}))).unwrap();
        assert_eq!(params.page, Some(-1));
    }

    #[test]
    fn test_meetings_params_type_mismatches() {
        let args = obj(json!({"limit": "5", "page": 1.5, "onlyParticipated": "yes"}));
        let violations = meetings_params(&args).unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["page", "limit", "onlyParticipated"]);
    }
}
