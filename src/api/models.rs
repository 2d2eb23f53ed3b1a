use super::validation::{is_iso_datetime, is_valid_email, Validate, Violations};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Page size used when the caller does not ask for one
pub const DEFAULT_PAGE_LIMIT: u32 = 50;

pub const UNKNOWN_ERROR: &str = "Unknown error occurred";

/// Result of every client operation: either `data` or `error`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl fmt::Display) -> Self {
        let message = error.to_string();
        let message = if message.trim().is_empty() {
            UNKNOWN_ERROR.to_string()
        } else {
            message
        };
        Self {
            data: None,
            error: Some(message),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub name: String,
    pub email: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for User {
    fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();
        if !is_valid_email(&self.email) {
            violations.push("email", format!("'{}' is not a valid email", self.email));
        }
        violations.into_result(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub label: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: String,
    pub name: String,
    pub happened_at: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer: Option<User>,
    #[serde(default)]
    pub invitees: Vec<User>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<Template>,
    /// Fields the API returns beyond the ones modelled here
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Meeting {
    fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();
        if let Some(Err(errs)) = self.organizer.as_ref().map(Validate::validate) {
            violations.extend(errs.nested("organizer"));
        }
        if let Err(errs) = self.invitees.validate() {
            violations.extend(errs.nested("invitees"));
        }
        violations.into_result(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingList {
    pub page: u32,
    pub pages: u32,
    pub total: u32,
    pub page_size: u32,
    pub results: Vec<Meeting>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for MeetingList {
    fn validate(&self) -> Result<(), Violations> {
        let mut violations = Violations::new();
        if self.pages == 0 {
            violations.push("pages", "must be greater than 0");
        }
        if self.page_size == 0 {
            violations.push("pageSize", "must be greater than 0");
        }
        if let Err(errs) = self.results.validate() {
            violations.extend(errs.nested("results"));
        }
        violations.into_result(())
    }
}

/// One transcript unit. Times are offsets in seconds; `start_time <= end_time`
/// is expected but not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sentence {
    pub speaker: String,
    pub text: String,
    pub start_time: u64,
    pub end_time: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Sentence {
    fn validate(&self) -> Result<(), Violations> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightSource {
    Manual,
    Auto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    pub title: String,
    pub summary: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Highlight {
    pub text: String,
    pub start_time: u64,
    pub source: HighlightSource,
    pub topic: Topic,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for Highlight {
    fn validate(&self) -> Result<(), Violations> {
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Validate for HealthStatus {
    fn validate(&self) -> Result<(), Violations> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeetingType {
    Internal,
    External,
}

impl MeetingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MeetingType::Internal => "internal",
            MeetingType::External => "external",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "internal" => Some(MeetingType::Internal),
            "external" => Some(MeetingType::External),
            _ => None,
        }
    }
}

/// Unvalidated filters for listing meetings, as supplied by a caller
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingsParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub only_participated: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_type: Option<String>,
}

/// Filters that passed validation, with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct MeetingsQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
    pub limit: u32,
    pub from: Option<String>,
    pub to: Option<String>,
    pub only_participated: Option<bool>,
    pub meeting_type: Option<MeetingType>,
}

impl MeetingsParams {
    pub fn validate(&self) -> Result<MeetingsQuery, Violations> {
        let mut violations = Violations::new();

        let page = positive("page", self.page, &mut violations);
        let limit = positive("limit", self.limit, &mut violations).unwrap_or(DEFAULT_PAGE_LIMIT);

        for (field, value) in [("from", &self.from), ("to", &self.to)] {
            if let Some(value) = value {
                if !is_iso_datetime(value) {
                    violations.push(field, format!("'{}' is not an ISO-8601 date-time", value));
                }
            }
        }

        let meeting_type = match self.meeting_type.as_deref() {
            None => None,
            Some(value) => {
                let parsed = MeetingType::parse(value);
                if parsed.is_none() {
                    violations.push(
                        "meetingType",
                        format!("'{}' must be one of: internal, external", value),
                    );
                }
                parsed
            }
        };

        violations.into_result(MeetingsQuery {
            query: self.query.clone(),
            page,
            limit,
            from: self.from.clone(),
            to: self.to.clone(),
            only_participated: self.only_participated,
            meeting_type,
        })
    }
}

fn positive(field: &str, value: Option<i64>, violations: &mut Violations) -> Option<u32> {
    let value = value?;
    if value <= 0 {
        violations.push(field, "must be a positive integer");
        return None;
    }
    match u32::try_from(value) {
        Ok(v) => Some(v),
        Err(_) => {
            violations.push(field, format!("must not exceed {}", u32::MAX));
            None
        }
    }
}

impl MeetingsQuery {
    /// Query-string pairs in wire order; unset filters are left out entirely.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(query) = &self.query {
            pairs.push(("query", query.clone()));
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        pairs.push(("limit", self.limit.to_string()));
        if let Some(from) = &self.from {
            pairs.push(("from", from.clone()));
        }
        if let Some(to) = &self.to {
            pairs.push(("to", to.clone()));
        }
        if let Some(only_participated) = self.only_participated {
            pairs.push(("onlyParticipated", only_participated.to_string()));
        }
        if let Some(meeting_type) = self.meeting_type {
            pairs.push(("meetingType", meeting_type.as_str().to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pairs(params: MeetingsParams) -> Vec<(&'static str, String)> {
        params.validate().unwrap().to_query_pairs()
    }

    #[test]
    fn test_empty_params_only_send_default_limit() {
        assert_eq!(
            pairs(MeetingsParams::default()),
            vec![("limit", "50".to_string())]
        );
    }

    #[test]
    fn test_page_and_limit_only() {
        let params = MeetingsParams {
            page: Some(2),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(
            pairs(params),
            vec![("page", "2".to_string()), ("limit", "10".to_string())]
        );
    }

    #[test]
    fn test_all_filters_in_wire_order() {
        let params = MeetingsParams {
            query: Some("roadmap".to_string()),
            page: Some(1),
            limit: Some(5),
            from: Some("2024-01-01T00:00:00Z".to_string()),
            to: Some("2024-02-01T00:00:00Z".to_string()),
            only_participated: Some(true),
            meeting_type: Some("external".to_string()),
        };
        let keys: Vec<&str> = pairs(params).into_iter().map(|(k, _)| k).collect();
        assert_eq!(
            keys,
            vec!["query", "page", "limit", "from", "to", "onlyParticipated", "meetingType"]
        );
    }

    #[test]
    fn test_negative_and_zero_page_rejected() {
        for page in [-1, 0] {
            let params = MeetingsParams {
                page: Some(page),
                ..Default::default()
            };
            let violations = params.validate().unwrap_err();
            assert_eq!(violations.len(), 1);
            assert!(violations.to_string().starts_with("page:"));
        }
    }

    #[test]
    fn test_oversized_limit_rejected() {
        let params = MeetingsParams {
            limit: Some(i64::from(u32::MAX) + 1),
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_collects_every_violation() {
        let params = MeetingsParams {
            page: Some(-3),
            from: Some("last week".to_string()),
            to: Some("2024-13-45".to_string()),
            meeting_type: Some("hybrid".to_string()),
            ..Default::default()
        };
        let violations = params.validate().unwrap_err();
        let fields: Vec<&str> = violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["page", "from", "to", "meetingType"]);
    }

    #[test]
    fn test_meeting_decodes_camel_case() {
        let meeting: Meeting = serde_json::from_value(json!({
            "id": "m1",
            "name": "Standup",
            "happenedAt": "2024-01-31T09:00:00Z",
            "url": "https://tldv.io/app/meetings/m1",
            "organizer": {"name": "Ana", "email": "ana@example.com"},
            "invitees": [{"name": "Bo", "email": "bo@example.com"}],
            "template": {"id": "t1", "label": "Daily"}
        }))
        .unwrap();

        assert_eq!(meeting.happened_at, "2024-01-31T09:00:00Z");
        assert_eq!(meeting.invitees.len(), 1);
        assert!(meeting.validate().is_ok());
    }

    #[test]
    fn test_unknown_fields_survive_reserialization() {
        let raw = json!({
            "id": "m1",
            "name": "Standup",
            "happenedAt": "2024-01-31T09:00:00Z",
            "url": "https://tldv.io/app/meetings/m1",
            "duration": 1800,
            "organizer": {"name": "Ana", "email": "ana@example.com", "role": "host"},
            "invitees": []
        });
        let meeting: Meeting = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(meeting.extra["duration"], 1800);

        let rendered = serde_json::to_value(&meeting).unwrap();
        assert_eq!(rendered, raw);
    }

    #[test]
    fn test_meeting_with_bad_invitee_email() {
        let meeting = Meeting {
            id: "m1".to_string(),
            name: "Standup".to_string(),
            happened_at: "2024-01-31T09:00:00Z".to_string(),
            url: "https://tldv.io".to_string(),
            organizer: None,
            invitees: vec![User {
                name: "Bo".to_string(),
                email: "not-an-email".to_string(),
                extra: Default::default(),
            }],
            template: None,
            extra: Default::default(),
        };
        let violations = meeting.validate().unwrap_err();
        assert!(violations.to_string().starts_with("invitees.[0].email"));
    }

    #[test]
    fn test_highlight_source_is_closed_set() {
        let ok: Result<HighlightSource, _> = serde_json::from_value(json!("auto"));
        assert_eq!(ok.unwrap(), HighlightSource::Auto);

        let bad: Result<HighlightSource, _> = serde_json::from_value(json!("ai"));
        assert!(bad.is_err());
    }

    #[test]
    fn test_failure_envelope_never_has_empty_message() {
        let response: ApiResponse<Meeting> = ApiResponse::failure("");
        assert_eq!(response.error.as_deref(), Some(UNKNOWN_ERROR));
        assert!(response.data.is_none());
    }

    #[test]
    fn test_success_envelope_serializes_without_error() {
        let response = ApiResponse::success(HealthStatus {
            status: "ok".to_string(),
            extra: Default::default(),
        });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({"data": {"status": "ok"}})
        );
        assert_eq!(
            serde_json::to_value(ApiResponse::<HealthStatus>::failure("down")).unwrap(),
            json!({"data": null, "error": "down"})
        );
    }
}
