pub mod client;
pub mod models;
pub mod retry;
pub mod validation;

pub use client::{ApiConfig, TldvClient, API_KEY_ENV, DEFAULT_BASE_URL};
pub use models::{
    ApiResponse, HealthStatus, Highlight, HighlightSource, Meeting, MeetingList, MeetingType,
    MeetingsParams, MeetingsQuery, Sentence, Template, Topic, User,
};
pub use retry::RetryPolicy;
pub use validation::{Validate, Violation, Violations};
