pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod telemetry;
pub mod tools;

pub use api::{ApiConfig, ApiResponse, TldvClient};
pub use error::{Result, TldvError};
pub use server::TldvServer;
