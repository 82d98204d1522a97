pub mod files;
pub mod handlers;
pub mod middleware;
pub mod play;
pub mod routes;
pub mod search;
pub mod streams;

pub use routes::create_router;

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}
