pub mod activity_recorder;
pub mod api;
pub mod error;
pub mod health;
pub mod logger;
pub mod routes;
pub mod server_state;

#[cfg(test)]
mod tests;

pub use activity_recorder::ActivityRecorder;
pub use api::error::{ApiError, Result as ApiResult};
pub use api::status::{ActivityStatusResponse, ConnectionCounts};
pub use error::{Result, ServerError};
pub use routes::build_router;
pub use server_state::ServerState;
