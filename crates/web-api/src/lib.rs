pub mod error;
pub mod handlers;
pub mod server;

pub use error::{ApiError, ErrorResponse};
pub use handlers::AppState;
pub use server::ApiServer;
