mod error;
pub use error::ApiError;

mod handler;
pub use handler::CommandHandler;

mod http;
pub use http::HttpApi;

pub use axum;
