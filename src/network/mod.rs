pub mod client;
pub mod error;
pub mod error_handler;
pub mod query;
pub mod result;
pub mod transport;

pub use client::{RequestClient, RequestHandle};
pub use error::ApiError;
pub use error_handler::{ErrorHandler, ResponseOutcome};
pub use query::QueryParams;
pub use result::RequestResult;
pub use transport::{HttpTransport, Transport};
