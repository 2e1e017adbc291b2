//! API middleware components

pub mod logging;
pub mod origin;

pub use logging::logging_middleware;
pub use origin::RequestOrigin;
