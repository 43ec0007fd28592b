//! Utility modules for toolgate

pub mod logging;

pub use logging::{init_logging, LoggingConfig};
