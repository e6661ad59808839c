pub mod error;
pub mod logging;

pub use error::{ConfigError, NotifyError};
pub use logging::{setup_logging, LogFormat, LogOutput, LoggingConfig};
