pub mod config;
pub mod logging;

pub use config::{ConfigProvider, EnvConfig, MemoryConfig};
pub use logging::{init_logging, LoggingConfig};
