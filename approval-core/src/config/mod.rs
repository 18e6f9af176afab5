pub mod settings;

pub use settings::{DatabaseConfig, LoggingConfig, Settings, StorageConfig};
