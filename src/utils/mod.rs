pub mod config;

pub use config::{ChainConfig, ConfigError, LogFormat, ProviderConfig, RuntimeConfig};
