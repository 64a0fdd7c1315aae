// advisable because not all test modules use all functions of this module:
#![allow(dead_code)]

use clickhouse_bootstrap::ConnectionSettings;
use flexi_logger::{Logger, LoggerHandle};

// Returns a logger that prints out all info, warn and error messages.
pub fn init_logger() -> LoggerHandle {
    Logger::try_with_env_or_str("info")
        .unwrap()
        .start()
        .unwrap_or_else(|e| panic!("Logger initialization failed with {e}"))
}

pub fn endpoint_only_settings() -> ConnectionSettings {
    let mut settings = ConnectionSettings::new();
    settings.endpoint = Some("http://localhost:8123".to_owned());
    settings
}
