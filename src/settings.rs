mod connection_settings;
pub(crate) mod duration_format;

pub use connection_settings::ConnectionSettings;
