//! Declarative connection settings.
use crate::{settings::duration_format, BootstrapError, BootstrapResult};
use secstr::SecUtf8;
use serde::{Deserialize, Deserializer};
use std::{collections::HashMap, path::Path, time::Duration};

/// General settings and parameters for the configuration of a
/// [`Client`](crate::Client).
///
/// Every field is independently optional; a field that is left unset never
/// overrides the corresponding builder default. Note that "unset" (`None`)
/// is different from "set to a falsy value" like `Some(false)`, `Some(0)`,
/// or an empty string -- the latter are applied verbatim.
///
/// The only field that is eventually required is `endpoint`; its absence
/// surfaces as a usage error when the client is built, not here.
///
/// `ConnectionSettings` can be deserialized from any serde source; keys use
/// the `camelCase` spelling of the configuration surface:
///
/// ```rust
/// use clickhouse_bootstrap::ConnectionSettings;
///
/// let settings: ConnectionSettings = serde_json::from_str(
///     r#"{
///         "endpoint": "http://localhost:8123",
///         "username": "default",
///         "connectTimeout": "5s",
///         "compressServerResponse": true
///     }"#,
/// )
/// .unwrap();
/// assert_eq!(settings.endpoint.as_deref(), Some("http://localhost:8123"));
/// assert_eq!(settings.compress_client_request, None);
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConnectionSettings {
    /// Connection target, e.g. `http://localhost:8123`.
    pub endpoint: Option<String>,
    /// Name of the database user.
    pub username: Option<String>,
    /// Password of the database user.
    #[serde(deserialize_with = "de_opt_secret")]
    pub password: Option<SecUtf8>,
    /// Access token, as an alternative to password authentication.
    #[serde(deserialize_with = "de_opt_secret")]
    pub access_token: Option<SecUtf8>,

    /// Whether client certificate authentication is to be used.
    #[serde(rename = "useSSLAuthentication")]
    pub use_ssl_authentication: Option<bool>,
    /// Whether the underlying client should pool connections.
    pub enable_connection_pool: Option<bool>,

    /// Timeout for establishing a connection.
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub connect_timeout: Option<Duration>,
    /// Timeout for obtaining a connection from the pool.
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub connection_request_timeout: Option<Duration>,
    /// Timeout for socket reads.
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub socket_timeout: Option<Duration>,
    /// Maximum lifetime of a pooled connection.
    #[serde(
        rename = "connectionTTL",
        deserialize_with = "duration_format::deserialize"
    )]
    pub connection_ttl: Option<Duration>,
    /// Keep-alive timeout for idle connections.
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub keep_alive_timeout: Option<Duration>,
    /// Overall timeout for the execution of a request.
    #[serde(deserialize_with = "duration_format::deserialize")]
    pub execution_timeout: Option<Duration>,

    /// Socket receive buffer size in bytes.
    pub socket_rcvbuf: Option<u64>,
    /// Socket send buffer size in bytes.
    pub socket_sndbuf: Option<u64>,
    /// Whether TCP keep-alive is enabled on the socket.
    pub socket_keep_alive: Option<bool>,
    /// Whether Nagle's algorithm is disabled on the socket.
    pub socket_tcp_no_delay: Option<bool>,
    /// `SO_LINGER` value in seconds.
    pub socket_linger: Option<u32>,

    /// Whether client requests are compressed.
    pub compress_client_request: Option<bool>,
    /// Whether server responses are compressed.
    pub compress_server_response: Option<bool>,
    /// Whether compression happens on the HTTP transport level.
    pub use_http_compression: Option<bool>,
    /// Buffer size used when decompressing LZ4 data, in bytes.
    pub lz4_uncompressed_buffer_size: Option<usize>,

    /// Database to use when a query does not specify one.
    pub default_database: Option<String>,

    /// Name of the connection reuse strategy, resolved against a
    /// [`StrategyRegistry`](crate::StrategyRegistry).
    pub connection_reuse_strategy: Option<String>,

    /// Whether the HTTP transport accepts cookies.
    pub http_cookies_enabled: Option<bool>,
    /// Additional HTTP headers, all entries are applied.
    pub http_headers: HashMap<String, String>,

    /// Path to the TLS trust store.
    pub ssl_trust_store_path: Option<String>,
    /// Password of the TLS trust store.
    #[serde(deserialize_with = "de_opt_secret")]
    pub ssl_trust_store_password: Option<SecUtf8>,
    /// Type of the TLS trust store, e.g. `JKS` or `PKCS12`.
    pub ssl_trust_store_type: Option<String>,
    /// Root certificate, as a path to a PEM file.
    pub root_certificate: Option<String>,
    /// Client certificate, as a path to a PEM file.
    pub client_certificate: Option<String>,
    /// Client key, as a path to a PEM file.
    pub client_key: Option<String>,

    /// Whether date/time values are interpreted in the server's timezone.
    pub use_server_time_zone: Option<bool>,
    /// Explicit timezone for interpreting date/time values.
    ///
    /// Takes precedence over `server_time_zone` if both are set.
    pub use_time_zone: Option<String>,
    /// Timezone the server is assumed to run in.
    pub server_time_zone: Option<String>,

    /// Whether requests are executed asynchronously.
    pub use_async_requests: Option<bool>,
    /// Size of the client's network buffer in bytes.
    pub client_network_buffer_size: Option<usize>,

    /// Maximum number of retries for retryable failures.
    pub max_retries: Option<u32>,
    /// Whether the binary reader may reuse its buffers across rows.
    pub allow_binary_reader_to_reuse_buffers: Option<bool>,

    /// Arbitrary server settings, passed through to the server.
    ///
    /// Only the first-iterated entry is applied (see
    /// [`ClientFactory::builder`](crate::ClientFactory::builder)).
    #[serde(rename = "serverSetting")]
    pub server_settings: HashMap<String, String>,
}

impl ConnectionSettings {
    /// Returns empty settings; useful as a starting point for programmatic
    /// configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads settings from the given JSON file.
    ///
    /// # Errors
    /// `BootstrapError::Io` if the file cannot be read,
    /// `BootstrapError::Settings` if its content is malformed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> BootstrapResult<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| BootstrapError::settings(Box::new(e)))
    }
}

fn de_opt_secret<'de, D>(deserializer: D) -> Result<Option<SecUtf8>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.map(SecUtf8::from))
}
