//! A builder for [`Client`](crate::Client).
use crate::{
    client::{reuse::ReuseStrategy, Client},
    BootstrapError, BootstrapResult,
};
use secstr::SecUtf8;
use std::{collections::HashMap, sync::Arc, time::Duration};

/// A builder for [`Client`](crate::Client).
///
/// Accumulates configuration through chained setter calls and produces the
/// finalized client handle with [`build`](ClientBuilder::build). Every
/// setting is optional except the endpoint; unset slots stay `None` in the
/// builder and fall back to the documented `DEFAULT_*` values (or to
/// "feature off") in the built client.
///
/// ```rust
/// use clickhouse_bootstrap::Client;
///
/// let client = Client::builder()
///     .endpoint("http://localhost:8123")
///     .username("default")
///     .build()
///     .unwrap();
/// assert_eq!(client.endpoint(), "http://localhost:8123/");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<SecUtf8>,
    access_token: Option<SecUtf8>,

    use_ssl_authentication: Option<bool>,
    enable_connection_pool: Option<bool>,

    connect_timeout: Option<Duration>,
    connection_request_timeout: Option<Duration>,
    socket_timeout: Option<Duration>,
    connection_ttl: Option<Duration>,
    keep_alive_timeout: Option<Duration>,
    execution_timeout: Option<Duration>,

    socket_rcvbuf: Option<u64>,
    socket_sndbuf: Option<u64>,
    socket_keep_alive: Option<bool>,
    socket_tcp_no_delay: Option<bool>,
    socket_linger: Option<u32>,

    compress_client_request: Option<bool>,
    compress_server_response: Option<bool>,
    use_http_compression: Option<bool>,
    lz4_uncompressed_buffer_size: Option<usize>,

    default_database: Option<String>,
    reuse_strategy: Option<Arc<dyn ReuseStrategy>>,

    http_cookies_enabled: Option<bool>,
    http_headers: HashMap<String, String>,

    ssl_trust_store_path: Option<String>,
    ssl_trust_store_password: Option<SecUtf8>,
    ssl_trust_store_type: Option<String>,
    root_certificate: Option<String>,
    client_certificate: Option<String>,
    client_key: Option<String>,

    use_server_time_zone: Option<bool>,
    time_zone: Option<String>,

    use_async_requests: Option<bool>,
    client_network_buffer_size: Option<usize>,

    max_retries: Option<u32>,
    allow_binary_reader_to_reuse_buffers: Option<bool>,

    server_settings: HashMap<String, String>,
}

impl ClientBuilder {
    /// Default username, the ClickHouse `default` user.
    pub const DEFAULT_USERNAME: &'static str = "default";

    /// Default timeout for establishing a connection.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default timeout for leasing a connection from the pool.
    pub const DEFAULT_CONNECTION_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

    /// Default timeout for socket reads.
    pub const DEFAULT_SOCKET_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default execution timeout; zero means unlimited.
    pub const DEFAULT_EXECUTION_TIMEOUT: Duration = Duration::ZERO;

    /// Default buffer size for LZ4 decompression.
    pub const DEFAULT_LZ4_UNCOMPRESSED_BUFFER_SIZE: usize = 64 * 1_024;

    /// Default size of the client's network buffer.
    pub const DEFAULT_CLIENT_NETWORK_BUFFER_SIZE: usize = 300_000;

    /// Default number of retries for retryable failures.
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the connection target, e.g. `http://localhost:8123`.
    pub fn endpoint<E: AsRef<str>>(&mut self, endpoint: E) -> &mut Self {
        self.endpoint = Some(endpoint.as_ref().to_owned());
        self
    }

    /// Sets the database user.
    pub fn username<U: AsRef<str>>(&mut self, username: U) -> &mut Self {
        self.username = Some(username.as_ref().to_owned());
        self
    }

    /// Sets the password.
    pub fn password<P: AsRef<str>>(&mut self, pw: P) -> &mut Self {
        self.password = Some(SecUtf8::from(pw.as_ref()));
        self
    }

    /// Sets the access token.
    pub fn access_token<T: AsRef<str>>(&mut self, token: T) -> &mut Self {
        self.access_token = Some(SecUtf8::from(token.as_ref()));
        self
    }

    /// Defines whether client certificate authentication is to be used.
    pub fn use_ssl_authentication(&mut self, value: bool) -> &mut Self {
        self.use_ssl_authentication = Some(value);
        self
    }

    /// Defines whether connections are pooled.
    pub fn enable_connection_pool(&mut self, value: bool) -> &mut Self {
        self.enable_connection_pool = Some(value);
        self
    }

    /// Sets the timeout for establishing a connection.
    pub fn connect_timeout(&mut self, value: Duration) -> &mut Self {
        self.connect_timeout = Some(value);
        self
    }

    /// Sets the timeout for leasing a connection from the pool.
    pub fn connection_request_timeout(&mut self, value: Duration) -> &mut Self {
        self.connection_request_timeout = Some(value);
        self
    }

    /// Sets the timeout for socket reads.
    pub fn socket_timeout(&mut self, value: Duration) -> &mut Self {
        self.socket_timeout = Some(value);
        self
    }

    /// Sets the maximum lifetime of a pooled connection.
    pub fn connection_ttl(&mut self, value: Duration) -> &mut Self {
        self.connection_ttl = Some(value);
        self
    }

    /// Sets the keep-alive timeout for idle connections.
    pub fn keep_alive_timeout(&mut self, value: Duration) -> &mut Self {
        self.keep_alive_timeout = Some(value);
        self
    }

    /// Sets the overall timeout for the execution of a request.
    pub fn execution_timeout(&mut self, value: Duration) -> &mut Self {
        self.execution_timeout = Some(value);
        self
    }

    /// Sets the socket receive buffer size in bytes.
    pub fn socket_rcvbuf(&mut self, value: u64) -> &mut Self {
        self.socket_rcvbuf = Some(value);
        self
    }

    /// Sets the socket send buffer size in bytes.
    pub fn socket_sndbuf(&mut self, value: u64) -> &mut Self {
        self.socket_sndbuf = Some(value);
        self
    }

    /// Defines whether TCP keep-alive is enabled on the socket.
    pub fn socket_keep_alive(&mut self, value: bool) -> &mut Self {
        self.socket_keep_alive = Some(value);
        self
    }

    /// Defines whether Nagle's algorithm is disabled on the socket.
    pub fn socket_tcp_no_delay(&mut self, value: bool) -> &mut Self {
        self.socket_tcp_no_delay = Some(value);
        self
    }

    /// Sets the `SO_LINGER` value in seconds.
    pub fn socket_linger(&mut self, value: u32) -> &mut Self {
        self.socket_linger = Some(value);
        self
    }

    /// Defines whether client requests are compressed.
    pub fn compress_client_request(&mut self, value: bool) -> &mut Self {
        self.compress_client_request = Some(value);
        self
    }

    /// Defines whether server responses are compressed.
    pub fn compress_server_response(&mut self, value: bool) -> &mut Self {
        self.compress_server_response = Some(value);
        self
    }

    /// Defines whether compression happens on the HTTP transport level.
    pub fn use_http_compression(&mut self, value: bool) -> &mut Self {
        self.use_http_compression = Some(value);
        self
    }

    /// Sets the buffer size used when decompressing LZ4 data.
    pub fn lz4_uncompressed_buffer_size(&mut self, value: usize) -> &mut Self {
        self.lz4_uncompressed_buffer_size = Some(value);
        self
    }

    /// Sets the database to use when a query does not specify one.
    pub fn default_database<D: AsRef<str>>(&mut self, db: D) -> &mut Self {
        self.default_database = Some(db.as_ref().to_owned());
        self
    }

    /// Sets the connection reuse strategy.
    pub fn connection_reuse_strategy(&mut self, strategy: Arc<dyn ReuseStrategy>) -> &mut Self {
        self.reuse_strategy = Some(strategy);
        self
    }

    /// Defines whether the HTTP transport accepts cookies.
    pub fn http_cookies_enabled(&mut self, value: bool) -> &mut Self {
        self.http_cookies_enabled = Some(value);
        self
    }

    /// Adds a single HTTP header.
    pub fn http_header<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) -> &mut Self {
        self.http_headers
            .insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }

    /// Adds all entries of the given map as HTTP headers.
    pub fn http_headers(&mut self, headers: &HashMap<String, String>) -> &mut Self {
        self.http_headers
            .extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));
        self
    }

    /// Sets the path to the TLS trust store.
    pub fn ssl_trust_store_path<P: AsRef<str>>(&mut self, path: P) -> &mut Self {
        self.ssl_trust_store_path = Some(path.as_ref().to_owned());
        self
    }

    /// Sets the password of the TLS trust store.
    pub fn ssl_trust_store_password<P: AsRef<str>>(&mut self, pw: P) -> &mut Self {
        self.ssl_trust_store_password = Some(SecUtf8::from(pw.as_ref()));
        self
    }

    /// Sets the type of the TLS trust store.
    pub fn ssl_trust_store_type<T: AsRef<str>>(&mut self, ty: T) -> &mut Self {
        self.ssl_trust_store_type = Some(ty.as_ref().to_owned());
        self
    }

    /// Sets the root certificate (path to a PEM file).
    pub fn root_certificate<C: AsRef<str>>(&mut self, cert: C) -> &mut Self {
        self.root_certificate = Some(cert.as_ref().to_owned());
        self
    }

    /// Sets the client certificate (path to a PEM file).
    pub fn client_certificate<C: AsRef<str>>(&mut self, cert: C) -> &mut Self {
        self.client_certificate = Some(cert.as_ref().to_owned());
        self
    }

    /// Sets the client key (path to a PEM file).
    pub fn client_key<K: AsRef<str>>(&mut self, key: K) -> &mut Self {
        self.client_key = Some(key.as_ref().to_owned());
        self
    }

    /// Defines whether date/time values are interpreted in the server's
    /// timezone.
    pub fn use_server_time_zone(&mut self, value: bool) -> &mut Self {
        self.use_server_time_zone = Some(value);
        self
    }

    /// Sets the timezone for interpreting date/time values.
    ///
    /// This is a single slot; a second call overwrites the first.
    pub fn use_time_zone<T: AsRef<str>>(&mut self, tz: T) -> &mut Self {
        self.time_zone = Some(tz.as_ref().to_owned());
        self
    }

    /// Defines whether requests are executed asynchronously.
    pub fn use_async_requests(&mut self, value: bool) -> &mut Self {
        self.use_async_requests = Some(value);
        self
    }

    /// Sets the size of the client's network buffer in bytes.
    pub fn client_network_buffer_size(&mut self, value: usize) -> &mut Self {
        self.client_network_buffer_size = Some(value);
        self
    }

    /// Sets the maximum number of retries for retryable failures.
    pub fn max_retries(&mut self, value: u32) -> &mut Self {
        self.max_retries = Some(value);
        self
    }

    /// Defines whether the binary reader may reuse its buffers across rows.
    pub fn allow_binary_reader_to_reuse_buffers(&mut self, value: bool) -> &mut Self {
        self.allow_binary_reader_to_reuse_buffers = Some(value);
        self
    }

    /// Adds a server setting that is passed through to the server with every
    /// request.
    pub fn server_setting<K: AsRef<str>, V: AsRef<str>>(&mut self, key: K, value: V) -> &mut Self {
        self.server_settings
            .insert(key.as_ref().to_owned(), value.as_ref().to_owned());
        self
    }

    /// Getter
    pub fn get_endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Getter
    pub fn get_username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// Getter
    pub fn get_password(&self) -> Option<&SecUtf8> {
        self.password.as_ref()
    }

    /// Getter
    pub fn get_access_token(&self) -> Option<&SecUtf8> {
        self.access_token.as_ref()
    }

    /// Getter
    pub fn get_use_ssl_authentication(&self) -> Option<bool> {
        self.use_ssl_authentication
    }

    /// Getter
    pub fn get_enable_connection_pool(&self) -> Option<bool> {
        self.enable_connection_pool
    }

    /// Getter
    pub fn get_connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }

    /// Getter
    pub fn get_connection_request_timeout(&self) -> Option<Duration> {
        self.connection_request_timeout
    }

    /// Getter
    pub fn get_socket_timeout(&self) -> Option<Duration> {
        self.socket_timeout
    }

    /// Getter
    pub fn get_connection_ttl(&self) -> Option<Duration> {
        self.connection_ttl
    }

    /// Getter
    pub fn get_keep_alive_timeout(&self) -> Option<Duration> {
        self.keep_alive_timeout
    }

    /// Getter
    pub fn get_execution_timeout(&self) -> Option<Duration> {
        self.execution_timeout
    }

    /// Getter
    pub fn get_socket_rcvbuf(&self) -> Option<u64> {
        self.socket_rcvbuf
    }

    /// Getter
    pub fn get_socket_sndbuf(&self) -> Option<u64> {
        self.socket_sndbuf
    }

    /// Getter
    pub fn get_socket_keep_alive(&self) -> Option<bool> {
        self.socket_keep_alive
    }

    /// Getter
    pub fn get_socket_tcp_no_delay(&self) -> Option<bool> {
        self.socket_tcp_no_delay
    }

    /// Getter
    pub fn get_socket_linger(&self) -> Option<u32> {
        self.socket_linger
    }

    /// Getter
    pub fn get_compress_client_request(&self) -> Option<bool> {
        self.compress_client_request
    }

    /// Getter
    pub fn get_compress_server_response(&self) -> Option<bool> {
        self.compress_server_response
    }

    /// Getter
    pub fn get_use_http_compression(&self) -> Option<bool> {
        self.use_http_compression
    }

    /// Getter
    pub fn get_lz4_uncompressed_buffer_size(&self) -> Option<usize> {
        self.lz4_uncompressed_buffer_size
    }

    /// Getter
    pub fn get_default_database(&self) -> Option<&str> {
        self.default_database.as_deref()
    }

    /// Getter
    pub fn get_connection_reuse_strategy(&self) -> Option<&dyn ReuseStrategy> {
        self.reuse_strategy.as_deref()
    }

    pub(crate) fn get_connection_reuse_strategy_arc(&self) -> Option<Arc<dyn ReuseStrategy>> {
        self.reuse_strategy.clone()
    }

    /// Getter
    pub fn get_http_cookies_enabled(&self) -> Option<bool> {
        self.http_cookies_enabled
    }

    /// Getter
    pub fn get_http_headers(&self) -> &HashMap<String, String> {
        &self.http_headers
    }

    /// Getter
    pub fn get_ssl_trust_store_path(&self) -> Option<&str> {
        self.ssl_trust_store_path.as_deref()
    }

    /// Getter
    pub fn get_ssl_trust_store_password(&self) -> Option<&SecUtf8> {
        self.ssl_trust_store_password.as_ref()
    }

    /// Getter
    pub fn get_ssl_trust_store_type(&self) -> Option<&str> {
        self.ssl_trust_store_type.as_deref()
    }

    /// Getter
    pub fn get_root_certificate(&self) -> Option<&str> {
        self.root_certificate.as_deref()
    }

    /// Getter
    pub fn get_client_certificate(&self) -> Option<&str> {
        self.client_certificate.as_deref()
    }

    /// Getter
    pub fn get_client_key(&self) -> Option<&str> {
        self.client_key.as_deref()
    }

    /// Getter
    pub fn get_use_server_time_zone(&self) -> Option<bool> {
        self.use_server_time_zone
    }

    /// Getter
    pub fn get_time_zone(&self) -> Option<&str> {
        self.time_zone.as_deref()
    }

    /// Getter
    pub fn get_use_async_requests(&self) -> Option<bool> {
        self.use_async_requests
    }

    /// Getter
    pub fn get_client_network_buffer_size(&self) -> Option<usize> {
        self.client_network_buffer_size
    }

    /// Getter
    pub fn get_max_retries(&self) -> Option<u32> {
        self.max_retries
    }

    /// Getter
    pub fn get_allow_binary_reader_to_reuse_buffers(&self) -> Option<bool> {
        self.allow_binary_reader_to_reuse_buffers
    }

    /// Getter
    pub fn get_server_settings(&self) -> &HashMap<String, String> {
        &self.server_settings
    }

    /// Constructs a `Client` from the builder.
    ///
    /// Unset slots fall back to the documented `DEFAULT_*` values, or leave
    /// the corresponding feature at "off" / "library-chosen".
    ///
    /// # Errors
    /// `BootstrapError::Usage` if no endpoint was configured,
    /// `BootstrapError::Endpoint` if the endpoint is not a valid URL.
    pub fn build(&self) -> BootstrapResult<Client> {
        let endpoint = self
            .endpoint
            .as_ref()
            .ok_or_else(|| BootstrapError::Usage("endpoint is missing"))?;
        let endpoint = url::Url::parse(endpoint)?;

        Ok(Client::new(endpoint, self.clone()))
    }
}
