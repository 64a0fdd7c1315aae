use crate::{
    client::{
        reuse::{Lifo, ReuseStrategy},
        ClientBuilder,
    },
    schema::{SchemaClient, TableDescriptor, TableSchema},
    BootstrapResult,
};
use secstr::SecUtf8;
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};
use url::Url;

/// The client handle produced by [`ClientBuilder::build`].
///
/// The handle is immutable with respect to its configuration; the only
/// mutable state is the table registry that the
/// [`SchemaRegistrar`](crate::SchemaRegistrar) fills during startup.
///
/// All configuration getters reflect the builder value if one was set, and
/// the library default otherwise.
#[derive(Debug)]
pub struct Client {
    endpoint: Url,
    username: String,
    password: SecUtf8,
    reuse_strategy: Arc<dyn ReuseStrategy>,
    options: ClientBuilder,
    registered: Mutex<HashMap<String, TableSchema>>,
}

impl Client {
    /// Returns a new builder for `Client`.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    pub(crate) fn new(endpoint: Url, options: ClientBuilder) -> Self {
        Self {
            endpoint,
            username: options
                .get_username()
                .unwrap_or(ClientBuilder::DEFAULT_USERNAME)
                .to_owned(),
            password: options
                .get_password()
                .cloned()
                .unwrap_or_else(|| SecUtf8::from("")),
            reuse_strategy: options
                .get_connection_reuse_strategy_arc()
                .unwrap_or_else(|| Arc::new(Lifo)),
            options,
            registered: Mutex::new(HashMap::new()),
        }
    }

    /// The connection target.
    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }

    /// The database user.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password.
    pub fn password(&self) -> &SecUtf8 {
        &self.password
    }

    /// The access token, if one was configured.
    pub fn access_token(&self) -> Option<&SecUtf8> {
        self.options.get_access_token()
    }

    /// Whether client certificate authentication is used.
    pub fn use_ssl_authentication(&self) -> bool {
        self.options.get_use_ssl_authentication().unwrap_or(false)
    }

    /// Whether connections are pooled.
    pub fn enable_connection_pool(&self) -> bool {
        self.options.get_enable_connection_pool().unwrap_or(true)
    }

    /// The timeout for establishing a connection.
    pub fn connect_timeout(&self) -> Duration {
        self.options
            .get_connect_timeout()
            .unwrap_or(ClientBuilder::DEFAULT_CONNECT_TIMEOUT)
    }

    /// The timeout for leasing a connection from the pool.
    pub fn connection_request_timeout(&self) -> Duration {
        self.options
            .get_connection_request_timeout()
            .unwrap_or(ClientBuilder::DEFAULT_CONNECTION_REQUEST_TIMEOUT)
    }

    /// The timeout for socket reads.
    pub fn socket_timeout(&self) -> Duration {
        self.options
            .get_socket_timeout()
            .unwrap_or(ClientBuilder::DEFAULT_SOCKET_TIMEOUT)
    }

    /// The maximum lifetime of a pooled connection; `None` means unlimited.
    pub fn connection_ttl(&self) -> Option<Duration> {
        self.options.get_connection_ttl()
    }

    /// The keep-alive timeout; `None` means server-driven.
    pub fn keep_alive_timeout(&self) -> Option<Duration> {
        self.options.get_keep_alive_timeout()
    }

    /// The overall execution timeout; zero means unlimited.
    pub fn execution_timeout(&self) -> Duration {
        self.options
            .get_execution_timeout()
            .unwrap_or(ClientBuilder::DEFAULT_EXECUTION_TIMEOUT)
    }

    /// The socket receive buffer size; `None` means OS default.
    pub fn socket_rcvbuf(&self) -> Option<u64> {
        self.options.get_socket_rcvbuf()
    }

    /// The socket send buffer size; `None` means OS default.
    pub fn socket_sndbuf(&self) -> Option<u64> {
        self.options.get_socket_sndbuf()
    }

    /// The TCP keep-alive flag; `None` means OS default.
    pub fn socket_keep_alive(&self) -> Option<bool> {
        self.options.get_socket_keep_alive()
    }

    /// The TCP no-delay flag; `None` means OS default.
    pub fn socket_tcp_no_delay(&self) -> Option<bool> {
        self.options.get_socket_tcp_no_delay()
    }

    /// The `SO_LINGER` value in seconds; `None` means OS default.
    pub fn socket_linger(&self) -> Option<u32> {
        self.options.get_socket_linger()
    }

    /// Whether client requests are compressed.
    pub fn compress_client_request(&self) -> bool {
        self.options.get_compress_client_request().unwrap_or(false)
    }

    /// Whether server responses are compressed.
    pub fn compress_server_response(&self) -> bool {
        self.options.get_compress_server_response().unwrap_or(true)
    }

    /// Whether compression happens on the HTTP transport level.
    pub fn use_http_compression(&self) -> bool {
        self.options.get_use_http_compression().unwrap_or(false)
    }

    /// The buffer size used when decompressing LZ4 data.
    pub fn lz4_uncompressed_buffer_size(&self) -> usize {
        self.options
            .get_lz4_uncompressed_buffer_size()
            .unwrap_or(ClientBuilder::DEFAULT_LZ4_UNCOMPRESSED_BUFFER_SIZE)
    }

    /// The database used when a query does not specify one.
    pub fn default_database(&self) -> Option<&str> {
        self.options.get_default_database()
    }

    /// The connection reuse strategy.
    pub fn connection_reuse_strategy(&self) -> &dyn ReuseStrategy {
        &*self.reuse_strategy
    }

    /// Whether the HTTP transport accepts cookies.
    pub fn http_cookies_enabled(&self) -> bool {
        self.options.get_http_cookies_enabled().unwrap_or(true)
    }

    /// The additional HTTP headers.
    pub fn http_headers(&self) -> &HashMap<String, String> {
        self.options.get_http_headers()
    }

    /// The path to the TLS trust store, if one was configured.
    pub fn ssl_trust_store_path(&self) -> Option<&str> {
        self.options.get_ssl_trust_store_path()
    }

    /// The password of the TLS trust store, if one was configured.
    pub fn ssl_trust_store_password(&self) -> Option<&SecUtf8> {
        self.options.get_ssl_trust_store_password()
    }

    /// The type of the TLS trust store, if one was configured.
    pub fn ssl_trust_store_type(&self) -> Option<&str> {
        self.options.get_ssl_trust_store_type()
    }

    /// The root certificate, if one was configured.
    pub fn root_certificate(&self) -> Option<&str> {
        self.options.get_root_certificate()
    }

    /// The client certificate, if one was configured.
    pub fn client_certificate(&self) -> Option<&str> {
        self.options.get_client_certificate()
    }

    /// The client key, if one was configured.
    pub fn client_key(&self) -> Option<&str> {
        self.options.get_client_key()
    }

    /// Whether date/time values are interpreted in the server's timezone.
    pub fn use_server_time_zone(&self) -> bool {
        self.options.get_use_server_time_zone().unwrap_or(true)
    }

    /// The explicitly configured timezone, if any.
    pub fn time_zone(&self) -> Option<&str> {
        self.options.get_time_zone()
    }

    /// Whether requests are executed asynchronously.
    pub fn use_async_requests(&self) -> bool {
        self.options.get_use_async_requests().unwrap_or(false)
    }

    /// The size of the client's network buffer in bytes.
    pub fn client_network_buffer_size(&self) -> usize {
        self.options
            .get_client_network_buffer_size()
            .unwrap_or(ClientBuilder::DEFAULT_CLIENT_NETWORK_BUFFER_SIZE)
    }

    /// The maximum number of retries for retryable failures.
    pub fn max_retries(&self) -> u32 {
        self.options
            .get_max_retries()
            .unwrap_or(ClientBuilder::DEFAULT_MAX_RETRIES)
    }

    /// Whether the binary reader may reuse its buffers across rows.
    pub fn allow_binary_reader_to_reuse_buffers(&self) -> bool {
        self.options
            .get_allow_binary_reader_to_reuse_buffers()
            .unwrap_or(false)
    }

    /// The server settings that are passed through with every request.
    pub fn server_settings(&self) -> &HashMap<String, String> {
        self.options.get_server_settings()
    }

    /// The table names that have been registered with this handle, sorted.
    pub fn registered_tables(&self) -> BootstrapResult<Vec<String>> {
        let guard = self.registered.lock()?;
        let mut names: Vec<String> = guard.values().map(|s| s.table_name().to_owned()).collect();
        names.sort();
        Ok(names)
    }

    /// The schema registered for the given entity type path, if any.
    pub fn registered_schema(&self, entity: &str) -> BootstrapResult<Option<TableSchema>> {
        Ok(self.registered.lock()?.get(entity).cloned())
    }
}

impl SchemaClient for Client {
    /// Produces the schema shell for the given table.
    ///
    /// Column detail is filled in by the wire layer below when the table is
    /// first described; at bootstrap time only name and database are known.
    fn table_schema(&self, table_name: &str) -> BootstrapResult<TableSchema> {
        let mut schema = TableSchema::named(table_name);
        if let Some(db) = self.default_database() {
            schema = schema.in_database(db);
        }
        Ok(schema)
    }

    fn register(&self, descriptor: &TableDescriptor, schema: TableSchema) -> BootstrapResult<()> {
        debug!(
            "registering table {} for entity {}",
            schema.table_name(),
            descriptor.entity()
        );
        self.registered
            .lock()?
            .insert(descriptor.entity().to_owned(), schema);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Client, ClientBuilder, ReuseStrategy};
    use std::time::Duration;

    #[test]
    fn test_library_defaults() {
        let client = Client::builder()
            .endpoint("http://localhost:8123")
            .build()
            .unwrap();
        assert_eq!(client.username(), "default");
        assert_eq!(client.password().unsecure(), "");
        assert_eq!(
            client.connect_timeout(),
            ClientBuilder::DEFAULT_CONNECT_TIMEOUT
        );
        assert_eq!(client.execution_timeout(), Duration::ZERO);
        assert_eq!(client.connection_ttl(), None);
        assert!(client.enable_connection_pool());
        assert!(client.compress_server_response());
        assert!(!client.compress_client_request());
        assert!(client.use_server_time_zone());
        assert_eq!(client.connection_reuse_strategy().name(), "lifo");
        assert_eq!(client.max_retries(), ClientBuilder::DEFAULT_MAX_RETRIES);
    }
}
