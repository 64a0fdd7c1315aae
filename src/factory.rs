//! Translation of [`ConnectionSettings`] into a configured [`ClientBuilder`].
use crate::{
    client::{ClientBuilder, StrategyRegistry},
    settings::ConnectionSettings,
    BootstrapResult, Client,
};

/// Translates [`ConnectionSettings`] into a configured
/// [`ClientBuilder`] and builds the [`Client`] from it.
///
/// Each optional setting is applied to the builder only if it is present;
/// absent settings leave the builder slot untouched, so the library default
/// takes effect. The translation itself never fails -- even an unresolvable
/// connection reuse strategy is only logged (the builder keeps its default
/// strategy). A missing or malformed endpoint surfaces later, in
/// [`ClientBuilder::build`].
///
/// ```rust
/// use clickhouse_bootstrap::{ClientFactory, ConnectionSettings};
///
/// let mut settings = ConnectionSettings::new();
/// settings.endpoint = Some("http://localhost:8123".to_owned());
/// settings.username = Some("default".to_owned());
///
/// let client = ClientFactory::new(settings).build().unwrap();
/// assert_eq!(client.username(), "default");
/// ```
#[derive(Debug)]
pub struct ClientFactory {
    settings: ConnectionSettings,
    strategies: StrategyRegistry,
}

impl ClientFactory {
    /// Creates a factory for the given settings, with the default strategy
    /// registry.
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            settings,
            strategies: StrategyRegistry::with_defaults(),
        }
    }

    /// Replaces the strategy registry, e.g. to make host-defined reuse
    /// strategies resolvable.
    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategyRegistry) -> Self {
        self.strategies = strategies;
        self
    }

    /// The settings this factory translates.
    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    /// Produces a builder that is configured with every present setting.
    ///
    /// Known limitation, kept for compatibility with the original
    /// integration layer: of the `server_settings` map only the
    /// first-iterated entry is applied; all further entries are dropped with
    /// a warning. HTTP headers are applied in full.
    ///
    /// When both `use_time_zone` and `server_time_zone` are present, the
    /// explicit `use_time_zone` wins and the conflict is logged.
    #[allow(clippy::too_many_lines)]
    pub fn builder(&self) -> ClientBuilder {
        debug!("initializing client builder");
        let s = &self.settings;
        let mut builder = ClientBuilder::new();

        if let Some(ref endpoint) = s.endpoint {
            builder.endpoint(endpoint);
        }
        if let Some(ref username) = s.username {
            builder.username(username);
        }
        if let Some(ref password) = s.password {
            builder.password(password.unsecure());
        }
        if let Some(ref token) = s.access_token {
            builder.access_token(token.unsecure());
        }

        if let Some(timeout) = s.connect_timeout {
            builder.connect_timeout(timeout);
        }
        if let Some(timeout) = s.connection_request_timeout {
            builder.connection_request_timeout(timeout);
        }
        if let Some(timeout) = s.socket_timeout {
            builder.socket_timeout(timeout);
        }
        if let Some(ttl) = s.connection_ttl {
            builder.connection_ttl(ttl);
        }
        if let Some(timeout) = s.keep_alive_timeout {
            builder.keep_alive_timeout(timeout);
        }
        if let Some(timeout) = s.execution_timeout {
            builder.execution_timeout(timeout);
        }

        if let Some(size) = s.socket_rcvbuf {
            builder.socket_rcvbuf(size);
        }
        if let Some(size) = s.socket_sndbuf {
            builder.socket_sndbuf(size);
        }
        if let Some(flag) = s.socket_keep_alive {
            builder.socket_keep_alive(flag);
        }
        if let Some(flag) = s.socket_tcp_no_delay {
            builder.socket_tcp_no_delay(flag);
        }
        if let Some(linger) = s.socket_linger {
            builder.socket_linger(linger);
        }

        if let Some(flag) = s.compress_client_request {
            builder.compress_client_request(flag);
        }
        if let Some(flag) = s.compress_server_response {
            builder.compress_server_response(flag);
        }
        if let Some(flag) = s.use_http_compression {
            builder.use_http_compression(flag);
        }
        if let Some(size) = s.lz4_uncompressed_buffer_size {
            builder.lz4_uncompressed_buffer_size(size);
        }

        if let Some(ref db) = s.default_database {
            builder.default_database(db);
        }

        if let Some(ref name) = s.connection_reuse_strategy {
            match self.strategies.resolve(name) {
                Some(strategy) => {
                    builder.connection_reuse_strategy(strategy);
                }
                None => {
                    error!("failed to set connection reuse strategy '{name}', using default");
                }
            }
        }

        if let Some(flag) = s.use_ssl_authentication {
            builder.use_ssl_authentication(flag);
        }
        if let Some(flag) = s.enable_connection_pool {
            builder.enable_connection_pool(flag);
        }

        if let Some(flag) = s.http_cookies_enabled {
            builder.http_cookies_enabled(flag);
        }
        if let Some(ref path) = s.ssl_trust_store_path {
            builder.ssl_trust_store_path(path);
        }
        if let Some(ref pw) = s.ssl_trust_store_password {
            builder.ssl_trust_store_password(pw.unsecure());
        }
        if let Some(ref ty) = s.ssl_trust_store_type {
            builder.ssl_trust_store_type(ty);
        }
        if let Some(ref cert) = s.root_certificate {
            builder.root_certificate(cert);
        }
        if let Some(ref cert) = s.client_certificate {
            builder.client_certificate(cert);
        }
        if let Some(ref key) = s.client_key {
            builder.client_key(key);
        }

        if let Some(flag) = s.use_server_time_zone {
            builder.use_server_time_zone(flag);
        }
        match (&s.use_time_zone, &s.server_time_zone) {
            (Some(tz), Some(server_tz)) => {
                warn!(
                    "both useTimeZone ('{tz}') and serverTimeZone ('{server_tz}') are set; \
                     using the explicit useTimeZone"
                );
                builder.use_time_zone(tz);
            }
            (Some(tz), None) | (None, Some(tz)) => {
                builder.use_time_zone(tz);
            }
            (None, None) => {}
        }

        if let Some(flag) = s.use_async_requests {
            builder.use_async_requests(flag);
        }
        if let Some(size) = s.client_network_buffer_size {
            builder.client_network_buffer_size(size);
        }

        if let Some(retries) = s.max_retries {
            builder.max_retries(retries);
        }
        if let Some(flag) = s.allow_binary_reader_to_reuse_buffers {
            builder.allow_binary_reader_to_reuse_buffers(flag);
        }

        if let Some((key, value)) = s.server_settings.iter().next() {
            if s.server_settings.len() > 1 {
                warn!(
                    "only one server setting is supported, applying '{key}' and dropping {} other(s)",
                    s.server_settings.len() - 1
                );
            }
            builder.server_setting(key, value);
        }

        if !s.http_headers.is_empty() {
            builder.http_headers(&s.http_headers);
        }

        builder
    }

    /// Builds and initializes a [`Client`] from the settings.
    ///
    /// # Errors
    /// The errors of [`ClientBuilder::build`].
    pub fn build(&self) -> BootstrapResult<Client> {
        info!("initializing client");
        let client = self.builder().build()?;
        info!("successfully initialized client for {}", client.endpoint());
        Ok(client)
    }
}

#[cfg(test)]
mod test {
    use super::ClientFactory;
    use crate::{client::ReuseStrategy, ConnectionSettings};

    fn endpoint_only() -> ConnectionSettings {
        let mut settings = ConnectionSettings::new();
        settings.endpoint = Some("http://localhost:8123".to_owned());
        settings
    }

    #[test]
    fn test_absent_fields_are_never_applied() {
        let builder = ClientFactory::new(endpoint_only()).builder();
        assert_eq!(builder.get_endpoint(), Some("http://localhost:8123"));
        assert_eq!(builder.get_username(), None);
        assert_eq!(builder.get_password(), None);
        assert_eq!(builder.get_connect_timeout(), None);
        assert_eq!(builder.get_socket_keep_alive(), None);
        assert_eq!(builder.get_compress_server_response(), None);
        assert_eq!(builder.get_use_server_time_zone(), None);
        assert_eq!(builder.get_time_zone(), None);
        assert_eq!(builder.get_max_retries(), None);
        assert!(builder.get_connection_reuse_strategy().is_none());
        assert!(builder.get_server_settings().is_empty());
        assert!(builder.get_http_headers().is_empty());
    }

    #[test]
    fn test_unknown_reuse_strategy_is_recovered() {
        let mut settings = endpoint_only();
        settings.connection_reuse_strategy = Some("com.example.FancyStrategy".to_owned());
        let builder = ClientFactory::new(settings).builder();
        assert!(builder.get_connection_reuse_strategy().is_none());
        // the built client falls back to the default strategy
        assert_eq!(builder.build().unwrap().connection_reuse_strategy().name(), "lifo");
    }

    #[test]
    fn test_known_reuse_strategy() {
        let mut settings = endpoint_only();
        settings.connection_reuse_strategy = Some("fifo".to_owned());
        let builder = ClientFactory::new(settings).builder();
        assert_eq!(builder.get_connection_reuse_strategy().unwrap().name(), "fifo");
    }
}
