//! Startup orchestration: one client handle, one registration pass.
use crate::{
    client::StrategyRegistry,
    schema::{SchemaRegistrar, TableDescriptor},
    settings::ConnectionSettings,
    BootstrapError, BootstrapResult, Client, ClientFactory,
};
use std::sync::Arc;

/// Drives the startup sequence: translate the settings into a client, and
/// run the schema registration pass once the client exists.
///
/// The client is constructed at most once ("create unless already
/// supplied"): the first call to [`client`](Bootstrap::client) builds it via
/// the [`ClientFactory`] -- unless the host handed in its own handle with
/// [`supply_client`](Bootstrap::supply_client), in which case translation is
/// skipped entirely. Every later call returns the same `Arc`.
///
/// ```rust
/// use clickhouse_bootstrap::{Bootstrap, ConnectionSettings, TableDescriptor};
///
/// struct Visit;
///
/// let mut settings = ConnectionSettings::new();
/// settings.endpoint = Some("http://localhost:8123".to_owned());
///
/// let mut bootstrap = Bootstrap::new(settings);
/// bootstrap.tables([TableDescriptor::named::<Visit>("visits")]);
/// let client = bootstrap.client().unwrap();
/// assert_eq!(client.registered_tables().unwrap(), vec!["visits"]);
/// ```
#[derive(Debug)]
pub struct Bootstrap {
    factory: ClientFactory,
    registrar: SchemaRegistrar,
    client: Option<Arc<Client>>,
}

impl Bootstrap {
    /// Creates a bootstrap for the given settings.
    pub fn new(settings: ConnectionSettings) -> Self {
        Self {
            factory: ClientFactory::new(settings),
            registrar: SchemaRegistrar::new(),
            client: None,
        }
    }

    /// Replaces the connection reuse strategy registry of the factory.
    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategyRegistry) -> Self {
        self.factory = self.factory.with_strategies(strategies);
        self
    }

    /// Declares the application's table entities.
    ///
    /// Builds the registrar's index; without this call the registration
    /// pass is a silent no-op.
    pub fn tables<I>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = TableDescriptor>,
    {
        self.registrar.index_tables(tables);
        self
    }

    /// Hands in a host-owned client; settings translation is skipped.
    ///
    /// # Errors
    /// `BootstrapError::Usage` if a client already exists.
    pub fn supply_client(&mut self, client: Arc<Client>) -> BootstrapResult<()> {
        if self.client.is_some() {
            return Err(BootstrapError::Usage(
                "a client is already present, cannot supply another one",
            ));
        }
        info!("using the supplied client, skipping settings translation");
        self.registrar.register_all(&*client)?;
        self.client = Some(client);
        Ok(())
    }

    /// Returns the process-wide client handle, creating and registering it
    /// on the first call.
    ///
    /// # Errors
    /// The errors of [`ClientFactory::build`] and of the registration pass.
    /// A failed registration pass leaves the bootstrap without a client, so
    /// a later call starts over.
    pub fn client(&mut self) -> BootstrapResult<Arc<Client>> {
        if let Some(ref client) = self.client {
            return Ok(Arc::clone(client));
        }

        let client = Arc::new(self.factory.build()?);
        self.registrar.register_all(&*client)?;
        self.client = Some(Arc::clone(&client));
        Ok(client)
    }

    /// The registrar, for state inspection.
    pub fn registrar(&self) -> &SchemaRegistrar {
        &self.registrar
    }
}
