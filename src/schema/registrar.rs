//! Startup-time registration of table descriptors.
use crate::{
    schema::{TableDescriptor, TableSchema},
    BootstrapResult,
};

/// The part of the client surface the registrar needs.
///
/// [`Client`](crate::Client) implements this; tests can substitute a fake
/// that records calls or injects failures.
pub trait SchemaClient {
    /// Fetches the schema of the given table.
    fn table_schema(&self, table_name: &str) -> BootstrapResult<TableSchema>;

    /// Registers the given schema for the given entity.
    fn register(&self, descriptor: &TableDescriptor, schema: TableSchema) -> BootstrapResult<()>;
}

/// Lifecycle state of a [`SchemaRegistrar`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RegistrarState {
    /// No table index has been built yet.
    Uninitialized,
    /// The table index is built; registration has not (fully) happened.
    Indexed,
    /// All indexed tables have been registered with a client handle.
    Registered,
}

/// Registers table descriptors with the client handle during startup.
///
/// The registrar moves through `Uninitialized -> Indexed -> Registered`:
/// [`index_tables`](SchemaRegistrar::index_tables) builds the process-lifetime
/// index of descriptors, and [`register_all`](SchemaRegistrar::register_all)
/// performs one registration pass against a client once that client exists.
///
/// A registrar that never gets an index stays `Uninitialized`; its
/// registration pass is a deliberate no-op, not an error.
#[derive(Debug)]
pub struct SchemaRegistrar {
    state: RegistrarState,
    index: Vec<TableDescriptor>,
}

impl SchemaRegistrar {
    /// Creates an uninitialized registrar.
    pub fn new() -> Self {
        Self {
            state: RegistrarState::Uninitialized,
            index: Vec::new(),
        }
    }

    /// The current lifecycle state.
    pub fn state(&self) -> RegistrarState {
        self.state
    }

    /// The indexed descriptors.
    pub fn index(&self) -> &[TableDescriptor] {
        &self.index
    }

    /// Builds the table index from the given descriptors.
    ///
    /// Indexing happens at most once per registrar; a second call is ignored
    /// with a warning.
    pub fn index_tables<I>(&mut self, tables: I) -> &mut Self
    where
        I: IntoIterator<Item = TableDescriptor>,
    {
        if self.state != RegistrarState::Uninitialized {
            warn!("table index is already built, ignoring additional descriptors");
            return self;
        }
        self.index = tables.into_iter().collect();
        self.state = RegistrarState::Indexed;
        debug!("indexed {} table descriptor(s)", self.index.len());
        self
    }

    /// Performs one registration pass against the given client.
    ///
    /// For every indexed descriptor, the table schema is fetched from the
    /// client and registered together with the descriptor. The first failure
    /// aborts the remaining registrations of the pass and leaves the
    /// registrar in `Indexed` state.
    ///
    /// In `Uninitialized` state this is a no-op. In `Registered` state the
    /// pass runs again and re-registers every entry; the design assumes one
    /// client handle per process, which [`Bootstrap`](crate::Bootstrap)
    /// enforces.
    ///
    /// # Errors
    /// The error of the first failing schema fetch or registration.
    pub fn register_all<C: SchemaClient>(&mut self, client: &C) -> BootstrapResult<()> {
        if self.state == RegistrarState::Uninitialized {
            debug!("no table index available, skipping schema registration");
            return Ok(());
        }

        debug!("start registering tables");
        for descriptor in &self.index {
            let table_name = descriptor.resolved_name();
            debug!("registering table {table_name}");
            let schema = client.table_schema(table_name)?;
            client.register(descriptor, schema)?;
        }
        debug!("end registering tables");
        self.state = RegistrarState::Registered;
        Ok(())
    }
}

impl Default for SchemaRegistrar {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::{RegistrarState, SchemaClient, SchemaRegistrar};
    use crate::{
        schema::{TableDescriptor, TableSchema},
        BootstrapError, BootstrapResult,
    };
    use std::cell::RefCell;

    struct Recorder {
        calls: RefCell<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Recorder {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                fail_on: None,
            }
        }
    }

    impl SchemaClient for Recorder {
        fn table_schema(&self, table_name: &str) -> BootstrapResult<TableSchema> {
            if self.fail_on == Some(table_name) {
                return Err(BootstrapError::schema(
                    table_name,
                    "no such table".to_string().into(),
                ));
            }
            Ok(TableSchema::named(table_name))
        }

        fn register(
            &self,
            _descriptor: &TableDescriptor,
            schema: TableSchema,
        ) -> BootstrapResult<()> {
            self.calls.borrow_mut().push(schema.table_name().to_owned());
            Ok(())
        }
    }

    struct A;
    struct B;

    #[test]
    fn test_lifecycle() {
        let mut registrar = SchemaRegistrar::new();
        assert_eq!(registrar.state(), RegistrarState::Uninitialized);

        registrar.index_tables([
            TableDescriptor::named::<A>("a"),
            TableDescriptor::named::<B>("b"),
        ]);
        assert_eq!(registrar.state(), RegistrarState::Indexed);

        let client = Recorder::new();
        registrar.register_all(&client).unwrap();
        assert_eq!(registrar.state(), RegistrarState::Registered);
        assert_eq!(*client.calls.borrow(), vec!["a", "b"]);
    }

    #[test]
    fn test_uninitialized_pass_is_a_noop() {
        let mut registrar = SchemaRegistrar::new();
        let client = Recorder::new();
        registrar.register_all(&client).unwrap();
        assert_eq!(registrar.state(), RegistrarState::Uninitialized);
        assert!(client.calls.borrow().is_empty());
    }

    #[test]
    fn test_second_index_is_ignored() {
        let mut registrar = SchemaRegistrar::new();
        registrar.index_tables([TableDescriptor::named::<A>("a")]);
        registrar.index_tables([TableDescriptor::named::<B>("b")]);
        assert_eq!(registrar.index().len(), 1);
        assert_eq!(registrar.index()[0].resolved_name(), "a");
    }

    #[test]
    fn test_first_failure_aborts_the_pass() {
        let mut registrar = SchemaRegistrar::new();
        registrar.index_tables([
            TableDescriptor::named::<A>("a"),
            TableDescriptor::named::<B>("b"),
        ]);

        let mut client = Recorder::new();
        client.fail_on = Some("a");
        let err = registrar.register_all(&client).unwrap_err();
        assert!(matches!(err, BootstrapError::Schema { .. }));
        assert_eq!(registrar.state(), RegistrarState::Indexed);
        assert!(client.calls.borrow().is_empty(), "b must not be registered");
    }
}
