mod test_utils;

use clickhouse_bootstrap::{
    BootstrapError, BootstrapResult, RegistrarState, SchemaClient, SchemaRegistrar,
    TableDescriptor, TableSchema,
};
use std::sync::Mutex;

struct Order;
struct Shipment;

/// Fake client that records every registration call.
#[derive(Default)]
struct RecordingClient {
    registered: Mutex<Vec<(String, String)>>,
    fail_for: Option<&'static str>,
}

impl RecordingClient {
    fn registered(&self) -> Vec<(String, String)> {
        self.registered.lock().unwrap().clone()
    }
}

impl SchemaClient for RecordingClient {
    fn table_schema(&self, table_name: &str) -> BootstrapResult<TableSchema> {
        if self.fail_for == Some(table_name) {
            return Err(BootstrapError::Schema {
                table: table_name.to_owned(),
                source: "DESCRIBE failed".to_owned().into(),
            });
        }
        Ok(TableSchema::named(table_name))
    }

    fn register(&self, descriptor: &TableDescriptor, schema: TableSchema) -> BootstrapResult<()> {
        self.registered
            .lock()
            .unwrap()
            .push((descriptor.entity().to_owned(), schema.table_name().to_owned()));
        Ok(())
    }
}

#[test]
fn test_each_indexed_table_is_registered_exactly_once() {
    let _handle = test_utils::init_logger();
    let mut registrar = SchemaRegistrar::new();
    registrar.index_tables([
        TableDescriptor::named::<Order>("a"),
        TableDescriptor::named::<Shipment>("b"),
    ]);

    let client = RecordingClient::default();
    registrar.register_all(&client).unwrap();

    let registered = client.registered();
    assert_eq!(registered.len(), 2);
    assert_eq!(registered[0].1, "a");
    assert_eq!(registered[1].1, "b");
    assert_eq!(registrar.state(), RegistrarState::Registered);
}

#[test]
fn test_undeclared_name_falls_back_to_bare_type_name() {
    let mut registrar = SchemaRegistrar::new();
    registrar.index_tables([TableDescriptor::of::<Order>()]);

    let client = RecordingClient::default();
    registrar.register_all(&client).unwrap();
    assert_eq!(client.registered()[0].1, "Order");
}

#[test]
fn test_empty_declared_name_is_registered_verbatim() {
    let mut registrar = SchemaRegistrar::new();
    registrar.index_tables([TableDescriptor::named::<Order>("")]);

    let client = RecordingClient::default();
    registrar.register_all(&client).unwrap();
    assert_eq!(client.registered()[0].1, "");
}

#[test]
fn test_never_indexed_registrar_registers_nothing() {
    let mut registrar = SchemaRegistrar::new();
    let client = RecordingClient::default();
    registrar.register_all(&client).unwrap();
    assert!(client.registered().is_empty());
    assert_eq!(registrar.state(), RegistrarState::Uninitialized);
}

#[test]
fn test_failing_fetch_aborts_the_remaining_pass() {
    let mut registrar = SchemaRegistrar::new();
    registrar.index_tables([
        TableDescriptor::named::<Order>("orders"),
        TableDescriptor::named::<Shipment>("shipments"),
    ]);

    let client = RecordingClient {
        fail_for: Some("orders"),
        ..RecordingClient::default()
    };
    let err = registrar.register_all(&client).unwrap_err();
    assert!(matches!(err, BootstrapError::Schema { .. }));
    assert!(client.registered().is_empty());
    assert_eq!(registrar.state(), RegistrarState::Indexed);
}

#[test]
fn test_second_pass_reregisters_all_entries() {
    let mut registrar = SchemaRegistrar::new();
    registrar.index_tables([TableDescriptor::named::<Order>("orders")]);

    let client = RecordingClient::default();
    registrar.register_all(&client).unwrap();
    registrar.register_all(&client).unwrap();
    assert_eq!(client.registered().len(), 2);
}
