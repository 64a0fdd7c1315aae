//! Startup integration layer for ClickHouse clients.
//!
//! This crate binds a declarative set of [`ConnectionSettings`] onto the
//! builder of a [`Client`] and registers the application's table entities
//! with the produced handle, once, during startup. It introduces no wire
//! protocol of its own; transport concerns (pooling, compression, TLS
//! handshakes, retries) belong to the client layer below and are only
//! *configured* here.
//!
//! The three pieces:
//!
//! * [`ClientFactory`] translates settings into a configured
//!   [`ClientBuilder`]; absent settings never override builder defaults.
//! * [`SchemaRegistrar`] indexes [`TableDescriptor`]s and registers each of
//!   them with the client handle in one pass.
//! * [`Bootstrap`] orchestrates both, guaranteeing exactly one client
//!   handle per process ("create unless already supplied").
//!
//! ```rust
//! use clickhouse_bootstrap::{Bootstrap, ConnectionSettings, TableDescriptor};
//!
//! struct TripEvent;
//!
//! let settings: ConnectionSettings = serde_json::from_str(
//!     r#"{
//!         "endpoint": "http://localhost:8123",
//!         "username": "default",
//!         "connectTimeout": "5s",
//!         "compressServerResponse": true
//!     }"#,
//! )
//! .unwrap();
//!
//! let mut bootstrap = Bootstrap::new(settings);
//! bootstrap.tables([TableDescriptor::named::<TripEvent>("trip_events")]);
//!
//! let client = bootstrap.client().unwrap();
//! assert_eq!(client.registered_tables().unwrap(), vec!["trip_events"]);
//! ```

#![deny(missing_debug_implementations)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

mod bootstrap;
mod bootstrap_error;
mod client;
mod factory;
mod schema;
mod settings;

pub use crate::bootstrap::Bootstrap;
pub use crate::bootstrap_error::{BootstrapError, BootstrapResult};
pub use crate::client::{
    Client, ClientBuilder, Fifo, Lifo, ReuseStrategy, StrategyFactory, StrategyRegistry,
};
pub use crate::factory::ClientFactory;
pub use crate::schema::{
    Column, RegistrarState, SchemaClient, SchemaRegistrar, TableDescriptor, TableSchema,
};
pub use crate::settings::ConnectionSettings;
