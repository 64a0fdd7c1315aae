mod registrar;
mod table;

pub use registrar::{RegistrarState, SchemaClient, SchemaRegistrar};
pub use table::{Column, TableDescriptor, TableSchema};
