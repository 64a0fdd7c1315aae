//! Table descriptors and schemas.

/// Declares that an entity type represents a table.
///
/// Descriptors are handed to [`Bootstrap::tables`](crate::Bootstrap::tables)
/// (or directly to a [`SchemaRegistrar`](crate::SchemaRegistrar)) during
/// startup; each descriptor leads to exactly one schema registration with
/// the client handle.
///
/// The table name is either declared explicitly with
/// [`named`](TableDescriptor::named) or falls back to the bare name of the
/// entity type:
///
/// ```rust
/// use clickhouse_bootstrap::TableDescriptor;
///
/// struct TripEvent;
///
/// assert_eq!(TableDescriptor::of::<TripEvent>().resolved_name(), "TripEvent");
/// assert_eq!(
///     TableDescriptor::named::<TripEvent>("trip_events").resolved_name(),
///     "trip_events"
/// );
/// ```
///
/// An explicitly declared name is used verbatim, even if it is empty.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TableDescriptor {
    entity: &'static str,
    table_name: Option<&'static str>,
}

impl TableDescriptor {
    /// Creates a descriptor for `T` without a declared table name; the bare
    /// type name of `T` is used.
    pub fn of<T: ?Sized>() -> Self {
        Self {
            entity: std::any::type_name::<T>(),
            table_name: None,
        }
    }

    /// Creates a descriptor for `T` with an explicitly declared table name.
    pub fn named<T: ?Sized>(table_name: &'static str) -> Self {
        Self {
            entity: std::any::type_name::<T>(),
            table_name: Some(table_name),
        }
    }

    /// The full path of the entity type.
    pub fn entity(&self) -> &'static str {
        self.entity
    }

    /// The declared table name, if any.
    pub fn declared_name(&self) -> Option<&'static str> {
        self.table_name
    }

    /// The table name to register under: the declared name, or the bare
    /// entity type name if none was declared.
    pub fn resolved_name(&self) -> &'static str {
        self.table_name.unwrap_or_else(|| bare_name(self.entity))
    }
}

// "crate::module::TripEvent" -> "TripEvent"; generic arguments are kept.
fn bare_name(type_path: &'static str) -> &'static str {
    type_path
        .rsplit("::")
        .next()
        .unwrap_or(type_path)
}

/// Schema of a server-side table.
///
/// At bootstrap time a schema carries name and database; column detail is
/// contributed by whatever wire layer the host attaches to the client.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct TableSchema {
    table_name: String,
    database: Option<String>,
    columns: Vec<Column>,
}

impl TableSchema {
    /// Creates a schema for the given table name.
    pub fn named<N: AsRef<str>>(table_name: N) -> Self {
        Self {
            table_name: table_name.as_ref().to_owned(),
            database: None,
            columns: Vec::new(),
        }
    }

    /// Assigns the database the table lives in.
    #[must_use]
    pub fn in_database<D: AsRef<str>>(mut self, database: D) -> Self {
        self.database = Some(database.as_ref().to_owned());
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn with_column<N: AsRef<str>, T: AsRef<str>>(mut self, name: N, column_type: T) -> Self {
        self.columns.push(Column {
            name: name.as_ref().to_owned(),
            column_type: column_type.as_ref().to_owned(),
        });
        self
    }

    /// The table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The database, if known.
    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    /// The columns, in declaration order.
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }
}

/// A single column of a [`TableSchema`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Column {
    name: String,
    column_type: String,
}

impl Column {
    /// The column name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The ClickHouse type of the column, e.g. `UInt64` or `String`.
    pub fn column_type(&self) -> &str {
        &self.column_type
    }
}

#[cfg(test)]
mod test {
    use super::{TableDescriptor, TableSchema};

    struct Visit;

    #[test]
    fn test_name_fallback() {
        let descriptor = TableDescriptor::of::<Visit>();
        assert_eq!(descriptor.declared_name(), None);
        assert_eq!(descriptor.resolved_name(), "Visit");
    }

    #[test]
    fn test_declared_name_wins() {
        let descriptor = TableDescriptor::named::<Visit>("visits");
        assert_eq!(descriptor.declared_name(), Some("visits"));
        assert_eq!(descriptor.resolved_name(), "visits");
    }

    #[test]
    fn test_empty_declared_name_is_used_verbatim() {
        let descriptor = TableDescriptor::named::<Visit>("");
        assert_eq!(descriptor.resolved_name(), "");
    }

    #[test]
    fn test_schema() {
        let schema = TableSchema::named("visits")
            .in_database("analytics")
            .with_column("id", "UInt64")
            .with_column("ts", "DateTime64(3)");
        assert_eq!(schema.table_name(), "visits");
        assert_eq!(schema.database(), Some("analytics"));
        assert_eq!(schema.columns().len(), 2);
        assert_eq!(schema.columns()[1].column_type(), "DateTime64(3)");
    }
}
