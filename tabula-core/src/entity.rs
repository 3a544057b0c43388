use crate::{ColumnDef, Result, TableRef, Value};
use std::sync::Arc;

pub type RowNames = Arc<[String]>;
pub type Row = Box<[Value]>;

/// Row of decoded values labeled with their column names.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct RowLabeled {
    pub labels: RowNames,
    pub values: Row,
}

impl RowLabeled {
    pub fn new(labels: RowNames, values: Row) -> Self {
        Self { labels, values }
    }

    /// Value of the column named `name`, matched case insensitively.
    pub fn get_column(&self, name: &str) -> Option<&Value> {
        self.labels
            .iter()
            .position(|v| v.eq_ignore_ascii_case(name))
            .map(|i| &self.values[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.labels
            .iter()
            .map(String::as_str)
            .zip(self.values.iter())
    }
}

/// Static metadata and row conversion of a persisted type.
///
/// Implemented by `#[derive(Entity)]`, the descriptors are registered at
/// compile time and read through the [`SchemaRegistry`](crate::SchemaRegistry).
pub trait Entity: Send + Sync + 'static {
    /// Name of the Rust type, used to mint table aliases.
    fn type_name() -> &'static str;

    fn table() -> &'static TableRef;

    /// Columns declared directly on the type.
    fn columns() -> &'static [ColumnDef];

    /// Columns of the embedded base entities, outermost base first.
    fn inherited_columns() -> Vec<&'static ColumnDef> {
        Vec::new()
    }

    /// Every column value, labeled with the column name.
    fn row_full(&self) -> RowLabeled;

    fn from_row(row: RowLabeled) -> Result<Self>
    where
        Self: Sized;
}
