use crate::{Column, ColumnDef, Encoding, ResultShape, StorageType, Value};

/// Parameter of a compiled statement together with what is needed to bind it.
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    pub value: Value,
    pub storage: StorageType,
    /// Primitive kind of the target column.
    pub kind: Value,
    /// Rounding scale for floating and decimal values.
    pub scale: Option<u8>,
    pub encoding: Encoding,
}

impl Pair {
    pub fn new(value: Value) -> Self {
        Self {
            kind: value.to_prototype(),
            value,
            storage: StorageType::Plain,
            scale: None,
            encoding: Encoding::default(),
        }
    }

    /// Value bound to the column described by `column`.
    pub fn with_column(value: Value, column: &ColumnDef) -> Self {
        Self {
            value,
            storage: column.storage,
            kind: column.value.clone(),
            scale: column.effective_scale(),
            encoding: column.encoding,
        }
    }
}

impl From<Value> for Pair {
    fn from(value: Value) -> Self {
        Pair::new(value)
    }
}

/// Output of a compilation, the only thing handed to the execution layer.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub sql: String,
    pub parameters: Vec<Pair>,
    pub shape: ResultShape,
    pub columns: Vec<Column>,
}

impl CompiledQuery {
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.parameters.iter().map(|v| &v.value)
    }
}
