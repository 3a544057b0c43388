use crate::{RowNames, Value};
use anyhow::{Context, bail};
use std::{
    fmt::{self, Debug, Formatter},
    io::{Cursor, Read},
};

/// Streamed content of a character or binary large object.
pub struct LargeObject {
    reader: Box<dyn Read + Send>,
    length: u64,
}

impl LargeObject {
    pub fn new(reader: impl Read + Send + 'static, length: u64) -> Self {
        Self {
            reader: Box::new(reader),
            length,
        }
    }

    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        let bytes = bytes.into();
        let length = bytes.len() as u64;
        Self::new(Cursor::new(bytes), length)
    }

    /// Declared length in bytes.
    pub fn len(&self) -> u64 {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Reads the whole stream, failing when it is shorter than declared.
    pub fn drain(mut self) -> anyhow::Result<Vec<u8>> {
        let mut result = Vec::with_capacity(usize::try_from(self.length).unwrap_or(0));
        self.reader
            .read_to_end(&mut result)
            .context("Failed to read the large object stream")?;
        if (result.len() as u64) < self.length {
            bail!(
                "The large object stream ended after {} of {} bytes",
                result.len(),
                self.length
            );
        }
        Ok(result)
    }
}

impl Debug for LargeObject {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("LargeObject")
            .field("length", &self.length)
            .finish_non_exhaustive()
    }
}

/// Value as handed to (or received from) the driver.
#[derive(Debug)]
pub enum DriverValue {
    /// Null of the given kind.
    Null(Value),
    Scalar(Value),
    CharacterStream(LargeObject),
    BinaryStream(LargeObject),
}

impl DriverValue {
    pub fn is_null(&self) -> bool {
        matches!(self, DriverValue::Null(..))
    }

    /// The scalar carried, `None` for streams.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            DriverValue::Null(v) | DriverValue::Scalar(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Value> for DriverValue {
    fn from(value: Value) -> Self {
        if value.is_null() {
            DriverValue::Null(value.to_prototype())
        } else {
            DriverValue::Scalar(value)
        }
    }
}

/// Row as returned by the driver: labels and undecoded values.
#[derive(Debug, Default)]
pub struct RawRow {
    pub labels: RowNames,
    pub values: Vec<DriverValue>,
}

impl RawRow {
    pub fn new(labels: RowNames, values: Vec<DriverValue>) -> Self {
        Self { labels, values }
    }

    /// Row of scalar values.
    pub fn from_values(
        labels: impl IntoIterator<Item = impl Into<String>>,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
