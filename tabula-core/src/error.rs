use std::{any, fmt::Debug};
use thiserror::Error;

/// Failures surfaced by the compiler and the marshaller.
///
/// All of them are caller errors: the model, the schema or the values handed
/// over are not valid for the requested operation. None of them is transient.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed query model.
    #[error("Model error: {0}")]
    Model(String),

    /// Two tables or sub-queries of the same query tree claim one alias.
    #[error("Alias `{alias}` is already used in this query")]
    AliasCollision { alias: String },

    /// A value has no binding or decoding rule for the requested target.
    #[error("Cannot convert {value} to {target}")]
    UnsupportedConversion { value: String, target: String },

    /// Entity metadata is missing something the operation needs.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Reading a value returned by the driver failed.
    #[error("Could not decode column `{column}`")]
    Decode {
        column: String,
        #[source]
        source: anyhow::Error,
    },
}

impl Error {
    pub fn model(message: impl Into<String>) -> Self {
        Self::Model(message.into())
    }

    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Conversion failure of `value` into the Rust type `T`.
    pub fn conversion<T: ?Sized>(value: &impl Debug) -> Self {
        Self::UnsupportedConversion {
            value: format!("{value:?}"),
            target: any::type_name::<T>().into(),
        }
    }

    /// Conversion failure of `value` into a named target.
    pub fn conversion_to(value: &impl Debug, target: impl Into<String>) -> Self {
        Self::UnsupportedConversion {
            value: format!("{value:?}"),
            target: target.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
