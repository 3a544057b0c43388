use crate::SqlWriter;

/// Entry point of a dialect.
pub trait Driver {
    type SqlWriter: SqlWriter;

    /// Human readable name of the dialect.
    const NAME: &'static str;

    fn get_instance() -> Self;
    fn sql_writer(&self) -> Self::SqlWriter;
}
