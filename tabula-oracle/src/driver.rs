use crate::OracleSqlWriter;
use tabula_core::Driver;

#[derive(Clone, Copy, Default)]
pub struct OracleDriver;
impl OracleDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for OracleDriver {
    type SqlWriter = OracleSqlWriter;

    const NAME: &'static str = "oracle";

    fn get_instance() -> Self {
        Self::new()
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        OracleSqlWriter::default()
    }
}
