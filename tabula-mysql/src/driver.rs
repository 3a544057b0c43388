use crate::MySQLSqlWriter;
use tabula_core::Driver;

#[derive(Clone, Copy, Default)]
pub struct MySQLDriver;
impl MySQLDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MySQLDriver {
    type SqlWriter = MySQLSqlWriter;

    const NAME: &'static str = "mysql";

    fn get_instance() -> Self {
        Self::new()
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        MySQLSqlWriter::default()
    }
}
