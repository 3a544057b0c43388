use crate::SqlServerSqlWriter;
use tabula_core::Driver;

#[derive(Clone, Copy, Default)]
pub struct SqlServerDriver;
impl SqlServerDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for SqlServerDriver {
    type SqlWriter = SqlServerSqlWriter;

    const NAME: &'static str = "sqlserver";

    fn get_instance() -> Self {
        Self::new()
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        SqlServerSqlWriter::default()
    }
}
