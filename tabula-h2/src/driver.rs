use crate::H2SqlWriter;
use tabula_core::Driver;

#[derive(Clone, Copy, Default)]
pub struct H2Driver;
impl H2Driver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for H2Driver {
    type SqlWriter = H2SqlWriter;

    const NAME: &'static str = "h2";

    fn get_instance() -> Self {
        Self::new()
    }

    fn sql_writer(&self) -> Self::SqlWriter {
        H2SqlWriter::default()
    }
}
