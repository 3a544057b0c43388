use tabula_core::{Context, Pagination, SqlWriter};

#[derive(Default, Debug, Clone, Copy)]
pub struct SqlServerSqlWriter {}

impl SqlWriter for SqlServerSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "sqlserver"
    }

    fn pagination(&self) -> Pagination {
        Pagination::RowNumber
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('[');
        self.write_escaped(context, out, value, ']', "]]");
        out.push(']');
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    /// No literal for non finite floats, they can only be bound.
    fn write_value_infinity(&self, context: &mut Context, out: &mut String, negative: bool) {
        log::warn!(
            "SQL Server has no literal for {}infinity, writing NULL",
            if negative { "negative " } else { "" }
        );
        self.write_value_none(context, out);
    }

    fn write_value_nan(&self, context: &mut Context, out: &mut String) {
        log::warn!("SQL Server has no NaN literal, writing NULL");
        self.write_value_none(context, out);
    }

    /// National strings, the literal keeps the characters outside the code page.
    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push_str("N'");
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("0x");
        out.push_str(&hex::encode_upper(value));
    }
}
