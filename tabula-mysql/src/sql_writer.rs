use tabula_core::{Context, SqlWriter};

#[derive(Default, Debug, Clone, Copy)]
pub struct MySQLSqlWriter {}

impl SqlWriter for MySQLSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "mysql"
    }

    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('`');
        self.write_escaped(context, out, value, '`', "``");
        out.push('`');
    }

    /// Backslash is an escape character inside MySQL strings.
    fn write_value_string(&self, _context: &mut Context, out: &mut String, value: &str) {
        out.reserve(value.len() + 2);
        out.push('\'');
        for c in value.chars() {
            match c {
                '\'' => out.push_str("''"),
                '\\' => out.push_str("\\\\"),
                c => out.push(c),
            }
        }
        out.push('\'');
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("1.0e+10000");
    }

    fn write_value_nan(&self, context: &mut Context, out: &mut String) {
        log::warn!("MySQL has no NaN literal, writing NULL");
        self.write_value_none(context, out);
    }
}
