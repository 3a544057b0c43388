use std::fmt::Write;
use tabula_core::{BitOp, Context, Result, SqlWriter, require_operand};

#[derive(Default, Debug, Clone, Copy)]
pub struct PostgresSqlWriter {}

impl SqlWriter for PostgresSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        out.push_str(["'Infinity'::FLOAT8", "'-Infinity'::FLOAT8"][negative as usize]);
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        out.push_str("'NaN'::FLOAT8");
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("'\\x");
        out.push_str(&hex::encode(value));
        out.push_str("'::BYTEA");
    }

    /// `$1`, `$2`, ... numbered after the parameters collected so far.
    fn write_placeholder(&self, context: &mut Context, out: &mut String) {
        let _ = write!(out, "${}", context.parameters.len());
    }

    fn render_bit_operator(&self, op: BitOp, a: &str, b: Option<&str>) -> Result<String> {
        let infix = |symbol: &str| -> Result<String> {
            Ok(format!("({a} {symbol} {})", require_operand(op, b)?))
        };
        match op {
            BitOp::Not => Ok(format!("(~{a})")),
            BitOp::And => infix("&"),
            BitOp::Or => infix("|"),
            BitOp::Xor => infix("#"),
            BitOp::Add => infix("+"),
            BitOp::Subtract => infix("-"),
            BitOp::Multiply => infix("*"),
            BitOp::Divide => infix("/"),
            BitOp::Remainder => infix("%"),
        }
    }
}
