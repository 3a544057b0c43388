use tabula_core::{BitOp, Context, Result, SqlWriter, require_operand};

#[derive(Default, Debug, Clone, Copy)]
pub struct H2SqlWriter {}

impl SqlWriter for H2SqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "h2"
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        out.push_str("CAST('");
        if negative {
            out.push('-');
        }
        out.push_str("Infinity' AS DOUBLE PRECISION)");
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        out.push_str("CAST('NaN' AS DOUBLE PRECISION)");
    }

    /// Bitwise operators are functions in H2.
    fn render_bit_operator(&self, op: BitOp, a: &str, b: Option<&str>) -> Result<String> {
        let call = |function: &str| -> Result<String> {
            Ok(format!("{function}({a}, {})", require_operand(op, b)?))
        };
        let infix = |symbol: &str| -> Result<String> {
            Ok(format!("({a} {symbol} {})", require_operand(op, b)?))
        };
        match op {
            BitOp::Not => Ok(format!("BITNOT({a})")),
            BitOp::And => call("BITAND"),
            BitOp::Or => call("BITOR"),
            BitOp::Xor => call("BITXOR"),
            BitOp::Remainder => call("MOD"),
            BitOp::Add => infix("+"),
            BitOp::Subtract => infix("-"),
            BitOp::Multiply => infix("*"),
            BitOp::Divide => infix("/"),
        }
    }
}
