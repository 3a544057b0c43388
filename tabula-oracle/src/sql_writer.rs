use std::fmt::Write;
use tabula_core::{
    AsValue, BitOp, Context, DriverValue, Pagination, Result, SqlWriter, Value, float_to_decimal,
    require_operand,
};
use time::{Date, PrimitiveDateTime};

#[derive(Default, Debug, Clone, Copy)]
pub struct OracleSqlWriter {}

impl SqlWriter for OracleSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }

    fn name(&self) -> &'static str {
        "oracle"
    }

    fn pagination(&self) -> Pagination {
        Pagination::PseudoRowNumber
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push(['0', '1'][value as usize]);
    }

    fn write_value_infinity(&self, _context: &mut Context, out: &mut String, negative: bool) {
        if negative {
            out.push('-');
        }
        out.push_str("BINARY_DOUBLE_INFINITY");
    }

    fn write_value_nan(&self, _context: &mut Context, out: &mut String) {
        out.push_str("BINARY_DOUBLE_NAN");
    }

    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("HEXTORAW('");
        out.push_str(&hex::encode_upper(value));
        out.push_str("')");
    }

    /// `DATE '2024-03-15'`, just the digits inside a timestamp.
    fn write_value_date(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Date,
        timestamp: bool,
    ) {
        if !timestamp {
            out.push_str("DATE '");
        }
        let _ = write!(
            out,
            "{:04}-{:02}-{:02}",
            value.year(),
            value.month() as u8,
            value.day()
        );
        if !timestamp {
            out.push('\'');
        }
    }

    /// Empty strings are stored as null.
    fn write_empty_check(
        &self,
        _context: &mut Context,
        out: &mut String,
        lhs: &str,
        negated: bool,
    ) {
        let _ = write!(out, "{lhs} IS {}NULL", if negated { "NOT " } else { "" });
    }

    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push_str("TIMESTAMP '");
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// Only `BITAND` exists, the other operators are derived from it.
    fn render_bit_operator(&self, op: BitOp, a: &str, b: Option<&str>) -> Result<String> {
        let binary = |render: fn(&str, &str) -> String| -> Result<String> {
            Ok(render(a, require_operand(op, b)?))
        };
        match op {
            BitOp::Not => Ok(format!("(({a} - 1) - 2 * BITAND({a}, -1))")),
            BitOp::And => binary(|a, b| format!("BITAND({a}, {b})")),
            BitOp::Or => binary(|a, b| format!("(({a} + {b}) - BITAND({a}, {b}))")),
            BitOp::Xor => binary(|a, b| format!("(({a} + {b}) - 2 * BITAND({a}, {b}))")),
            BitOp::Remainder => binary(|a, b| format!("MOD({a}, {b})")),
            BitOp::Add => binary(|a, b| format!("({a} + {b})")),
            BitOp::Subtract => binary(|a, b| format!("({a} - {b})")),
            BitOp::Multiply => binary(|a, b| format!("({a} * {b})")),
            BitOp::Divide => binary(|a, b| format!("({a} / {b})")),
        }
    }

    /// Floats with a declared scale are bound as fixed scale decimals, non
    /// finite ones are rejected. Without a scale they are bound unchanged.
    fn bind_float(&self, value: &Value, scale: Option<u8>) -> Result<DriverValue> {
        Ok(DriverValue::Scalar(match scale {
            Some(..) => float_to_decimal(value, scale)?.as_value(),
            None => value.clone(),
        }))
    }
}
