use crate::{
    AliasTable, BitOp, Column, ColumnDef, CompiledQuery, Condition, ConditionItem, DriverValue,
    Entity, EntitySchema, Error, Join, JoinType, Operand, Order, Ordered, PageState, PageWindow,
    Pair, Predicate, PredicateKind, Query, RawRow, Result, ResultShape, RowLabeled, RowMap,
    SchemaRegistry, TableSource, Value, bind_pair, decode_value, float_to_decimal,
    hydrate_labeled, hydrate_map, hydrate_scalar, is_plain_identifier, is_reserved_word,
    round_float, separated_by, truncate_long, try_separated_by,
    writer::{Context, Fragment, pagination},
};
use rust_decimal::prelude::ToPrimitive;
use std::{fmt::Write, sync::Arc};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, macros::time};

macro_rules! write_integer {
    ($out:ident, $value:expr) => {{
        let mut buffer = itoa::Buffer::new();
        $out.push_str(buffer.format($value));
    }};
}
macro_rules! write_float {
    ($this:ident, $context:ident, $out:ident, $value:expr) => {{
        if $value.is_infinite() {
            $this.write_value_infinity($context, $out, $value.is_sign_negative());
        } else if $value.is_nan() {
            $this.write_value_nan($context, $out);
        } else {
            let mut buffer = ryu::Buffer::new();
            $out.push_str(buffer.format($value));
        }
    }};
}

/// Paging algorithm of a dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT ? OFFSET ?`
    LimitOffset,
    /// `ROW_NUMBER() OVER(...)` in a derived table filtered from outside.
    RowNumber,
    /// `ROWNUM` pseudo column, two or three nesting levels.
    PseudoRowNumber,
}

/// Knobs of [`SqlWriter::write_select_core`] used by the paging algorithms.
#[derive(Default, Debug, Clone, Copy)]
pub struct SelectOptions<'a> {
    /// Select `COUNT(*)` instead of the columns.
    pub count: bool,
    /// Expression appended to the select list.
    pub extra_column: Option<&'a str>,
    /// Expression AND-ed to the WHERE clause.
    pub extra_condition: Option<&'a str>,
    pub skip_order_by: bool,
}

/// Second operand of a binary operator.
pub fn require_operand<'a>(op: BitOp, b: Option<&'a str>) -> Result<&'a str> {
    b.ok_or_else(|| Error::model(format!("Operator {op:?} needs a second operand")))
}

/// Date of a `<` or `<=` comparison moved to the last millisecond of its day.
pub fn shift_end_of_day(value: Value) -> Value {
    let end = time!(23:59:59.999);
    match value {
        Value::Date(Some(v)) => Value::Timestamp(Some(PrimitiveDateTime::new(v, end))),
        Value::Timestamp(Some(v)) => Value::Timestamp(Some(v.replace_time(end))),
        Value::TimestampWithTimezone(Some(v)) => {
            Value::TimestampWithTimezone(Some(v.replace_time(end)))
        }
        v => v,
    }
}

/// Dialect printer turning the query model into SQL text and parameters.
///
/// Every method has a default implementing the generic dialect, backends
/// override what differs: identifier quoting, literals, placeholders, bitwise
/// operators, the paging algorithm and the binding of some values.
pub trait SqlWriter: Send + Sync {
    fn as_dyn(&self) -> &dyn SqlWriter;

    fn name(&self) -> &'static str {
        "generic"
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset
    }

    /// Whether the current fragment allows labels (`expr AS label`).
    fn alias_declaration(&self, context: &Context) -> bool {
        context.fragment == Fragment::SqlSelect
    }

    /// Escape occurrences of `search` char with `replace` while copying into buffer.
    fn write_escaped(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &str,
        search: char,
        replace: &str,
    ) {
        let mut position = 0;
        for (i, c) in value.char_indices() {
            if c == search {
                out.push_str(&value[position..i]);
                out.push_str(replace);
                position = i + c.len_utf8();
            }
        }
        out.push_str(&value[position..]);
    }

    /// Identifiers that can't be written as they are.
    fn needs_quoting(&self, value: &str) -> bool {
        !is_plain_identifier(value) || is_reserved_word(value)
    }

    /// Quote identifiers ("name") doubling inner quotes.
    fn write_identifier_quoted(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('"');
        self.write_escaped(context, out, value, '"', "\"\"");
        out.push('"');
    }

    fn write_identifier(&self, context: &mut Context, out: &mut String, value: &str) {
        if self.needs_quoting(value) {
            self.write_identifier_quoted(context, out, value);
        } else {
            out.push_str(value);
        }
    }

    /// Render a concrete value (including proper quoting / escaping).
    fn write_value(&self, context: &mut Context, out: &mut String, value: &Value) {
        match value {
            v if v.is_null() => self.write_value_none(context, out),
            Value::Boolean(Some(v)) => self.write_value_bool(context, out, *v),
            Value::Int8(Some(v)) => write_integer!(out, *v),
            Value::Int16(Some(v)) => write_integer!(out, *v),
            Value::Int32(Some(v)) => write_integer!(out, *v),
            Value::Int64(Some(v)) => write_integer!(out, *v),
            Value::UInt8(Some(v)) => write_integer!(out, *v),
            Value::UInt16(Some(v)) => write_integer!(out, *v),
            Value::UInt32(Some(v)) => write_integer!(out, *v),
            Value::UInt64(Some(v)) => write_integer!(out, *v),
            Value::Float32(Some(v)) => write_float!(self, context, out, *v),
            Value::Float64(Some(v)) => write_float!(self, context, out, *v),
            Value::Decimal(Some(v), ..) => drop(write!(out, "{v}")),
            Value::Char(Some(v)) => {
                let mut buf = [0u8; 4];
                self.write_value_string(context, out, v.encode_utf8(&mut buf));
            }
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => {
                self.write_value_string(context, out, v)
            }
            Value::Blob(Some(v)) => self.write_value_blob(context, out, v.as_ref()),
            Value::Date(Some(v)) => self.write_value_date(context, out, v, false),
            Value::Time(Some(v)) => self.write_value_time(context, out, v, false),
            Value::Timestamp(Some(v)) => self.write_value_timestamp(context, out, v),
            Value::TimestampWithTimezone(Some(v)) => {
                self.write_value_timestamptz(context, out, v)
            }
            Value::Uuid(Some(v)) => drop(write!(out, "'{v}'")),
            Value::List(Some(v), ..) => self.write_value_list(context, out, v),
            _ => log::error!("Cannot write {value:?}"),
        }
    }

    fn write_value_none(&self, _context: &mut Context, out: &mut String) {
        out.push_str("NULL");
    }

    fn write_value_bool(&self, _context: &mut Context, out: &mut String, value: bool) {
        out.push_str(["false", "true"][value as usize]);
    }

    fn write_value_infinity(&self, context: &mut Context, out: &mut String, negative: bool) {
        self.write_value_string(context, out, ["Infinity", "-Infinity"][negative as usize]);
    }

    fn write_value_nan(&self, context: &mut Context, out: &mut String) {
        self.write_value_string(context, out, "NaN");
    }

    /// Render and escape a string literal using single quotes.
    fn write_value_string(&self, context: &mut Context, out: &mut String, value: &str) {
        out.push('\'');
        self.write_escaped(context, out, value, '\'', "''");
        out.push('\'');
    }

    /// Render a blob literal as `X'0A1B'`.
    fn write_value_blob(&self, _context: &mut Context, out: &mut String, value: &[u8]) {
        out.push_str("X'");
        out.push_str(&hex::encode_upper(value));
        out.push('\'');
    }

    /// Render a DATE literal (optionally as part of TIMESTAMP composition).
    fn write_value_date(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Date,
        timestamp: bool,
    ) {
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:04}-{:02}-{:02}{b}",
            value.year(),
            value.month() as u8,
            value.day()
        );
    }

    /// Render a TIME literal (optionally as part of TIMESTAMP composition).
    fn write_value_time(
        &self,
        _context: &mut Context,
        out: &mut String,
        value: &Time,
        timestamp: bool,
    ) {
        let mut subsecond = value.nanosecond();
        let mut width = 9;
        while width > 1 && subsecond % 10 == 0 {
            subsecond /= 10;
            width -= 1;
        }
        let b = if timestamp { "" } else { "'" };
        let _ = write!(
            out,
            "{b}{:02}:{:02}:{:02}.{:0width$}{b}",
            value.hour(),
            value.minute(),
            value.second(),
            subsecond
        );
    }

    fn write_value_timestamp(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &PrimitiveDateTime,
    ) {
        out.push('\'');
        self.write_value_date(context, out, &value.date(), true);
        out.push(' ');
        self.write_value_time(context, out, &value.time(), true);
        out.push('\'');
    }

    /// Written in UTC.
    fn write_value_timestamptz(
        &self,
        context: &mut Context,
        out: &mut String,
        value: &OffsetDateTime,
    ) {
        let date_time = value.to_offset(UtcOffset::UTC);
        self.write_value_timestamp(
            context,
            out,
            &PrimitiveDateTime::new(date_time.date(), date_time.time()),
        );
    }

    fn write_value_list(&self, context: &mut Context, out: &mut String, value: &[Value]) {
        out.push('(');
        separated_by(
            out,
            value,
            |out, v| {
                self.write_value(context, out, v);
            },
            ", ",
        );
        out.push(')');
    }

    fn write_placeholder(&self, _context: &mut Context, out: &mut String) {
        out.push('?');
    }

    /// Collects the parameter and writes its placeholder.
    fn write_parameter(&self, context: &mut Context, out: &mut String, pair: Pair) {
        context.parameters.push(pair);
        self.write_placeholder(context, out);
    }

    /// SQL of a bitwise or arithmetic operation, `b` is ignored by unary operators.
    fn render_bit_operator(&self, op: BitOp, a: &str, b: Option<&str>) -> Result<String> {
        let infix = |symbol: &str| -> Result<String> {
            Ok(format!("({a} {symbol} {})", require_operand(op, b)?))
        };
        match op {
            BitOp::Not => Ok(format!("(~{a})")),
            BitOp::And => infix("&"),
            BitOp::Or => infix("|"),
            BitOp::Xor => infix("^"),
            BitOp::Add => infix("+"),
            BitOp::Subtract => infix("-"),
            BitOp::Multiply => infix("*"),
            BitOp::Divide => infix("/"),
            BitOp::Remainder => infix("%"),
        }
    }

    /// Empty string or null test of the column expression `lhs`.
    fn write_empty_check(
        &self,
        _context: &mut Context,
        out: &mut String,
        lhs: &str,
        negated: bool,
    ) {
        if negated {
            let _ = write!(out, "({lhs} <> '' AND {lhs} IS NOT NULL)");
        } else {
            let _ = write!(out, "({lhs} = '' OR {lhs} IS NULL)");
        }
    }

    /// Alias qualifying `column`, empty when it is not qualified.
    fn column_alias(&self, context: &Context, column: &Column) -> Result<String> {
        if !column.alias.is_empty() {
            return Ok(column.alias.clone());
        }
        match context.default_alias() {
            Some(alias) => Ok(alias.to_string()),
            None if column.is_wildcard() || !column.is_reference() => Ok(String::new()),
            None => Err(Error::model(format!(
                "Column `{}` must be qualified with a table alias, the query has more than one table",
                column.name
            ))),
        }
    }

    /// Descriptor of the column referenced, when it belongs to an entity.
    fn column_def(&self, context: &Context, column: &Column) -> Result<Option<ColumnDef>> {
        if !column.is_reference() || column.is_wildcard() {
            return Ok(None);
        }
        let alias = self.column_alias(context, column)?;
        Ok(context.column_def(&alias, &column.name))
    }

    /// Column expression, without its label.
    fn write_column(&self, context: &mut Context, out: &mut String, column: &Column) -> Result<()> {
        if let Some(function) = &column.function {
            out.push_str(function);
            out.push('(');
        }
        if let Some((op, other)) = &column.operation {
            let mut a = String::new();
            self.write_column_base(context, &mut a, column)?;
            let b = if op.is_unary() {
                None
            } else {
                let mut b = String::new();
                self.write_column(context, &mut b, other)?;
                Some(b)
            };
            out.push_str(&self.render_bit_operator(*op, &a, b.as_deref())?);
        } else {
            self.write_column_base(context, out, column)?;
        }
        if column.function.is_some() {
            out.push(')');
        }
        Ok(())
    }

    /// Raw expression, literal or qualified column name.
    fn write_column_base(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &Column,
    ) -> Result<()> {
        if column.raw {
            out.push_str(&column.name);
            return Ok(());
        }
        if let Some(value) = &column.value {
            self.write_value(context, out, value);
            return Ok(());
        }
        if column.name.is_empty() {
            return Ok(());
        }
        let alias = self.column_alias(context, column)?;
        if context.qualify_columns && !alias.is_empty() {
            out.push_str(&alias);
            out.push('.');
        }
        if column.is_wildcard() {
            out.push('*');
            return Ok(());
        }
        match context.column_def(&alias, &column.name) {
            Some(def) => self.write_identifier(context, out, def.name),
            None => self.write_identifier(context, out, &column.name),
        }
        Ok(())
    }

    /// Column expression followed by its label where labels are allowed.
    fn write_column_labeled(
        &self,
        context: &mut Context,
        out: &mut String,
        column: &Column,
    ) -> Result<()> {
        if !column.label.is_empty() && !column.is_selectable() {
            return Err(Error::model(format!(
                "Column labeled `{}` has nothing to select",
                column.label
            )));
        }
        self.write_column(context, out, column)?;
        if !column.label.is_empty() && self.alias_declaration(context) {
            out.push_str(" AS ");
            self.write_identifier(context, out, &column.label);
        }
        Ok(())
    }

    /// Columns actually selected: the requested ones followed by the ordering
    /// columns missing from them, unless a wildcard already covers them.
    fn select_columns(&self, query: &Query) -> Vec<Column> {
        let mut result = query.columns.clone();
        if result.is_empty() || result.iter().any(|c| c.is_wildcard() && c.alias.is_empty()) {
            return result;
        }
        for Ordered { column, .. } in &query.order_by {
            let covered = result.iter().any(|c| {
                c.same_expression(column)
                    || (c.is_wildcard() && c.alias == column.alias)
                    || (!c.label.is_empty()
                        && column.alias.is_empty()
                        && c.label.eq_ignore_ascii_case(&column.name))
            });
            if !covered {
                result.push(column.clone());
            }
        }
        result
    }

    fn write_table(
        &self,
        context: &mut Context,
        out: &mut String,
        table: &AliasTable,
    ) -> Result<()> {
        match &table.source {
            TableSource::Entity(schema) => {
                if !schema.table.schema.is_empty() {
                    self.write_identifier(context, out, schema.table.schema);
                    out.push('.');
                }
                self.write_identifier(context, out, schema.table.name);
            }
            TableSource::Named(name) => {
                separated_by(
                    out,
                    name.split('.'),
                    |out, v| self.write_identifier(context, out, v),
                    ".",
                );
            }
            TableSource::SubQuery(query) => {
                out.push('(');
                self.write_sub_query(context, out, query)?;
                out.push(')');
            }
        }
        if !table.alias.is_empty() {
            out.push(' ');
            out.push_str(&table.alias);
        }
        Ok(())
    }

    fn write_join_type(&self, _context: &mut Context, out: &mut String, join_type: &JoinType) {
        out.push_str(match join_type {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
            JoinType::Full => "FULL JOIN",
        });
    }

    fn write_join(&self, context: &mut Context, out: &mut String, join: &Join) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlJoin);
        out.push(' ');
        self.write_join_type(&mut context, out, &join.kind);
        out.push(' ');
        self.write_table(&mut context, out, &join.table)?;
        if !join.on.is_empty() {
            out.push_str(" ON ");
            self.write_condition(&mut context, out, &join.on)?;
        }
        Ok(())
    }

    /// Nodes in order, the first one bare. Dropped predicates leave nothing behind.
    fn write_condition(
        &self,
        context: &mut Context,
        out: &mut String,
        condition: &Condition,
    ) -> Result<()> {
        let mut first = true;
        for node in &condition.nodes {
            let mut item = String::new();
            match &node.item {
                ConditionItem::Predicate(predicate) => {
                    self.write_predicate(context, &mut item, predicate)?;
                }
                ConditionItem::Nested(nested) => {
                    let mut inner = String::new();
                    self.write_condition(context, &mut inner, nested)?;
                    if !inner.is_empty() {
                        let _ = write!(item, "({inner})");
                    }
                }
                ConditionItem::Group(predicates) => {
                    let mut inner = String::new();
                    let separator = format!(" {} ", node.composition.inner());
                    try_separated_by(
                        &mut inner,
                        predicates,
                        |out, v| self.write_predicate(context, out, v),
                        &separator,
                    )?;
                    if !inner.is_empty() {
                        let _ = write!(item, "({inner})");
                    }
                }
            }
            if item.is_empty() {
                continue;
            }
            if !first {
                out.push(' ');
                out.push_str(node.composition.outer());
                out.push(' ');
            }
            out.push_str(&item);
            first = false;
        }
        Ok(())
    }

    fn write_predicate(
        &self,
        context: &mut Context,
        out: &mut String,
        predicate: &Predicate,
    ) -> Result<()> {
        let Predicate { column, kind } = predicate;
        if let PredicateKind::Exists(query) | PredicateKind::NotExists(query) = kind {
            if matches!(kind, PredicateKind::NotExists(..)) {
                out.push_str("NOT ");
            }
            out.push_str("EXISTS (");
            self.write_sub_query(context, out, query)?;
            out.push(')');
            return Ok(());
        }
        let def = self.column_def(context, column)?;
        let pair = |value: Value| match &def {
            Some(def) => Pair::with_column(value, def),
            None => Pair::new(value),
        };
        let mut lhs = String::new();
        self.write_column(context, &mut lhs, column)?;
        match kind {
            PredicateKind::Equal(operand)
            | PredicateKind::NotEqual(operand)
            | PredicateKind::Less(operand)
            | PredicateKind::LessEqual(operand)
            | PredicateKind::More(operand)
            | PredicateKind::MoreEqual(operand) => {
                let symbol = match kind {
                    PredicateKind::Equal(..) => "=",
                    PredicateKind::NotEqual(..) => "<>",
                    PredicateKind::Less(..) => "<",
                    PredicateKind::LessEqual(..) => "<=",
                    PredicateKind::More(..) => ">",
                    _ => ">=",
                };
                match operand {
                    Operand::Value(value) if value.is_null() => match kind {
                        PredicateKind::Equal(..) => {
                            let _ = write!(out, "{lhs} IS NULL");
                        }
                        PredicateKind::NotEqual(..) => {
                            let _ = write!(out, "{lhs} IS NOT NULL");
                        }
                        _ => {
                            return Err(Error::model(format!(
                                "Cannot compare `{lhs}` {symbol} NULL"
                            )));
                        }
                    },
                    Operand::Value(value) => {
                        let value = if context.end_of_day
                            && matches!(kind, PredicateKind::Less(..) | PredicateKind::LessEqual(..))
                        {
                            shift_end_of_day(value.clone())
                        } else {
                            value.clone()
                        };
                        let _ = write!(out, "{lhs} {symbol} ");
                        self.write_parameter(context, out, pair(value));
                    }
                    Operand::Column(other) => {
                        let _ = write!(out, "{lhs} {symbol} ");
                        self.write_column(context, out, other)?;
                    }
                }
            }
            PredicateKind::Like(value)
            | PredicateKind::NotLike(value)
            | PredicateKind::StartWith(value)
            | PredicateKind::NotStartWith(value)
            | PredicateKind::EndWith(value)
            | PredicateKind::NotEndWith(value) => {
                let text = match value {
                    Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => v.clone(),
                    Value::Char(Some(v)) => v.to_string(),
                    _ => return Err(Error::conversion_to(value, "LIKE pattern")),
                };
                let (negated, pattern) = match kind {
                    PredicateKind::Like(..) => (false, format!("%{text}%")),
                    PredicateKind::NotLike(..) => (true, format!("%{text}%")),
                    PredicateKind::StartWith(..) => (false, format!("{text}%")),
                    PredicateKind::NotStartWith(..) => (true, format!("{text}%")),
                    PredicateKind::EndWith(..) => (false, format!("%{text}")),
                    _ => (true, format!("%{text}")),
                };
                let _ = write!(out, "{lhs} {}LIKE ", if negated { "NOT " } else { "" });
                self.write_parameter(context, out, Pair::new(Value::Varchar(Some(pattern))));
            }
            PredicateKind::In(values) | PredicateKind::NotIn(values) => {
                let negated = matches!(kind, PredicateKind::NotIn(..));
                if values.is_empty() {
                    out.push_str(if negated { "1=1" } else { "1=0" });
                    return Ok(());
                }
                let _ = write!(out, "{lhs} {}IN (", if negated { "NOT " } else { "" });
                separated_by(
                    out,
                    values,
                    |out, v| self.write_parameter(context, out, pair(v.clone())),
                    ", ",
                );
                out.push(')');
            }
            PredicateKind::IsNull => {
                let _ = write!(out, "{lhs} IS NULL");
            }
            PredicateKind::IsNotNull => {
                let _ = write!(out, "{lhs} IS NOT NULL");
            }
            PredicateKind::IsEmpty => self.write_empty_check(context, out, &lhs, false),
            PredicateKind::IsNotEmpty => self.write_empty_check(context, out, &lhs, true),
            PredicateKind::Between(low, high) => match (low.is_null(), high.is_null()) {
                (true, true) => {
                    log::warn!("BETWEEN on `{lhs}` without bounds is ignored");
                }
                (false, false) => {
                    let _ = write!(out, "{lhs} BETWEEN ");
                    self.write_parameter(context, out, pair(low.clone()));
                    out.push_str(" AND ");
                    self.write_parameter(context, out, pair(high.clone()));
                }
                _ => {
                    return Err(Error::model(format!(
                        "BETWEEN on `{lhs}` needs both bounds"
                    )));
                }
            },
            PredicateKind::Exists(..) | PredicateKind::NotExists(..) => {}
        }
        Ok(())
    }

    fn write_order_by(
        &self,
        context: &mut Context,
        out: &mut String,
        order_by: &[Ordered],
    ) -> Result<()> {
        let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
        out.push_str("ORDER BY ");
        try_separated_by(
            out,
            order_by,
            |out, v| {
                self.write_column(&mut context, out, &v.column)?;
                out.push_str(match v.order {
                    Order::ASC => " ASC",
                    Order::DESC => " DESC",
                });
                Ok(())
            },
            ", ",
        )
    }

    /// Sub-query with its parameters spliced in place.
    fn write_sub_query(
        &self,
        context: &mut Context,
        out: &mut String,
        query: &Query,
    ) -> Result<Vec<Column>> {
        let mut nested = context.nested(query)?;
        let result = self.write_select_core(&mut nested, out, query, &SelectOptions::default());
        context.leave(nested);
        result
    }

    /// Unpaged SELECT, returns the columns selected.
    fn write_select_core(
        &self,
        context: &mut Context,
        out: &mut String,
        query: &Query,
        options: &SelectOptions,
    ) -> Result<Vec<Column>> {
        let Some(from) = &query.from else {
            return Err(Error::model("The query does not select from any table"));
        };
        out.push_str("SELECT ");
        let columns = if options.count {
            out.push_str("COUNT(*)");
            vec![Column::raw("COUNT(*)")]
        } else {
            if query.distinct {
                out.push_str("DISTINCT ");
            }
            let columns = self.select_columns(query);
            if columns.is_empty() {
                out.push('*');
            } else {
                let mut context = context.switch_fragment(Fragment::SqlSelect);
                try_separated_by(
                    out,
                    &columns,
                    |out, v| self.write_column_labeled(&mut context, out, v),
                    ", ",
                )?;
            }
            if let Some(extra) = options.extra_column {
                out.push_str(", ");
                out.push_str(extra);
            }
            columns
        };
        out.push_str(" FROM ");
        self.write_table(&mut context.switch_fragment(Fragment::SqlSelectFrom), out, from)?;
        for join in &query.joins {
            self.write_join(context, out, join)?;
        }
        let mut condition = String::new();
        self.write_condition(
            &mut context.switch_fragment(Fragment::SqlSelectWhere),
            &mut condition,
            &query.condition,
        )?;
        match (condition.is_empty(), options.extra_condition) {
            (false, Some(extra)) => {
                let _ = write!(out, " WHERE ({condition}) AND {extra}");
            }
            (false, None) => {
                let _ = write!(out, " WHERE {condition}");
            }
            (true, Some(extra)) => {
                let _ = write!(out, " WHERE {extra}");
            }
            (true, None) => {}
        }
        if !query.group_by.is_empty() {
            let mut context = context.switch_fragment(Fragment::SqlGroupBy);
            out.push_str(" GROUP BY ");
            try_separated_by(
                out,
                &query.group_by,
                |out, v| self.write_column(&mut context, out, v),
                ", ",
            )?;
        }
        let mut having = String::new();
        self.write_condition(
            &mut context.switch_fragment(Fragment::SqlHaving),
            &mut having,
            &query.having,
        )?;
        if !having.is_empty() {
            let _ = write!(out, " HAVING {having}");
        }
        if !options.skip_order_by && !options.count && !query.order_by.is_empty() {
            out.push(' ');
            self.write_order_by(context, out, &query.order_by)?;
        }
        Ok(columns)
    }

    /// SELECT restricted to the rows of the window, as the paging algorithm
    /// of the dialect does it.
    fn write_select_paged(
        &self,
        context: &mut Context,
        out: &mut String,
        query: &Query,
        state: PageState,
    ) -> Result<Vec<Column>> {
        let writer = self.as_dyn();
        match (state, self.pagination()) {
            (PageState::Unpaged, _) => {
                self.write_select_core(context, out, query, &SelectOptions::default())
            }
            (state, Pagination::LimitOffset) => {
                pagination::write_limit_offset(writer, context, out, query, state)
            }
            (state, Pagination::RowNumber) => {
                pagination::write_row_number(writer, context, out, query, state)
            }
            (state, Pagination::PseudoRowNumber) => {
                pagination::write_pseudo_row_number(writer, context, out, query, state)
            }
        }
    }

    fn compile_select(&self, query: &Query, page: Option<PageWindow>) -> Result<CompiledQuery> {
        let mut context = Context::for_query(query, Fragment::SqlSelect)?;
        let mut out = String::with_capacity(128 + query.columns.len() * 24);
        let state = PageState::new(page, !query.order_by.is_empty());
        let columns = self.write_select_paged(&mut context, &mut out, query, state)?;
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: query.shape.clone(),
            columns,
        })
    }

    /// Number of rows of `query`. Distinct and grouped queries are counted
    /// from a derived table.
    fn compile_count(&self, query: &Query) -> Result<CompiledQuery> {
        let mut context = Context::for_query(query, Fragment::SqlSelect)?;
        let mut out = String::with_capacity(128);
        if query.distinct || !query.group_by.is_empty() {
            out.push_str("SELECT COUNT(*) FROM (");
            self.write_select_core(
                &mut context,
                &mut out,
                query,
                &SelectOptions {
                    skip_order_by: true,
                    ..Default::default()
                },
            )?;
            out.push_str(") c_");
        } else {
            self.write_select_core(
                &mut context,
                &mut out,
                query,
                &SelectOptions {
                    count: true,
                    ..Default::default()
                },
            )?;
        }
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: ResultShape::Scalar,
            columns: vec![Column::raw("COUNT(*)")],
        })
    }

    /// Single table SELECT with optional columns, condition, ordering and window.
    ///
    /// An offset without a limit is a `Error::Model`.
    fn compile_paged_raw(
        &self,
        schema: &Arc<EntitySchema>,
        columns: Option<&[&str]>,
        condition: Option<&Condition>,
        order_by: Option<&[Ordered]>,
        offset: Option<u64>,
        limit: Option<u64>,
    ) -> Result<CompiledQuery> {
        if offset.is_some() && limit.is_none() {
            return Err(Error::model("An offset was given without a limit"));
        }
        let mut query = Query::from_schema(schema.clone());
        query = match columns {
            Some(columns) => query.select(columns.iter().map(|v| Column::new(*v))),
            None => query.select(schema.column_labels().map(Column::new)),
        };
        if let Some(condition) = condition {
            query = query.filter(condition.clone());
        }
        if let Some(order_by) = order_by {
            query = query.order_by(order_by.iter().cloned());
        }
        let window = limit.map(|size| PageWindow::new(offset.unwrap_or_default(), size));
        self.compile_select(&query, window)
    }

    fn write_primary_key_condition(
        &self,
        context: &mut Context,
        out: &mut String,
        schema: &EntitySchema,
        values: &[Value],
    ) -> Result<()> {
        let primary_key = schema.require_primary_key()?;
        if primary_key.len() != values.len() {
            return Err(Error::model(format!(
                "`{}` has {} primary key columns, {} values were given",
                schema.type_name,
                primary_key.len(),
                values.len()
            )));
        }
        separated_by(
            out,
            primary_key.iter().zip(values),
            |out, (column, value)| {
                self.write_identifier(context, out, column.name);
                out.push_str(" = ");
                self.write_parameter(context, out, Pair::with_column(value.clone(), column));
            },
            " AND ",
        );
        Ok(())
    }

    fn compile_find_by_id(
        &self,
        schema: &Arc<EntitySchema>,
        id: &[Value],
    ) -> Result<CompiledQuery> {
        let primary_key = schema.require_primary_key()?;
        if primary_key.len() != id.len() {
            return Err(Error::model(format!(
                "`{}` has {} primary key columns, {} values were given",
                schema.type_name,
                primary_key.len(),
                id.len()
            )));
        }
        let condition = primary_key
            .iter()
            .zip(id)
            .fold(Condition::new(), |condition, (column, value)| {
                condition.and(Column::new(column.name).equal(value.clone()))
            });
        let query = Query::from_schema(schema.clone()).filter(condition);
        self.compile_select(&query, None)
    }

    /// INSERT of the values of `row` mapped by `schema`.
    fn compile_insert(&self, schema: &Arc<EntitySchema>, row: &RowLabeled) -> Result<CompiledQuery> {
        let mut context = Context::for_schema(schema.clone(), Fragment::SqlInsertInto);
        let values = schema
            .columns
            .iter()
            .filter_map(|c| row.get_column(c.name).map(|v| (c, v)))
            .collect::<Vec<_>>();
        if values.is_empty() {
            return Err(Error::model(format!(
                "Nothing to insert into `{}`",
                schema.table.name
            )));
        }
        let mut out = String::with_capacity(64 + values.len() * 16);
        out.push_str("INSERT INTO ");
        self.write_table(
            &mut context,
            &mut out,
            &AliasTable {
                alias: String::new(),
                source: TableSource::Entity(schema.clone()),
            },
        )?;
        out.push_str(" (");
        separated_by(
            &mut out,
            &values,
            |out, (c, _)| self.write_identifier(&mut context, out, c.name),
            ", ",
        );
        out.push_str(") VALUES (");
        {
            let mut context = context.switch_fragment(Fragment::SqlInsertIntoValues);
            separated_by(
                &mut out,
                &values,
                |out, (c, v)| self.write_parameter(&mut context, out, Pair::with_column((*v).clone(), c)),
                ", ",
            );
        }
        out.push(')');
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: ResultShape::Scalar,
            columns: Vec::new(),
        })
    }

    /// UPDATE of the non key columns of `row`, located by its primary key.
    fn compile_update_by_id(
        &self,
        schema: &Arc<EntitySchema>,
        row: &RowLabeled,
    ) -> Result<CompiledQuery> {
        let primary_key = schema.require_primary_key()?;
        let id = primary_key
            .iter()
            .map(|c| {
                row.get_column(c.name).cloned().ok_or_else(|| {
                    Error::model(format!("Primary key column `{}` has no value", c.name))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let assignments = schema
            .columns
            .iter()
            .filter(|c| !c.is_primary_key())
            .filter_map(|c| row.get_column(c.name).map(|v| (c.name, v.clone())))
            .collect::<Vec<_>>();
        let mut context = Context::for_schema(schema.clone(), Fragment::SqlUpdate);
        let mut out = String::with_capacity(64 + assignments.len() * 16);
        self.write_update_set(&mut context, &mut out, schema, &assignments)?;
        out.push_str(" WHERE ");
        self.write_primary_key_condition(
            &mut context.switch_fragment(Fragment::SqlUpdateWhere),
            &mut out,
            schema,
            &id,
        )?;
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: ResultShape::Scalar,
            columns: Vec::new(),
        })
    }

    fn write_update_set(
        &self,
        context: &mut Context,
        out: &mut String,
        schema: &Arc<EntitySchema>,
        assignments: &[(&str, Value)],
    ) -> Result<()> {
        if assignments.is_empty() {
            return Err(Error::model(format!(
                "Nothing to update in `{}`",
                schema.table.name
            )));
        }
        out.push_str("UPDATE ");
        self.write_table(
            context,
            out,
            &AliasTable {
                alias: String::new(),
                source: TableSource::Entity(schema.clone()),
            },
        )?;
        out.push_str(" SET ");
        let mut context = context.switch_fragment(Fragment::SqlUpdateSet);
        separated_by(
            out,
            assignments,
            |out, (name, value)| {
                let pair = match schema.resolve(name) {
                    Some(column) => {
                        self.write_identifier(&mut context, out, column.name);
                        Pair::with_column(value.clone(), column)
                    }
                    None => {
                        self.write_identifier(&mut context, out, name);
                        Pair::new(value.clone())
                    }
                };
                out.push_str(" = ");
                self.write_parameter(&mut context, out, pair);
            },
            ", ",
        );
        Ok(())
    }

    fn compile_delete_by_id(
        &self,
        schema: &Arc<EntitySchema>,
        id: &[Value],
    ) -> Result<CompiledQuery> {
        let mut context = Context::for_schema(schema.clone(), Fragment::SqlDeleteFrom);
        let mut out = String::with_capacity(64);
        self.write_delete_from(&mut context, &mut out, schema)?;
        out.push_str(" WHERE ");
        self.write_primary_key_condition(
            &mut context.switch_fragment(Fragment::SqlDeleteFromWhere),
            &mut out,
            schema,
            id,
        )?;
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: ResultShape::Scalar,
            columns: Vec::new(),
        })
    }

    /// UPDATE of the rows matching `condition`, which can't be empty.
    fn compile_update(
        &self,
        schema: &Arc<EntitySchema>,
        assignments: &[(&str, Value)],
        condition: &Condition,
    ) -> Result<CompiledQuery> {
        if condition.is_empty() {
            return Err(Error::model("UPDATE requires a condition"));
        }
        let mut context = Context::for_schema(schema.clone(), Fragment::SqlUpdate);
        let mut out = String::with_capacity(64 + assignments.len() * 16);
        self.write_update_set(&mut context, &mut out, schema, assignments)?;
        out.push_str(" WHERE ");
        self.write_condition(
            &mut context.switch_fragment(Fragment::SqlUpdateWhere),
            &mut out,
            condition,
        )?;
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: ResultShape::Scalar,
            columns: Vec::new(),
        })
    }

    /// DELETE of the rows matching `condition`, which can't be empty.
    fn compile_delete(
        &self,
        schema: &Arc<EntitySchema>,
        condition: &Condition,
    ) -> Result<CompiledQuery> {
        if condition.is_empty() {
            return Err(Error::model("DELETE requires a condition"));
        }
        let mut context = Context::for_schema(schema.clone(), Fragment::SqlDeleteFrom);
        let mut out = String::with_capacity(64);
        self.write_delete_from(&mut context, &mut out, schema)?;
        out.push_str(" WHERE ");
        self.write_condition(
            &mut context.switch_fragment(Fragment::SqlDeleteFromWhere),
            &mut out,
            condition,
        )?;
        log::debug!("[{}] {}", self.name(), truncate_long!(out));
        Ok(CompiledQuery {
            sql: out,
            parameters: context.parameters,
            shape: ResultShape::Scalar,
            columns: Vec::new(),
        })
    }

    fn write_delete_from(
        &self,
        context: &mut Context,
        out: &mut String,
        schema: &Arc<EntitySchema>,
    ) -> Result<()> {
        out.push_str("DELETE FROM ");
        self.write_table(
            context,
            out,
            &AliasTable {
                alias: String::new(),
                source: TableSource::Entity(schema.clone()),
            },
        )
    }

    /// Driver value of a parameter.
    fn bind(&self, pair: &Pair) -> Result<DriverValue> {
        bind_pair(self.as_dyn(), pair)
    }

    /// Floating values, rounded to `scale` when present.
    fn bind_float(&self, value: &Value, scale: Option<u8>) -> Result<DriverValue> {
        Ok(DriverValue::Scalar(match (value, scale) {
            (Value::Float32(Some(v)), Some(scale)) => Value::Float32(Some(
                float_to_decimal(value, Some(scale))
                    .ok()
                    .and_then(|v| v.to_f32())
                    .unwrap_or(*v),
            )),
            (Value::Float64(Some(v)), Some(scale)) => Value::Float64(Some(round_float(*v, scale))),
            _ => value.clone(),
        }))
    }

    fn decode(&self, raw: DriverValue, column: &ColumnDef) -> Result<Value> {
        decode_value(raw, column)
    }

    /// Decodes the columns known to `schema` (case insensitive match of the labels).
    fn hydrate_row(&self, row: RawRow, schema: &EntitySchema) -> Result<RowLabeled> {
        hydrate_labeled(self.as_dyn(), row, schema)
    }

    fn hydrate_entity<E: Entity>(&self, row: RawRow) -> Result<E>
    where
        Self: Sized,
    {
        let schema = SchemaRegistry::global().schema::<E>()?;
        E::from_row(self.hydrate_row(row, &schema)?)
    }

    fn hydrate_map(&self, row: RawRow) -> Result<RowMap> {
        hydrate_map(row)
    }

    fn hydrate_scalar(&self, row: RawRow) -> Result<Value> {
        hydrate_scalar(row)
    }
}

/// Generic dialect: ANSI quoting, `?` placeholders and `LIMIT ? OFFSET ?`.
#[derive(Default, Debug, Clone, Copy)]
pub struct GenericSqlWriter;

impl GenericSqlWriter {
    pub const fn new() -> Self {
        Self {}
    }
}

impl SqlWriter for GenericSqlWriter {
    fn as_dyn(&self) -> &dyn SqlWriter {
        self
    }
}
