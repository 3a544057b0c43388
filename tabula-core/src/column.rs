use crate::{AliasTable, AsValue, Error, Predicate, PredicateKind, Query, Result, Value};

/// Bitwise and arithmetic operators a column can be combined with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitOp {
    And,
    Or,
    Xor,
    /// Unary, the second operand is ignored.
    Not,
    Add,
    Subtract,
    Multiply,
    Divide,
    Remainder,
}

impl BitOp {
    pub fn is_unary(&self) -> bool {
        *self == BitOp::Not
    }
}

/// Reference to a column, a literal or a computed expression.
///
/// Empty `alias` means the column is not qualified: it gets the alias of the
/// only table of the query when compiled.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Column {
    /// Function wrapping the column (`UPPER` => `UPPER(col)`).
    pub function: Option<String>,
    /// Table alias.
    pub alias: String,
    /// Field or column name, or the raw expression when `raw` is set.
    pub name: String,
    /// Result label (`col AS label`).
    pub label: String,
    /// Literal value, rendered inline.
    pub value: Option<Value>,
    /// `name` is a SQL expression written as is.
    pub raw: bool,
    pub operation: Option<(BitOp, Box<Column>)>,
}

impl Column {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The `*` wildcard.
    pub fn all() -> Self {
        Self::new("*")
    }

    pub fn raw(expression: impl Into<String>) -> Self {
        Self {
            name: expression.into(),
            raw: true,
            ..Default::default()
        }
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// One column per name, labeled with the label at the same position.
    pub fn list<N, L>(names: &[N], labels: &[L]) -> Result<Vec<Column>>
    where
        N: AsRef<str>,
        L: AsRef<str>,
    {
        if names.len() != labels.len() {
            return Err(Error::model(format!(
                "{} column names were given with {} labels",
                names.len(),
                labels.len()
            )));
        }
        Ok(names
            .iter()
            .zip(labels)
            .map(|(name, label)| Column::new(name.as_ref()).label(label.as_ref()))
            .collect())
    }

    /// Qualify with the alias of `table`.
    pub fn of(mut self, table: &AliasTable) -> Self {
        self.alias = table.alias.clone();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = alias.into();
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    pub fn bit(mut self, op: BitOp, other: Column) -> Self {
        self.operation = Some((op, Box::new(other)));
        self
    }

    pub fn is_wildcard(&self) -> bool {
        !self.raw && self.value.is_none() && self.name == "*"
    }

    /// It names a column (as opposed to a literal or a raw expression).
    pub fn is_reference(&self) -> bool {
        !self.raw && self.value.is_none() && !self.name.is_empty()
    }

    /// Whether it can appear in a select list.
    pub fn is_selectable(&self) -> bool {
        !self.name.is_empty()
            || self.function.is_some()
            || self.value.is_some()
            || self.operation.is_some()
    }

    /// Same underlying expression, ignoring the label.
    pub fn same_expression(&self, other: &Column) -> bool {
        self.function == other.function
            && self.alias == other.alias
            && self.name.eq_ignore_ascii_case(&other.name)
            && self.value == other.value
            && self.raw == other.raw
            && self.operation == other.operation
    }

    pub fn asc(self) -> Ordered {
        Ordered {
            column: self,
            order: Order::ASC,
        }
    }

    pub fn desc(self) -> Ordered {
        Ordered {
            column: self,
            order: Order::DESC,
        }
    }

    fn predicate(self, kind: PredicateKind) -> Predicate {
        Predicate { column: self, kind }
    }

    pub fn equal(self, operand: impl Into<Operand>) -> Predicate {
        self.predicate(PredicateKind::Equal(operand.into()))
    }
    pub fn not_equal(self, operand: impl Into<Operand>) -> Predicate {
        self.predicate(PredicateKind::NotEqual(operand.into()))
    }
    pub fn like(self, value: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::Like(value.into()))
    }
    pub fn not_like(self, value: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::NotLike(value.into()))
    }
    pub fn start_with(self, value: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::StartWith(value.into()))
    }
    pub fn not_start_with(self, value: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::NotStartWith(value.into()))
    }
    pub fn end_with(self, value: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::EndWith(value.into()))
    }
    pub fn not_end_with(self, value: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::NotEndWith(value.into()))
    }
    pub fn less(self, operand: impl Into<Operand>) -> Predicate {
        self.predicate(PredicateKind::Less(operand.into()))
    }
    pub fn less_equal(self, operand: impl Into<Operand>) -> Predicate {
        self.predicate(PredicateKind::LessEqual(operand.into()))
    }
    pub fn more(self, operand: impl Into<Operand>) -> Predicate {
        self.predicate(PredicateKind::More(operand.into()))
    }
    pub fn more_equal(self, operand: impl Into<Operand>) -> Predicate {
        self.predicate(PredicateKind::MoreEqual(operand.into()))
    }
    pub fn is_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        self.predicate(PredicateKind::In(values.into_iter().map(Into::into).collect()))
    }
    pub fn not_in<V: Into<Value>>(self, values: impl IntoIterator<Item = V>) -> Predicate {
        self.predicate(PredicateKind::NotIn(
            values.into_iter().map(Into::into).collect(),
        ))
    }
    pub fn is_null(self) -> Predicate {
        self.predicate(PredicateKind::IsNull)
    }
    pub fn is_not_null(self) -> Predicate {
        self.predicate(PredicateKind::IsNotNull)
    }
    pub fn is_empty(self) -> Predicate {
        self.predicate(PredicateKind::IsEmpty)
    }
    pub fn is_not_empty(self) -> Predicate {
        self.predicate(PredicateKind::IsNotEmpty)
    }
    pub fn between(self, low: impl Into<Value>, high: impl Into<Value>) -> Predicate {
        self.predicate(PredicateKind::Between(low.into(), high.into()))
    }
    pub fn exists(query: Query) -> Predicate {
        Column::default().predicate(PredicateKind::Exists(Box::new(query)))
    }
    pub fn not_exists(query: Query) -> Predicate {
        Column::default().predicate(PredicateKind::NotExists(Box::new(query)))
    }
}

/// Right hand side of a comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Value(Value),
    Column(Column),
}

impl From<Value> for Operand {
    fn from(value: Value) -> Self {
        Operand::Value(value)
    }
}

impl From<Column> for Operand {
    fn from(value: Column) -> Self {
        Operand::Column(value)
    }
}

impl<T: AsValue> From<T> for Operand {
    fn from(value: T) -> Self {
        Operand::Value(value.as_value())
    }
}

impl From<&str> for Operand {
    fn from(value: &str) -> Self {
        Operand::Value(value.into())
    }
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    #[default]
    ASC,
    DESC,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Ordered {
    pub column: Column,
    pub order: Order,
}
