use crate::{Column, Operand, Query, Value};

/// Single boolean comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct Predicate {
    pub column: Column,
    pub kind: PredicateKind,
}

impl Predicate {
    pub fn new(column: Column, kind: PredicateKind) -> Self {
        Self { column, kind }
    }
}

/// Operator of a predicate together with the values it needs.
#[derive(Debug, Clone, PartialEq)]
pub enum PredicateKind {
    Equal(Operand),
    NotEqual(Operand),
    Like(Value),
    NotLike(Value),
    StartWith(Value),
    NotStartWith(Value),
    EndWith(Value),
    NotEndWith(Value),
    Less(Operand),
    LessEqual(Operand),
    More(Operand),
    MoreEqual(Operand),
    In(Vec<Value>),
    NotIn(Vec<Value>),
    IsNull,
    IsNotNull,
    IsEmpty,
    IsNotEmpty,
    Exists(Box<Query>),
    NotExists(Box<Query>),
    Between(Value, Value),
}

/// How a node attaches to what precedes it and, for groups, how the
/// predicates of the group are joined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    And,
    Or,
    /// AND with the preceding nodes, OR inside the group.
    AndOr,
    /// OR with the preceding nodes, AND inside the group.
    OrAnd,
    /// OR with the preceding nodes, OR inside the group.
    OrOr,
}

impl Composition {
    /// Glue operator in front of the node.
    pub fn outer(&self) -> &'static str {
        match self {
            Composition::And | Composition::AndOr => "AND",
            Composition::Or | Composition::OrAnd | Composition::OrOr => "OR",
        }
    }

    /// Operator joining the predicates of a group.
    pub fn inner(&self) -> &'static str {
        match self {
            Composition::And | Composition::OrAnd => "AND",
            Composition::Or | Composition::AndOr | Composition::OrOr => "OR",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ConditionItem {
    Predicate(Predicate),
    Nested(Condition),
    Group(Vec<Predicate>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionNode {
    pub composition: Composition,
    pub item: ConditionItem,
}

/// Ordered sequence of nodes. An empty condition compiles to nothing.
///
/// ```rust
/// use tabula_core::{Column, Condition};
/// let condition = Condition::new()
///     .and(Column::new("AGE").more(18))
///     .and_any([
///         Column::new("CITY").equal("NY"),
///         Column::new("CITY").equal("LA"),
///     ]);
/// assert_eq!(condition.nodes.len(), 2);
/// ```
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Condition {
    pub nodes: Vec<ConditionNode>,
}

impl Condition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn push(mut self, composition: Composition, item: ConditionItem) -> Self {
        self.nodes.push(ConditionNode { composition, item });
        self
    }

    pub fn and(self, predicate: Predicate) -> Self {
        self.push(Composition::And, ConditionItem::Predicate(predicate))
    }

    pub fn or(self, predicate: Predicate) -> Self {
        self.push(Composition::Or, ConditionItem::Predicate(predicate))
    }

    /// `AND (p1 AND p2 ...)`
    pub fn and_all(self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.push(
            Composition::And,
            ConditionItem::Group(predicates.into_iter().collect()),
        )
    }

    /// `AND (p1 OR p2 ...)`
    pub fn and_any(self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.push(
            Composition::AndOr,
            ConditionItem::Group(predicates.into_iter().collect()),
        )
    }

    /// `OR (p1 AND p2 ...)`
    pub fn or_all(self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.push(
            Composition::OrAnd,
            ConditionItem::Group(predicates.into_iter().collect()),
        )
    }

    /// `OR (p1 OR p2 ...)`
    pub fn or_any(self, predicates: impl IntoIterator<Item = Predicate>) -> Self {
        self.push(
            Composition::OrOr,
            ConditionItem::Group(predicates.into_iter().collect()),
        )
    }

    pub fn and_nested(self, condition: Condition) -> Self {
        self.push(Composition::And, ConditionItem::Nested(condition))
    }

    pub fn or_nested(self, condition: Condition) -> Self {
        self.push(Composition::Or, ConditionItem::Nested(condition))
    }
}

impl From<Predicate> for Condition {
    fn from(value: Predicate) -> Self {
        Condition::new().and(value)
    }
}
