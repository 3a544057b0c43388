use crate::{
    Column, Condition, Entity, EntitySchema, Error, Ordered, Result, SchemaRegistry,
};
use std::{
    collections::BTreeSet,
    fmt::{self, Debug, Formatter},
    sync::{Arc, Mutex, PoisonError},
};

/// Set of aliases used in a query tree. Cloning shares the set.
#[derive(Default, Clone)]
pub struct AliasScope(Arc<Mutex<BTreeSet<String>>>);

impl AliasScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `alias`, `Error::AliasCollision` when it is already taken.
    pub fn reserve(&self, alias: &str) -> Result<()> {
        let mut aliases = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        if !aliases.insert(alias.to_string()) {
            return Err(Error::AliasCollision {
                alias: alias.to_string(),
            });
        }
        Ok(())
    }

    /// Registers and returns `{prefix}{n}` with the lowest free `n`.
    pub fn mint(&self, prefix: char) -> String {
        let prefix = prefix.to_ascii_lowercase();
        let mut aliases = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        let alias = (0usize..)
            .map(|i| format!("{prefix}{i}"))
            .find(|v| !aliases.contains(v))
            .unwrap_or_else(|| prefix.to_string());
        aliases.insert(alias.clone());
        alias
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(alias)
    }

    /// Both share the same set.
    pub fn shared_with(&self, other: &AliasScope) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Debug for AliasScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let aliases = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        f.debug_set().entries(aliases.iter()).finish()
    }
}

/// What an alias points to.
#[derive(Debug, Clone, PartialEq)]
pub enum TableSource {
    Entity(Arc<EntitySchema>),
    Named(String),
    SubQuery(Box<Query>),
}

/// Table (or sub-query) bound to an alias. Empty alias means unaliased.
#[derive(Debug, Clone, PartialEq)]
pub struct AliasTable {
    pub alias: String,
    pub source: TableSource,
}

impl AliasTable {
    /// Column qualified with this alias.
    pub fn col(&self, name: impl Into<String>) -> Column {
        Column::new(name).of(self)
    }

    pub fn schema(&self) -> Option<&Arc<EntitySchema>> {
        match &self.source {
            TableSource::Entity(schema) => Some(schema),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
    Left,
    Right,
    Full,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinType,
    pub table: AliasTable,
    pub on: Condition,
}

/// What the rows of a compiled query are hydrated into.
#[derive(Default, Debug, Clone, PartialEq)]
pub enum ResultShape {
    Entity(Arc<EntitySchema>),
    #[default]
    Map,
    Scalar,
}

/// Neutral SELECT model.
///
/// ```rust
/// use tabula_core::{Column, Condition, JoinType, Query};
/// # fn main() -> tabula_core::Result<()> {
/// let query = Query::from_table("ORDERS");
/// let o = query.table_named("ORDERS")?;
/// let c = query.table_named("CUSTOMERS")?;
/// let query = query
///     .from(&o)
///     .join(
///         JoinType::Inner,
///         &c,
///         Condition::new().and(o.col("CUSTOMER_ID").equal(c.col("ID"))),
///     )
///     .select([o.col("ID"), c.col("NAME")]);
/// assert_eq!(o.alias, "o0");
/// assert_eq!(c.alias, "c0");
/// assert_eq!(query.joins.len(), 1);
/// # Ok(())
/// # }
/// ```
#[derive(Default, Debug, Clone)]
pub struct Query {
    pub from: Option<AliasTable>,
    pub joins: Vec<Join>,
    pub columns: Vec<Column>,
    pub distinct: bool,
    pub condition: Condition,
    pub group_by: Vec<Column>,
    pub having: Condition,
    pub order_by: Vec<Ordered>,
    /// Shift the dates of `<` and `<=` comparisons to the end of their day.
    pub end_of_day: bool,
    pub shape: ResultShape,
    scope: AliasScope,
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.from == other.from
            && self.joins == other.joins
            && self.columns == other.columns
            && self.distinct == other.distinct
            && self.condition == other.condition
            && self.group_by == other.group_by
            && self.having == other.having
            && self.order_by == other.order_by
            && self.end_of_day == other.end_of_day
            && self.shape == other.shape
    }
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Single unaliased table of the entity, rows hydrated into `E`.
    pub fn of<E: Entity>() -> Result<Self> {
        Ok(Self::from_schema(SchemaRegistry::global().schema::<E>()?))
    }

    pub fn from_schema(schema: Arc<EntitySchema>) -> Self {
        Self {
            shape: ResultShape::Entity(schema.clone()),
            from: Some(AliasTable {
                alias: String::new(),
                source: TableSource::Entity(schema),
            }),
            ..Default::default()
        }
    }

    /// Single unaliased table.
    pub fn from_table(name: impl Into<String>) -> Self {
        Self {
            from: Some(AliasTable {
                alias: String::new(),
                source: TableSource::Named(name.into()),
            }),
            ..Default::default()
        }
    }

    /// Child query sharing the alias scope, to be used as a sub-query.
    pub fn nested(&self) -> Self {
        Self {
            scope: self.scope.clone(),
            ..Default::default()
        }
    }

    pub fn scope(&self) -> &AliasScope {
        &self.scope
    }

    pub fn table<E: Entity>(&self) -> Result<AliasTable> {
        let schema = SchemaRegistry::global().schema::<E>()?;
        let alias = self.scope.mint(initial(E::type_name(), 'e'));
        Ok(AliasTable {
            alias,
            source: TableSource::Entity(schema),
        })
    }

    pub fn table_as<E: Entity>(&self, alias: impl Into<String>) -> Result<AliasTable> {
        let alias = alias.into();
        let schema = SchemaRegistry::global().schema::<E>()?;
        self.scope.reserve(&alias)?;
        Ok(AliasTable {
            alias,
            source: TableSource::Entity(schema),
        })
    }

    pub fn table_named(&self, name: impl Into<String>) -> Result<AliasTable> {
        let name = name.into();
        let alias = self.scope.mint(initial(&name, 't'));
        Ok(AliasTable {
            alias,
            source: TableSource::Named(name),
        })
    }

    pub fn table_named_as(
        &self,
        name: impl Into<String>,
        alias: impl Into<String>,
    ) -> Result<AliasTable> {
        let alias = alias.into();
        self.scope.reserve(&alias)?;
        Ok(AliasTable {
            alias,
            source: TableSource::Named(name.into()),
        })
    }

    pub fn sub_query(&self, query: Query) -> Result<AliasTable> {
        let alias = self.scope.mint('q');
        Ok(AliasTable {
            alias,
            source: TableSource::SubQuery(query.into()),
        })
    }

    pub fn sub_query_as(&self, query: Query, alias: impl Into<String>) -> Result<AliasTable> {
        let alias = alias.into();
        self.scope.reserve(&alias)?;
        Ok(AliasTable {
            alias,
            source: TableSource::SubQuery(query.into()),
        })
    }

    pub fn from(mut self, table: &AliasTable) -> Self {
        if let (ResultShape::Map, Some(schema), None, true) = (
            &self.shape,
            table.schema(),
            &self.from,
            self.joins.is_empty(),
        ) {
            self.shape = ResultShape::Entity(schema.clone());
        }
        self.from = Some(table.clone());
        self
    }

    pub fn join(mut self, kind: JoinType, table: &AliasTable, on: impl Into<Condition>) -> Self {
        self.joins.push(Join {
            kind,
            table: table.clone(),
            on: on.into(),
        });
        self
    }

    pub fn select(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.columns.extend(columns);
        self
    }

    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }

    pub fn filter(mut self, condition: impl Into<Condition>) -> Self {
        self.condition = condition.into();
        self
    }

    pub fn group_by(mut self, columns: impl IntoIterator<Item = Column>) -> Self {
        self.group_by.extend(columns);
        self
    }

    pub fn having(mut self, condition: impl Into<Condition>) -> Self {
        self.having = condition.into();
        self
    }

    pub fn order_by(mut self, order: impl IntoIterator<Item = Ordered>) -> Self {
        self.order_by.extend(order);
        self
    }

    pub fn end_of_day(mut self, value: bool) -> Self {
        self.end_of_day = value;
        self
    }

    pub fn shape(mut self, shape: ResultShape) -> Self {
        self.shape = shape;
        self
    }

    /// FROM table followed by the joined ones.
    pub fn tables(&self) -> impl Iterator<Item = &AliasTable> {
        self.from
            .iter()
            .chain(self.joins.iter().map(|v| &v.table))
    }

    pub fn is_single_table(&self) -> bool {
        self.from.is_some() && self.joins.is_empty()
    }
}

fn initial(name: &str, fallback: char) -> char {
    name.rsplit("::")
        .next()
        .and_then(|v| v.chars().find(char::is_ascii_alphabetic))
        .unwrap_or(fallback)
}
