use crate::{ColumnDef, EntitySchema, Error, Pair, Query, Result, TableSource};
use std::{
    mem,
    ops::{Deref, DerefMut},
    sync::Arc,
};

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlGroupBy,
    SqlHaving,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlJoin,
    SqlPagination,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

/// Table visible from the query being written.
#[derive(Debug, Clone)]
pub struct ScopeTable {
    pub alias: String,
    pub schema: Option<Arc<EntitySchema>>,
}

/// State carried while writing one statement: the fragment being written,
/// the tables in scope and the parameters collected so far.
#[derive(Default, Debug, Clone)]
pub struct Context {
    pub fragment: Fragment,
    pub parameters: Vec<Pair>,
    pub qualify_columns: bool,
    /// Shift the dates of `<` and `<=` comparisons to the end of their day.
    pub end_of_day: bool,
    tables: Vec<ScopeTable>,
    outer: Vec<ScopeTable>,
    single_table: bool,
}

impl Context {
    pub fn new(fragment: Fragment, qualify_columns: bool) -> Self {
        Self {
            fragment,
            qualify_columns,
            ..Default::default()
        }
    }

    /// Context of a SELECT, `Error::Model` when the query has no table.
    pub fn for_query(query: &Query, fragment: Fragment) -> Result<Self> {
        let mut result = Self::new(fragment, true);
        result.enter(query)?;
        Ok(result)
    }

    /// Context of a statement on the single unaliased table of `schema`.
    pub fn for_schema(schema: Arc<EntitySchema>, fragment: Fragment) -> Self {
        Self {
            fragment,
            tables: vec![ScopeTable {
                alias: String::new(),
                schema: Some(schema),
            }],
            single_table: true,
            ..Default::default()
        }
    }

    fn enter(&mut self, query: &Query) -> Result<()> {
        if query.from.is_none() {
            return Err(Error::model("The query does not select from any table"));
        }
        self.tables = query
            .tables()
            .map(|v| ScopeTable {
                alias: v.alias.clone(),
                schema: match &v.source {
                    TableSource::Entity(schema) => Some(schema.clone()),
                    _ => None,
                },
            })
            .collect();
        for (i, table) in self.tables.iter().enumerate() {
            if !table.alias.is_empty()
                && self.tables[..i].iter().any(|v| v.alias == table.alias)
            {
                return Err(Error::AliasCollision {
                    alias: table.alias.clone(),
                });
            }
        }
        self.single_table = query.is_single_table();
        self.end_of_day = query.end_of_day;
        Ok(())
    }

    /// Context of a sub-query. It takes over the parameters collected so far,
    /// give them back with [`Context::leave`].
    pub fn nested(&mut self, query: &Query) -> Result<Context> {
        let mut result = Context::new(Fragment::SqlSelect, self.qualify_columns);
        result.enter(query)?;
        result.outer = self
            .tables
            .iter()
            .chain(self.outer.iter())
            .cloned()
            .collect();
        // Inner aliases must not hide the ones of the enclosing queries
        if let Some(table) = result
            .tables
            .iter()
            .find(|v| !v.alias.is_empty() && result.outer.iter().any(|o| o.alias == v.alias))
        {
            return Err(Error::AliasCollision {
                alias: table.alias.clone(),
            });
        }
        result.parameters = mem::take(&mut self.parameters);
        Ok(result)
    }

    pub fn leave(&mut self, nested: Context) {
        self.parameters = nested.parameters;
    }

    /// Alias unqualified columns get, `None` when there is more than one table.
    pub fn default_alias(&self) -> Option<&str> {
        if self.single_table {
            self.tables.first().map(|v| v.alias.as_str())
        } else {
            None
        }
    }

    pub fn is_single_table(&self) -> bool {
        self.single_table
    }

    pub fn tables(&self) -> &[ScopeTable] {
        &self.tables
    }

    /// Schema of the table named by `alias`, inner tables first.
    pub fn schema_of(&self, alias: &str) -> Option<Arc<EntitySchema>> {
        self.tables
            .iter()
            .chain(self.outer.iter())
            .find(|v| v.alias == alias)
            .and_then(|v| v.schema.clone())
    }

    /// Descriptor of the column `name` of the table `alias`.
    pub fn column_def(&self, alias: &str, name: &str) -> Option<ColumnDef> {
        self.schema_of(alias)
            .and_then(|v| v.resolve(name).cloned())
    }

    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        let previous = mem::replace(&mut self.fragment, fragment);
        ContextUpdater {
            current: self,
            previous,
        }
    }
}

/// Restores the previous fragment when dropped.
pub struct ContextUpdater<'a> {
    pub current: &'a mut Context,
    pub previous: Fragment,
}

impl Deref for ContextUpdater<'_> {
    type Target = Context;

    fn deref(&self) -> &Self::Target {
        self.current
    }
}

impl DerefMut for ContextUpdater<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.current
    }
}

impl Drop for ContextUpdater<'_> {
    fn drop(&mut self) {
        self.current.fragment = self.previous;
    }
}
