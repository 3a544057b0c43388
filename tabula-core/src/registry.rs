use crate::{ColumnDef, Entity, Error, Result, TableRef};
use std::{
    any::TypeId,
    collections::HashMap,
    sync::{Arc, LazyLock, PoisonError, RwLock},
};

/// Ordered column descriptors of an entity and the lookups between field and
/// column names. Immutable once built.
#[derive(Debug)]
pub struct EntitySchema {
    pub type_name: &'static str,
    pub table: TableRef,
    pub columns: Vec<ColumnDef>,
    field_to_column: HashMap<&'static str, usize>,
    column_to_field: HashMap<String, usize>,
}

impl EntitySchema {
    pub fn build<E: Entity>() -> Result<Self> {
        let columns = E::inherited_columns()
            .into_iter()
            .chain(E::columns().iter())
            .enumerate()
            .map(|(i, c)| ColumnDef {
                position: i,
                ..c.clone()
            })
            .collect::<Vec<_>>();
        Self::new(E::type_name(), *E::table(), columns)
    }

    pub fn new(type_name: &'static str, table: TableRef, columns: Vec<ColumnDef>) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::schema(format!(
                "Entity `{type_name}` does not declare any column"
            )));
        }
        let mut field_to_column = HashMap::with_capacity(columns.len());
        let mut column_to_field = HashMap::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            if field_to_column.insert(column.field, i).is_some() {
                return Err(Error::schema(format!(
                    "Entity `{type_name}` declares field `{}` more than once",
                    column.field
                )));
            }
            if column_to_field
                .insert(column.name.to_ascii_lowercase(), i)
                .is_some()
            {
                return Err(Error::schema(format!(
                    "Entity `{type_name}` maps column `{}` more than once",
                    column.name
                )));
            }
        }
        Ok(Self {
            type_name,
            table,
            columns,
            field_to_column,
            column_to_field,
        })
    }

    pub fn column_labels(&self) -> impl Iterator<Item = &'static str> {
        self.columns.iter().map(|c| c.name)
    }

    pub fn column_by_field(&self, field: &str) -> Option<&ColumnDef> {
        self.field_to_column.get(field).map(|i| &self.columns[*i])
    }

    /// Case insensitive.
    pub fn column_by_name(&self, name: &str) -> Option<&ColumnDef> {
        self.column_to_field
            .get(&name.to_ascii_lowercase())
            .map(|i| &self.columns[*i])
    }

    /// Field name first, then column name.
    pub fn resolve(&self, name: &str) -> Option<&ColumnDef> {
        self.column_by_field(name)
            .or_else(|| self.column_by_name(name))
    }

    pub fn column_name(&self, field: &str) -> Option<&'static str> {
        self.column_by_field(field).map(|c| c.name)
    }

    pub fn field_name(&self, column: &str) -> Option<&'static str> {
        self.column_by_name(column).map(|c| c.field)
    }

    pub fn primary_key(&self) -> impl Iterator<Item = &ColumnDef> {
        self.columns.iter().filter(|c| c.is_primary_key())
    }

    /// Primary key columns, `Error::Schema` when there are none.
    pub fn require_primary_key(&self) -> Result<Vec<&ColumnDef>> {
        let result = self.primary_key().collect::<Vec<_>>();
        if result.is_empty() {
            return Err(Error::schema(format!(
                "Entity `{}` does not have a primary key",
                self.type_name
            )));
        }
        Ok(result)
    }
}

impl PartialEq for EntitySchema {
    fn eq(&self, other: &Self) -> bool {
        self.type_name == other.type_name && self.table == other.table
    }
}

/// Cache of entity schemas keyed by type.
///
/// Built lazily on first access. Concurrent first accesses of the same type
/// may build the schema more than once, the first one inserted is kept and
/// returned to everybody.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: RwLock<HashMap<TypeId, Arc<EntitySchema>>>,
}

static GLOBAL: LazyLock<SchemaRegistry> = LazyLock::new(SchemaRegistry::new);

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process wide registry, initialized on first use.
    pub fn global() -> &'static SchemaRegistry {
        &GLOBAL
    }

    pub fn schema<E: Entity>(&self) -> Result<Arc<EntitySchema>> {
        let key = TypeId::of::<E>();
        if let Some(schema) = self
            .schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
        {
            return Ok(schema.clone());
        }
        let schema = Arc::new(EntitySchema::build::<E>()?);
        log::trace!(
            "Built schema of `{}` with {} columns",
            schema.type_name,
            schema.columns.len()
        );
        let mut schemas = self
            .schemas
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(schemas.entry(key).or_insert(schema).clone())
    }

    pub fn contains<E: Entity>(&self) -> bool {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&TypeId::of::<E>())
    }

    pub fn len(&self) -> usize {
        self.schemas
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
