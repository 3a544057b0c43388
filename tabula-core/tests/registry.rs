#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Barrier, LazyLock},
        thread,
    };
    use tabula_core::{
        AsValue, ColumnDef, Entity, EntitySchema, Error, GenericSqlWriter, PrimaryKeyType, Query,
        RawRow, Result, ResultShape, RowLabeled, SchemaRegistry, SqlWriter, TableRef, Value,
        is_reserved_word,
    };

    #[derive(Debug, PartialEq)]
    struct Book {
        id: i64,
        title: String,
    }

    static BOOK_TABLE: TableRef = TableRef {
        name: "BOOKS",
        schema: "library",
    };
    static BOOK_COLUMNS: LazyLock<Vec<ColumnDef>> = LazyLock::new(|| {
        vec![
            ColumnDef {
                field: "id",
                name: "BOOK_ID",
                value: Value::Int64(None),
                primary_key: PrimaryKeyType::PrimaryKey,
                ..Default::default()
            },
            ColumnDef {
                field: "title",
                name: "TITLE",
                value: Value::Varchar(None),
                position: 1,
                ..Default::default()
            },
        ]
    });

    impl Entity for Book {
        fn type_name() -> &'static str {
            "Book"
        }
        fn table() -> &'static TableRef {
            &BOOK_TABLE
        }
        fn columns() -> &'static [ColumnDef] {
            &BOOK_COLUMNS
        }
        fn row_full(&self) -> RowLabeled {
            RowLabeled::new(
                vec!["BOOK_ID".to_string(), "TITLE".into()].into(),
                vec![self.id.as_value(), self.title.clone().as_value()].into(),
            )
        }
        fn from_row(row: RowLabeled) -> Result<Self> {
            let get = |name: &str| {
                row.get_column(name)
                    .cloned()
                    .ok_or_else(|| Error::model(format!("Missing column {name}")))
            };
            Ok(Self {
                id: i64::try_from_value(get("BOOK_ID")?)?,
                title: String::try_from_value(get("TITLE")?)?,
            })
        }
    }

    /// Embeds the columns of `Book`.
    struct Ebook {
        book: Book,
        url: String,
    }

    static EBOOK_TABLE: TableRef = TableRef {
        name: "EBOOKS",
        schema: "",
    };
    static EBOOK_COLUMNS: LazyLock<Vec<ColumnDef>> = LazyLock::new(|| {
        vec![ColumnDef {
            field: "url",
            name: "URL",
            value: Value::Varchar(None),
            ..Default::default()
        }]
    });

    impl Entity for Ebook {
        fn type_name() -> &'static str {
            "Ebook"
        }
        fn table() -> &'static TableRef {
            &EBOOK_TABLE
        }
        fn columns() -> &'static [ColumnDef] {
            &EBOOK_COLUMNS
        }
        fn inherited_columns() -> Vec<&'static ColumnDef> {
            Book::inherited_columns()
                .into_iter()
                .chain(Book::columns().iter())
                .collect()
        }
        fn row_full(&self) -> RowLabeled {
            let base = self.book.row_full();
            RowLabeled::new(
                base.labels
                    .iter()
                    .cloned()
                    .chain(["URL".to_string()])
                    .collect(),
                base.values
                    .iter()
                    .cloned()
                    .chain([self.url.clone().as_value()])
                    .collect(),
            )
        }
        fn from_row(row: RowLabeled) -> Result<Self> {
            let url = row
                .get_column("URL")
                .cloned()
                .ok_or_else(|| Error::model("Missing column URL"))?;
            Ok(Self {
                url: String::try_from_value(url)?,
                book: Book::from_row(row)?,
            })
        }
    }

    struct Empty;

    static EMPTY_TABLE: TableRef = TableRef {
        name: "EMPTY",
        schema: "",
    };

    impl Entity for Empty {
        fn type_name() -> &'static str {
            "Empty"
        }
        fn table() -> &'static TableRef {
            &EMPTY_TABLE
        }
        fn columns() -> &'static [ColumnDef] {
            &[]
        }
        fn row_full(&self) -> RowLabeled {
            RowLabeled::default()
        }
        fn from_row(_row: RowLabeled) -> Result<Self> {
            Ok(Empty)
        }
    }

    #[test]
    fn schema_lookups() {
        let schema = EntitySchema::build::<Book>().unwrap();
        assert_eq!(schema.column_name("id"), Some("BOOK_ID"));
        assert_eq!(schema.field_name("book_id"), Some("id"));
        assert_eq!(schema.resolve("TITLE").map(|c| c.field), Some("title"));
        assert_eq!(schema.resolve("title").map(|c| c.name), Some("TITLE"));
        assert!(schema.resolve("missing").is_none());
        assert_eq!(
            schema.require_primary_key().unwrap()[0].name,
            "BOOK_ID"
        );
        assert_eq!(
            schema.column_labels().collect::<Vec<_>>(),
            vec!["BOOK_ID", "TITLE"]
        );
    }

    #[test]
    fn schema_inherited() {
        let schema = EntitySchema::build::<Ebook>().unwrap();
        assert_eq!(
            schema
                .columns
                .iter()
                .map(|c| (c.position, c.name))
                .collect::<Vec<_>>(),
            vec![(0, "BOOK_ID"), (1, "TITLE"), (2, "URL")]
        );
        assert!(schema.column_by_field("id").unwrap().is_primary_key());
        let ebook = Ebook::from_row(
            Ebook {
                book: Book {
                    id: 3,
                    title: "Dune".into(),
                },
                url: "http://x".into(),
            }
            .row_full(),
        )
        .unwrap();
        assert_eq!(ebook.book.title, "Dune");
        assert_eq!(ebook.url, "http://x");
    }

    #[test]
    fn schema_invalid() {
        assert!(matches!(
            EntitySchema::build::<Empty>(),
            Err(Error::Schema(..))
        ));
        let column = ColumnDef {
            field: "a",
            name: "A",
            ..Default::default()
        };
        let duplicated = EntitySchema::new(
            "Twice",
            TableRef::default(),
            vec![
                column.clone(),
                ColumnDef {
                    field: "b",
                    name: "a",
                    ..Default::default()
                },
            ],
        );
        assert!(matches!(duplicated, Err(Error::Schema(..))));
        let schema = EntitySchema::new("Keyless", TableRef::default(), vec![column]).unwrap();
        assert!(matches!(
            schema.require_primary_key(),
            Err(Error::Schema(..))
        ));
    }

    #[test]
    fn registry_concurrent() {
        let registry = SchemaRegistry::new();
        assert!(registry.is_empty());
        let barrier = Barrier::new(8);
        let schemas = thread::scope(|s| {
            let handles = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        registry.schema::<Book>().unwrap()
                    })
                })
                .collect::<Vec<_>>();
            handles
                .into_iter()
                .map(|v| v.join().unwrap())
                .collect::<Vec<_>>()
        });
        assert!(schemas.iter().all(|v| Arc::ptr_eq(v, &schemas[0])));
        assert!(Arc::ptr_eq(
            &registry.schema::<Book>().unwrap(),
            &schemas[0]
        ));
        assert_eq!(registry.len(), 1);
        assert!(registry.contains::<Book>());
        assert!(!registry.contains::<Ebook>());
    }

    #[test]
    fn query_of_entity() {
        let query = Query::of::<Book>().unwrap();
        assert!(matches!(&query.shape, ResultShape::Entity(schema) if schema.type_name == "Book"));
        let compiled = GenericSqlWriter::new()
            .compile_select(&query.filter(tabula_core::Column::new("id").equal(3)), None)
            .unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM library.BOOKS WHERE BOOK_ID = ?"
        );
        assert_eq!(compiled.parameters[0].kind, Value::Int64(None));

        let query = Query::new();
        let b = query.table::<Book>().unwrap();
        let e = query.table::<Ebook>().unwrap();
        assert_eq!(b.alias, "b0");
        assert_eq!(e.alias, "e0");
        assert!(matches!(
            query.table_as::<Book>("e0"),
            Err(Error::AliasCollision { .. })
        ));
        let query = query.from(&b);
        assert!(matches!(query.shape, ResultShape::Entity(..)));
    }

    #[test]
    fn hydrate_entity() {
        let book: Book = GenericSqlWriter::new()
            .hydrate_entity(RawRow::from_values(
                ["book_id", "title"],
                [Value::Int32(Some(9)), Value::Unknown(Some("Emma".into()))],
            ))
            .unwrap();
        assert_eq!(
            book,
            Book {
                id: 9,
                title: "Emma".into()
            }
        );
    }

    #[test]
    fn reserved_words() {
        assert!(is_reserved_word("order"));
        assert!(is_reserved_word("User"));
        assert!(is_reserved_word("ROWNUM"));
        assert!(!is_reserved_word("customer"));
    }
}
