#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tabula::{
        Column, ColumnDef, Encoding, Entity, Error, GenericSqlWriter, PrimaryKeyType, Query,
        RawRow, SchemaRegistry, SqlWriter, StorageType, TableRef, Value,
    };
    use time::macros::date;

    #[test]
    fn entity_defaults() {
        #[derive(Entity)]
        struct SomeEntity {
            a: i8,
            b: String,
            _c: Option<time::Time>,
        }
        assert_eq!(
            SomeEntity::table(),
            &TableRef {
                name: "SOME_ENTITY",
                schema: "",
            }
        );
        assert_eq!(SomeEntity::type_name(), "SomeEntity");
        let columns = SomeEntity::columns();
        assert_eq!(columns.len(), 3);

        assert_eq!(columns[0].field, "a");
        assert_eq!(columns[0].name, "A");
        assert!(matches!(columns[0].value, Value::Int8(None)));
        assert!(!columns[0].nullable);
        assert_eq!(columns[0].storage, StorageType::Plain);

        assert_eq!(columns[1].name, "B");
        assert!(matches!(columns[1].value, Value::Varchar(None)));

        assert_eq!(columns[2].field, "_c");
        assert_eq!(columns[2].name, "C");
        assert!(matches!(columns[2].value, Value::Time(None)));
        assert!(columns[2].nullable);
        assert_eq!(columns[2].position, 2);
        assert!(SomeEntity::inherited_columns().is_empty());
    }

    fn upper(value: &Value, _column: &ColumnDef) -> tabula::Result<Option<Value>> {
        Ok(value
            .as_str()
            .map(|v| Value::Varchar(Some(v.to_uppercase()))))
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[tabula(name = "ACCOUNTS", schema = "bank")]
    struct Account {
        #[tabula(primary_key)]
        id: i64,
        #[tabula(name = "OWNER")]
        owner_name: String,
        #[tabula(precision = 12, scale = 2)]
        balance: Decimal,
        nickname: Option<String>,
        #[tabula(storage = "long_date")]
        opened: time::Date,
        #[tabula(storage = "clob", encoding = "UTF-16LE")]
        notes: Option<String>,
        #[tabula(converter = upper)]
        code: String,
        #[tabula(skip)]
        cache: Vec<String>,
    }

    fn account() -> Account {
        Account {
            id: 7,
            owner_name: "Ada".into(),
            balance: Decimal::new(125050, 2),
            nickname: None,
            opened: date!(2024 - 03 - 15),
            notes: Some("vip".into()),
            code: "ABC".into(),
            cache: vec![],
        }
    }

    #[test]
    fn entity_attributes() {
        assert_eq!(
            Account::table(),
            &TableRef {
                name: "ACCOUNTS",
                schema: "bank",
            }
        );
        let columns = Account::columns();
        assert_eq!(columns.len(), 7);
        assert_eq!(columns[0].primary_key, PrimaryKeyType::PrimaryKey);
        assert!(!columns[0].nullable);
        assert_eq!(columns[1].field, "owner_name");
        assert_eq!(columns[1].name, "OWNER");
        assert_eq!(columns[2].value, Value::Decimal(None, 12, 2));
        assert_eq!(columns[2].scale, Some(2));
        assert!(columns[3].nullable);
        assert_eq!(columns[4].storage, StorageType::LongDate);
        assert!(matches!(columns[4].value, Value::Date(None)));
        assert_eq!(columns[5].storage, StorageType::LargeCharacter);
        assert_eq!(columns[5].encoding, Encoding::Utf16Le);
        assert!(columns[6].converter.is_some());
        assert!(columns.iter().all(|c| c.field != "cache"));
    }

    #[test]
    fn entity_row_full() {
        let row = account().row_full();
        assert_eq!(
            row.labels.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["ID", "OWNER", "BALANCE", "NICKNAME", "OPENED", "NOTES", "CODE"]
        );
        assert_eq!(row.get_column("id"), Some(&Value::Int64(Some(7))));
        assert_eq!(row.get_column("NICKNAME"), Some(&Value::Varchar(None)));
        assert_eq!(
            Account::from_row(row).unwrap(),
            Account {
                cache: vec![],
                ..account()
            }
        );
    }

    #[test]
    fn entity_from_partial_row() {
        let mut row = account().row_full();
        let keep = |label: &str| !matches!(label, "NICKNAME" | "NOTES");
        row.values = row
            .labels
            .iter()
            .zip(row.values.iter())
            .filter(|(l, _)| keep(l))
            .map(|(_, v)| v.clone())
            .collect();
        row.labels = row
            .labels
            .iter()
            .filter(|l| keep(l))
            .cloned()
            .collect::<Vec<_>>()
            .into();
        let account = Account::from_row(row.clone()).unwrap();
        assert_eq!(account.nickname, None);
        assert_eq!(account.notes, None);

        row.labels = row
            .labels
            .iter()
            .map(|v| if v == "OWNER" { "OTHER".into() } else { v.clone() })
            .collect::<Vec<_>>()
            .into();
        assert!(matches!(Account::from_row(row), Err(Error::Model(..))));
    }

    #[test]
    fn entity_hydrate() {
        let account: Account = GenericSqlWriter::new()
            .hydrate_entity(RawRow::from_values(
                ["id", "owner", "BALANCE", "Opened", "notes", "code", "rn_"],
                [
                    Value::Int64(Some(7)),
                    Value::Unknown(Some("Ada".into())),
                    Value::Unknown(Some("1250.5".into())),
                    Value::Int64(Some(1_710_460_800_000)),
                    Value::Varchar(Some("vip".into())),
                    Value::Varchar(Some("abc".into())),
                    Value::Int64(Some(1)),
                ],
            ))
            .unwrap();
        assert_eq!(account, self::account());
    }

    #[test]
    fn entity_statements() {
        let writer = GenericSqlWriter::new();
        let query = Query::of::<Account>()
            .unwrap()
            .filter(Column::new("owner_name").equal("Ada"));
        let compiled = writer.compile_select(&query, None).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM bank.ACCOUNTS WHERE OWNER = ?");

        let query = Query::of::<Account>()
            .unwrap()
            .filter(Column::new("opened").less_equal(date!(2024 - 03 - 15)));
        let compiled = writer.compile_select(&query, None).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM bank.ACCOUNTS WHERE OPENED <= ?");
        assert_eq!(compiled.parameters[0].storage, StorageType::LongDate);

        let schema = SchemaRegistry::global().schema::<Account>().unwrap();
        let compiled = writer.compile_insert(&schema, &account().row_full()).unwrap();
        assert_eq!(
            compiled.sql,
            "INSERT INTO bank.ACCOUNTS (ID, OWNER, BALANCE, NICKNAME, OPENED, NOTES, CODE) VALUES (?, ?, ?, ?, ?, ?, ?)"
        );
        assert_eq!(compiled.parameters[2].scale, Some(2));
        assert_eq!(compiled.parameters[5].encoding, Encoding::Utf16Le);
        let compiled = writer
            .compile_find_by_id(&schema, &[Value::Int64(Some(7))])
            .unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM bank.ACCOUNTS WHERE ID = ?");
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[tabula(name = "AUDITED")]
    struct Audit {
        created_by: String,
        version: i32,
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    struct Document {
        #[tabula(primary_key)]
        id: i32,
        #[tabula(inherit)]
        audit: Audit,
        title: String,
    }

    #[derive(Entity, Debug, Clone, PartialEq)]
    #[tabula(name = "SIGNED_DOCUMENTS")]
    struct SignedDocument {
        #[tabula(inherit)]
        document: Document,
        signature: Box<[u8]>,
    }

    #[test]
    fn entity_inherit() {
        assert_eq!(Document::table().name, "DOCUMENT");
        assert_eq!(
            Document::inherited_columns()
                .iter()
                .map(|c| c.name)
                .collect::<Vec<_>>(),
            vec!["CREATED_BY", "VERSION"]
        );
        let registry = SchemaRegistry::new();
        let schema = registry.schema::<SignedDocument>().unwrap();
        assert_eq!(
            schema
                .columns
                .iter()
                .map(|c| (c.position, c.name))
                .collect::<Vec<_>>(),
            vec![
                (0, "CREATED_BY"),
                (1, "VERSION"),
                (2, "ID"),
                (3, "TITLE"),
                (4, "SIGNATURE"),
            ]
        );
        assert_eq!(schema.require_primary_key().unwrap()[0].name, "ID");
        assert!(Arc::ptr_eq(
            &schema,
            &registry.schema::<SignedDocument>().unwrap()
        ));

        let signed = SignedDocument {
            document: Document {
                id: 1,
                audit: Audit {
                    created_by: "root".into(),
                    version: 3,
                },
                title: "Charter".into(),
            },
            signature: vec![1, 2, 3].into_boxed_slice(),
        };
        let row = signed.row_full();
        assert_eq!(
            row.labels.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["CREATED_BY", "VERSION", "ID", "TITLE", "SIGNATURE"]
        );
        assert_eq!(SignedDocument::from_row(row).unwrap(), signed);
    }

    #[test]
    fn entity_composite_key() {
        #[derive(Entity)]
        #[tabula(primary_key = ("CODE", Self::region))]
        struct Branch {
            code: String,
            region: i16,
            label: Option<String>,
        }
        let columns = Branch::columns();
        assert_eq!(columns[0].primary_key, PrimaryKeyType::PartOfPrimaryKey);
        assert_eq!(columns[1].primary_key, PrimaryKeyType::PartOfPrimaryKey);
        assert_eq!(columns[2].primary_key, PrimaryKeyType::None);
        let schema = SchemaRegistry::new().schema::<Branch>().unwrap();
        let compiled = GenericSqlWriter::new()
            .compile_delete_by_id(
                &schema,
                &[Value::Varchar(Some("N1".into())), Value::Int16(Some(4))],
            )
            .unwrap();
        assert_eq!(
            compiled.sql,
            "DELETE FROM BRANCH WHERE CODE = ? AND REGION = ?"
        );
    }
}
