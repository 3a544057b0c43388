#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use std::sync::Arc;
    use tabula_core::{
        BitOp, Column, ColumnDef, Condition, EntitySchema, Error, GenericSqlWriter, JoinType,
        PageWindow, Pagination, PrimaryKeyType, Query, ResultShape, RowLabeled, SqlWriter,
        TableRef, Value,
    };
    use time::macros::{date, datetime};

    const WRITER: GenericSqlWriter = GenericSqlWriter::new();

    struct RowNumberWriter;
    impl SqlWriter for RowNumberWriter {
        fn as_dyn(&self) -> &dyn SqlWriter {
            self
        }
        fn pagination(&self) -> Pagination {
            Pagination::RowNumber
        }
    }

    struct RownumWriter;
    impl SqlWriter for RownumWriter {
        fn as_dyn(&self) -> &dyn SqlWriter {
            self
        }
        fn pagination(&self) -> Pagination {
            Pagination::PseudoRowNumber
        }
    }

    fn product() -> Arc<EntitySchema> {
        Arc::new(
            EntitySchema::new(
                "Product",
                TableRef {
                    name: "PRODUCT",
                    schema: "",
                },
                vec![
                    ColumnDef {
                        field: "id",
                        name: "ID",
                        value: Value::Int64(None),
                        primary_key: PrimaryKeyType::PrimaryKey,
                        ..Default::default()
                    },
                    ColumnDef {
                        field: "name",
                        name: "NAME",
                        value: Value::Varchar(None),
                        position: 1,
                        ..Default::default()
                    },
                    ColumnDef {
                        field: "price",
                        name: "PRICE",
                        value: Value::Decimal(None, 10, 2),
                        nullable: true,
                        position: 2,
                        ..Default::default()
                    },
                ],
            )
            .unwrap(),
        )
    }

    fn users() -> Query {
        Query::from_table("USERS")
    }

    #[test]
    fn select_filtered() {
        let query = users()
            .select([Column::new("NAME"), Column::new("AGE")])
            .filter(Condition::new().and(Column::new("AGE").more(18)).and_any([
                Column::new("CITY").equal("NY"),
                Column::new("CITY").equal("LA"),
            ]))
            .order_by([Column::new("NAME").asc()]);
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT NAME, AGE FROM USERS WHERE AGE > ? AND (CITY = ? OR CITY = ?) ORDER BY NAME ASC"
        );
        assert_eq!(
            compiled.values().cloned().collect::<Vec<_>>(),
            vec![
                Value::Int32(Some(18)),
                Value::Varchar(Some("NY".into())),
                Value::Varchar(Some("LA".into())),
            ]
        );
        assert_eq!(compiled.shape, ResultShape::Map);

        let paged = WRITER
            .compile_select(&query, Some(PageWindow::new(20, 10)))
            .unwrap();
        assert_eq!(
            paged.sql,
            "SELECT NAME, AGE FROM USERS WHERE AGE > ? AND (CITY = ? OR CITY = ?) ORDER BY NAME ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            paged.values().skip(3).cloned().collect::<Vec<_>>(),
            vec![Value::Int64(Some(10)), Value::Int64(Some(20))]
        );
    }

    #[test]
    fn select_deterministic() {
        let query = users()
            .select([Column::new("NAME")])
            .filter(Column::new("ID").is_in([1, 2, 3]))
            .order_by([Column::new("NAME").desc()]);
        let first = WRITER.compile_select(&query, Some(PageWindow::new(0, 5))).unwrap();
        let second = WRITER.compile_select(&query, Some(PageWindow::new(0, 5))).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.sql,
            "SELECT NAME FROM USERS WHERE ID IN (?, ?, ?) ORDER BY NAME DESC LIMIT ? OFFSET ?"
        );
    }

    #[test]
    fn select_order_columns() {
        let query = users()
            .select([Column::new("NAME")])
            .order_by([Column::new("AGE").desc(), Column::new("NAME").asc()]);
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT NAME, AGE FROM USERS ORDER BY AGE DESC, NAME ASC"
        );
        let query = users()
            .select([Column::new("AGE").function("MAX").label("oldest")])
            .order_by([Column::new("oldest").desc()]);
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT MAX(AGE) AS oldest FROM USERS ORDER BY oldest DESC"
        );
        let query = users()
            .select([Column::all()])
            .order_by([Column::new("AGE").asc()]);
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT * FROM USERS ORDER BY AGE ASC"
        );
    }

    #[test]
    fn select_in_empty() {
        let query = users().filter(Column::new("ID").is_in(Vec::<i32>::new()));
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT * FROM USERS WHERE 1=0"
        );
        let query = users().filter(Column::new("ID").not_in(Vec::<i32>::new()));
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM USERS WHERE 1=1");
        assert!(compiled.parameters.is_empty());
    }

    #[test]
    fn select_between() {
        let query = users().filter(Column::new("AGE").between(18, 30));
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(compiled.sql, "SELECT * FROM USERS WHERE AGE BETWEEN ? AND ?");
        assert_eq!(compiled.parameters.len(), 2);

        let query = users().filter(
            Condition::new()
                .and(Column::new("AGE").between(Value::Null, Value::Int32(None)))
                .and(Column::new("CITY").equal("NY")),
        );
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT * FROM USERS WHERE CITY = ?"
        );

        let query = users().filter(Column::new("AGE").between(18, Value::Null));
        assert!(matches!(
            WRITER.compile_select(&query, None),
            Err(Error::Model(..))
        ));
    }

    #[test]
    fn select_nulls() {
        let query = users().filter(
            Condition::new()
                .and(Column::new("CITY").equal(Value::Varchar(None)))
                .and(Column::new("NAME").not_equal(Value::Null)),
        );
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM USERS WHERE CITY IS NULL AND NAME IS NOT NULL"
        );
        assert!(compiled.parameters.is_empty());
        let query = users().filter(Column::new("AGE").less(Value::Int32(None)));
        assert!(matches!(
            WRITER.compile_select(&query, None),
            Err(Error::Model(..))
        ));
    }

    #[test]
    fn select_text_predicates() {
        let query = users().filter(
            Condition::new()
                .and(Column::new("NAME").start_with("Jo"))
                .and(Column::new("NAME").not_like("x"))
                .and(Column::new("CITY").end_with('k'))
                .and(Column::new("NICK").is_empty())
                .or(Column::new("NICK").is_not_empty()),
        );
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM USERS WHERE NAME LIKE ? AND NAME NOT LIKE ? AND CITY LIKE ? AND (NICK = '' OR NICK IS NULL) OR (NICK <> '' AND NICK IS NOT NULL)"
        );
        assert_eq!(
            compiled.values().cloned().collect::<Vec<_>>(),
            vec![
                Value::Varchar(Some("Jo%".into())),
                Value::Varchar(Some("%x%".into())),
                Value::Varchar(Some("%k".into())),
            ]
        );
        let query = users().filter(Column::new("AGE").like(5));
        assert!(matches!(
            WRITER.compile_select(&query, None),
            Err(Error::UnsupportedConversion { .. })
        ));
    }

    #[test]
    fn select_nested_conditions() {
        let query = users().filter(
            Condition::new()
                .and(Column::new("A").equal(1))
                .or_nested(
                    Condition::new()
                        .and(Column::new("B").equal(2))
                        .and(Column::new("C").equal(3)),
                )
                .or_all([Column::new("D").equal(4), Column::new("E").equal(5)])
                .or_any([Column::new("F").equal(6), Column::new("G").equal(7)])
                .and_nested(Condition::new())
                .and_all([Column::new("H").is_null()]),
        );
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT * FROM USERS WHERE A = ? OR (B = ? AND C = ?) OR (D = ? AND E = ?) OR (F = ? OR G = ?) AND (H IS NULL)"
        );
    }

    #[test]
    fn select_end_of_day() {
        let query = users()
            .filter(
                Condition::new()
                    .and(Column::new("CREATED").more_equal(date!(2024 - 03 - 01)))
                    .and(Column::new("CREATED").less_equal(date!(2024 - 03 - 15))),
            )
            .end_of_day(true);
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.values().cloned().collect::<Vec<_>>(),
            vec![
                Value::Date(Some(date!(2024 - 03 - 01))),
                Value::Timestamp(Some(datetime!(2024-03-15 23:59:59.999))),
            ]
        );
    }

    #[test]
    fn bit_operators() {
        for (op, expected) in [
            (BitOp::And, "(A & B)"),
            (BitOp::Or, "(A | B)"),
            (BitOp::Xor, "(A ^ B)"),
            (BitOp::Add, "(A + B)"),
            (BitOp::Subtract, "(A - B)"),
            (BitOp::Multiply, "(A * B)"),
            (BitOp::Divide, "(A / B)"),
            (BitOp::Remainder, "(A % B)"),
        ] {
            assert_eq!(
                WRITER.render_bit_operator(op, "A", Some("B")).unwrap(),
                expected
            );
            assert!(matches!(
                WRITER.render_bit_operator(op, "A", None),
                Err(Error::Model(..))
            ));
        }
        assert_eq!(
            WRITER.render_bit_operator(BitOp::Not, "A", None).unwrap(),
            "(~A)"
        );
        assert_eq!(
            WRITER
                .render_bit_operator(BitOp::Not, "A", Some("B"))
                .unwrap(),
            "(~A)"
        );
    }

    #[test]
    fn select_columns_expressions() {
        let query = users().select([
            Column::new("FLAGS")
                .bit(BitOp::Xor, Column::literal(1))
                .label("toggled"),
            Column::new("FLAGS").bit(BitOp::Not, Column::default()),
            Column::raw("COUNT(*)").label("n"),
            Column::literal("x"),
        ]);
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT (FLAGS ^ 1) AS toggled, (~FLAGS), COUNT(*) AS n, 'x' FROM USERS"
        );
        let query = users().filter(Column::new("NAME").function("UPPER").equal("BOB"));
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT * FROM USERS WHERE UPPER(NAME) = ?"
        );
        let query = users().select([Column::default().label("nothing")]);
        assert!(matches!(
            WRITER.compile_select(&query, None),
            Err(Error::Model(..))
        ));
        assert!(Column::list(&["A", "B"], &["a"]).is_err());
    }

    #[test]
    fn select_quoting() {
        let query = Query::from_table("app.USER")
            .select([Column::new("ORDER"), Column::new("first name"), Column::new("ok")]);
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            r#"SELECT "ORDER", "first name", ok FROM app."USER""#
        );
    }

    #[test]
    fn select_group_by() {
        let query = users()
            .select([Column::new("CITY"), Column::raw("COUNT(*)").label("n")])
            .group_by([Column::new("CITY")])
            .having(Column::raw("COUNT(*)").more(5));
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT CITY, COUNT(*) AS n FROM USERS GROUP BY CITY HAVING COUNT(*) > ?"
        );
    }

    #[test]
    fn select_count() {
        let query = users()
            .filter(Column::new("AGE").more(18))
            .order_by([Column::new("NAME").asc()]);
        let compiled = WRITER.compile_count(&query).unwrap();
        assert_eq!(compiled.sql, "SELECT COUNT(*) FROM USERS WHERE AGE > ?");
        assert_eq!(compiled.shape, ResultShape::Scalar);
        let query = users().select([Column::new("CITY")]).distinct();
        assert_eq!(
            WRITER.compile_count(&query).unwrap().sql,
            "SELECT COUNT(*) FROM (SELECT DISTINCT CITY FROM USERS) c_"
        );
    }

    #[test]
    fn select_join() {
        let query = Query::new();
        let o = query.table_named("ORDERS").unwrap();
        let c = query.table_named("CUSTOMERS").unwrap();
        assert_eq!(o.alias, "o0");
        assert_eq!(c.alias, "c0");
        let query = query
            .from(&o)
            .join(
                JoinType::Left,
                &c,
                o.col("CUSTOMER_ID").equal(c.col("ID")),
            )
            .select([o.col("ID"), c.col("NAME").label("customer")]);
        assert_eq!(
            WRITER.compile_select(&query, None).unwrap().sql,
            "SELECT o0.ID, c0.NAME AS customer FROM ORDERS o0 LEFT JOIN CUSTOMERS c0 ON o0.CUSTOMER_ID = c0.ID"
        );

        let ambiguous = query.clone().filter(Column::new("NAME").equal("x"));
        assert!(matches!(
            WRITER.compile_select(&ambiguous, None),
            Err(Error::Model(..))
        ));
    }

    #[test]
    fn aliases() {
        let query = Query::new();
        assert_eq!(query.table_named("USERS").unwrap().alias, "u0");
        assert_eq!(query.table_named("UNITS").unwrap().alias, "u1");
        assert_eq!(query.table_named("1_table").unwrap().alias, "t0");
        assert_eq!(query.sub_query(Query::new()).unwrap().alias, "q0");
        assert!(matches!(
            query.table_named_as("ITEMS", "u0"),
            Err(Error::AliasCollision { alias }) if alias == "u0"
        ));
        let nested = query.nested();
        assert!(nested.scope().shared_with(query.scope()));
        assert_eq!(nested.table_named("USERS").unwrap().alias, "u2");
        assert!(query.scope().contains("u2"));
        assert!(matches!(
            nested.sub_query_as(Query::new(), "q0"),
            Err(Error::AliasCollision { .. })
        ));
    }

    #[test]
    fn alias_collision_compiled() {
        let query = Query::new();
        let u = query.table_named("USERS").unwrap();
        let twice = query
            .clone()
            .from(&u)
            .join(JoinType::Inner, &u, u.col("ID").equal(u.col("ID")));
        assert!(matches!(
            WRITER.compile_select(&twice, None),
            Err(Error::AliasCollision { alias }) if alias == "u0"
        ));

        // Sub-query with its own scope reusing the outer alias
        let detached = Query::new();
        let inner = detached.table_named("USERS").unwrap();
        assert_eq!(inner.alias, "u0");
        let detached = detached
            .from(&inner)
            .filter(inner.col("ID").equal(u.col("ID")));
        let query = query
            .from(&u)
            .select([u.col("NAME")])
            .filter(Column::exists(detached));
        assert!(matches!(
            WRITER.compile_select(&query, None),
            Err(Error::AliasCollision { alias }) if alias == "u0"
        ));
    }

    #[test]
    fn select_exists() {
        let query = Query::new();
        let c = query.table_named("CUSTOMERS").unwrap();
        let sub = query.nested();
        let o = sub.table_named("ORDERS").unwrap();
        let sub = sub.from(&o).select([Column::literal(1)]).filter(
            Condition::new()
                .and(o.col("CUSTOMER_ID").equal(c.col("ID")))
                .and(o.col("TOTAL").more(100)),
        );
        let query = query.from(&c).select([c.col("NAME")]).filter(
            Condition::new()
                .and(c.col("CITY").equal("NY"))
                .and(Column::exists(sub.clone()))
                .and(c.col("AGE").more(30)),
        );
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT c0.NAME FROM CUSTOMERS c0 WHERE c0.CITY = ? AND EXISTS (SELECT 1 FROM ORDERS o0 WHERE o0.CUSTOMER_ID = c0.ID AND o0.TOTAL > ?) AND c0.AGE > ?"
        );
        assert_eq!(
            compiled.values().cloned().collect::<Vec<_>>(),
            vec![
                Value::Varchar(Some("NY".into())),
                Value::Int32(Some(100)),
                Value::Int32(Some(30)),
            ]
        );

        let outer = Query::new();
        let q = outer.sub_query(sub.clone()).unwrap();
        let outer = outer
            .from(&q)
            .filter(Column::not_exists(sub))
            .select([q.col("*")]);
        assert!(WRITER.compile_select(&outer, None).is_ok());
    }

    #[test]
    fn select_from_sub_query() {
        let query = Query::new();
        let inner = query.nested();
        let u = inner.table_named("USERS").unwrap();
        let inner = inner
            .from(&u)
            .select([u.col("CITY"), u.col("AGE")])
            .filter(u.col("AGE").more(18));
        let q = query.sub_query(inner).unwrap();
        let query = query
            .from(&q)
            .select([q.col("CITY")])
            .filter(q.col("AGE").less(65));
        let compiled = WRITER.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT q0.CITY FROM (SELECT u0.CITY, u0.AGE FROM USERS u0 WHERE u0.AGE > ?) q0 WHERE q0.AGE < ?"
        );
        assert_eq!(compiled.parameters.len(), 2);
    }

    #[test]
    fn select_without_table() {
        assert!(matches!(
            WRITER.compile_select(&Query::new(), None),
            Err(Error::Model(..))
        ));
    }

    #[test]
    fn paging_row_number() {
        let writer = RowNumberWriter;
        let query = users()
            .select([Column::new("NAME")])
            .filter(Column::new("AGE").more(18))
            .order_by([Column::new("NAME").asc()]);
        assert_eq!(
            writer
                .compile_select(&query, Some(PageWindow::new(20, 10)))
                .unwrap()
                .sql,
            "SELECT TOP 10 * FROM (SELECT NAME, ROW_NUMBER() OVER(ORDER BY NAME ASC) AS rn_ FROM USERS WHERE AGE > ?) p_ WHERE rn_ > 20 ORDER BY rn_"
        );
        let query = users().select([Column::new("NAME")]);
        assert_eq!(
            writer
                .compile_select(&query, Some(PageWindow::new(0, 5)))
                .unwrap()
                .sql,
            "SELECT TOP 5 * FROM (SELECT NAME, ROW_NUMBER() OVER(ORDER BY (SELECT 0)) AS rn_ FROM USERS) p_ WHERE rn_ > 0 ORDER BY rn_"
        );
        let query = users()
            .select([Column::new("CITY")])
            .distinct()
            .order_by([Column::new("CITY").desc()]);
        assert_eq!(
            writer
                .compile_select(&query, Some(PageWindow::new(10, 10)))
                .unwrap()
                .sql,
            "SELECT TOP 10 * FROM (SELECT d_.*, ROW_NUMBER() OVER(ORDER BY CITY DESC) AS rn_ FROM (SELECT DISTINCT CITY FROM USERS) d_) p_ WHERE rn_ > 10 ORDER BY rn_"
        );
        assert_eq!(
            writer.compile_select(&query, None).unwrap().sql,
            "SELECT DISTINCT CITY FROM USERS ORDER BY CITY DESC"
        );
    }

    #[test]
    fn paging_pseudo_row_number() {
        let writer = RownumWriter;
        let window = Some(PageWindow::new(20, 10));
        let query = users()
            .select([Column::new("NAME")])
            .order_by([Column::new("NAME").asc()]);
        assert_eq!(
            writer.compile_select(&query, window).unwrap().sql,
            "SELECT * FROM (SELECT o_.*, ROWNUM AS rn_ FROM (SELECT NAME FROM USERS ORDER BY NAME ASC) o_) WHERE rn_ > 20 AND rn_ <= 30"
        );
        let query = users()
            .select([Column::new("NAME")])
            .filter(Column::new("AGE").more(18));
        assert_eq!(
            writer.compile_select(&query, window).unwrap().sql,
            "SELECT * FROM (SELECT NAME, ROWNUM AS rn_ FROM USERS WHERE (AGE > ?) AND ROWNUM <= 30) WHERE rn_ > 20"
        );
        let query = users();
        assert_eq!(
            writer.compile_select(&query, window).unwrap().sql,
            "SELECT * FROM (SELECT b_.*, ROWNUM AS rn_ FROM (SELECT * FROM USERS) b_ WHERE ROWNUM <= 30) WHERE rn_ > 20"
        );
    }

    #[test]
    fn entity_statements() {
        let schema = product();
        let row = RowLabeled::new(
            vec!["ID".to_string(), "NAME".into(), "PRICE".into()].into(),
            vec![
                Value::Int64(Some(1)),
                Value::Varchar(Some("Pen".into())),
                Value::Decimal(Some(Decimal::new(1999, 3)), 0, 3),
            ]
            .into(),
        );
        let insert = WRITER.compile_insert(&schema, &row).unwrap();
        assert_eq!(
            insert.sql,
            "INSERT INTO PRODUCT (ID, NAME, PRICE) VALUES (?, ?, ?)"
        );
        assert_eq!(insert.parameters[2].scale, Some(2));
        assert_eq!(insert.parameters[2].kind, Value::Decimal(None, 10, 2));

        let update = WRITER.compile_update_by_id(&schema, &row).unwrap();
        assert_eq!(
            update.sql,
            "UPDATE PRODUCT SET NAME = ?, PRICE = ? WHERE ID = ?"
        );
        assert_eq!(update.parameters[2].value, Value::Int64(Some(1)));

        let delete = WRITER
            .compile_delete_by_id(&schema, &[Value::Int64(Some(1))])
            .unwrap();
        assert_eq!(delete.sql, "DELETE FROM PRODUCT WHERE ID = ?");

        let find = WRITER
            .compile_find_by_id(&schema, &[Value::Int64(Some(1))])
            .unwrap();
        assert_eq!(find.sql, "SELECT * FROM PRODUCT WHERE ID = ?");
        assert_eq!(find.shape, ResultShape::Entity(schema.clone()));
        assert!(matches!(
            WRITER.compile_find_by_id(&schema, &[]),
            Err(Error::Model(..))
        ));

        let update = WRITER
            .compile_update(
                &schema,
                &[("price", Value::Int32(Some(0)))],
                &Column::new("name").equal("Pen").into(),
            )
            .unwrap();
        assert_eq!(update.sql, "UPDATE PRODUCT SET PRICE = ? WHERE NAME = ?");
        assert!(matches!(
            WRITER.compile_update(&schema, &[("PRICE", Value::Null)], &Condition::new()),
            Err(Error::Model(..))
        ));
        assert!(matches!(
            WRITER.compile_delete(&schema, &Condition::new()),
            Err(Error::Model(..))
        ));
        assert_eq!(
            WRITER
                .compile_delete(&schema, &Column::new("PRICE").less(10).into())
                .unwrap()
                .sql,
            "DELETE FROM PRODUCT WHERE PRICE < ?"
        );
    }

    #[test]
    fn paged_raw() {
        let schema = product();
        let compiled = WRITER
            .compile_paged_raw(
                &schema,
                Some(&["NAME"]),
                None,
                Some(&[Column::new("NAME").asc()]),
                Some(5),
                Some(5),
            )
            .unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT NAME FROM PRODUCT ORDER BY NAME ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            WRITER
                .compile_paged_raw(&schema, None, None, None, None, None)
                .unwrap()
                .sql,
            "SELECT ID, NAME, PRICE FROM PRODUCT"
        );
        assert!(matches!(
            WRITER.compile_paged_raw(&schema, None, None, None, Some(5), None),
            Err(Error::Model(..))
        ));
    }
}
