#[cfg(test)]
mod tests {
    use tabula::{BitOp, Column, Condition, Driver, PageWindow, Query, SqlWriter, Value};
    use tabula_postgres::PostgresDriver;
    use tabula_tests::{Order, User, adults_query, execute_tests, init_logs};

    #[test]
    fn postgres() {
        init_logs();
        let writer = PostgresDriver::new().sql_writer();
        execute_tests(&writer);
    }

    #[test]
    fn postgres_placeholders() {
        let writer = PostgresDriver::new().sql_writer();
        let query = adults_query().order_by([Column::new("name").desc()]);
        let compiled = writer
            .compile_select(&query, Some(PageWindow::new(20, 10)))
            .unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM USERS WHERE AGE > $1 AND (CITY = $2 OR CITY = $3) ORDER BY NAME DESC LIMIT $4 OFFSET $5"
        );
        assert_eq!(compiled.parameters.len(), 5);
    }

    #[test]
    fn postgres_placeholders_sub_query() {
        let writer = PostgresDriver::new().sql_writer();
        let query = Query::new();
        let u = query.table::<User>().unwrap();
        let nested = query.nested();
        let o = nested.table::<Order>().unwrap();
        let orders = nested.from(&o).select([Column::literal(1)]).filter(
            Condition::new()
                .and(Column::new("user_id").of(&o).equal(Column::new("id").of(&u)))
                .and(Column::new("total").of(&o).more(100)),
        );
        let query = query.from(&u).filter(
            Condition::new()
                .and(Column::new("city").of(&u).equal("NY"))
                .and(Column::exists(orders))
                .and(Column::new("age").of(&u).more(30)),
        );
        let compiled = writer.compile_select(&query, None).unwrap();
        assert!(compiled.sql.contains("u0.CITY = $1"), "{}", compiled.sql);
        assert!(compiled.sql.contains("o0.TOTAL > $2"), "{}", compiled.sql);
        assert!(compiled.sql.ends_with("u0.AGE > $3"), "{}", compiled.sql);
    }

    #[test]
    fn postgres_expressions() {
        let writer = PostgresDriver::new().sql_writer();
        let query = Query::of::<User>().unwrap().select([
            Column::new("age")
                .bit(BitOp::Xor, Column::literal(3))
                .label("FLAGS"),
            Column::new("age").bit(BitOp::Not, Column::default()).label("INVERTED"),
            Column::literal(Value::Blob(Some(vec![10, 255].into_boxed_slice()))).label("DATA"),
        ]);
        let compiled = writer.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT (AGE # 3) AS FLAGS, (~AGE) AS INVERTED, '\\x0aff'::BYTEA AS DATA FROM USERS"
        );
        assert!(
            writer
                .render_bit_operator(BitOp::Remainder, "A", None)
                .is_err()
        );
        assert_eq!(
            writer
                .render_bit_operator(BitOp::Remainder, "A", Some("2"))
                .unwrap(),
            "(A % 2)"
        );
        assert_eq!(
            writer
                .render_bit_operator(BitOp::Not, "A", Some("2"))
                .unwrap(),
            "(~A)"
        );
    }
}
