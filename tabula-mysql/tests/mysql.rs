#[cfg(test)]
mod tests {
    use tabula::{Column, Context, Driver, PageWindow, Query, SqlWriter, Value};
    use tabula_mysql::MySQLDriver;
    use tabula_tests::{User, adults_query, execute_tests, init_logs};

    #[test]
    fn mysql() {
        init_logs();
        let writer = MySQLDriver::new().sql_writer();
        execute_tests(&writer);
    }

    #[test]
    fn mysql_adults_page() {
        let writer = MySQLDriver::get_instance().sql_writer();
        let query = adults_query().order_by([Column::new("name").asc()]);
        let compiled = writer
            .compile_select(&query, Some(PageWindow::new(20, 10)))
            .unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT * FROM USERS WHERE AGE > ? AND (CITY = ? OR CITY = ?) ORDER BY NAME ASC LIMIT ? OFFSET ?"
        );
        assert_eq!(
            compiled.values().skip(3).cloned().collect::<Vec<_>>(),
            vec![Value::Int64(Some(10)), Value::Int64(Some(20))]
        );
    }

    #[test]
    fn mysql_literals() {
        let writer = MySQLDriver::new().sql_writer();
        let mut context = Context::default();
        let mut out = String::new();
        writer.write_identifier(&mut context, &mut out, "order");
        out.push(' ');
        writer.write_identifier(&mut context, &mut out, "a`b");
        assert_eq!(out, "`order` `a``b`");

        let query = Query::of::<User>().unwrap().select([
            Column::literal("it's C:\\dir").label("PATH"),
            Column::literal(f64::NEG_INFINITY).label("LOW"),
            Column::literal(true).label("YES"),
        ]);
        let compiled = writer.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT 'it''s C:\\\\dir' AS PATH, -1.0e+10000 AS LOW, true AS YES FROM USERS"
        );
        assert_eq!(MySQLDriver::NAME, writer.name());
    }
}
