#[cfg(test)]
mod tests {
    use tabula::{BitOp, Column, Driver, Query, SqlWriter};
    use tabula_h2::H2Driver;
    use tabula_tests::{User, execute_tests, init_logs};

    #[test]
    fn h2() {
        init_logs();
        let writer = H2Driver::new().sql_writer();
        execute_tests(&writer);
    }

    #[test]
    fn h2_bit_functions() {
        let writer = H2Driver::get_instance().sql_writer();
        let cases = [
            (BitOp::And, "BITAND(A, B)"),
            (BitOp::Or, "BITOR(A, B)"),
            (BitOp::Xor, "BITXOR(A, B)"),
            (BitOp::Not, "BITNOT(A)"),
            (BitOp::Remainder, "MOD(A, B)"),
            (BitOp::Add, "(A + B)"),
            (BitOp::Divide, "(A / B)"),
        ];
        for (op, expected) in cases {
            assert_eq!(
                writer.render_bit_operator(op, "A", Some("B")).unwrap(),
                expected
            );
        }
        assert!(writer.render_bit_operator(BitOp::And, "A", None).is_err());

        let query = Query::of::<User>()
            .unwrap()
            .select([
                Column::new("id"),
                Column::new("age")
                    .bit(BitOp::And, Column::literal(1))
                    .label("ODD"),
            ])
            .filter(
                Column::new("age")
                    .bit(BitOp::Remainder, Column::literal(2))
                    .equal(0),
            );
        let compiled = writer.compile_select(&query, None).unwrap();
        assert_eq!(
            compiled.sql,
            "SELECT ID, BITAND(AGE, 1) AS ODD FROM USERS WHERE MOD(AGE, 2) = ?"
        );
    }
}
