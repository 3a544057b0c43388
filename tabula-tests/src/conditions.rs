use crate::User;
use tabula::{Column, Condition, Error, Query, SqlWriter, Value};
use time::macros::date;

fn compile<W: SqlWriter>(writer: &W, condition: Condition) -> (String, Vec<Value>) {
    let query = Query::of::<User>()
        .expect("User has columns")
        .filter(condition);
    let compiled = writer
        .compile_select(&query, None)
        .expect("Could not compile the condition");
    let values = compiled.values().cloned().collect();
    (compiled.sql, values)
}

pub fn conditions<W: SqlWriter>(writer: &W) {
    // Empty lists
    let (sql, values) = compile(
        writer,
        Condition::new().and(Column::new("id").is_in(Vec::<i64>::new())),
    );
    assert!(sql.ends_with("WHERE 1=0"), "{sql}");
    assert!(values.is_empty());
    let (sql, _) = compile(
        writer,
        Condition::new().and(Column::new("id").not_in(Vec::<i64>::new())),
    );
    assert!(sql.ends_with("WHERE 1=1"), "{sql}");

    // Nulls
    let (sql, values) = compile(
        writer,
        Condition::new().and(Column::new("city").equal(Value::Varchar(None))),
    );
    assert!(sql.ends_with("IS NULL"), "{sql}");
    assert!(values.is_empty());

    // Patterns
    let (_, values) = compile(
        writer,
        Condition::new()
            .and(Column::new("name").start_with("Jo"))
            .or(Column::new("name").end_with("k")),
    );
    assert_eq!(
        values,
        vec![
            Value::Varchar(Some("Jo%".into())),
            Value::Varchar(Some("%k".into())),
        ]
    );

    // Bounds
    let (_, values) = compile(
        writer,
        Condition::new().and(Column::new("age").between(18, 65)),
    );
    assert_eq!(values, vec![Value::Int32(Some(18)), Value::Int32(Some(65))]);
    let (sql, values) = compile(
        writer,
        Condition::new()
            .and(Column::new("age").between(Value::Int32(None), Value::Int32(None)))
            .and(Column::new("name").is_not_null()),
    );
    assert!(!sql.contains("BETWEEN"), "{sql}");
    assert!(!sql.contains("WHERE  AND"), "{sql}");
    assert!(values.is_empty());
    let query = Query::of::<User>()
        .expect("User has columns")
        .filter(Column::new("age").between(18, Value::Int32(None)));
    assert!(matches!(
        writer.compile_select(&query, None),
        Err(Error::Model(..))
    ));

    // End of day
    let query = Query::of::<User>()
        .expect("User has columns")
        .filter(Column::new("id").less_equal(date!(2024 - 03 - 15)))
        .end_of_day(true);
    let compiled = writer
        .compile_select(&query, None)
        .expect("Could not compile the end of day condition");
    assert!(matches!(
        compiled.parameters[0].value,
        Value::Timestamp(Some(v)) if v.hour() == 23 && v.minute() == 59 && v.millisecond() == 999
    ));

    // Determinism
    let condition = Condition::new()
        .and(Column::new("age").more(18))
        .or_all([Column::new("city").equal("NY"), Column::new("name").is_empty()])
        .and_nested(Condition::new().and(Column::new("id").is_in([1i64, 2, 3])));
    assert_eq!(
        compile(writer, condition.clone()),
        compile(writer, condition)
    );
}
