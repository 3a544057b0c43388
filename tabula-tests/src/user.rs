use tabula::{
    Column, Condition, Entity, JoinType, PageWindow, Query, RawRow, SchemaRegistry, SqlWriter,
    Value,
};

#[derive(Entity, Debug, Clone, PartialEq)]
#[tabula(name = "USERS")]
pub struct User {
    #[tabula(primary_key)]
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub city: Option<String>,
}

#[derive(Entity, Debug, Clone, PartialEq)]
#[tabula(name = "ORDERS")]
pub struct Order {
    #[tabula(primary_key)]
    pub id: i64,
    pub user_id: i64,
    #[tabula(precision = 10, scale = 2)]
    pub total: rust_decimal::Decimal,
}

/// Adults living in NY or LA, by name.
pub fn adults_query() -> Query {
    Query::of::<User>()
        .expect("User has columns")
        .filter(Condition::new().and(Column::new("age").more(18)).and_any([
            Column::new("city").equal("NY"),
            Column::new("city").equal("LA"),
        ]))
}

pub fn users<W: SqlWriter>(writer: &W) {
    // Grouping
    let query = adults_query().order_by([Column::new("name").asc()]);
    let compiled = writer
        .compile_select(&query, Some(PageWindow::new(20, 10)))
        .expect("Could not compile the adults query");
    assert_eq!(
        compiled.values().take(3).cloned().collect::<Vec<_>>(),
        vec![
            Value::Int32(Some(18)),
            Value::Varchar(Some("NY".into())),
            Value::Varchar(Some("LA".into())),
        ]
    );
    assert_eq!(compiled.sql.matches(" OR ").count(), 1);
    assert!(compiled.sql.contains(" AND ("), "{}", compiled.sql);

    // Determinism
    let again = writer
        .compile_select(&query, Some(PageWindow::new(20, 10)))
        .expect("Could not compile the adults query");
    assert_eq!(compiled, again);

    // Aliases
    let query = Query::new();
    let a = query.table::<User>().expect("Could not alias User");
    let b = query.table::<User>().expect("Could not alias User");
    assert_eq!(a.alias, "u0");
    assert_eq!(b.alias, "u1");
    let query = query.from(&a).select([Column::new("name").of(&b)]).join(
        JoinType::Inner,
        &b,
        Column::new("id").of(&a).equal(Column::new("id").of(&b)),
    );
    let compiled = writer
        .compile_select(&query, None)
        .expect("Could not compile the self join");
    assert!(
        compiled
            .sql
            .contains("FROM USERS u0 INNER JOIN USERS u1 ON u0.ID = u1.ID"),
        "{}",
        compiled.sql
    );
    assert!(compiled.parameters.is_empty());

    // Exists keeps the parameters in textual order
    let query = Query::new();
    let u = query.table::<User>().expect("Could not alias User");
    let nested = query.nested();
    let o = nested.table::<Order>().expect("Could not alias Order");
    assert_eq!(o.alias, "o0");
    let orders = nested
        .from(&o)
        .select([Column::literal(1)])
        .filter(
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
    let compiled = writer
        .compile_select(&query, None)
        .expect("Could not compile the exists query");
    assert_eq!(
        compiled.values().cloned().collect::<Vec<_>>(),
        vec![
            Value::Varchar(Some("NY".into())),
            Value::Int32(Some(100)),
            Value::Int32(Some(30)),
        ]
    );
    assert_eq!(
        compiled.parameters[1].kind,
        Value::Decimal(None, 10, 2),
        "The parameter takes the kind of the column"
    );

    // Hydration
    let user: User = writer
        .hydrate_entity(RawRow::from_values(
            ["id", "Name", "AGE", "city"],
            [
                Value::Int64(Some(1)),
                Value::Varchar(Some("Ada".into())),
                Value::Int16(Some(36)),
                Value::Varchar(None),
            ],
        ))
        .expect("Could not hydrate User");
    assert_eq!(
        user,
        User {
            id: 1,
            name: "Ada".into(),
            age: 36,
            city: None,
        }
    );
    let schema = SchemaRegistry::global()
        .schema::<User>()
        .expect("User has columns");
    let compiled = writer
        .compile_insert(&schema, &user.row_full())
        .expect("Could not compile the insert");
    assert_eq!(compiled.parameters.len(), 4);
    assert_eq!(compiled.parameters[3].value, Value::Varchar(None));
}
