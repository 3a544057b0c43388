use crate::{User, adults_query};
use tabula::{Column, PageRequest, Pagination, Query, SqlWriter, Value};

/// The window of page `P` (zero based) of size `S` is `LIMIT S OFFSET P*S`
/// whatever the algorithm of the dialect.
pub fn paging<W: SqlWriter>(writer: &W) {
    let ordered = adults_query().order_by([Column::new("name").asc()]);
    for size in [1u64, 10, 25] {
        for page in 0u64..4 {
            let request = PageRequest::<()>::new(page + 1, size);
            let window = request.window();
            assert_eq!(window.offset, page * size);
            assert_eq!(window.size, size);
            let compiled = writer
                .compile_select(&ordered, Some(window))
                .expect("Could not compile the page");
            let sql = &compiled.sql;
            let offset = page * size;
            match writer.pagination() {
                Pagination::LimitOffset => {
                    assert!(sql.contains(" LIMIT "), "{sql}");
                    assert_eq!(
                        compiled.values().skip(3).cloned().collect::<Vec<_>>(),
                        vec![
                            Value::Int64(Some(size as i64)),
                            Value::Int64(Some(offset as i64)),
                        ]
                    );
                }
                Pagination::RowNumber => {
                    assert!(sql.starts_with(&format!("SELECT TOP {size} * FROM (")), "{sql}");
                    assert!(
                        sql.ends_with(&format!(") p_ WHERE rn_ > {offset} ORDER BY rn_")),
                        "{sql}"
                    );
                    assert_eq!(compiled.parameters.len(), 3);
                }
                Pagination::PseudoRowNumber => {
                    assert!(
                        sql.ends_with(&format!(
                            ") o_) WHERE rn_ > {offset} AND rn_ <= {}",
                            offset + size
                        )),
                        "{sql}"
                    );
                    assert_eq!(compiled.parameters.len(), 3);
                }
            }
        }
    }

    // Without ordering, and distinct
    let unordered = adults_query();
    let cities = Query::of::<User>()
        .expect("User has columns")
        .select([Column::new("city")])
        .distinct();
    let cities_ordered = cities.clone().order_by([Column::new("city").asc()]);
    for size in [1u64, 10, 25] {
        for page in 0u64..4 {
            let window = PageRequest::<()>::new(page + 1, size).window();
            let (offset, end) = (page * size, page * size + size);
            let compile = |query: &Query| {
                writer
                    .compile_select(query, Some(window))
                    .expect("Could not compile the page")
            };
            let plain = compile(&unordered);
            let distinct = compile(&cities);
            let distinct_ordered = compile(&cities_ordered);
            match writer.pagination() {
                Pagination::LimitOffset => {
                    let tail = vec![
                        Value::Int64(Some(size as i64)),
                        Value::Int64(Some(offset as i64)),
                    ];
                    assert_eq!(plain.values().skip(3).cloned().collect::<Vec<_>>(), tail);
                    for compiled in [&distinct, &distinct_ordered] {
                        assert!(
                            compiled.sql.starts_with("SELECT DISTINCT CITY FROM USERS"),
                            "{}",
                            compiled.sql
                        );
                        assert_eq!(compiled.values().cloned().collect::<Vec<_>>(), tail);
                    }
                }
                Pagination::RowNumber => {
                    let head = format!("SELECT TOP {size} * FROM (");
                    let tail = format!(") p_ WHERE rn_ > {offset} ORDER BY rn_");
                    for compiled in [&plain, &distinct, &distinct_ordered] {
                        let sql = &compiled.sql;
                        assert!(sql.starts_with(&head), "{sql}");
                        assert!(sql.ends_with(&tail), "{sql}");
                    }
                    assert!(
                        plain
                            .sql
                            .contains("ROW_NUMBER() OVER(ORDER BY (SELECT 0)) AS rn_ FROM USERS"),
                        "{}",
                        plain.sql
                    );
                    assert_eq!(plain.parameters.len(), 3);
                    assert!(
                        distinct.sql.contains(
                            "SELECT d_.*, ROW_NUMBER() OVER(ORDER BY (SELECT 0)) AS rn_ FROM (SELECT DISTINCT CITY FROM USERS) d_)"
                        ),
                        "{}",
                        distinct.sql
                    );
                    assert!(
                        distinct_ordered.sql.contains(
                            "SELECT d_.*, ROW_NUMBER() OVER(ORDER BY CITY ASC) AS rn_ FROM (SELECT DISTINCT CITY FROM USERS) d_)"
                        ),
                        "{}",
                        distinct_ordered.sql
                    );
                }
                Pagination::PseudoRowNumber => {
                    let bound = format!(" WHERE ROWNUM <= {end}) WHERE rn_ > {offset}");
                    assert!(
                        plain.sql.starts_with("SELECT * FROM (SELECT b_.*, ROWNUM AS rn_ FROM ("),
                        "{}",
                        plain.sql
                    );
                    assert!(plain.sql.ends_with(&format!("b_{bound}")), "{}", plain.sql);
                    assert_eq!(plain.parameters.len(), 3);
                    assert_eq!(
                        distinct.sql,
                        format!(
                            "SELECT * FROM (SELECT b_.*, ROWNUM AS rn_ FROM (SELECT DISTINCT CITY FROM USERS) b_{bound}"
                        )
                    );
                    assert_eq!(
                        distinct_ordered.sql,
                        format!(
                            "SELECT * FROM (SELECT o_.*, ROWNUM AS rn_ FROM (SELECT DISTINCT CITY FROM USERS ORDER BY CITY ASC) o_) WHERE rn_ > {offset} AND rn_ <= {end}"
                        )
                    );
                }
            }
        }
    }

    // Explicit offset wins over the page
    let request = PageRequest::<()>::with_offset(7, 5);
    assert_eq!(request.window().offset, 7);

    // Unpaged and counted
    let compiled = writer
        .compile_select(&ordered, None)
        .expect("Could not compile the unpaged query");
    assert!(compiled.sql.ends_with("ORDER BY NAME ASC"), "{}", compiled.sql);
    let count = writer
        .compile_count(&ordered)
        .expect("Could not compile the count");
    assert!(count.sql.starts_with("SELECT COUNT(*) FROM "), "{}", count.sql);
    assert!(!count.sql.contains("ORDER BY"), "{}", count.sql);
    assert_eq!(count.parameters.len(), 3);
}
