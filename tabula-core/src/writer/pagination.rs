//! Paging algorithms, one per [`Pagination`](super::Pagination) variant.

use crate::{
    Column, Order, PageState, PageWindow, Pair, Query, Result, SqlWriter, Value,
    writer::{Context, Fragment, SelectOptions},
};
use std::fmt::Write;

fn window(state: PageState) -> PageWindow {
    state.window().unwrap_or_default()
}

fn int(value: u64) -> Value {
    Value::Int64(Some(i64::try_from(value).unwrap_or(i64::MAX)))
}

/// `<query> LIMIT ? OFFSET ?` binding the size then the offset.
pub fn write_limit_offset(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    query: &Query,
    state: PageState,
) -> Result<Vec<Column>> {
    let window = window(state);
    let columns = writer.write_select_core(context, out, query, &SelectOptions::default())?;
    let mut context = context.switch_fragment(Fragment::SqlPagination);
    out.push_str(" LIMIT ");
    writer.write_parameter(&mut context, out, Pair::new(int(window.size)));
    out.push_str(" OFFSET ");
    writer.write_parameter(&mut context, out, Pair::new(int(window.offset)));
    Ok(columns)
}

/// Numbers the rows with `ROW_NUMBER()` in a derived table and keeps the
/// window from outside:
///
/// ```sql
/// SELECT TOP 10 * FROM (
///     SELECT ..., ROW_NUMBER() OVER(ORDER BY ...) AS rn_ FROM ... WHERE ...
/// ) p_ WHERE rn_ > 20 ORDER BY rn_
/// ```
///
/// Without an ordering the numbering is `OVER(ORDER BY (SELECT 0))`. Distinct
/// queries are wrapped first, numbering them directly would make every row
/// distinct.
pub fn write_row_number(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    query: &Query,
    state: PageState,
) -> Result<Vec<Column>> {
    let window = window(state);
    let mut over = String::new();
    out.push_str("SELECT TOP ");
    let _ = write!(out, "{} * FROM (", window.size);
    let columns = if query.distinct {
        // Numbered over the columns of the derived table
        let columns = writer.select_columns(query);
        if query.order_by.is_empty() {
            over.push_str("ORDER BY (SELECT 0)");
        } else {
            let mut context = context.switch_fragment(Fragment::SqlSelectOrderBy);
            let qualify = context.qualify_columns;
            context.qualify_columns = false;
            over.push_str("ORDER BY ");
            for (i, ordered) in query.order_by.iter().enumerate() {
                if i > 0 {
                    over.push_str(", ");
                }
                let labeled = columns
                    .iter()
                    .find(|c| !c.label.is_empty() && c.same_expression(&ordered.column));
                match labeled {
                    Some(column) => writer.write_identifier(&mut context, &mut over, &column.label),
                    None => writer.write_column(&mut context, &mut over, &ordered.column)?,
                }
                over.push_str(match ordered.order {
                    Order::ASC => " ASC",
                    Order::DESC => " DESC",
                });
            }
            context.qualify_columns = qualify;
        }
        let _ = write!(out, "SELECT d_.*, ROW_NUMBER() OVER({over}) AS rn_ FROM (");
        let columns = writer.write_select_core(
            context,
            out,
            query,
            &SelectOptions {
                skip_order_by: true,
                ..Default::default()
            },
        )?;
        out.push_str(") d_");
        columns
    } else {
        if query.order_by.is_empty() {
            over.push_str("ORDER BY (SELECT 0)");
        } else {
            writer.write_order_by(context, &mut over, &query.order_by)?;
        }
        let row_number = format!("ROW_NUMBER() OVER({over}) AS rn_");
        writer.write_select_core(
            context,
            out,
            query,
            &SelectOptions {
                extra_column: Some(&row_number),
                skip_order_by: true,
                ..Default::default()
            },
        )?
    };
    let _ = write!(out, ") p_ WHERE rn_ > {} ORDER BY rn_", window.offset);
    Ok(columns)
}

/// Filters on the `ROWNUM` pseudo column.
///
/// Ordered queries need three levels, `ROWNUM` is assigned before the rows
/// are sorted so it can only be read once the ordered query is wrapped:
///
/// ```sql
/// SELECT * FROM (SELECT o_.*, ROWNUM AS rn_ FROM (<ordered query>) o_)
/// WHERE rn_ > 20 AND rn_ <= 30
/// ```
///
/// Unordered queries read `ROWNUM` directly, bounding it in the base query:
///
/// ```sql
/// SELECT * FROM (SELECT ..., ROWNUM AS rn_ FROM ... WHERE (...) AND ROWNUM <= 30)
/// WHERE rn_ > 20
/// ```
///
/// Queries selecting a wildcard, grouped or distinct are wrapped once more
/// before the pseudo column is read.
pub fn write_pseudo_row_number(
    writer: &dyn SqlWriter,
    context: &mut Context,
    out: &mut String,
    query: &Query,
    state: PageState,
) -> Result<Vec<Column>> {
    let window = window(state);
    out.push_str("SELECT * FROM (");
    let columns = match state {
        PageState::Ordered(..) => {
            out.push_str("SELECT o_.*, ROWNUM AS rn_ FROM (");
            let columns = writer.write_select_core(context, out, query, &SelectOptions::default())?;
            let _ = write!(
                out,
                ") o_) WHERE rn_ > {} AND rn_ <= {}",
                window.offset,
                window.end()
            );
            return Ok(columns);
        }
        _ if reads_pseudo_column_directly(query) => {
            let bound = format!("ROWNUM <= {}", window.end());
            writer.write_select_core(
                context,
                out,
                query,
                &SelectOptions {
                    extra_column: Some("ROWNUM AS rn_"),
                    extra_condition: Some(&bound),
                    ..Default::default()
                },
            )?
        }
        _ => {
            out.push_str("SELECT b_.*, ROWNUM AS rn_ FROM (");
            let columns = writer.write_select_core(context, out, query, &SelectOptions::default())?;
            let _ = write!(out, ") b_ WHERE ROWNUM <= {}", window.end());
            columns
        }
    };
    let _ = write!(out, ") WHERE rn_ > {}", window.offset);
    Ok(columns)
}

/// Explicit columns, no wildcard, no grouping, not distinct.
fn reads_pseudo_column_directly(query: &Query) -> bool {
    !query.distinct
        && query.group_by.is_empty()
        && query.having.is_empty()
        && !query.columns.is_empty()
        && !query.columns.iter().any(Column::is_wildcard)
}
