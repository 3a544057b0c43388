use crate::{EntitySchema, RawRow, Result, RowLabeled, SqlWriter, Value, decode_untyped};
use convert_case::{Case, Casing};
use std::collections::BTreeMap;

/// Loosely typed row, see [`hydrate_map`].
pub type RowMap = BTreeMap<String, Value>;

/// Label of the row number column added by the paging algorithms.
pub const ROW_NUMBER_LABEL: &str = "rn_";

fn is_row_number(label: &str) -> bool {
    label.eq_ignore_ascii_case(ROW_NUMBER_LABEL)
}

/// Decodes the columns of `row` known to `schema`, the other ones are skipped.
pub fn hydrate_labeled(
    writer: &dyn SqlWriter,
    row: RawRow,
    schema: &EntitySchema,
) -> Result<RowLabeled> {
    let mut labels = Vec::with_capacity(row.len());
    let mut values = Vec::with_capacity(row.len());
    for (label, raw) in row.labels.iter().zip(row.values) {
        let Some(column) = schema.resolve(label) else {
            if !is_row_number(label) {
                log::trace!(
                    "Column `{label}` is not mapped by `{}`, skipped",
                    schema.type_name
                );
            }
            continue;
        };
        values.push(writer.decode(raw, column)?);
        labels.push(column.name.to_string());
    }
    Ok(RowLabeled::new(labels.into(), values.into()))
}

/// Every value published under its label, the camel case form of the label
/// and both its upper and lower case variants.
pub fn hydrate_map(row: RawRow) -> Result<RowMap> {
    let mut result = RowMap::new();
    for (label, raw) in row.labels.iter().zip(row.values) {
        if is_row_number(label) {
            continue;
        }
        let value = decode_untyped(raw, label)?;
        for key in [
            label.to_case(Case::Camel),
            label.to_uppercase(),
            label.to_lowercase(),
        ] {
            result.insert(key, value.clone());
        }
        result.insert(label.clone(), value);
    }
    Ok(result)
}

/// First value of the row, `Value::Null` when the row is empty.
pub fn hydrate_scalar(row: RawRow) -> Result<Value> {
    let Some(label) = row.labels.first().cloned() else {
        return Ok(Value::Null);
    };
    match row.values.into_iter().next() {
        Some(raw) => decode_untyped(raw, &label),
        None => Ok(Value::Null),
    }
}
