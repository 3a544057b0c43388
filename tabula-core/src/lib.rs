mod as_value;
mod column;
mod column_def;
mod compiled;
mod condition;
mod decode_type;
mod driver;
mod entity;
mod error;
mod marshal;
mod page;
mod query;
mod registry;
mod util;
mod value;
pub mod writer;

pub use ::anyhow::Context as ErrorContext;
pub use as_value::*;
pub use column::*;
pub use column_def::*;
pub use compiled::*;
pub use condition::*;
pub use decode_type::*;
pub use driver::*;
pub use entity::*;
pub use error::*;
pub use marshal::*;
pub use page::*;
pub use query::*;
pub use registry::*;
pub use util::*;
pub use value::*;
pub use writer::{
    Context, ContextUpdater, Fragment, GenericSqlWriter, Pagination, ScopeTable, SelectOptions,
    SqlWriter, require_operand, shift_end_of_day,
};
