mod context;
pub mod pagination;
mod sql_writer;

pub use context::*;
pub use sql_writer::*;
