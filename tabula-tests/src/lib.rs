mod conditions;
mod marshal;
mod paging;
mod user;

use conditions::conditions;
use log::LevelFilter;
use marshal::marshal;
use paging::paging;
use std::env;
use tabula::SqlWriter;
pub use user::*;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

/// Dialect independent properties every writer must satisfy.
pub fn execute_tests<W: SqlWriter>(writer: &W) {
    users(writer);
    conditions(writer);
    paging(writer);
    marshal(writer);
}
