mod batch;
mod coercion;
mod find_or_create;
mod predicates;
mod relationships;
mod simple;
mod tenants;
mod unique;

use crate::{
    batch::batch, coercion::coercion, find_or_create::find_or_create, predicates::predicates,
    relationships::relationships, simple::simple, tenants::tenants, unique::unique,
};
use botdb::{Connection, SharedConnection};
use log::LevelFilter;
use std::env;

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

/// Runs every scenario on the connection, panics on the first failure.
pub async fn execute_tests<C: Connection>(mut connection: SharedConnection<C>) {
    simple(&mut connection).await;
    unique(&mut connection).await;
    find_or_create(&mut connection).await;
    tenants(&mut connection).await;
    coercion(&mut connection).await;
    batch(&connection).await;
    relationships(&mut connection).await;
    predicates(&mut connection).await;
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        let result = { $($code)+ };
        log::set_max_level(level);
        result
    }};
}
