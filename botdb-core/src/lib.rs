mod as_value;
mod column;
mod connection;
mod constraint;
mod driver;
mod entity;
mod entity_builder;
mod error;
mod executor;
mod instance;
mod prepared;
mod prepared_row;
mod query;
pub mod registry;
mod relations;
mod schema;
mod sql_writer;
mod statement;
mod tenant;
mod util;
mod value;
mod where_clause;

pub use ::anyhow::Context;
pub use as_value::*;
pub use column::*;
pub use connection::*;
pub use constraint::*;
pub use driver::*;
pub use entity::*;
pub use entity_builder::*;
pub use error::*;
pub use executor::*;
pub use instance::*;
pub use prepared::*;
pub use prepared_row::*;
pub use query::*;
pub use registry::register;
pub use relations::*;
pub use schema::*;
pub use sql_writer::*;
pub use statement::*;
pub use tenant::*;
pub use util::*;
pub use value::*;
pub use where_clause::*;
pub mod stream {
    pub use ::futures::stream::*;
}
pub use ::futures::future;
pub use ::time;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
