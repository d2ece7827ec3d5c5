use crate::{Connection, Prepared, SqlWriter};

pub trait Driver: Default + Send + Sync + 'static {
    type Connection: Connection<Driver = Self>;
    type SqlWriter: SqlWriter;
    type Prepared: Prepared;

    /// Scheme of the connection URLs accepted by this driver.
    const NAME: &'static str;

    fn sql_writer(&self) -> Self::SqlWriter;
}
