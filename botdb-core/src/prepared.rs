use crate::{Result, Value};
use std::fmt::Display;

/// A statement prepared by the driver, with named parameters.
///
/// Values stay bound until [`clear_bindings`](Prepared::clear_bindings) is called,
/// so the same statement can be executed again with different values:
/// ```rust,ignore
/// prepared.clear_bindings()?.bind("$name", &Value::Varchar(Some("botdb".into())))?;
/// ```
pub trait Prepared: Send + Sync + Display {
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self>;
    /// Bind a value to the parameter named `key` (including the leading `$`).
    fn bind(&mut self, key: &str, value: &Value) -> Result<&mut Self>;
}
