use crate::{CBox, error_message_from_ptr};
use botdb_core::{
    Context, Error, Prepared, QueryBuilderError, Result, Value, format_timestamp, truncate_long,
};
use libsqlite3_sys::*;
use std::{
    ffi::{CStr, CString, c_int},
    fmt::{self, Display},
    os::raw::{c_char, c_void},
};

pub struct SqlitePrepared {
    pub(crate) statement: CBox<*mut sqlite3_stmt>,
}

impl SqlitePrepared {
    pub(crate) fn new(statement: CBox<*mut sqlite3_stmt>) -> Self {
        Self { statement }
    }

    /// The SQL the statement was prepared from.
    pub fn sql(&self) -> String {
        unsafe {
            let sql = sqlite3_sql(*self.statement);
            if sql.is_null() {
                return String::new();
            }
            CStr::from_ptr(sql).to_string_lossy().into_owned()
        }
    }

    fn bind_text(&mut self, index: c_int, value: &str) -> c_int {
        unsafe {
            sqlite3_bind_text64(
                *self.statement,
                index,
                value.as_ptr() as *const c_char,
                value.len() as sqlite3_uint64,
                SQLITE_TRANSIENT(),
                SQLITE_UTF8 as u8,
            )
        }
    }
}

impl Prepared for SqlitePrepared {
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        unsafe {
            sqlite3_reset(*self.statement);
            sqlite3_clear_bindings(*self.statement);
        }
        Ok(self)
    }

    fn bind(&mut self, key: &str, value: &Value) -> Result<&mut Self> {
        let name = CString::new(key)
            .with_context(|| format!("Invalid parameter name `{}`", key))?;
        let index = unsafe { sqlite3_bind_parameter_index(*self.statement, name.as_ptr()) };
        if index == 0 {
            let error = Error::new(QueryBuilderError::UnknownParameter(key.into()))
                .context(format!("While binding to the query:\n{}", truncate_long!(self.sql())));
            log::error!("{:#}", error);
            return Err(error);
        }
        let rc = unsafe {
            match value {
                v if v.is_null() => sqlite3_bind_null(*self.statement, index),
                Value::Boolean(Some(v)) => sqlite3_bind_int(*self.statement, index, *v as c_int),
                Value::Int64(Some(v)) => sqlite3_bind_int64(*self.statement, index, *v),
                Value::Float64(Some(v)) => sqlite3_bind_double(*self.statement, index, *v),
                Value::Varchar(Some(v)) | Value::Enum(Some(v), ..) => self.bind_text(index, v),
                Value::Blob(Some(v)) => sqlite3_bind_blob64(
                    *self.statement,
                    index,
                    v.as_ptr() as *const c_void,
                    v.len() as sqlite3_uint64,
                    SQLITE_TRANSIENT(),
                ),
                Value::Timestamp(Some(v)) => {
                    let v = format_timestamp(v)
                        .with_context(|| format!("Cannot bind the date {} to `{}`", v, key))?;
                    self.bind_text(index, &v)
                }
                Value::StringList(Some(v)) => self.bind_text(index, &v.join(",")),
                _ => {
                    let error =
                        Error::msg(format!("Cannot use a {:?} as a query parameter", value));
                    log::error!("{:#}", error);
                    return Err(error);
                }
            }
        };
        if rc != SQLITE_OK {
            let error = unsafe {
                let db = sqlite3_db_handle(*self.statement);
                Error::msg(error_message_from_ptr(sqlite3_errmsg(db)).into_owned())
            }
            .context(format!(
                "Cannot bind parameter `{}` to the query:\n{}",
                key,
                truncate_long!(self.sql())
            ));
            log::error!("{:#}", error);
            return Err(error);
        }
        Ok(self)
    }
}

impl Display for SqlitePrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&truncate_long!(self.sql()))
    }
}
