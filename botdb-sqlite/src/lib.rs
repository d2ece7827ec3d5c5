mod cbox;
mod connection;
mod driver;
mod extract;
mod prepared;
mod sql_writer;

use botdb_core::DriverError;
use libsqlite3_sys::{SQLITE_CONSTRAINT, sqlite3, sqlite3_errmsg, sqlite3_extended_errcode};
use std::{
    borrow::Cow,
    ffi::{CStr, c_char},
};

pub(crate) use cbox::*;
pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub use sql_writer::*;

pub(crate) fn error_message_from_ptr(ptr: *const c_char) -> Cow<'static, str> {
    if ptr.is_null() {
        return "Unknown error (could not extract the error message)".into();
    }
    unsafe { CStr::from_ptr(ptr).to_string_lossy().into_owned().into() }
}

/// The last error reported on the connection.
pub(crate) fn driver_error(connection: *mut sqlite3) -> DriverError {
    unsafe {
        let code = sqlite3_extended_errcode(connection);
        DriverError {
            code,
            constraint: (code & 0xff) == SQLITE_CONSTRAINT,
            message: error_message_from_ptr(sqlite3_errmsg(connection)).into_owned(),
        }
    }
}
