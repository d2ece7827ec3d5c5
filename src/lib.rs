pub use botdb_core::*;
