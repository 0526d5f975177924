//! Data-access layer
//!
//! - `statement`: parameterized SQL with `$n` placeholders
//! - `handle`: the pool-owning [`Db`] handle
//! - `scan`: positional row scanners shared by single- and multi-row reads
//! - `id`: identifiers for new rows

pub mod error;
pub mod handle;
pub mod id;
pub mod pool;
pub mod scan;
pub mod statement;

pub use error::DbError;
pub use handle::{Db, Row};
pub use id::{new_id, IdError};
pub use pool::{create_pool, DbConfig};
pub use scan::ScanRow;
pub use statement::{
    Insert, Select, Statement, StatementError, Update, Value, MAX_BIND_PARAMS,
};
