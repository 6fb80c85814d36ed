#[macro_use]
mod tracing_macros;

mod apply;
mod change_step;
mod diff;
mod error;
pub mod ordering;
mod table;
mod table_change;

pub use apply::OrderedCollection;
pub use change_step::ChangeStep;
pub use diff::{
    changes, changes_by_reference, changes_by_value, unordered_changes, unordered_changes_by_value,
};
pub use error::{ApplyError, TableError};
pub use table::{Table, TableIndex, TableSection};
pub use table_change::TableChange;

#[cfg(feature = "wasm")]
pub mod wasm;
