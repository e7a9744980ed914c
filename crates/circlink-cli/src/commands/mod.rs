//! Command implementations.

pub mod analyze;
pub mod index;

pub use self::analyze::execute_analyze;
pub use self::index::execute_index;
