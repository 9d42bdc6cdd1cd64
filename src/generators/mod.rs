//! Module level generation: bar/space patterns and the rows of a symbol.

pub mod pattern;
pub mod row;

pub use pattern::Pattern;
pub use row::{RowIndicators, SymbolRow, START_PAT, STOP_PAT};
