//! Service layer - statement parsing and conversion
//!
//! The parsing pipeline runs leaves first: year inference, row extraction
//! (with amount placement for ambiguous text lines), normalization, and
//! assembly. `StatementProcessor` drives it over a readable document;
//! `StatementService` adds unlocking and export around it.

pub mod assemble;
pub mod disambiguate;
pub mod extract;
pub mod normalize;
mod process;
mod statement;
pub mod year;

pub use disambiguate::{AmountColumn, Placement};
pub use extract::{PageRows, PageStrategy};
pub use process::StatementProcessor;
pub use statement::{ConvertResult, StatementService};
pub use year::YearInferencer;
