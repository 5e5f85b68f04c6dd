//! Data model shared by comparators, the assembler and renderers.

pub mod diff;
pub mod record;
pub mod result;
pub mod value;

pub use diff::{Diff, DiffField, Match, Op};
pub use record::Record;
pub use result::{Artifacts, ChartRow, ChartStatus, CompareResult, Counts};
pub use value::{Scalar, Value};
