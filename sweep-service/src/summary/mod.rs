// Summary Aggregation Module
// Merges per-combination payloads into aligned tabular collections

pub mod table;
pub mod writer;

pub use table::SummaryTable;
pub use writer::{SummaryError, SummaryFormat, SummaryWriter};
