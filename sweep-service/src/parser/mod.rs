// Parser module for matrix specifications
// Provides tabular and nested range parsing, validation, and value coercion

pub mod error;
pub mod models;
pub mod nested;
pub mod tabular;

pub use error::{ParseError, ParseErrorKind, ParseResult};
pub use models::{linspace, ParamMap, ParamRanges, Scalar};
pub use nested::NestedParser;
pub use tabular::TabularParser;
