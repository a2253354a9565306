pub mod parser;

pub use parser::{parse_changes, Change, ParseError, ParsedBatch};
