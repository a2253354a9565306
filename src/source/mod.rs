pub mod p4;

pub use p4::{ChangeSource, P4ChangeSource, SourceError};
