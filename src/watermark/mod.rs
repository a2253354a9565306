pub mod store;

pub use store::{WatermarkError, WatermarkStore};
