pub mod indicator_store;

pub use indicator_store::{IndicatorStore, ReadingValue};
