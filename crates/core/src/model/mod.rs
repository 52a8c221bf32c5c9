pub mod dataset;
pub mod record;
pub mod year_range;

pub use dataset::Dataset;
pub use record::{Category, INDIE_TAG, Record};
pub use year_range::YearRange;
