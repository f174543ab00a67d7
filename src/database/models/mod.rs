pub mod series;

pub use series::{columns, Series, SERIES_TABLE};
