pub mod formatting;

pub use formatting::{element_summary, format_tag};
