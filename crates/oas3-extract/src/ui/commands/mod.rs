pub mod analyze;
pub mod list;

pub use analyze::{AnalyzeConfig, analyze};
pub use list::{list_models, list_paths};
