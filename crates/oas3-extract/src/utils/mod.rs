pub mod refs;
pub mod spec;

pub use refs::{component_name, reference_target};
pub use spec::{SpecFormat, SpecLoadError, SpecLoader};
