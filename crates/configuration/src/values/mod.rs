mod flattening;
mod secret;

pub use flattening::FlatteningSettings;
pub use secret::{Secret, Variable};
