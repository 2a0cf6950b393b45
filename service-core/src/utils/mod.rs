pub mod validation;

pub use validation::{PositiveId, ValidatedJson};
