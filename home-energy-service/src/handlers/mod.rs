pub mod health;
pub mod homes;

pub use health::{health_check, metrics, readiness_check};
pub use homes::{create_home, get_advice, get_home};
