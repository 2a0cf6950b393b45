pub mod advice;
pub mod database;
pub mod metrics;
pub mod providers;
pub mod store;

pub use advice::{select_advice_provider, AdviceError, AdviceProvider};
pub use database::Database;
pub use metrics::{get_metrics, init_metrics};
pub use store::{HomeStore, InMemoryHomeStore};
