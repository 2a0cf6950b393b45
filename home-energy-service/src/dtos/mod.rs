pub mod home;

pub use home::{AdviceResponse, CreateHomeRequest, HomeResponse};
