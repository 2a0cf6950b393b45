pub mod home;

pub use home::{CreateHome, HeatingType, Home, HomeRow, InsulationLevel};
