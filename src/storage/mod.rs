pub mod json_store;

pub use json_store::{load_data, save_data};
