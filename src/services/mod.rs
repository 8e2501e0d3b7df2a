pub mod daily_pick_service;
pub mod ending_service;

pub use daily_pick_service::*;
pub use ending_service::*;
