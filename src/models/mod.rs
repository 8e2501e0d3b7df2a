pub mod command;
pub mod ending;

pub use command::*;
pub use ending::*;
