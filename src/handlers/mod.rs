pub mod ending;

pub use ending::{
    Reply, handle_add_ending, handle_command, handle_daily_ending, handle_list_endings,
    handle_remove_ending,
};
