pub mod strikes;
pub mod ticker;
pub mod time_utils;
