pub mod attendance;
pub mod core;
pub mod credits;
pub mod gradebook;
