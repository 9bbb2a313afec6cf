pub mod attendance;
pub mod regions;
