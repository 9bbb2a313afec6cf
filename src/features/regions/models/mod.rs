mod region;

pub use region::{Region, RegionLevel};
