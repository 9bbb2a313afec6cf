mod wilayah_client;

pub use wilayah_client::{RegionSource, WilayahClient};
