//! Indonesian administrative regions (wilayah) feature.
//!
//! Region lists are read from the public emsifa "api-wilayah-indonesia"
//! reference API. The attendance form uses [`RegionSource`] to fill its
//! cascading dropdowns, and the same lookups are proxied read-only below.
//!
//! ## Data Hierarchy
//!
//! - Level 1: Provinces (Provinsi)
//! - Level 2: Regencies/Cities (Kabupaten/Kota)
//! - Level 3: Districts (Kecamatan)
//! - Level 4: Villages (Kelurahan/Desa)
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/regions/provinces` | List all provinces |
//! | GET | `/api/regions/provinces/{id}/cities` | List cities/regencies in a province |
//! | GET | `/api/regions/cities/{id}/districts` | List districts in a city |
//! | GET | `/api/regions/districts/{id}/villages` | List villages in a district |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use clients::WilayahClient;
pub use services::RegionService;
