//! Attendance (presensi) form feature.
//!
//! Holds each visitor's in-progress form in a server-side session: the
//! identity fields, the cascading province → city → district → village
//! selection, and the submission to the spreadsheet endpoint.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/` | Start a new form and redirect to its page |
//! | GET | `/forms/{id}` | Render the form page |
//! | POST | `/forms/{id}` | Apply a page action (urlencoded) |
//! | POST | `/api/forms` | Create a form session (loads provinces) |
//! | GET | `/api/forms/{id}` | Get the form view |
//! | DELETE | `/api/forms/{id}` | Discard a form session |
//! | PATCH | `/api/forms/{id}/identity` | Update identity fields |
//! | PUT | `/api/forms/{id}/{level}` | Select a region at `province`, `city`, `district` or `village` |
//! | POST | `/api/forms/{id}/levels/{level}/reload` | Re-fetch one region list |
//! | POST | `/api/forms/{id}/submit` | Submit the record |
//! | POST | `/api/forms/{id}/success/dismiss` | Close the success overlay |
//! | POST | `/api/forms/{id}/alert/dismiss` | Acknowledge the error alert |

pub mod clients;
pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use clients::SpreadsheetClient;
pub use services::FormService;
