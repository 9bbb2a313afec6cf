mod form_handler;
mod page_handler;

pub use form_handler::*;
pub use page_handler::*;
