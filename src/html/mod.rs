//! HTML rendering for the browser form
//!
//! Pages are assembled from plain strings; every piece of user or tool
//! supplied text goes through `html_escape` before it is embedded.

mod pages;

pub use pages::{error_page, index_page, result_page, FormDefaults};
