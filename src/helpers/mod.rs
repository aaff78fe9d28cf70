//! Helper functions for page rendering
//!
//! HTML fragments (tag sidebar, pagination), URL construction and localized
//! date formatting, shared by the generator and the templates.

mod date;
mod html;
mod list;
mod url;

pub use date::*;
pub use html::*;
pub use list::*;
pub use url::*;
