//! Zip package handling
//!
//! A DOCX file is a zip archive. Only the main document part is ever
//! rewritten; every other entry is copied through untouched.

mod package;
mod part;

pub use package::{Package, MAIN_DOCUMENT};
pub use part::Part;
