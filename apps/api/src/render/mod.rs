//! HTML rendering of resume documents.

pub mod template;
