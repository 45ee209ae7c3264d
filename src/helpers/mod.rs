//! Small rendering helpers shared by the generator and templates

pub mod date;
pub mod html;
pub mod url;
