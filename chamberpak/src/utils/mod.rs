//! Utility functions

pub mod path;
pub mod text;

pub use path::{normalize_entry, normalize_path};
pub use text::{clean_line, conv_bool, sep_values};
