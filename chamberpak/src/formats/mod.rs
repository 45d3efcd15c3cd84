//! Text format parsing

pub mod keyvalues;

pub use keyvalues::{Node, Tree};
