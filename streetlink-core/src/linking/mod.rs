//! Splicing request endpoints into the street graph

pub mod naming;
pub mod resolver;
pub mod scope;

pub use naming::{DefaultNamer, LocationNamer, corner_name};
pub use scope::RequestScope;
