pub mod macros;
pub mod meta;

pub use meta::*;
