pub mod collection;
pub mod filter;

pub use collection::*;
pub use filter::*;
