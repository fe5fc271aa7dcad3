pub mod config;
pub mod error;
pub mod mongo;
pub mod source;

pub use config::*;
pub use error::*;
pub use mongo::*;
pub use source::*;
