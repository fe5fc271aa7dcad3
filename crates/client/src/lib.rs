pub mod http;
pub mod points;

pub use http::*;
pub use points::*;
