pub mod bootstrap;
pub mod card;
pub mod page;
pub mod query;
pub mod settings;
pub mod view;

pub use bootstrap::*;
pub use card::*;
pub use page::*;
pub use query::*;
pub use settings::*;
pub use view::*;
