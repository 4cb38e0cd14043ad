pub mod config;
pub mod context;
pub mod deck;
pub mod error;
pub mod sync;

pub use config::*;
pub use context::*;
pub use deck::*;
pub use error::*;
pub use sync::*;
