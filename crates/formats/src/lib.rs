pub mod buildings;
pub mod geometry;
pub mod loader;

pub use buildings::*;
pub use geometry::*;
pub use loader::*;
