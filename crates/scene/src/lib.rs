pub mod basemap;
pub mod controller;
pub mod lighting;
pub mod view_state;

pub use basemap::*;
pub use controller::*;
pub use lighting::*;
pub use view_state::*;
