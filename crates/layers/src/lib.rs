pub mod extrude;
pub mod geojson;
pub mod layer;
pub mod polygon;
pub mod query;
pub mod symbology;

pub use layer::*;
