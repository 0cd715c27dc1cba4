//! Infrastructure layer: host-scene boundary implementations

pub mod traits;

pub use traits::{PlaceProvider, TogglePlaceMode};
