//! Application layer: wizard, derived geometry and export
//!
//! This layer orchestrates the domain model and depends on the host-scene
//! boundary traits.

pub mod drawer;
pub mod events;
pub mod export;
pub mod wizard;

pub use drawer::{DrawerStyle, Rgb, TreeDrawer};
pub use events::WizardEvent;
pub use export::{BranchEntry, BranchExport, BranchRole};
pub use wizard::{InteractionStatus, Key, PlacementWizard, SeedFn, TreeColumn};
