//! Host-scene boundary traits for testability
//!
//! These traits abstract the visualization host's placement surface,
//! allowing the wizard to be driven with mock implementations.

/// Scene placement surface.
///
/// The host owns the actual point-placement tool; the wizard toggles it and
/// reads it back. External cancellation (e.g. Escape pressed in the 3D view)
/// reaches the wizard through `PlacementWizard::on_place_mode_changed`.
pub trait PlaceProvider {
    /// Enable or disable point placement in the scene.
    fn set_place_mode_enabled(&mut self, enabled: bool);

    /// Whether the scene currently accepts point placement.
    fn place_mode_enabled(&self) -> bool;
}

/// In-memory placement surface for hosts without a native tool and for
/// tests.
#[derive(Debug, Default)]
pub struct TogglePlaceMode {
    enabled: bool,
}

impl TogglePlaceMode {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PlaceProvider for TogglePlaceMode {
    fn set_place_mode_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn place_mode_enabled(&self) -> bool {
        self.enabled
    }
}
