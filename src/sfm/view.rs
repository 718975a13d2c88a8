//! View - A single image with its camera and pixel observations.

use std::collections::HashMap;

use super::camera::{Camera, CameraIntrinsicsPrior};
use super::types::{Feature, TrackId, ViewId};

/// A view in the reconstruction: one captured image, its camera, and the
/// pixel location of every Track it observes.
///
/// Views start out unestimated; the estimation pipeline flips the flag
/// once a pose has been computed for the camera.
#[derive(Clone)]
pub struct View {
    /// Unique identifier for this View.
    pub id: ViewId,

    /// Human-readable name, usually the image filename.
    pub name: String,

    /// The calibrated camera for this view.
    pub camera: Camera,

    /// Intrinsics hints supplied from outside the estimation pipeline.
    pub intrinsics_prior: CameraIntrinsicsPrior,

    /// Whether the upstream pipeline successfully estimated this view's pose.
    pub estimated: bool,

    /// Track -> pixel observation. One entry per Track this view observes.
    features: HashMap<TrackId, Feature>,
}

impl View {
    /// Create a new unestimated View with a default camera.
    pub fn new(id: ViewId, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            camera: Camera::default(),
            intrinsics_prior: CameraIntrinsicsPrior::default(),
            estimated: false,
            features: HashMap::new(),
        }
    }

    /// Record the pixel observation of a Track in this view.
    pub fn set_feature(&mut self, track_id: TrackId, feature: Feature) {
        self.features.insert(track_id, feature);
    }

    /// Look up the pixel observation of a Track, if this view observes it.
    pub fn get_feature(&self, track_id: TrackId) -> Option<&Feature> {
        self.features.get(&track_id)
    }

    /// Remove the observation of a Track.
    ///
    /// Returns true if the observation existed and was removed.
    pub fn erase_feature(&mut self, track_id: TrackId) -> bool {
        self.features.remove(&track_id).is_some()
    }

    /// Get the ids of all Tracks this view observes.
    pub fn track_ids(&self) -> impl Iterator<Item = &TrackId> {
        self.features.keys()
    }

    /// Get the number of Tracks this view observes.
    pub fn num_features(&self) -> usize {
        self.features.len()
    }
}

impl std::fmt::Debug for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("estimated", &self.estimated)
            .field("features", &self.features.len())
            .finish()
    }
}
