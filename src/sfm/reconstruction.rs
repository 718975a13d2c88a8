//! Reconstruction - Container for Views and Tracks.
//!
//! The Reconstruction is the aggregate the estimation pipeline fills in and
//! the exporters read back out:
//! - Views with their cameras and pixel observations
//! - Tracks (3D points) with their observer sets
//!
//! It provides methods for:
//! - Adding and removing Views and Tracks
//! - Creating bidirectional associations (View <-> Track)
//! - Enumerating entities in a stable order
//!
//! Ids are assigned sequentially and entities are stored in id-ordered
//! maps, so iteration always follows creation order. Exporters rely on
//! that order staying put: it decides camera and point ordering in output
//! files and the index table points use to reference cameras.

use std::collections::BTreeMap;

use nalgebra::Vector4;

use super::track::Track;
use super::types::{Feature, TrackId, ViewId};
use super::view::View;

/// A structure-from-motion reconstruction containing Views and Tracks.
#[derive(Clone)]
pub struct Reconstruction {
    /// All Views, keyed and iterated in id order.
    views: BTreeMap<ViewId, View>,

    /// All Tracks, keyed and iterated in id order.
    tracks: BTreeMap<TrackId, Track>,

    /// Counter for generating unique View ids.
    next_view_id: u64,

    /// Counter for generating unique Track ids.
    next_track_id: u64,
}

impl Reconstruction {
    /// Create a new empty Reconstruction.
    pub fn new() -> Self {
        Self {
            views: BTreeMap::new(),
            tracks: BTreeMap::new(),
            next_view_id: 0,
            next_track_id: 0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create and add a new View with the given name.
    ///
    /// The View starts unestimated with a default camera; use
    /// [`view_mut`](Self::view_mut) to fill in camera parameters, the
    /// intrinsics prior, and the estimated flag.
    ///
    /// Returns the id of the created View.
    pub fn add_view(&mut self, name: &str) -> ViewId {
        let id = ViewId::new(self.next_view_id);
        self.next_view_id += 1;
        self.views.insert(id, View::new(id, name));
        id
    }

    /// Get a View by id.
    pub fn view(&self, id: ViewId) -> Option<&View> {
        self.views.get(&id)
    }

    /// Get a mutable reference to a View by id.
    pub fn view_mut(&mut self, id: ViewId) -> Option<&mut View> {
        self.views.get_mut(&id)
    }

    /// Get all View ids in creation order.
    pub fn view_ids(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys().copied()
    }

    /// Get all Views in creation order.
    pub fn views(&self) -> impl Iterator<Item = &View> {
        self.views.values()
    }

    /// Get the number of Views.
    pub fn num_views(&self) -> usize {
        self.views.len()
    }

    /// Remove a View from the reconstruction.
    ///
    /// This does NOT remove the view from any Track's observer set; a
    /// Track may keep listing the removed id among its observers.
    pub fn remove_view(&mut self, id: ViewId) -> Option<View> {
        self.views.remove(&id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Track Operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create and add a new Track at the given homogeneous position.
    ///
    /// The Track starts unestimated with no observers.
    /// Returns the id of the created Track.
    pub fn add_track(&mut self, point: Vector4<f64>) -> TrackId {
        let id = TrackId::new(self.next_track_id);
        self.next_track_id += 1;
        self.tracks.insert(id, Track::new(id, point));
        id
    }

    /// Get a Track by id.
    pub fn track(&self, id: TrackId) -> Option<&Track> {
        self.tracks.get(&id)
    }

    /// Get a mutable reference to a Track by id.
    pub fn track_mut(&mut self, id: TrackId) -> Option<&mut Track> {
        self.tracks.get_mut(&id)
    }

    /// Get all Track ids in creation order.
    pub fn track_ids(&self) -> impl Iterator<Item = TrackId> + '_ {
        self.tracks.keys().copied()
    }

    /// Get all Tracks in creation order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracks.values()
    }

    /// Get the number of Tracks.
    pub fn num_tracks(&self) -> usize {
        self.tracks.len()
    }

    /// Remove a Track from the reconstruction.
    ///
    /// This does NOT remove the observation entries from Views.
    pub fn remove_track(&mut self, id: TrackId) -> Option<Track> {
        self.tracks.remove(&id)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Association (View <-> Track)
    // ─────────────────────────────────────────────────────────────────────────

    /// Record that `view_id` observes `track_id` at pixel `feature`.
    ///
    /// This installs the observation on both sides: the feature in the
    /// View's observation map and the view id in the Track's observer set.
    ///
    /// Returns true if both entities exist and the association was created.
    pub fn associate(&mut self, view_id: ViewId, track_id: TrackId, feature: Feature) -> bool {
        if !self.views.contains_key(&view_id) || !self.tracks.contains_key(&track_id) {
            return false;
        }

        if let Some(view) = self.views.get_mut(&view_id) {
            view.set_feature(track_id, feature);
        }
        if let Some(track) = self.tracks.get_mut(&track_id) {
            track.add_view(view_id);
        }

        true
    }
}

impl Default for Reconstruction {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Reconstruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconstruction")
            .field("num_views", &self.views.len())
            .field("num_tracks", &self.tracks.len())
            .finish()
    }
}
