//! Track - A triangulated 3D point observed by Views.

use std::collections::BTreeSet;

use nalgebra::{Vector3, Vector4};

use super::types::{TrackId, ViewId};

/// A 3D point in the reconstruction, stored in homogeneous coordinates,
/// together with the set of Views that observe it.
///
/// The observer set is ordered by ViewId so that iterating it is
/// deterministic across runs.
#[derive(Clone)]
pub struct Track {
    /// Unique identifier for this Track.
    pub id: TrackId,

    /// 3D position in homogeneous world coordinates (x, y, z, w).
    pub point: Vector4<f64>,

    /// Whether the upstream pipeline successfully triangulated this point.
    pub estimated: bool,

    /// Views observing this track.
    views: BTreeSet<ViewId>,
}

impl Track {
    /// Create a new unestimated Track at the given homogeneous position.
    pub fn new(id: TrackId, point: Vector4<f64>) -> Self {
        Self {
            id,
            point,
            estimated: false,
            views: BTreeSet::new(),
        }
    }

    /// Dehomogenize the point: divide through by the scale component.
    pub fn point_euclidean(&self) -> Vector3<f64> {
        self.point.xyz() / self.point.w
    }

    /// Record that a View observes this track.
    pub fn add_view(&mut self, view_id: ViewId) {
        self.views.insert(view_id);
    }

    /// Remove a View from the observer set.
    ///
    /// Returns true if the observation existed and was removed.
    pub fn erase_view(&mut self, view_id: ViewId) -> bool {
        self.views.remove(&view_id)
    }

    /// Get the observing ViewIds in ascending id order.
    pub fn view_ids(&self) -> impl Iterator<Item = &ViewId> {
        self.views.iter()
    }

    /// Get the number of Views observing this track.
    pub fn num_views(&self) -> usize {
        self.views.len()
    }
}

impl std::fmt::Debug for Track {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Track")
            .field("id", &self.id)
            .field("point", &self.point)
            .field("estimated", &self.estimated)
            .field("views", &self.views.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn create_test_track() -> Track {
        Track::new(TrackId::new(1), Vector4::new(1.0, 2.0, 3.0, 1.0))
    }

    #[test]
    fn test_add_erase_view() {
        let mut track = create_test_track();

        track.add_view(ViewId::new(1));
        track.add_view(ViewId::new(2));
        track.add_view(ViewId::new(2)); // Duplicate insert is a no-op

        assert_eq!(track.num_views(), 2);

        assert!(track.erase_view(ViewId::new(1)));
        assert_eq!(track.num_views(), 1);
        assert!(!track.erase_view(ViewId::new(1))); // Already removed
    }

    #[test]
    fn test_view_ids_are_ordered() {
        let mut track = create_test_track();

        track.add_view(ViewId::new(9));
        track.add_view(ViewId::new(3));
        track.add_view(ViewId::new(5));

        let ids: Vec<u64> = track.view_ids().map(|id| id.0).collect();
        assert_eq!(ids, vec![3, 5, 9]);
    }

    #[test]
    fn test_point_euclidean() {
        let track = Track::new(TrackId::new(0), Vector4::new(2.0, 4.0, 6.0, 2.0));

        assert_relative_eq!(
            track.point_euclidean(),
            Vector3::new(1.0, 2.0, 3.0),
            epsilon = 1e-12
        );
    }
}
