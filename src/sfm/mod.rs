//! Structure-from-motion data structures.
//!
//! This module contains:
//! - [`View`] - Captured images with their cameras and pixel observations
//! - [`Track`] - Triangulated 3D points observed by Views
//! - [`Reconstruction`] - Container managing Views, Tracks, and their relationships
//!
//! # Architecture
//!
//! The reconstruction forms a bipartite graph structure:
//! - Views observe Tracks (View → Track via their feature map)
//! - Tracks list their observers (Track → View via their observer set)
//!
//! Both directions are wired up together through
//! [`Reconstruction::associate`]. Entities are addressed by lightweight
//! [`ViewId`] / [`TrackId`] handles and enumerate in creation order.
//!
//! # Example
//!
//! ```ignore
//! use sfm_export::sfm::{Feature, Reconstruction};
//!
//! let mut recon = Reconstruction::new();
//!
//! let view_id = recon.add_view("frame_000.png");
//! let track_id = recon.add_track(point);
//!
//! // Record the pixel observation (bidirectional)
//! recon.associate(view_id, track_id, Feature::new(120.0, 88.5));
//! ```

pub mod camera;
pub mod reconstruction;
pub mod track;
pub mod types;
pub mod view;

pub use camera::{Camera, CameraIntrinsicsPrior};
pub use reconstruction::Reconstruction;
pub use track::Track;
pub use types::{Feature, TrackId, ViewId};
pub use view::View;
