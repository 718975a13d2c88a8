//! Bundler v0.3 export.
//!
//! Writes a reconstruction in the two-file layout consumed by Bundler and
//! the dense-reconstruction tools built on top of it: a list file naming
//! each exported image (with its focal-length prior when one is known) and
//! a bundle file holding camera intrinsics, extrinsics, and the 3D points
//! with their 2D observations.
//!
//! Bundler's camera frame has y up and z pointing backward, while
//! internally cameras use y down and z forward; rotations and translations
//! are converted with a fixed diagonal sign flip on the way out. Pixel
//! observations are likewise re-origined from the top-left corner to the
//! principal point, with y growing upward.
//!
//! Only estimated views and estimated, sufficiently observed tracks are
//! exported. Filtering happens on a private copy; the caller's
//! reconstruction is never touched.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use nalgebra::{Matrix3, Vector2, Vector3};
use tracing::info;

use crate::sfm::{Camera, Feature, Reconstruction, TrackId, ViewId};

/// Magic line identifying the bundle file sub-version.
const BUNDLE_FILE_MAGIC: &str = "# Bundle file v0.3";

/// Placeholder RGB color emitted for every point; the reconstruction does
/// not track point colors.
const POINT_COLOR: &str = "255 255 255";

/// Minimum number of observing views for a track to be exported.
const MIN_TRACK_VIEWS: usize = 2;

/// Sign flip between the internal camera frame (x right, y down,
/// z forward) and Bundler's camera frame (x right, y up, z backward).
fn internal_to_bundler_axes() -> Matrix3<f64> {
    Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, -1.0))
}

/// Re-origin a pixel observation the way Bundler measures it: offset from
/// the principal point, with y growing upward instead of downward.
fn adjusted_feature(feature: &Feature, camera: &Camera) -> Vector2<f64> {
    Vector2::new(
        feature.x - camera.principal_point_x,
        -(feature.y - camera.principal_point_y),
    )
}

/// Copy the reconstruction and drop everything that was not estimated.
///
/// Views survive iff their pose was estimated. Tracks survive iff their
/// position was estimated and at least two views observe them. View
/// removal is shallow, so the observer count seen by the track filter is
/// the original graph's count even though views are pruned first; a
/// surviving track may still list an observer that was dropped as a
/// camera, and such observations are skipped when the bundle file is
/// written.
fn create_estimated_subreconstruction(reconstruction: &Reconstruction) -> Reconstruction {
    let mut sub = reconstruction.clone();

    let view_ids: Vec<ViewId> = sub.view_ids().collect();
    for view_id in view_ids {
        let estimated = match sub.view(view_id) {
            Some(view) => view.estimated,
            None => continue,
        };
        if !estimated {
            sub.remove_view(view_id);
        }
    }

    let track_ids: Vec<TrackId> = sub.track_ids().collect();
    for track_id in track_ids {
        let keep = match sub.track(track_id) {
            Some(track) => track.estimated && track.num_views() >= MIN_TRACK_VIEWS,
            None => continue,
        };
        if !keep {
            sub.remove_track(track_id);
        }
    }

    sub
}

/// Write the image list: one line per view with its name and, when the
/// intrinsics prior carries one, the prior focal length.
fn write_lists_file(reconstruction: &Reconstruction, lists_path: &Path) -> Result<()> {
    let file = File::create(lists_path)
        .with_context(|| format!("Failed to open {} for writing", lists_path.display()))?;
    let mut writer = BufWriter::new(file);

    for view in reconstruction.views() {
        write!(writer, "{}", view.name)?;
        if let Some(focal_length) = view.intrinsics_prior.focal_length {
            write!(writer, " 0 {}", focal_length)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Write the bundle file: header, one camera block per view, then one
/// point block per track.
fn write_bundle_file(reconstruction: &Reconstruction, bundle_path: &Path) -> Result<()> {
    let file = File::create(bundle_path)
        .with_context(|| format!("Failed to open {} for writing", bundle_path.display()))?;
    let mut writer = BufWriter::new(file);

    let axis_flip = internal_to_bundler_axes();

    writeln!(writer, "{}", BUNDLE_FILE_MAGIC)?;
    writeln!(
        writer,
        "{} {}",
        reconstruction.num_views(),
        reconstruction.num_tracks()
    )?;

    // Cameras first. The position of each view in this pass fixes the
    // index that point observations below refer back to.
    let mut view_id_to_index: HashMap<ViewId, usize> = HashMap::new();
    for (index, view) in reconstruction.views().enumerate() {
        view_id_to_index.insert(view.id, index);

        let camera = &view.camera;
        writeln!(
            writer,
            "{} {} {}",
            camera.focal_length, camera.radial_distortion_1, camera.radial_distortion_2
        )?;

        let rotation = axis_flip * camera.rotation_matrix();
        for row in rotation.row_iter() {
            writeln!(writer, "{} {} {}", row[0], row[1], row[2])?;
        }

        let translation = axis_flip * camera.world_to_camera_translation();
        writeln!(
            writer,
            "{} {} {}",
            translation.x, translation.y, translation.z
        )?;
    }

    // Points second, referencing cameras through the index table.
    for track in reconstruction.tracks() {
        let position = track.point_euclidean();
        writeln!(writer, "{} {} {}", position.x, position.y, position.z)?;
        writeln!(writer, "{}", POINT_COLOR)?;

        // The count is the track's own observer count; observations whose
        // view carries no index are skipped below.
        write!(writer, "{}", track.num_views())?;
        for view_id in track.view_ids() {
            let index = match view_id_to_index.get(view_id) {
                Some(index) => *index,
                None => continue,
            };
            let view = match reconstruction.view(*view_id) {
                Some(view) => view,
                None => continue,
            };
            let feature = match view.get_feature(track.id) {
                Some(feature) => feature,
                None => continue,
            };

            // The keypoint index is written as 0; keypoint files are not
            // kept, so there is nothing to reference.
            let adjusted = adjusted_feature(feature, &view.camera);
            write!(writer, " {} 0 {} {}", index, adjusted.x, adjusted.y)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}

/// Export a reconstruction in Bundler v0.3 layout: an image list at
/// `lists_path` and the bundle geometry at `bundle_path`.
///
/// Only estimated views and estimated tracks observed by at least two
/// views are exported; filtering happens on a private copy and the caller's
/// reconstruction is left untouched. The two files are written in
/// sequence with no transactional guarantee across the pair: if the
/// bundle write fails, the list file stays on disk as written.
pub fn write_bundler_files(
    reconstruction: &Reconstruction,
    lists_path: impl AsRef<Path>,
    bundle_path: impl AsRef<Path>,
) -> Result<()> {
    let estimated = create_estimated_subreconstruction(reconstruction);
    info!(
        "Writing Bundler export: {} views, {} tracks",
        estimated.num_views(),
        estimated.num_tracks()
    );

    write_lists_file(&estimated, lists_path.as_ref())?;
    write_bundle_file(&estimated, bundle_path.as_ref())
}
