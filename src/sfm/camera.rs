//! Camera model with the intrinsics the Bundler format carries.
//!
//! The intrinsic parameterization is the Snavely/Bundler one: a single
//! focal length (fx = fy) and two radial distortion coefficients, plus a
//! principal point used to re-origin pixel observations. Extrinsics are a
//! world-to-camera rotation and the camera center in world coordinates.

use nalgebra::{Matrix3, Rotation3, Vector3};

/// A calibrated camera attached to a View.
///
/// Internally the camera frame follows the computer-vision convention:
/// x right, y down, z forward along the optical axis.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Focal length in pixels (fx = fy).
    pub focal_length: f64,

    /// First radial distortion coefficient (k1).
    pub radial_distortion_1: f64,

    /// Second radial distortion coefficient (k2).
    pub radial_distortion_2: f64,

    /// Principal point x, in pixels from the left image edge.
    pub principal_point_x: f64,

    /// Principal point y, in pixels from the top image edge.
    pub principal_point_y: f64,

    /// World-to-camera rotation R: p_cam = R * p_world + t.
    pub orientation: Rotation3<f64>,

    /// Camera center C in world coordinates.
    pub position: Vector3<f64>,
}

impl Camera {
    /// Get the world-to-camera rotation as a plain 3x3 matrix.
    pub fn rotation_matrix(&self) -> Matrix3<f64> {
        self.orientation.into_inner()
    }

    /// Compute the world-to-camera translation t = -R * C.
    pub fn world_to_camera_translation(&self) -> Vector3<f64> {
        -(self.rotation_matrix() * self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            focal_length: 1.0,
            radial_distortion_1: 0.0,
            radial_distortion_2: 0.0,
            principal_point_x: 0.0,
            principal_point_y: 0.0,
            orientation: Rotation3::identity(),
            position: Vector3::zeros(),
        }
    }
}

/// Externally supplied intrinsics hints for a View, typically recovered
/// from image metadata before estimation runs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CameraIntrinsicsPrior {
    /// Focal length in pixels, when the source carried one.
    pub focal_length: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_camera_is_at_origin() {
        let camera = Camera::default();

        assert_eq!(camera.focal_length, 1.0);
        assert_eq!(camera.rotation_matrix(), Matrix3::identity());
        assert_eq!(camera.world_to_camera_translation(), Vector3::zeros());
    }

    #[test]
    fn test_world_to_camera_translation() {
        let camera = Camera {
            orientation: Rotation3::from_euler_angles(0.1, -0.2, 0.3),
            position: Vector3::new(1.0, -2.0, 3.0),
            ..Camera::default()
        };

        let t = camera.world_to_camera_translation();

        // The camera center must map to the camera-frame origin.
        let mapped = camera.rotation_matrix() * camera.position + t;
        assert_relative_eq!(mapped, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_prior_defaults_to_unset() {
        let prior = CameraIntrinsicsPrior::default();
        assert!(prior.focal_length.is_none());
    }
}
