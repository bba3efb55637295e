//! Camera component

use serde::{Deserialize, Serialize};

/// Viewing parameters of a camera node
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Camera {
    /// Vertical field of view in radians
    pub fov_y_radians: f32,
    /// Near clipping plane distance
    pub z_near: f32,
    /// Far clipping plane distance
    pub z_far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(60.0, 0.1, 1000.0)
    }
}

impl Camera {
    /// Create a camera from a vertical field of view in degrees
    pub fn new(fov_y_degrees: f32, z_near: f32, z_far: f32) -> Self {
        Self {
            fov_y_radians: fov_y_degrees.to_radians(),
            z_near,
            z_far,
        }
    }

    pub fn fov_degrees(&self) -> f32 {
        self.fov_y_radians.to_degrees()
    }

    pub fn set_fov_degrees(&mut self, degrees: f32) {
        self.fov_y_radians = degrees.to_radians();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert!((camera.fov_degrees() - 60.0).abs() < 1e-4);
        assert_eq!(camera.z_near, 0.1);
        assert_eq!(camera.z_far, 1000.0);
    }

    #[test]
    fn test_fov_degrees_round_trip() {
        let mut camera = Camera::new(90.0, 1.0, 10.0);
        camera.set_fov_degrees(45.0);
        assert!((camera.fov_degrees() - 45.0).abs() < 1e-4);
    }
}
