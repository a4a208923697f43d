use crate::algebra::{Mat4, Vec3};

/// Camera orbiting the scene about the Y axis as time advances.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub base_offset: Vec3,
    /// Point rotated about the origin, then added to `base_offset`.
    pub orbit_point: Vec3,
    /// Vertical field of view, degrees.
    pub fov: f32,
    /// Radians per second.
    pub angular_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            base_offset: Vec3(0.0, 5.0, -25.0),
            orbit_point: Vec3(0.0, 5.0, 25.0),
            fov: 40.0,
            angular_speed: 2.0,
        }
    }
}

impl OrbitCamera {
    /// Freeze the camera for one frame of a `width`×`height` image.
    pub fn frame(&self, elapsed: f32, width: u32, height: u32) -> CameraFrame {
        let theta = elapsed * self.angular_speed;
        let rotation = Mat4::rotation_y(-theta);
        let origin = self.base_offset.add(rotation.transform_point(self.orbit_point));

        CameraFrame {
            rotation,
            origin,
            inv_width: 1.0 / width as f32,
            inv_height: 1.0 / height as f32,
            aspect: width as f32 / height as f32,
            angle: (self.fov.to_radians() * 0.5).tan(),
        }
    }
}

/// Per-frame camera state, computed once before tiles are dispatched and only
/// read by the workers.
#[derive(Clone, Copy, Debug)]
pub struct CameraFrame {
    rotation: Mat4,
    origin: Vec3,
    inv_width: f32,
    inv_height: f32,
    aspect: f32,
    angle: f32,
}

impl CameraFrame {
    /// Primary ray (origin, normalized direction) through the center of pixel (x, y).
    pub fn primary_ray(&self, x: u32, y: u32) -> (Vec3, Vec3) {
        let xx = (2.0 * ((x as f32 + 0.5) * self.inv_width) - 1.0) * self.angle * self.aspect;
        let yy = (1.0 - 2.0 * ((y as f32 + 0.5) * self.inv_height)) * self.angle;
        let dir = Vec3(xx, yy, -1.0).normalize();
        (self.origin, self.rotation * dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4 && (a.2 - b.2).abs() < 1e-4
    }

    #[test]
    fn test_origin_at_start() {
        let frame = OrbitCamera::default().frame(0.0, 640, 480);
        assert_eq!(frame.primary_ray(320, 240).0, Vec3(0.0, 10.0, 0.0));
    }

    #[test]
    fn test_center_pixel_looks_down_negative_z() {
        let frame = OrbitCamera::default().frame(0.0, 1, 1);
        let (_, dir) = frame.primary_ray(0, 0);
        assert!(close(dir, Vec3(0.0, 0.0, -1.0)));
    }

    #[test]
    fn test_orbit_half_turn() {
        let cam = OrbitCamera::default();
        // theta = pi after elapsed * 2 = pi
        let frame = cam.frame(PI / 2.0, 1, 1);
        let (origin, dir) = frame.primary_ray(0, 0);
        assert!(close(origin, Vec3(0.0, 10.0, -50.0)));
        assert!(close(dir, Vec3(0.0, 0.0, 1.0)));
    }

    #[test]
    fn test_corner_rays_span_fov() {
        let frame = OrbitCamera::default().frame(0.0, 100, 100);
        let (_, top) = frame.primary_ray(50, 0);
        let (_, bottom) = frame.primary_ray(50, 99);
        assert!(top.1 > 0.0 && bottom.1 < 0.0);
        assert!((top.norm() - 1.0).abs() < 1e-5);
        // Close to half the vertical fov.
        let half = top.1.atan2(-top.2).to_degrees();
        assert!((half - 20.0).abs() < 0.5, "{half}");
    }
}
