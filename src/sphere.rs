//! src/sphere.rs
//! -------------
//! Sphere geometry plus the Whitted material attributes.

use crate::algebra::Vec3;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    pub center         : Vec3,
    pub radius         : f32,
    pub surface_color  : Vec3,
    /// Non-zero for spheres that act as lights.
    pub emission_color : Vec3,
    pub reflection     : f32,
    pub transparency   : f32,
}

impl Sphere {
    pub fn new(center: Vec3, radius: f32, surface_color: Vec3, reflection: f32, transparency: f32) -> Self {
        Self {
            center,
            radius,
            surface_color,
            emission_color: Vec3::ZERO,
            reflection,
            transparency,
        }
    }

    pub fn with_emission(mut self, emission_color: Vec3) -> Self {
        self.emission_color = emission_color;
        self
    }

    pub fn is_light(&self) -> bool {
        self.emission_color.max_component() > 0.0
    }

    /// Reflective or refractive material.
    pub fn is_specular(&self) -> bool {
        self.reflection > 0.0 || self.transparency > 0.0
    }

    /// Intersect a ray (ro + t·rd), `rd` normalized.
    /// Returns both parametric distances (near, far); either may be negative
    /// when the origin is inside the sphere or the sphere lies behind it.
    pub fn intersect(&self, ro: Vec3, rd: Vec3) -> Option<(f32, f32)> {
        let l   = self.center.sub(ro);
        let tca = l.dot(rd);
        let d2  = l.dot(l) - tca * tca;
        let r2  = self.radius * self.radius;
        if d2 > r2 { return None; }

        let thc = (r2 - d2).sqrt();
        Some((tca - thc, tca + thc))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_intersection() {
        for r in [0.5_f32, 1.0, 4.0, 10000.0] {
            let s = Sphere::new(Vec3::ZERO, r, Vec3::ONE, 0.0, 0.0);
            let (t0, t1) = s
                .intersect(Vec3(0.0, 0.0, -2.0 * r), Vec3(0.0, 0.0, 1.0))
                .expect("ray through the center must hit");
            assert!((t0 - r).abs() <= r * 1e-5, "t0 = {t0} for r = {r}");
            assert!((t1 - 3.0 * r).abs() <= r * 1e-5, "t1 = {t1} for r = {r}");
        }
    }

    #[test]
    fn test_sphere_miss() {
        let s = Sphere::new(Vec3::ZERO, 1.0, Vec3::ONE, 0.0, 0.0);
        assert!(s.intersect(Vec3(0.0, 2.0, -5.0), Vec3(0.0, 0.0, 1.0)).is_none());
    }

    #[test]
    fn test_intersection_behind_origin_is_negative() {
        let s = Sphere::new(Vec3::ZERO, 1.0, Vec3::ONE, 0.0, 0.0);
        let (t0, t1) = s.intersect(Vec3(0.0, 0.0, 5.0), Vec3(0.0, 0.0, 1.0)).unwrap();
        assert!(t0 < 0.0 && t1 < 0.0);
    }

    #[test]
    fn test_intersection_from_inside() {
        let s = Sphere::new(Vec3::ZERO, 2.0, Vec3::ONE, 0.0, 0.0);
        let (t0, t1) = s.intersect(Vec3::ZERO, Vec3(1.0, 0.0, 0.0)).unwrap();
        assert_eq!((t0, t1), (-2.0, 2.0));
    }

    #[test]
    fn test_light_detection() {
        let plain = Sphere::new(Vec3::ZERO, 1.0, Vec3::ONE, 0.0, 0.0);
        assert!(!plain.is_light());
        assert!(plain.with_emission(Vec3(0.0, 0.0, 2.0)).is_light());
    }
}
