use std::ops::Mul;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec3(pub f32, pub f32, pub f32);

impl Vec3 {
    pub const ZERO: Vec3 = Vec3(0.0, 0.0, 0.0);
    pub const ONE: Vec3 = Vec3(1.0, 1.0, 1.0);

    pub const fn splat(v: f32) -> Self { Self(v, v, v) }

    pub fn add(self, v: Self) -> Self { Self(self.0+v.0, self.1+v.1, self.2+v.2) }
    pub fn sub(self, v: Self) -> Self { Self(self.0-v.0, self.1-v.1, self.2-v.2) }
    pub fn scale(self, f: f32) -> Self { Self(self.0*f, self.1*f, self.2*f) }
    /// Element-wise (color) product.
    pub fn mul(self, v: Self) -> Self { Self(self.0*v.0, self.1*v.1, self.2*v.2) }
    pub fn dot(self, v: Self) -> f32 { self.0*v.0 + self.1*v.1 + self.2*v.2 }
    pub fn length2(self) -> f32 { self.dot(self) }
    pub fn norm(self) -> f32 { self.length2().sqrt() }
    /// Divides by the magnitude. A zero vector yields NaN components.
    pub fn normalize(self) -> Self { self.scale(1.0/self.norm()) }
    pub fn neg(self) -> Self { Self(-self.0,-self.1,-self.2) }

    /// Mirror `self` about the normal `n`: `v - 2(v·n)n`.
    pub fn reflect(self, n: Self) -> Self { self.sub(n.scale(2.0*self.dot(n))) }

    pub fn max_component(self) -> f32 { self.0.max(self.1).max(self.2) }
}

/// Row-major 4×4 transform. Only what the orbiting camera needs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mat4(pub [[f32; 4]; 4]);

impl Mat4 {
    /// Rotation of `angle` radians about the Y axis.
    #[rustfmt::skip]
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4([
            [  c, 0.0,   s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [ -s, 0.0,   c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Transform a position (w = 1, translation applied).
    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3(
            m[0][0]*p.0 + m[0][1]*p.1 + m[0][2]*p.2 + m[0][3],
            m[1][0]*p.0 + m[1][1]*p.1 + m[1][2]*p.2 + m[1][3],
            m[2][0]*p.0 + m[2][1]*p.1 + m[2][2]*p.2 + m[2][3],
        )
    }

    /// Transform a direction (w = 0, translation ignored).
    pub fn transform_dir(&self, d: Vec3) -> Vec3 {
        let m = &self.0;
        Vec3(
            m[0][0]*d.0 + m[0][1]*d.1 + m[0][2]*d.2,
            m[1][0]*d.0 + m[1][1]*d.1 + m[1][2]*d.2,
            m[2][0]*d.0 + m[2][1]*d.1 + m[2][2]*d.2,
        )
    }
}

impl Mul<Vec3> for Mat4 {
    type Output = Vec3;
    fn mul(self, d: Vec3) -> Vec3 { self.transform_dir(d) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a.0 - b.0).abs() < 1e-5 && (a.1 - b.1).abs() < 1e-5 && (a.2 - b.2).abs() < 1e-5
    }

    #[test]
    fn test_reflect() {
        let v = Vec3(1.0, -1.0, 0.0);
        let n = Vec3(0.0, 1.0, 0.0);
        assert_eq!(v.reflect(n), Vec3(1.0, 1.0, 0.0));
    }

    #[test]
    fn test_normalize() {
        let v = Vec3(3.0, 0.0, 4.0).normalize();
        assert!((v.norm() - 1.0).abs() < 1e-6);
        assert!(approx(v, Vec3(0.6, 0.0, 0.8)));
    }

    #[test]
    fn test_normalize_zero_is_nan() {
        let v = Vec3::ZERO.normalize();
        assert!(v.0.is_nan() && v.1.is_nan() && v.2.is_nan());
    }

    #[test]
    fn test_rotation_y_quarter_turn() {
        let r = Mat4::rotation_y(FRAC_PI_2);
        assert!(approx(r * Vec3(0.0, 0.0, 1.0), Vec3(1.0, 0.0, 0.0)));
        assert!(approx(r * Vec3(1.0, 0.0, 0.0), Vec3(0.0, 0.0, -1.0)));
        // Y is the axis, untouched.
        assert!(approx(r * Vec3(0.0, 2.0, 0.0), Vec3(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_rotation_preserves_length() {
        let r = Mat4::rotation_y(-1.234);
        let v = Vec3(0.3, -0.2, -1.0).normalize();
        assert!(((r * v).norm() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_transform_point_applies_translation() {
        let m = Mat4([
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, -2.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        assert_eq!(m.transform_point(Vec3(1.0, 1.0, 1.0)), Vec3(2.0, 1.0, -1.0));
        assert_eq!(m.transform_dir(Vec3(1.0, 1.0, 1.0)), Vec3(1.0, 1.0, 1.0));
    }
}
