use crate::{algebra::Vec3, sphere::Sphere};

/// Ordered sphere list. Insertion order breaks distance ties (first wins)
/// and fixes the light accumulation order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    spheres: Vec<Sphere>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sphere: Sphere) -> &mut Self {
        self.spheres.push(sphere);
        self
    }

    pub fn with(mut self, sphere: Sphere) -> Self {
        self.spheres.push(sphere);
        self
    }

    pub fn spheres(&self) -> &[Sphere] {
        &self.spheres
    }

    pub fn len(&self) -> usize {
        self.spheres.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spheres.is_empty()
    }

    /// Indices of emissive spheres, in scene order.
    pub fn lights(&self) -> impl Iterator<Item = (usize, &Sphere)> + '_ {
        self.spheres.iter().enumerate().filter(|(_, s)| s.is_light())
    }

    /// Gray ground, three glassy mirrors and one light.
    pub fn showcase() -> Self {
        Scene::new()
            .with(ground())
            .with(Sphere::new(Vec3(0.0, 10.0, -20.0), 4.0, Vec3(1.00, 0.32, 0.36), 1.0, 0.9))
            .with(Sphere::new(Vec3(5.0, 10.0, -15.0), 2.0, Vec3(0.90, 0.76, 0.46), 1.0, 0.9))
            .with(Sphere::new(Vec3(5.0, 10.0, -25.0), 3.0, Vec3(0.65, 0.77, 0.97), 1.0, 0.9))
            .with(light())
    }

    /// Ground, the red mirror and the light only.
    pub fn minimal() -> Self {
        Scene::new()
            .with(ground())
            .with(Sphere::new(Vec3(0.0, 10.0, -20.0), 4.0, Vec3(1.00, 0.32, 0.36), 1.0, 0.9))
            .with(light())
    }
}

fn ground() -> Sphere {
    Sphere::new(Vec3(0.0, -10005.0, -20.0), 10000.0, Vec3::splat(0.20), 0.0, 0.0)
}

fn light() -> Sphere {
    Sphere::new(Vec3(20.0, 30.0, -40.0), 3.0, Vec3::ZERO, 0.0, 0.0).with_emission(Vec3::splat(3.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scene_creation() {
        let scene = Scene::showcase();
        assert_eq!(scene.len(), 5);
        let lights: Vec<usize> = scene.lights().map(|(i, _)| i).collect();
        assert_eq!(lights, vec![4]);
    }

    #[test]
    fn test_scene_keeps_insertion_order() {
        let a = Sphere::new(Vec3::ZERO, 1.0, Vec3::ONE, 0.0, 0.0);
        let b = Sphere::new(Vec3::ONE, 2.0, Vec3::ONE, 0.0, 0.0);
        let mut scene = Scene::new();
        scene.push(a).push(b);
        assert_eq!(scene.spheres(), &[a, b]);
    }

    #[test]
    fn test_empty_scene() {
        let scene = Scene::default();
        assert!(scene.is_empty());
        assert_eq!(scene.lights().count(), 0);
    }
}
