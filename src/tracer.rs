//! Recursive Whitted tracer.
//!
//! `trace` is a pure function of its arguments: the scene is only read, and
//! nothing is shared between recursive calls, so any number of pixels can be
//! traced concurrently against the same `&Scene`.

use crate::{algebra::Vec3, scene::Scene, sphere::Sphere};

/// Reflective/refractive bounces allowed before forcing diffuse shading.
pub const MAX_DEPTH: u32 = 4;
/// Offset along the normal for secondary ray origins.
pub const BIAS: f32 = 1e-4;
pub const INDEX_OF_REFRACTION: f32 = 1.1;
/// Radiance of rays that escape the scene.
pub const BACKGROUND: Vec3 = Vec3::ONE;

/// `a·(1-t) + b·t`
#[inline]
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    b * t + a * (1.0 - t)
}

/// Fresnel-like reflection weight for a facing ratio `cos_theta`.
#[inline]
pub fn fresnel(cos_theta: f32) -> f32 {
    mix((1.0 - cos_theta).powi(3), 1.0, 0.1)
}

pub fn trace(ro: Vec3, rd: Vec3, scene: &Scene, depth: u32) -> Vec3 {
    trace_observed(ro, rd, scene, depth, &mut |_: u32| {})
}

/// Same as [`trace`], calling `observer(depth)` every time a reflective or
/// refractive bounce is taken.
pub fn trace_observed<F>(ro: Vec3, rd: Vec3, scene: &Scene, depth: u32, observer: &mut F) -> Vec3
where
    F: FnMut(u32),
{
    let spheres = scene.spheres();
    let (idx, t_near) = match nearest_hit(ro, rd, spheres) {
        Some(v) => v,
        None => return BACKGROUND,
    };
    let sphere = &spheres[idx];

    let phit = ro.add(rd.scale(t_near));
    let mut nhit = phit.sub(sphere.center).normalize();
    let mut inside = false;
    if rd.dot(nhit) > 0.0 {
        nhit = nhit.neg();
        inside = true;
    }

    let surface = if sphere.is_specular() && depth < MAX_DEPTH {
        observer(depth);

        let weight = fresnel(-rd.dot(nhit));

        let refl_dir = rd.reflect(nhit).normalize();
        let reflection = trace_observed(phit.add(nhit.scale(BIAS)), refl_dir, scene, depth + 1, observer);

        let mut refraction = Vec3::ZERO;
        if sphere.transparency != 0.0 {
            if let Some(refr_dir) = refract(rd, nhit, inside) {
                refraction = trace_observed(phit.sub(nhit.scale(BIAS)), refr_dir, scene, depth + 1, observer);
            }
        }

        reflection
            .scale(weight)
            .add(refraction.scale((1.0 - weight) * sphere.transparency))
            .mul(sphere.surface_color)
    } else {
        direct_light(idx, phit, nhit, spheres)
    };

    surface.add(sphere.emission_color)
}

/// Closest sphere with a non-negative distance. A negative near distance
/// (origin inside) falls back to the far one. Ties keep the earlier sphere.
fn nearest_hit(ro: Vec3, rd: Vec3, spheres: &[Sphere]) -> Option<(usize, f32)> {
    let mut best: Option<(usize, f32)> = None;
    for (i, s) in spheres.iter().enumerate() {
        let Some((t0, t1)) = s.intersect(ro, rd) else { continue };
        let t = if t0 < 0.0 { t1 } else { t0 };
        if t < 0.0 {
            continue;
        }
        if best.map_or(true, |(_, bt)| t < bt) {
            best = Some((i, t));
        }
    }
    best
}

/// Snell refraction with the fixed index. `None` on total internal reflection.
fn refract(rd: Vec3, nhit: Vec3, inside: bool) -> Option<Vec3> {
    let eta = if inside { INDEX_OF_REFRACTION } else { 1.0 / INDEX_OF_REFRACTION };
    let cosi = -nhit.dot(rd);
    let k = 1.0 - eta * eta * (1.0 - cosi * cosi);
    if k < 0.0 {
        return None;
    }
    Some(rd.scale(eta).add(nhit.scale(eta * cosi - k.sqrt())).normalize())
}

/// Diffuse shading with binary shadows from every other emissive sphere.
fn direct_light(shaded: usize, phit: Vec3, nhit: Vec3, spheres: &[Sphere]) -> Vec3 {
    let surface_color = spheres[shaded].surface_color;
    let shadow_ro = phit.add(nhit.scale(BIAS));

    let mut color = Vec3::ZERO;
    for (i, light) in spheres.iter().enumerate() {
        if i == shaded || !light.is_light() {
            continue;
        }
        let light_dir = light.center.sub(phit).normalize();

        let blocked = spheres.iter().enumerate().any(|(j, s)| {
            j != i
                && j != shaded
                && s.intersect(shadow_ro, light_dir).map_or(false, |(_, t1)| t1 > 0.0)
        });
        if blocked {
            continue;
        }

        let n_dot_l = nhit.dot(light_dir).max(0.0);
        color = color.add(surface_color.scale(n_dot_l).mul(light.emission_color));
    }
    color
}
