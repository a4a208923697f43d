use bytemuck::{Pod, Zeroable};

use crate::algebra::Vec3;

/// One pixel of a host BGRA8 frame buffer.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Bgra {
    pub b: u8,
    pub g: u8,
    pub r: u8,
    pub a: u8,
}

impl Bgra {
    pub const BYTES: usize = 4;

    /// Quantize radiance to bytes with `(c * 255) as u8`.
    ///
    /// The cast truncates and saturates: values above 1 clamp to 255,
    /// negatives and NaN become 0.
    pub fn from_radiance(c: Vec3) -> Self {
        Self {
            b: (c.2 * 255.0) as u8,
            g: (c.1 * 255.0) as u8,
            r: (c.0 * 255.0) as u8,
            a: 255,
        }
    }
}

/// View a host byte buffer as pixels. The length must be a multiple of 4.
pub fn as_pixels_mut(bytes: &mut [u8]) -> Option<&mut [Bgra]> {
    bytemuck::try_cast_slice_mut(bytes).ok()
}

pub fn as_bytes(pixels: &[Bgra]) -> &[u8] {
    bytemuck::cast_slice(pixels)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantize_truncates() {
        let p = Bgra::from_radiance(Vec3(0.829843, 0.101409, 0.124211));
        assert_eq!(p, Bgra { b: 31, g: 25, r: 211, a: 255 });
    }

    #[test]
    fn test_quantize_out_of_range_saturates() {
        let p = Bgra::from_radiance(Vec3(3.0, -0.5, f32::NAN));
        assert_eq!(p, Bgra { b: 0, g: 0, r: 255, a: 255 });
    }

    #[test]
    fn test_byte_layout() {
        let mut bytes = vec![0u8; 8];
        let pixels = as_pixels_mut(&mut bytes).unwrap();
        pixels[1] = Bgra { b: 1, g: 2, r: 3, a: 4 };
        assert_eq!(bytes, vec![0, 0, 0, 0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_odd_length_rejected() {
        let mut bytes = vec![0u8; 7];
        assert!(as_pixels_mut(&mut bytes).is_none());
    }
}
