use crate::math::to_rgba8;

pub const DECAL_RESOLUTION: u32 = 128;

const PAD_COLOR: [f32; 3] = [0.32, 0.33, 0.34];
const ASPHALT: [f32; 3] = [0.14, 0.15, 0.16];
const MARKING_YELLOW: [f32; 3] = [0.95, 0.78, 0.12];
const MARKING_WHITE: [f32; 3] = [0.95, 0.95, 0.95];

/// Square RGBA texture laid over the top face of a box
#[derive(Debug, Clone, PartialEq)]
pub struct Decal {
    size: u32,
    texels: Vec<[u8; 4]>,
}

impl Decal {
    pub fn new(size: u32, fill: [f32; 3]) -> Self {
        let size = size.max(1);
        Self {
            size,
            texels: vec![to_rgba8(fill); (size * size) as usize],
        }
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn texels(&self) -> &[[u8; 4]] {
        &self.texels
    }

    /// Nearest-texel lookup, `u`/`v` in 0..1 (clamped)
    pub fn sample(&self, u: f32, v: f32) -> [f32; 3] {
        let max = (self.size - 1) as f32;
        let x = (u.clamp(0.0, 1.0) * max).round() as u32;
        let y = (v.clamp(0.0, 1.0) * max).round() as u32;
        let texel = self.texels[(y * self.size + x) as usize];
        [
            texel[0] as f32 / 255.0,
            texel[1] as f32 / 255.0,
            texel[2] as f32 / 255.0,
        ]
    }

    /// Paint texels whose normalized centre satisfies `inside`
    fn paint(&mut self, color: [f32; 3], inside: impl Fn(f32, f32) -> bool) {
        let rgba = to_rgba8(color);
        let size = self.size as f32;
        for y in 0..self.size {
            for x in 0..self.size {
                let u = (x as f32 + 0.5) / size;
                let v = (y as f32 + 0.5) / size;
                if inside(u, v) {
                    self.texels[(y * self.size + x) as usize] = rgba;
                }
            }
        }
    }

    fn fill_rect(&mut self, color: [f32; 3], u0: f32, v0: f32, u1: f32, v1: f32) {
        self.paint(color, |u, v| u >= u0 && u <= u1 && v >= v0 && v <= v1);
    }

    fn fill_ring(&mut self, color: [f32; 3], inner: f32, outer: f32) {
        self.paint(color, |u, v| {
            let d = ((u - 0.5).powi(2) + (v - 0.5).powi(2)).sqrt();
            d >= inner && d <= outer
        });
    }
}

/// Procedural helipad marking: dark disc, yellow ring and a white "H"
pub fn helipad_decal(size: u32) -> Decal {
    let mut decal = Decal::new(size.max(8), PAD_COLOR);
    decal.fill_ring(ASPHALT, 0.0, 0.47);
    decal.fill_ring(MARKING_YELLOW, 0.40, 0.45);

    decal.fill_rect(MARKING_WHITE, 0.33, 0.28, 0.41, 0.72);
    decal.fill_rect(MARKING_WHITE, 0.59, 0.28, 0.67, 0.72);
    decal.fill_rect(MARKING_WHITE, 0.41, 0.46, 0.59, 0.54);
    decal
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f32; 3], b: [f32; 3]) -> bool {
        a.iter().zip(b).all(|(x, y)| (x - y).abs() < 0.01)
    }

    #[test]
    fn decal_has_square_texel_buffer() {
        let decal = helipad_decal(64);
        assert_eq!(decal.size(), 64);
        assert_eq!(decal.texels().len(), 64 * 64);
    }

    #[test]
    fn markings_land_where_expected() {
        let decal = helipad_decal(DECAL_RESOLUTION);
        // Corner stays bare pad
        assert!(close(decal.sample(0.0, 0.0), PAD_COLOR));
        // Crossbar of the H at the centre
        assert!(close(decal.sample(0.5, 0.5), MARKING_WHITE));
        // Left leg of the H
        assert!(close(decal.sample(0.37, 0.35), MARKING_WHITE));
        // Ring, straight above the centre
        assert!(close(decal.sample(0.5, 0.075), MARKING_YELLOW));
        // Between ring and H
        assert!(close(decal.sample(0.5, 0.2), ASPHALT));
    }

    #[test]
    fn zero_size_decal_still_samples() {
        let decal = Decal::new(0, MARKING_YELLOW);
        assert_eq!(decal.size(), 1);
        assert_eq!(decal.texels().len(), 1);
        assert!(close(decal.sample(0.7, 0.2), MARKING_YELLOW));
    }

    #[test]
    fn sample_clamps_out_of_range() {
        let decal = helipad_decal(32);
        assert_eq!(decal.sample(-1.0, -1.0), decal.sample(0.0, 0.0));
        assert_eq!(decal.sample(2.0, 2.0), decal.sample(1.0, 1.0));
    }
}
