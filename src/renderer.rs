use glam::Vec3;

use crate::camera::Camera;
use crate::math::{face_normal, intersect_aabb, to_rgba8};
use crate::scenes::{Scene, SceneBox};

/// Offset along the normal before casting shadow rays
const SHADOW_BIAS: f32 = 1e-3;
/// Horizon colour is the sky colour lifted towards white by this much
const HORIZON_LIFT: f32 = 0.45;

/// Closest surface hit along a ray
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub distance: f32,
    pub box_index: usize,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Software stand-in for the rendering library: ray casts the scene's box
/// proxies into an RGBA8 frame.
pub struct Viewport {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 4]>,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            pixels: vec![[0, 0, 0, 255]; (width * height) as usize],
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        let width = width.max(1);
        let height = height.max(1);
        if (width, height) != (self.width, self.height) {
            self.width = width;
            self.height = height;
            self.pixels = vec![[0, 0, 0, 255]; (width * height) as usize];
        }
    }

    /// Last rendered frame as tightly packed RGBA8 rows
    pub fn pixels(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        (x < self.width && y < self.height).then(|| self.pixels[(y * self.width + x) as usize])
    }

    /// Draw `scene` as seen from `camera`
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> &[u8] {
        let aspect = self.aspect();
        let (width, height) = (self.width as f32, self.height as f32);

        for y in 0..self.height {
            let ndc_y = 1.0 - 2.0 * (y as f32 + 0.5) / height;
            for x in 0..self.width {
                let ndc_x = 2.0 * (x as f32 + 0.5) / width - 1.0;
                let direction = camera.ray_direction(ndc_x, ndc_y, aspect);
                let color = shade(scene, camera.position, direction);
                self.pixels[(y * self.width + x) as usize] = to_rgba8(color);
            }
        }

        self.pixels()
    }
}

/// Nearest box hit along the ray
pub fn trace(scene: &Scene, origin: Vec3, direction: Vec3) -> Option<Hit> {
    let mut best: Option<(f32, usize)> = None;
    for (index, scene_box) in scene.boxes.iter().enumerate() {
        let t = intersect_aabb(origin, direction, scene_box.bounds.min, scene_box.bounds.max);
        if t > 0.0 && best.map_or(true, |(closest, _)| t < closest) {
            best = Some((t, index));
        }
    }

    best.map(|(distance, box_index)| {
        let point = origin + direction * distance;
        Hit {
            distance,
            box_index,
            point,
            normal: face_normal(point, &scene.boxes[box_index].bounds),
        }
    })
}

/// Colour seen along one camera ray
pub fn shade(scene: &Scene, origin: Vec3, direction: Vec3) -> [f32; 3] {
    let Some(hit) = trace(scene, origin, direction) else {
        return sky(scene.sky, direction);
    };

    let scene_box = &scene.boxes[hit.box_index];
    let base = surface_color(scene, scene_box, &hit);
    let lighting = &scene.lighting;

    let mut light = Vec3::from_array(lighting.ambient);

    let sun_facing = hit.normal.dot(lighting.sun_direction);
    if sun_facing > 0.0 {
        let lit = !lighting.sun_shadows
            || !occluded(scene, hit.point + hit.normal * SHADOW_BIAS, lighting.sun_direction, f32::INFINITY);
        if lit {
            light += Vec3::from_array(lighting.sun_color) * sun_facing;
        }
    }

    for spot in &lighting.spotlights {
        let to_point = hit.point - spot.position;
        let distance = to_point.length();
        if distance <= f32::EPSILON || distance >= spot.range {
            continue;
        }
        let l = to_point / distance;
        let cos_angle = l.dot(spot.direction);
        if cos_angle <= spot.cos_cutoff {
            continue;
        }
        let facing = hit.normal.dot(-l);
        if facing <= 0.0 {
            continue;
        }
        let penumbra = spot.cos_cutoff + (1.0 - spot.cos_cutoff) * 0.2;
        let edge = smoothstep(spot.cos_cutoff, penumbra, cos_angle);
        let falloff = 1.0 - distance / spot.range;
        light += Vec3::from_array(spot.color) * (facing * edge * falloff);
    }

    (Vec3::from_array(base) * light).to_array()
}

fn surface_color(scene: &Scene, scene_box: &SceneBox, hit: &Hit) -> [f32; 3] {
    match scene_box.decal.and_then(|i| scene.decals.get(i)) {
        Some(decal) if hit.normal == Vec3::Y => {
            let size = scene_box.bounds.size();
            let u = (hit.point.x - scene_box.bounds.min.x) / size.x.max(f32::EPSILON);
            let v = (hit.point.z - scene_box.bounds.min.z) / size.z.max(f32::EPSILON);
            decal.sample(u, v)
        }
        _ => scene_box.color,
    }
}

fn occluded(scene: &Scene, origin: Vec3, direction: Vec3, max_distance: f32) -> bool {
    scene.boxes.iter().any(|b| {
        let t = intersect_aabb(origin, direction, b.bounds.min, b.bounds.max);
        t > 0.0 && t < max_distance
    })
}

fn sky(zenith: [f32; 3], direction: Vec3) -> [f32; 3] {
    let zenith = Vec3::from_array(zenith);
    let horizon = zenith.lerp(Vec3::ONE, HORIZON_LIFT);
    horizon.lerp(zenith, direction.y.clamp(0.0, 1.0)).to_array()
}

fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    let t = ((x - edge0) / (edge1 - edge0).max(f32::EPSILON)).clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::AABB;
    use crate::scenes::{Decal, Lighting};

    fn scene_with(boxes: Vec<SceneBox>) -> Scene {
        Scene {
            name: "test".to_string(),
            sky: [0.2, 0.4, 0.8],
            boxes,
            entities: Vec::new(),
            decals: Vec::new(),
            lighting: Lighting {
                ambient: [0.5, 0.5, 0.5],
                sun_direction: Vec3::Y,
                sun_color: [0.5, 0.5, 0.5],
                sun_shadows: true,
                spotlights: Vec::new(),
            },
            spins: Vec::new(),
        }
    }

    fn slab(min: Vec3, max: Vec3, color: [f32; 3]) -> SceneBox {
        SceneBox {
            bounds: AABB::new(min, max),
            color,
            decal: None,
        }
    }

    #[test]
    fn trace_picks_nearest_box() {
        let scene = scene_with(vec![
            slab(Vec3::new(-1.0, -1.0, -10.0), Vec3::new(1.0, 1.0, -8.0), [1.0, 0.0, 0.0]),
            slab(Vec3::new(-1.0, -1.0, -5.0), Vec3::new(1.0, 1.0, -4.0), [0.0, 1.0, 0.0]),
        ]);
        let hit = trace(&scene, Vec3::ZERO, Vec3::NEG_Z).unwrap();
        assert_eq!(hit.box_index, 1);
        assert!((hit.distance - 4.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec3::Z);
    }

    #[test]
    fn miss_shows_sky() {
        let scene = scene_with(Vec::new());
        assert_eq!(shade(&scene, Vec3::ZERO, Vec3::Y), [0.2, 0.4, 0.8]);
    }

    #[test]
    fn sunlit_top_face_gets_ambient_plus_sun() {
        let scene = scene_with(vec![slab(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0), [1.0, 1.0, 1.0])]);
        let color = shade(&scene, Vec3::new(0.0, 5.0, 0.0), Vec3::NEG_Y);
        assert!((color[0] - 1.0).abs() < 1e-4);
    }

    #[test]
    fn shadowed_face_gets_only_ambient() {
        let scene = scene_with(vec![
            slab(Vec3::new(-5.0, -1.0, -5.0), Vec3::new(5.0, 0.0, 5.0), [1.0, 1.0, 1.0]),
            slab(Vec3::new(-1.0, 2.0, -1.0), Vec3::new(1.0, 3.0, 1.0), [1.0, 1.0, 1.0]),
        ]);
        // Looking at the ground under the floating box from the side
        let origin = Vec3::new(0.0, 1.0, 4.0);
        let target = Vec3::new(0.0, 0.0, 0.0);
        let color = shade(&scene, origin, (target - origin).normalize());
        assert!((color[0] - 0.5).abs() < 1e-4);
    }

    #[test]
    fn decal_is_sampled_on_top_face() {
        let mut scene = scene_with(vec![SceneBox {
            bounds: AABB::new(Vec3::new(-1.0, 0.0, -1.0), Vec3::new(1.0, 0.1, 1.0)),
            color: [0.0, 0.0, 0.0],
            decal: Some(0),
        }]);
        scene.decals.push(Decal::new(4, [1.0, 1.0, 1.0]));
        scene.lighting.sun_shadows = false;
        let color = shade(&scene, Vec3::new(0.0, 3.0, 0.0), Vec3::NEG_Y);
        assert!(color[0] > 0.9);
    }

    #[test]
    fn viewport_renders_every_pixel() {
        let scene = scene_with(vec![slab(Vec3::new(-50.0, -1.0, -50.0), Vec3::new(50.0, 0.0, 50.0), [0.5, 0.5, 0.5])]);
        let camera = Camera::new(Vec3::new(0.0, 2.0, 0.0), 0.0, -0.3);
        let mut viewport = Viewport::new(16, 9);
        let frame = viewport.render(&scene, &camera);
        assert_eq!(frame.len(), 16 * 9 * 4);

        // Top row is sky, bottom row is ground
        let top = viewport.pixel(8, 0).unwrap();
        let bottom = viewport.pixel(8, 8).unwrap();
        assert_ne!(top, bottom);
        assert_eq!(bottom, to_rgba8([0.5, 0.5, 0.5]));
        assert!(viewport.pixel(16, 0).is_none());
    }
}
