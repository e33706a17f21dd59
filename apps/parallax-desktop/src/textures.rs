//! Procedural RGBA8 images for the demo scene.

use glam::{Vec2, Vec3};

/// Tightly packed RGBA8 pixels.
pub struct Image {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl Image {
    fn from_fn(width: u32, height: u32, mut pixel: impl FnMut(Vec2) -> [f32; 4]) -> Self {
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for y in 0..height {
            for x in 0..width {
                let uv = Vec2::new(
                    (x as f32 + 0.5) / width as f32,
                    (y as f32 + 0.5) / height as f32,
                );
                rgba.extend(pixel(uv).map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8));
            }
        }
        Self {
            width,
            height,
            rgba,
        }
    }
}

/// Dusk sky over two ridge lines, wide enough to pan across.
pub fn backdrop(width: u32, height: u32) -> Image {
    let sky_top = Vec3::new(0.08, 0.09, 0.22);
    let sky_low = Vec3::new(0.85, 0.45, 0.30);
    let far = Vec3::new(0.22, 0.16, 0.28);
    let near = Vec3::new(0.07, 0.06, 0.10);
    Image::from_fn(width, height, |uv| {
        let far_ridge = 0.62 + 0.05 * (uv.x * 9.0).sin() + 0.03 * (uv.x * 23.0).cos();
        let near_ridge = 0.78 + 0.04 * (uv.x * 5.0 + 1.3).sin();
        let color = if uv.y > near_ridge {
            near
        } else if uv.y > far_ridge {
            far
        } else {
            sky_top.lerp(sky_low, (uv.y / far_ridge).powf(1.6))
        };
        [color.x, color.y, color.z, 1.0]
    })
}

/// Rounded panel with a lighter border.
pub fn panel(size: u32, tint: [f32; 3]) -> Image {
    let tint = Vec3::from(tint);
    Image::from_fn(size, size, |uv| {
        let edge = (uv - Vec2::splat(0.5)).abs().max_element();
        let border = if edge > 0.44 { 1.35 } else { 1.0 };
        let shade = 0.85 + 0.15 * (1.0 - uv.y);
        let color = (tint * shade * border).min(Vec3::ONE);
        [color.x, color.y, color.z, 0.92]
    })
}

/// Soft radial puff; alpha falls to zero at the rim.
pub fn smoke_puff(size: u32) -> Image {
    Image::from_fn(size, size, |uv| {
        let d = (uv - Vec2::splat(0.5)).length() * 2.0;
        let alpha = (1.0 - d).max(0.0).powf(1.8) * 0.55;
        [0.82, 0.82, 0.86, alpha]
    })
}
