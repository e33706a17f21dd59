use parallax_common::{SpriteId, TextureHandle};
use parallax_view::NdcQuad;

/// Which layer a draw belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Background,
    Sprite(SpriteId),
    /// Index into the live particle set for this frame.
    Particle(usize),
}

/// One textured quad plus its per-quad uniform values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRequest {
    pub layer: Layer,
    pub texture: TextureHandle,
    pub quad: NdcQuad,
    pub alpha: f32,
    pub hover: bool,
    /// Camera offset in world units at the time of the frame.
    pub offset: f32,
}

impl DrawRequest {
    /// Hover as the `0.0`/`1.0` scalar shaders consume.
    pub fn hover_flag(&self) -> f32 {
        if self.hover { 1.0 } else { 0.0 }
    }
}

/// Backend-agnostic draw interface. Graphics backends implement this trait.
///
/// The backend owns shader programs and textures; the compositor only hands
/// it quads in NDC, texture handles and uniform scalars.
pub trait GpuBackend {
    /// Start a frame (clear targets, reset batches).
    fn begin_frame(&mut self) {}

    /// Draw one quad.
    fn draw(&mut self, request: &DrawRequest);

    /// Finish a frame.
    fn end_frame(&mut self) {}
}

/// Debug text backend: a stand-in for the GPU backend.
///
/// Records the draw requests of the most recent frame and renders them as a
/// human-readable listing. Useful for CLI output, logging, and tests.
#[derive(Debug, Default)]
pub struct DebugTextBackend {
    frames: u64,
    requests: Vec<DrawRequest>,
}

impl DebugTextBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames begun so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Draws recorded for the current (or last) frame, in submission order.
    pub fn requests(&self) -> &[DrawRequest] {
        &self.requests
    }

    pub fn output(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "=== Frame {} ({} draws) ===\n",
            self.frames,
            self.requests.len()
        ));
        for request in &self.requests {
            let layer = match request.layer {
                Layer::Background => "background".to_string(),
                Layer::Sprite(id) => id.to_string(),
                Layer::Particle(i) => format!("particle#{i}"),
            };
            let tl = request.quad.top_left();
            let br = request.quad.bottom_right();
            out.push_str(&format!(
                "  {layer:<12} tex={} ndc=({:.3}, {:.3})..({:.3}, {:.3}) alpha={:.2} hover={} offset={:.1}\n",
                request.texture.0,
                tl.x,
                tl.y,
                br.x,
                br.y,
                request.alpha,
                request.hover_flag(),
                request.offset
            ));
        }
        out
    }
}

impl GpuBackend for DebugTextBackend {
    fn begin_frame(&mut self) {
        self.frames += 1;
        self.requests.clear();
    }

    fn draw(&mut self, request: &DrawRequest) {
        self.requests.push(*request);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use parallax_view::NdcVertex;

    fn quad() -> NdcQuad {
        let v = |x: f32, y: f32| NdcVertex {
            position: Vec2::new(x, y),
            uv: Vec2::ZERO,
        };
        NdcQuad([v(-1.0, -1.0), v(1.0, -1.0), v(-1.0, 1.0), v(1.0, 1.0)])
    }

    fn request(layer: Layer, hover: bool) -> DrawRequest {
        DrawRequest {
            layer,
            texture: TextureHandle(3),
            quad: quad(),
            alpha: 0.5,
            hover,
            offset: 12.0,
        }
    }

    #[test]
    fn debug_backend_empty_frame() {
        let mut backend = DebugTextBackend::new();
        backend.begin_frame();
        backend.end_frame();
        let output = backend.output();
        assert!(output.contains("Frame 1"));
        assert!(output.contains("0 draws"));
    }

    #[test]
    fn debug_backend_lists_draws() {
        let mut backend = DebugTextBackend::new();
        backend.begin_frame();
        backend.draw(&request(Layer::Background, false));
        backend.draw(&request(Layer::Sprite(SpriteId(2)), true));
        backend.end_frame();

        let output = backend.output();
        assert!(output.contains("2 draws"));
        assert!(output.contains("background"));
        assert!(output.contains("sprite#2"));
        assert!(output.contains("hover=1"));
        assert!(output.contains("ndc=(-1.000, 1.000)..(1.000, -1.000)"));
    }

    #[test]
    fn begin_frame_resets_requests() {
        let mut backend = DebugTextBackend::new();
        backend.begin_frame();
        backend.draw(&request(Layer::Particle(0), false));
        backend.begin_frame();
        assert!(backend.requests().is_empty());
        assert_eq!(backend.frames(), 2);
    }

    #[test]
    fn hover_flag_scalar() {
        assert_eq!(request(Layer::Background, true).hover_flag(), 1.0);
        assert_eq!(request(Layer::Background, false).hover_flag(), 0.0);
    }
}
