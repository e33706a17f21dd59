mod textures;

use anyhow::{Context, Result};
use clap::Parser;
use egui::Context as EguiContext;
use parallax_common::{Rect, SpriteId, WorldSize};
use parallax_input::{ChannelHandler, InputSink, InteractionEvent};
use parallax_render::{Scene, SceneConfig};
use parallax_render_wgpu::WgpuBackend;
use parallax_tools::SceneInspector;
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver};
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

const WORLD: (f32, f32) = (1920.0, 1080.0);
const EVENT_LOG_LEN: usize = 12;

#[derive(Parser)]
#[command(name = "parallax-desktop", about = "Parallax scene desktop viewer")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Scene config (.yaml, .yml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Application state.
struct AppState {
    scene: Scene,
    sprites: Vec<(SpriteId, [f32; 3])>,
    interactions: Receiver<InteractionEvent>,
    event_log: VecDeque<InteractionEvent>,
    show_inspector: bool,
    last_frame: Instant,
    // Fixed timestep
    tick_accumulator: f64,
    tick_rate: f64,
}

impl AppState {
    fn new(config: SceneConfig) -> Result<Self> {
        let mut scene = Scene::new(config)?;
        // Textures arrive once the GPU is up.
        scene.set_background(WorldSize::new(WORLD.0, WORLD.1)?, None);

        let (tx, interactions) = mpsc::channel();
        let panels = [
            (Rect::new(360.0, 420.0, 280.0, 360.0), [0.80, 0.35, 0.30]),
            (Rect::new(820.0, 380.0, 280.0, 420.0), [0.30, 0.55, 0.80]),
            (Rect::new(1020.0, 460.0, 280.0, 360.0), [0.40, 0.75, 0.45]),
        ];
        let mut sprites = Vec::with_capacity(panels.len());
        for (rect, tint) in panels {
            let id = scene.add_sprite(rect, None, ChannelHandler::new(tx.clone()))?;
            sprites.push((id, tint));
        }

        Ok(Self {
            scene,
            sprites,
            interactions,
            event_log: VecDeque::with_capacity(EVENT_LOG_LEN),
            show_inspector: true,
            last_frame: Instant::now(),
            tick_accumulator: 0.0,
            tick_rate: 1.0 / 60.0,
        })
    }

    /// Upload procedural textures and attach them to the scene.
    fn upload_textures(
        &mut self,
        backend: &mut WgpuBackend,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Result<()> {
        let backdrop = textures::backdrop(960, 540);
        let handle = backend.create_texture(
            device,
            queue,
            backdrop.width,
            backdrop.height,
            &backdrop.rgba,
        )?;
        self.scene.set_background_texture(handle)?;

        for &(id, tint) in &self.sprites {
            let panel = textures::panel(64, tint);
            let handle =
                backend.create_texture(device, queue, panel.width, panel.height, &panel.rgba)?;
            self.scene.set_sprite_texture(id, handle)?;
        }

        let puff = textures::smoke_puff(64);
        let handle = backend.create_texture(device, queue, puff.width, puff.height, &puff.rgba)?;
        self.scene.set_particle_texture(handle);
        self.scene.ensure_textures()?;
        Ok(())
    }

    fn update(&mut self, dt: f32) {
        self.tick_accumulator += dt as f64;
        while self.tick_accumulator >= self.tick_rate {
            self.tick_accumulator -= self.tick_rate;
            self.scene.tick();
        }

        for event in self.interactions.try_iter() {
            match event {
                InteractionEvent::Click(id) => tracing::info!(sprite = %id, "sprite clicked"),
                other => tracing::debug!(?other, "interaction"),
            }
            if self.event_log.len() == EVENT_LOG_LEN {
                self.event_log.pop_front();
            }
            self.event_log.push_back(event);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        if key == KeyCode::F1 {
            self.show_inspector = !self.show_inspector;
        }
    }

    fn draw_ui(&mut self, ctx: &EguiContext) {
        if !self.show_inspector {
            return;
        }

        let summary = SceneInspector::summary(&self.scene);

        egui::SidePanel::left("inspector")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Parallax Scene");
                ui.separator();
                ui.label(format!("Ticks: {}", summary.ticks));
                ui.label(format!(
                    "Viewport: {:.0} x {:.0}",
                    summary.viewport[0], summary.viewport[1]
                ));
                if let (Some(scale), Some(view)) = (summary.scale, summary.view_world) {
                    ui.label(format!("Scale: {scale:.4}"));
                    ui.label(format!("View world: {:.0} x {:.0}", view[0], view[1]));
                }
                ui.label(format!(
                    "Camera: {:.1} -> {:.1} (max {:.1})",
                    summary.offset, summary.target, summary.max_scroll
                ));
                ui.label(format!("Particles: {}", summary.particle_count));
                ui.separator();

                ui.heading("Sprites");
                for sprite in SceneInspector::list_sprites(&self.scene) {
                    let label = format!(
                        "{} at ({:.0}, {:.0})",
                        sprite.id, sprite.rect.x, sprite.rect.y
                    );
                    ui.selectable_label(sprite.hovered, label);
                }

                ui.separator();
                ui.heading("Interactions");
                for event in self.event_log.iter().rev() {
                    let text = match event {
                        InteractionEvent::Enter(id) => format!("enter {id}"),
                        InteractionEvent::Leave(id) => format!("leave {id}"),
                        InteractionEvent::Click(id) => format!("click {id}"),
                    };
                    ui.monospace(text);
                }

                ui.separator();
                ui.small("F1: Toggle Inspector | Move: Pan | LMB: Click");
            });
    }
}

struct Gpu {
    window: Arc<Window>,
    surface: wgpu::Surface<'static>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    backend: WgpuBackend,
    egui_winit: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
}

struct GpuApp {
    state: AppState,
    gpu: Option<Gpu>,
    egui_ctx: EguiContext,
    init_error: Option<anyhow::Error>,
}

impl GpuApp {
    fn new(state: AppState) -> Self {
        Self {
            state,
            gpu: None,
            egui_ctx: EguiContext::default(),
            init_error: None,
        }
    }

    fn init_gpu(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attrs = Window::default_attributes()
            .with_title("Parallax Scene")
            .with_inner_size(PhysicalSize::new(1280u32, 720));
        let window = Arc::new(event_loop.create_window(attrs).context("creating window")?);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window.clone())
            .context("creating surface")?;

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: Some(&surface),
            force_fallback_adapter: false,
        }))
        .context("no compatible graphics adapter")?;

        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("parallax_device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
            },
            None,
        ))
        .context("creating device")?;

        let size = window.inner_size();
        let surface_caps = surface.get_capabilities(&adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first())
            .copied()
            .context("surface reports no formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::AutoVsync,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);

        let mut backend = WgpuBackend::new(&device, surface_format);
        self.state.upload_textures(&mut backend, &device, &queue)?;

        let logical = size.to_logical::<f32>(window.scale_factor());
        self.state
            .scene
            .on_resize(logical.width, logical.height, window.scale_factor() as f32)?;

        let egui_winit = egui_winit::State::new(
            self.egui_ctx.clone(),
            egui::ViewportId::ROOT,
            &window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(&device, surface_format, None, 1, false);

        tracing::info!(
            "GPU initialized with {} backend",
            adapter.get_info().backend.to_str()
        );

        self.gpu = Some(Gpu {
            window,
            surface,
            device,
            queue,
            config,
            backend,
            egui_winit,
            egui_renderer,
        });
        Ok(())
    }

    fn redraw(&mut self) {
        let now = Instant::now();
        let dt = (now - self.state.last_frame).as_secs_f32().min(0.1);
        self.state.last_frame = now;
        self.state.update(dt);

        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let output = match gpu.surface.get_current_texture() {
            Ok(t) => t,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                gpu.surface.configure(&gpu.device, &gpu.config);
                return;
            }
            Err(e) => {
                tracing::error!("surface error: {e}");
                return;
            }
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let stats = self.state.scene.render(&mut gpu.backend);
        if stats.skipped_missing_texture > 0 {
            tracing::trace!(
                skipped = stats.skipped_missing_texture,
                "drawables without texture"
            );
        }
        gpu.backend.present(&gpu.device, &gpu.queue, &view);

        let raw_input = gpu.egui_winit.take_egui_input(&gpu.window);
        let state = &mut self.state;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            state.draw_ui(ctx);
        });
        gpu.egui_winit
            .handle_platform_output(&gpu.window, full_output.platform_output);

        let paint_jobs = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [gpu.config.width, gpu.config.height],
            pixels_per_point: full_output.pixels_per_point,
        };

        for (id, image_delta) in &full_output.textures_delta.set {
            gpu.egui_renderer
                .update_texture(&gpu.device, &gpu.queue, *id, image_delta);
        }
        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("egui_encoder"),
            });
        gpu.egui_renderer.update_buffers(
            &gpu.device,
            &gpu.queue,
            &mut encoder,
            &paint_jobs,
            &screen_descriptor,
        );
        {
            let mut pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui_pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();
            gpu.egui_renderer
                .render(&mut pass, &paint_jobs, &screen_descriptor);
        }
        gpu.queue.submit(std::iter::once(encoder.finish()));
        for id in &full_output.textures_delta.free {
            gpu.egui_renderer.free_texture(id);
        }

        output.present();
        gpu.window.request_redraw();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.gpu.is_some() {
            return;
        }
        if let Err(err) = self.init_gpu(event_loop) {
            tracing::error!("graphics initialization failed: {err:#}");
            self.init_error = Some(err);
            event_loop.exit();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        if let Some(gpu) = &mut self.gpu {
            let response = gpu.egui_winit.on_window_event(&gpu.window, &event);
            if response.consumed {
                return;
            }
        }

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                let Some(gpu) = &mut self.gpu else {
                    return;
                };
                gpu.config.width = new_size.width.max(1);
                gpu.config.height = new_size.height.max(1);
                gpu.surface.configure(&gpu.device, &gpu.config);

                let scale_factor = gpu.window.scale_factor();
                let logical = new_size.to_logical::<f32>(scale_factor);
                if let Err(err) =
                    self.state
                        .scene
                        .on_resize(logical.width, logical.height, scale_factor as f32)
                {
                    tracing::warn!(%err, "resize rejected");
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(gpu) = &self.gpu else {
                    return;
                };
                let size = gpu.window.inner_size();
                let x = (position.x as f32 / size.width.max(1) as f32).clamp(0.0, 1.0);
                let y = (position.y as f32 / size.height.max(1) as f32).clamp(0.0, 1.0);
                if let Err(err) = self.state.scene.on_pointer_move(x, y) {
                    tracing::warn!(%err, "pointer move rejected");
                }
            }
            WindowEvent::CursorLeft { .. } => {
                self.state.scene.on_pointer_leave();
            }
            WindowEvent::MouseInput {
                button: MouseButton::Left,
                state: ElementState::Pressed,
                ..
            } => {
                self.state.scene.on_click();
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: ElementState::Pressed,
                        ..
                    },
                ..
            } => {
                self.state.handle_key(key);
            }
            WindowEvent::RedrawRequested => {
                self.redraw();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(gpu) = &self.gpu {
            gpu.window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("parallax-desktop starting");

    let config = match &cli.config {
        Some(path) => SceneConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SceneConfig::default(),
    };

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(AppState::new(config)?);
    event_loop.run_app(&mut app)?;

    match app.init_error.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
