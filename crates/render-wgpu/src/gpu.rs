use crate::shaders;
use bytemuck::{Pod, Zeroable};
use parallax_common::TextureHandle;
use parallax_render::{DrawRequest, GpuBackend};
use std::collections::BTreeMap;
use wgpu::util::DeviceExt;

/// Errors raised while uploading textures.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("texture size must be non-zero, got {width}x{height}")]
    EmptyTexture { width: u32, height: u32 },
    #[error("texture data is {actual} bytes, expected {expected} for RGBA8")]
    DataLength { expected: usize, actual: usize },
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
struct QuadVertex {
    position: [f32; 2],
    uv: [f32; 2],
    alpha: f32,
    hover: f32,
}

/// Two triangles over the BL, BR, TL, TR strip order.
const QUAD_INDICES: [u16; 6] = [0, 1, 2, 2, 1, 3];

fn quad_vertices(request: &DrawRequest) -> [QuadVertex; 4] {
    request.quad.0.map(|v| QuadVertex {
        position: v.position.to_array(),
        uv: v.uv.to_array(),
        alpha: request.alpha,
        hover: request.hover_flag(),
    })
}

/// Validate an RGBA8 upload before it reaches the device.
fn check_rgba(width: u32, height: u32, rgba: &[u8]) -> Result<(), BackendError> {
    if width == 0 || height == 0 {
        return Err(BackendError::EmptyTexture { width, height });
    }
    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(BackendError::DataLength {
            expected,
            actual: rgba.len(),
        });
    }
    Ok(())
}

struct GpuTexture {
    bind_group: wgpu::BindGroup,
    size: (u32, u32),
}

/// wgpu implementation of [`GpuBackend`].
///
/// Draw requests are batched into a vertex list during the frame; `present`
/// uploads the batch and issues one indexed draw per quad, binding that
/// quad's texture. Blending is straight alpha over, no depth.
pub struct WgpuBackend {
    pipeline: wgpu::RenderPipeline,
    texture_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    index_buffer: wgpu::Buffer,
    vertex_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    textures: BTreeMap<TextureHandle, GpuTexture>,
    next_texture: u64,
    vertices: Vec<QuadVertex>,
    batches: Vec<TextureHandle>,
    clear_color: wgpu::Color,
    surface_format: wgpu::TextureFormat,
}

impl WgpuBackend {
    const INITIAL_QUADS: usize = 256;

    pub fn new(device: &wgpu::Device, surface_format: wgpu::TextureFormat) -> Self {
        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("quad_texture_layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("quad_pipeline_layout"),
            bind_group_layouts: &[&texture_layout],
            push_constant_ranges: &[],
        });

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("quad_shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::QUAD_SHADER.into()),
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("quad_pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_quad"),
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as u64,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &wgpu::vertex_attr_array![
                        0 => Float32x2,
                        1 => Float32x2,
                        2 => Float32,
                        3 => Float32,
                    ],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_quad"),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: Default::default(),
            multiview: None,
            cache: None,
        });

        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("quad_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad_index_buffer"),
            contents: bytemuck::cast_slice(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let vertex_capacity = Self::INITIAL_QUADS * 4;
        let vertex_buffer = Self::create_vertex_buffer(device, vertex_capacity);

        Self {
            pipeline,
            texture_layout,
            sampler,
            index_buffer,
            vertex_buffer,
            vertex_capacity,
            textures: BTreeMap::new(),
            next_texture: 1,
            vertices: Vec::new(),
            batches: Vec::new(),
            clear_color: wgpu::Color {
                r: 0.02,
                g: 0.02,
                b: 0.03,
                a: 1.0,
            },
            surface_format,
        }
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.surface_format
    }

    pub fn set_clear_color(&mut self, color: wgpu::Color) {
        self.clear_color = color;
    }

    /// Upload tightly packed RGBA8 pixels and return a handle for draw requests.
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) -> Result<TextureHandle, BackendError> {
        check_rgba(width, height, rgba)?;

        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("quad_texture"),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4 * width),
                rows_per_image: Some(height),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("quad_texture_bind_group"),
            layout: &self.texture_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        let handle = TextureHandle(self.next_texture);
        self.next_texture += 1;
        self.textures.insert(
            handle,
            GpuTexture {
                bind_group,
                size: (width, height),
            },
        );
        tracing::debug!(texture = handle.0, width, height, "texture uploaded");
        Ok(handle)
    }

    /// Pixel size of an uploaded texture.
    pub fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(&handle).map(|t| t.size)
    }

    /// Quads batched for the current frame.
    pub fn batched(&self) -> usize {
        self.batches.len()
    }

    /// Submit the batched frame into `view`, clearing it first.
    pub fn present(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        view: &wgpu::TextureView,
    ) {
        if self.vertices.len() > self.vertex_capacity {
            self.vertex_capacity = self.vertices.len().next_power_of_two();
            self.vertex_buffer = Self::create_vertex_buffer(device, self.vertex_capacity);
            tracing::debug!(capacity = self.vertex_capacity, "quad vertex buffer grown");
        }
        if !self.vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&self.vertices));
        }

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("scene_encoder"),
        });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_color),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.pipeline);
            pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
            for (quad, handle) in self.batches.iter().enumerate() {
                let Some(texture) = self.textures.get(handle) else {
                    continue;
                };
                pass.set_bind_group(0, &texture.bind_group, &[]);
                let base_vertex = (quad * 4) as i32;
                pass.draw_indexed(0..QUAD_INDICES.len() as u32, base_vertex, 0..1);
            }
        }

        queue.submit(std::iter::once(encoder.finish()));
    }

    fn create_vertex_buffer(device: &wgpu::Device, vertices: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("quad_vertex_buffer"),
            size: (vertices * std::mem::size_of::<QuadVertex>()) as u64,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }
}

impl GpuBackend for WgpuBackend {
    fn begin_frame(&mut self) {
        self.vertices.clear();
        self.batches.clear();
    }

    fn draw(&mut self, request: &DrawRequest) {
        if !self.textures.contains_key(&request.texture) {
            tracing::warn!(
                texture = request.texture.0,
                layer = ?request.layer,
                "draw names unknown texture, skipped"
            );
            return;
        }
        self.vertices.extend_from_slice(&quad_vertices(request));
        self.batches.push(request.texture);
    }
}
