use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use log::{debug, info, warn};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::accumulation::{FramePlan, Target};
use crate::config::Config;
use crate::overlay::Overlay;
use crate::screenshot::linear_to_srgb;
use crate::session::SessionStatus;
use crate::traits::{CapturedImage, RenderTargetPair};
use crate::types::TraceUniform;
use crate::uniforms::ShaderUniforms;

pub const WORKGROUP_SIZE: u32 = 8;

/// Accumulation targets keep full float precision so long averages don't band
const TARGET_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba32Float;
const TARGET_BYTES_PER_PIXEL: u32 = 16;

/// GPU side of the accumulation loop: two fixed-size float targets, a compute
/// pass that blends a new frame into one of them, and a display pass.
pub struct RayTracer {
    window: Arc<Window>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    surface_config: wgpu::SurfaceConfiguration,
    resolution: (u32, u32),
    targets: [wgpu::Texture; 2],
    trace_pipeline: wgpu::ComputePipeline,
    /// Indexed by the target being written
    trace_bind_groups: [wgpu::BindGroup; 2],
    uniform_buffer: wgpu::Buffer,
    display_pipeline: wgpu::RenderPipeline,
    /// Indexed by the target being shown
    display_bind_groups: [wgpu::BindGroup; 2],
    overlay: Option<Overlay>,
}

impl RayTracer {
    pub async fn new(window: Arc<Window>, config: &Config) -> Result<Self> {
        let size = window.inner_size();
        let resolution = (config.window.width, config.window.height);

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("Failed to create surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let adapter_info = adapter.get_info();
        info!("Using adapter {} ({:?})", adapter_info.name, adapter_info.backend);

        let (device, queue) = Self::request_device(&adapter).await?;

        let surface_config = Self::create_surface_config(&surface, &adapter, size)?;
        surface.configure(&device, &surface_config);

        let targets = [
            Self::create_target(&device, resolution, "Accumulation Target A"),
            Self::create_target(&device, resolution, "Accumulation Target B"),
        ];
        let views = [
            targets[0].create_view(&wgpu::TextureViewDescriptor::default()),
            targets[1].create_view(&wgpu::TextureViewDescriptor::default()),
        ];

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Trace Uniform Buffer"),
            contents: bytemuck::cast_slice(&[TraceUniform::default()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let (trace_pipeline, trace_bind_groups) =
            Self::create_trace_pipeline(&device, &uniform_buffer, &views);
        let (display_pipeline, display_bind_groups) =
            Self::create_display_pipeline(&device, &views, surface_config.format);

        let overlay = config
            .show_ui
            .then(|| Overlay::new(&window, &device, surface_config.format));

        info!(
            "Ray tracer initialized: {}x{} targets, {} samples per frame",
            resolution.0, resolution.1, config.render.samples
        );

        Ok(Self {
            window,
            device,
            queue,
            surface,
            surface_config,
            resolution,
            targets,
            trace_pipeline,
            trace_bind_groups,
            uniform_buffer,
            display_pipeline,
            display_bind_groups,
            overlay,
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("Failed to find appropriate adapter: {e}"))
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .context("Failed to create device")
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        size: winit::dpi::PhysicalSize<u32>,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("Surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn create_target(device: &wgpu::Device, resolution: (u32, u32), label: &str) -> wgpu::Texture {
        device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size: wgpu::Extent3d {
                width: resolution.0,
                height: resolution.1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TARGET_FORMAT,
            usage: wgpu::TextureUsages::STORAGE_BINDING
                | wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        })
    }

    fn create_trace_pipeline(
        device: &wgpu::Device,
        uniform_buffer: &wgpu::Buffer,
        views: &[wgpu::TextureView; 2],
    ) -> (wgpu::ComputePipeline, [wgpu::BindGroup; 2]) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Trace Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("trace.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: false },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::COMPUTE,
                    ty: wgpu::BindingType::StorageTexture {
                        access: wgpu::StorageTextureAccess::WriteOnly,
                        format: TARGET_FORMAT,
                        view_dimension: wgpu::TextureViewDimension::D2,
                    },
                    count: None,
                },
            ],
            label: Some("trace_bind_group_layout"),
        });

        // Writing target `write` always reads from the other one
        let bind_group_for = |write: Target| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&views[write.other().index()]),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&views[write.index()]),
                    },
                ],
                label: Some("trace_bind_group"),
            })
        };
        let bind_groups = [bind_group_for(Target::A), bind_group_for(Target::B)];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Trace Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("Trace Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        (pipeline, bind_groups)
    }

    fn create_display_pipeline(
        device: &wgpu::Device,
        views: &[wgpu::TextureView; 2],
        surface_format: wgpu::TextureFormat,
    ) -> (wgpu::RenderPipeline, [wgpu::BindGroup; 2]) {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Display Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("display.wgsl").into()),
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: false },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            }],
            label: Some("display_bind_group_layout"),
        });

        let bind_group_for = |view: &wgpu::TextureView| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                layout: &bind_group_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(view),
                }],
                label: Some("display_bind_group"),
            })
        };
        let bind_groups = [bind_group_for(&views[0]), bind_group_for(&views[1])];

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Display Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Display Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        (pipeline, bind_groups)
    }

    /// Reconfigure the swapchain; the accumulation targets keep their size
    pub fn resize(&mut self, new_size: winit::dpi::PhysicalSize<u32>) {
        if new_size.width == 0 || new_size.height == 0 {
            return;
        }
        self.surface_config.width = new_size.width;
        self.surface_config.height = new_size.height;
        self.surface.configure(&self.device, &self.surface_config);
        debug!("Surface resized to {}x{}", new_size.width, new_size.height);
    }

    /// Keep the overlay's view of the window current. The panel has no
    /// widgets, so events are never withheld from the camera.
    pub fn handle_event(&mut self, event: &winit::event::WindowEvent) {
        if let Some(overlay) = &mut self.overlay {
            overlay.handle_event(&self.window, event);
        }
    }

    fn acquire_frame(&mut self) -> Result<Option<wgpu::SurfaceTexture>> {
        match self.surface.get_current_texture() {
            Ok(frame) => Ok(Some(frame)),
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                let size = self.window.inner_size();
                self.resize(size);
                Ok(None)
            }
            Err(wgpu::SurfaceError::Timeout) => {
                warn!("Surface acquire timed out, skipping frame");
                Ok(None)
            }
            Err(e) => Err(anyhow!("Failed to acquire surface texture: {e}")),
        }
    }
}

impl RenderTargetPair for RayTracer {
    fn render(&mut self, plan: &FramePlan, uniforms: &ShaderUniforms) -> Result<()> {
        self.queue.write_buffer(
            &self.uniform_buffer,
            0,
            bytemuck::cast_slice(&[uniforms.to_gpu()]),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Trace Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("Trace Pass"),
                timestamp_writes: None,
            });
            compute_pass.set_pipeline(&self.trace_pipeline);
            compute_pass.set_bind_group(0, &self.trace_bind_groups[plan.write.index()], &[]);

            let workgroup_size_x = self.resolution.0.div_ceil(WORKGROUP_SIZE);
            let workgroup_size_y = self.resolution.1.div_ceil(WORKGROUP_SIZE);
            compute_pass.dispatch_workgroups(workgroup_size_x, workgroup_size_y, 1);
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn present(&mut self, target: Target, status: &SessionStatus) -> Result<()> {
        let Some(output) = self.acquire_frame()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Present Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Display Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_pipeline(&self.display_pipeline);
            render_pass.set_bind_group(0, &self.display_bind_groups[target.index()], &[]);
            render_pass.draw(0..3, 0..1);
        }

        if let Some(overlay) = &mut self.overlay {
            let size = [self.surface_config.width, self.surface_config.height];
            overlay.draw(
                &self.device,
                &self.queue,
                &mut encoder,
                &view,
                &self.window,
                size,
                status,
            );
        }

        self.queue.submit(std::iter::once(encoder.finish()));
        self.window.pre_present_notify();
        output.present();
        Ok(())
    }

    fn capture(&mut self, target: Target) -> Result<CapturedImage> {
        let (width, height) = self.resolution;
        let padded = padded_bytes_per_row(width);

        let readback = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Capture Readback Buffer"),
            size: padded as u64 * height as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Capture Encoder"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.targets[target.index()],
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &readback,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(height),
                },
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit(std::iter::once(encoder.finish()));

        let buffer_slice = readback.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            tx.send(result).ok();
        });

        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: None,
            })
            .context("Failed waiting for capture copy")?;
        rx.recv()
            .context("Capture map callback dropped")?
            .context("Failed to map capture buffer")?;

        let pixels = {
            let data = buffer_slice.get_mapped_range();
            unpack_float_rows(&data, width, height, padded)
        };
        readback.unmap();

        Ok(CapturedImage::new(width, height, pixels))
    }
}

/// Row pitch for a texture-to-buffer copy, rounded up to wgpu's alignment
pub fn padded_bytes_per_row(width: u32) -> u32 {
    let unpadded = width * TARGET_BYTES_PER_PIXEL;
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    unpadded.div_ceil(align) * align
}

/// Strip row padding and convert linear RGBA32F texels to opaque sRGB RGBA8
pub fn unpack_float_rows(data: &[u8], width: u32, height: u32, padded: u32) -> Vec<u8> {
    let row_bytes = (width * TARGET_BYTES_PER_PIXEL) as usize;
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);

    for row in data.chunks(padded as usize).take(height as usize) {
        for texel in row[..row_bytes.min(row.len())].chunks_exact(TARGET_BYTES_PER_PIXEL as usize) {
            for channel in texel.chunks_exact(4).take(3) {
                let value = f32::from_le_bytes([channel[0], channel[1], channel[2], channel[3]]);
                pixels.push(linear_to_srgb(value));
            }
            pixels.push(255);
        }
    }

    pixels
}
