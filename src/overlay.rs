use winit::window::Window;

use crate::accumulation::RenderMode;
use crate::session::SessionStatus;

/// Text lines shown in the status panel
pub fn status_lines(status: &SessionStatus) -> Vec<String> {
    let p = status.position;
    vec![
        format!("FPS: {:.0}", status.fps),
        format!("Accumulated frames: {}", status.frame_count),
        format!("Position: ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z),
        format!("Pause: {}", on_off(status.paused)),
        format!("Frame mode: {}", on_off(status.step_mode)),
    ]
}

fn on_off(flag: bool) -> &'static str {
    if flag {
        "on"
    } else {
        "off"
    }
}

fn mode_color(mode: RenderMode) -> egui::Color32 {
    match mode {
        RenderMode::Running => egui::Color32::from_rgb(100, 200, 100),
        RenderMode::Paused => egui::Color32::from_rgb(200, 150, 100),
        RenderMode::SteppingArmed => egui::Color32::from_rgb(74, 158, 255),
    }
}

/// egui status panel drawn over the presented frame
pub struct Overlay {
    ctx: egui::Context,
    state: egui_winit::State,
    renderer: egui_wgpu::Renderer,
}

impl Overlay {
    pub fn new(window: &Window, device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let ctx = egui::Context::default();
        let state = egui_winit::State::new(
            ctx.clone(),
            egui::ViewportId::ROOT,
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let renderer = egui_wgpu::Renderer::new(device, format, egui_wgpu::RendererOptions::default());

        Self { ctx, state, renderer }
    }

    pub fn handle_event(&mut self, window: &Window, event: &winit::event::WindowEvent) -> bool {
        self.state.on_window_event(window, event).consumed
    }

    /// Record the panel into `encoder`, loading over whatever `view` holds
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        window: &Window,
        size_in_pixels: [u32; 2],
        status: &SessionStatus,
    ) {
        let raw_input = self.state.take_egui_input(window);
        let lines = status_lines(status);
        let color = mode_color(status.mode);

        let full_output = self.ctx.run(raw_input, |ctx| {
            egui::Window::new("Status")
                .title_bar(false)
                .resizable(false)
                .fixed_pos(egui::pos2(10.0, 10.0))
                .show(ctx, |ui| {
                    for (i, line) in lines.iter().enumerate() {
                        let text = egui::RichText::new(line).size(14.0);
                        let text = if i == 0 { text.strong().color(color) } else { text };
                        ui.label(text);
                    }
                });
        });

        self.state
            .handle_platform_output(window, full_output.platform_output);

        let tris = self
            .ctx
            .tessellate(full_output.shapes, self.ctx.pixels_per_point());
        for (id, image_delta) in &full_output.textures_delta.set {
            self.renderer.update_texture(device, queue, *id, image_delta);
        }

        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels,
            pixels_per_point: window.scale_factor() as f32,
        };
        self.renderer
            .update_buffers(device, queue, encoder, &tris, &screen_descriptor);

        {
            let render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("egui Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            let mut render_pass = render_pass.forget_lifetime();
            self.renderer
                .render(&mut render_pass, &tris, &screen_descriptor);
        }

        for id in &full_output.textures_delta.free {
            self.renderer.free_texture(id);
        }
    }
}
