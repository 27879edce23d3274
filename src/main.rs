use glint::{
    pipelines::QuadPipeline,
    window::RenderData,
    Glint, GlintApp, GlintConfig, GlintContext,
};
use wgpu::CommandBuffer;
use winit::event_loop::ActiveEventLoop;

const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.2,
    g: 0.3,
    b: 0.3,
    a: 1.0,
};

fn main() {
    env_logger::init();
    // Default config: 800x600 window, quit on E. Fatal failures (no device,
    // no window) have already been logged by the runner.
    if let Err(_e) = Glint::run(GlintConfig::default(), |_| Box::new(HelloApp::default())) {
        std::process::exit(-1);
    }
}

/// The tutorial app: clear the screen each frame and draw a quad with the
/// fixed shader pair.
#[derive(Default)]
struct HelloApp {
    quad: Option<QuadPipeline>,
}

impl GlintApp for HelloApp {
    fn start(&mut self, _event_loop: &ActiveEventLoop, context: &mut GlintContext) {
        let format = context.render_window().surface_format();
        // A broken shader is not fatal: log the diagnostic and keep running
        // with clear-only rendering.
        self.quad = match QuadPipeline::new(context.device(), format) {
            Ok(quad) => Some(quad),
            Err(e) => {
                log::error!("{}", e);
                None
            }
        };
    }

    fn render(
        &mut self,
        _context: &mut GlintContext,
        render_data: RenderData,
    ) -> Option<Vec<CommandBuffer>> {
        let RenderData {
            encoder,
            frame,
            ..
        } = render_data;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: None,
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &view,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
        });
        if let Some(quad) = &self.quad {
            quad.draw(&mut rpass);
        }
        None
    }
}
