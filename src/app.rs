use wgpu::CommandBuffer;
use winit::{dpi::PhysicalSize, event::WindowEvent, event_loop::ActiveEventLoop};

use crate::{window::RenderData, GlintContext};

/// A trait to define all stages of your Glint app. Each function here is run
/// at a specific stage within the winit event loop. When you impl this for
/// your app, think of this as the table of contents of your app flow.
pub trait GlintApp {
    /// Run once after the window and graphics device exist
    fn start(&mut self, _event_loop: &ActiveEventLoop, _context: &mut GlintContext) {}
    /// Run on each window event from winit
    fn window_input(
        &mut self,
        _context: &mut GlintContext,
        _event_loop: &ActiveEventLoop,
        _event: &WindowEvent,
    ) {
    }
    /// Run synchronously whenever the window surface has been resized. The
    /// surface is already configured to the new size when this is called.
    fn resize(&mut self, _context: &mut GlintContext, _new_size: PhysicalSize<u32>) {}
    /// Run each frame before render, called within winit's `about_to_wait`
    fn update(&mut self, _context: &mut GlintContext) {}
    /// Run each frame with the acquired surface frame. Commands returned here
    /// are submitted before the encoder's own, in order.
    fn render(
        &mut self,
        _context: &mut GlintContext,
        _render_data: RenderData,
    ) -> Option<Vec<CommandBuffer>> {
        None
    }
    /// Run at exit
    fn end(&mut self, _context: &mut GlintContext) {}
}
