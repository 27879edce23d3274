use std::{fmt::Formatter, sync::Arc};

use wgpu::{
    Adapter, CreateSurfaceError, Device, Instance, Queue, RequestAdapterError, RequestDeviceError,
};
use winit::{
    application::ApplicationHandler,
    error::{EventLoopError, OsError},
    event::{ElementState, StartCause, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

use crate::{
    device_context::{DeviceConfig, DeviceContext},
    window::{GlintWindow, RenderData, WindowConfig},
    GlintApp,
};

/// [`Glint`] is an application runner that owns the winit/wgpu boilerplate of
/// a single-window app. Impl [`GlintApp`] for your application (of any type)
/// and you are good to go.
pub struct Glint {
    config: GlintConfig,
    app: Box<dyn GlintApp>,
    context: GlintContext,
    runner_state: RunnerState,
}

impl Glint {
    /// Runs the application until its window is closed or [`GlintContext::exit`]
    /// is requested. Returns an error for the fatal failures: no suitable
    /// graphics device, or no window.
    pub fn run(
        config: GlintConfig,
        app_create_fn: impl FnOnce(&mut GlintContext) -> Box<dyn GlintApp>,
    ) -> Result<(), GlintError> {
        let mut context = match GlintContext::new(&config.device_config) {
            Ok(c) => c,
            Err(e) => {
                log::error!("Failed to acquire graphics device: {}", e);
                return Err(e);
            }
        };
        let app = app_create_fn(&mut context);
        let mut glint = Glint {
            app,
            context,
            config,
            runner_state: RunnerState::default(),
        };
        let event_loop = match EventLoop::new() {
            Ok(e) => e,
            Err(e) => return Err(GlintError::EventLoopError(e)),
        };
        event_loop
            .run_app(&mut glint)
            .map_err(GlintError::EventLoopError)?;
        match glint.runner_state.fatal.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}

impl ApplicationHandler for Glint {
    fn new_events(&mut self, event_loop: &ActiveEventLoop, _cause: StartCause) {
        // Ensure we're poll
        if event_loop.control_flow() != ControlFlow::Poll {
            event_loop.set_control_flow(ControlFlow::Poll);
        }
    }

    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Glint {
            app,
            config,
            context,
            runner_state,
            ..
        } = self;
        if runner_state.is_init {
            return;
        }
        let window_attributes = Window::default_attributes()
            .with_inner_size(winit::dpi::PhysicalSize::new(
                config.window_config.width,
                config.window_config.height,
            ))
            .with_title(config.window_config.title.clone());
        let window = match event_loop.create_window(window_attributes) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                runner_state.fatal = Some(GlintError::WindowError(e));
                event_loop.exit();
                return;
            }
        };
        if let Err(e) = context.attach_window(&config.window_config, window) {
            log::error!("Failed to create window surface: {}", e);
            runner_state.fatal = Some(e);
            event_loop.exit();
            return;
        }
        app.start(event_loop, context);
        runner_state.is_init = true;
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let Glint {
            app,
            context,
            ..
        } = self;
        app.window_input(context, event_loop, &event);

        let mut is_extra_update = false;

        match event {
            WindowEvent::Resized(physical_size) => {
                // On windows, minimized app can have 0,0 size
                if physical_size.width > 0 && physical_size.height > 0 {
                    if context.reconfigure_surface(physical_size) {
                        // Deliver the resize to the app synchronously
                        app.resize(context, physical_size);
                        is_extra_update = true;
                    }
                }
            }
            WindowEvent::ScaleFactorChanged {
                ..
            } => {
                let size = context.window.as_ref().map(|w| w.window().inner_size());
                if let Some(size) = size {
                    if context.reconfigure_surface(size) {
                        app.resize(context, size);
                        is_extra_update = true;
                    }
                }
            }
            WindowEvent::KeyboardInput {
                event,
                is_synthetic,
                ..
            } => {
                let quit_key = context.window.as_ref().and_then(|w| w.quit_key());
                if !is_synthetic && quit_requested(quit_key, event.physical_key, event.state) {
                    context.exit();
                }
            }
            WindowEvent::CloseRequested => {
                context.exit();
            }
            _ => (),
        }
        // Update immediately, because about_to_wait isn't triggered during
        // resize. This ensures resizing's effect is instant.
        if is_extra_update {
            run_update(event_loop, app, context);
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let Glint {
            app,
            context,
            ..
        } = self;
        run_update(event_loop, app, context);
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        let Glint {
            app,
            context,
            ..
        } = self;
        app.end(context);
    }
}

/// True when the pressed physical key matches the configured quit key.
fn quit_requested(quit_key: Option<KeyCode>, key: PhysicalKey, state: ElementState) -> bool {
    match quit_key {
        Some(code) => key == PhysicalKey::Code(code) && state == ElementState::Pressed,
        None => false,
    }
}

fn run_update(event_loop: &ActiveEventLoop, app: &mut Box<dyn GlintApp>, context: &mut GlintContext) {
    // Exit is checked at the top so no rendering work happens after close has
    // been requested.
    if context.exit {
        context.window = None;
        event_loop.exit();
        return;
    }
    app.update(context);

    render(app, context);
}

fn render(app: &mut Box<dyn GlintApp>, context: &mut GlintContext) {
    // The window leaves the context for the duration of the frame so the app
    // can borrow both it and the context.
    let Some(window) = context.window.take() else {
        return;
    };
    match window.surface().get_current_texture() {
        Ok(frame) => {
            let mut encoder =
                context
                    .device()
                    .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                        label: Some("Render Commands"),
                    });

            // Run render
            let mut buffers = app
                .render(context, RenderData {
                    encoder: &mut encoder,
                    window: &window,
                    frame: &frame,
                })
                .unwrap_or_default();
            buffers.push(encoder.finish());
            context.queue().submit(buffers);

            frame.present();
        }
        Err(error) => {
            if error == wgpu::SurfaceError::OutOfMemory {
                panic!("Swapchain error: {error}. Rendering cannot continue.")
            }
        }
    }
    window.window().request_redraw();
    context.window = Some(window);
}

#[derive(Default)]
struct RunnerState {
    is_init: bool,
    fatal: Option<GlintError>,
}

/// Configuration of your window and device.
#[derive(Debug, Clone, Default)]
pub struct GlintConfig {
    pub device_config: DeviceConfig,
    pub window_config: WindowConfig,
}

impl GlintConfig {
    pub fn performance(width: u32, height: u32) -> Self {
        Self {
            device_config: DeviceConfig::performance(),
            window_config: WindowConfig {
                width,
                height,
                ..WindowConfig::default()
            },
        }
    }
}

#[derive(Debug)]
pub enum GlintError {
    WindowError(OsError),
    SurfaceError(CreateSurfaceError),
    AdapterError(RequestAdapterError),
    DeviceError(RequestDeviceError),
    EventLoopError(EventLoopError),
}

impl std::fmt::Display for GlintError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            GlintError::WindowError(e) => format!("WindowError: {}", e),
            GlintError::SurfaceError(e) => format!("SurfaceError: {}", e),
            GlintError::AdapterError(e) => format!("AdapterError: {}", e),
            GlintError::DeviceError(e) => format!("DeviceError: {}", e),
            GlintError::EventLoopError(e) => format!("EventLoopError: {}", e),
        };
        write!(f, "{}", s)
    }
}

/// The runtime context accessible through [`GlintApp`]. Holds the graphics
/// device and the render window.
pub struct GlintContext {
    device_context: DeviceContext,
    window: Option<GlintWindow>,
    exit: bool,
}

impl GlintContext {
    pub fn new(device_config: &DeviceConfig) -> Result<Self, GlintError> {
        let device_context = DeviceContext::new(device_config)?;
        Ok(Self {
            device_context,
            window: None,
            exit: false,
        })
    }

    pub(crate) fn attach_window(
        &mut self,
        config: &WindowConfig,
        window: Arc<Window>,
    ) -> Result<(), GlintError> {
        let render_window = match GlintWindow::new(&self.device_context, config, window) {
            Ok(w) => w,
            Err(e) => return Err(GlintError::SurfaceError(e)),
        };
        // Recreate adapter and device against the surface so queue families
        // are correct.
        self.device_context
            .reconfigure_with_surface(render_window.surface())?;
        let size = render_window.window().inner_size();
        self.window = Some(render_window);
        let device = self.device_context.device_arc();
        if let Some(w) = self.window.as_mut() {
            w.configure_surface_with_size(&device, size);
        }
        Ok(())
    }

    /// Configures the window surface to exactly the given size. Returns false
    /// when no window exists yet.
    pub(crate) fn reconfigure_surface(&mut self, size: winit::dpi::PhysicalSize<u32>) -> bool {
        let device = self.device_context.device_arc();
        match self.window.as_mut() {
            Some(window) => {
                window.configure_surface_with_size(&device, size);
                true
            }
            None => false,
        }
    }

    pub fn render_window(&self) -> &GlintWindow {
        self.window.as_ref().unwrap()
    }

    pub fn render_window_maybe(&self) -> Option<&GlintWindow> {
        self.window.as_ref()
    }

    #[allow(unused)]
    pub fn instance(&self) -> &Instance {
        self.device_context.instance()
    }

    pub fn adapter(&self) -> &Adapter {
        self.device_context.adapter()
    }

    pub fn device(&self) -> &Device {
        self.device_context.device()
    }

    pub fn device_arc(&self) -> Arc<Device> {
        self.device_context.device_arc()
    }

    pub fn queue(&self) -> &Queue {
        self.device_context.queue()
    }

    pub fn queue_arc(&self) -> Arc<Queue> {
        self.device_context.queue_arc()
    }

    /// Request the render loop to exit. Checked at the top of each iteration,
    /// so no further frame is rendered once this is set.
    pub fn exit(&mut self) {
        self.exit = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_key_press_requests_close() {
        assert!(quit_requested(
            Some(KeyCode::KeyE),
            PhysicalKey::Code(KeyCode::KeyE),
            ElementState::Pressed,
        ));
    }

    #[test]
    fn quit_key_release_or_other_key_is_ignored() {
        assert!(!quit_requested(
            Some(KeyCode::KeyE),
            PhysicalKey::Code(KeyCode::KeyE),
            ElementState::Released,
        ));
        assert!(!quit_requested(
            Some(KeyCode::KeyE),
            PhysicalKey::Code(KeyCode::Escape),
            ElementState::Pressed,
        ));
        assert!(!quit_requested(
            None,
            PhysicalKey::Code(KeyCode::KeyE),
            ElementState::Pressed,
        ));
    }
}
