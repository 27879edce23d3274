use std::sync::Arc;

use wgpu::{
    CommandEncoder, CompositeAlphaMode, CreateSurfaceError, Device, PresentMode, Surface,
    SurfaceConfiguration, SurfaceTexture, TextureFormat,
};
use winit::{dpi::PhysicalSize, keyboard::KeyCode, window::Window};

use crate::device_context::DeviceContext;

#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub title: String,
    /// Window width in physical pixels
    pub width: u32,
    /// Window height in physical pixels
    pub height: u32,
    pub present_mode: PresentMode,
    pub alpha_mode: CompositeAlphaMode,
    pub surface_format: TextureFormat,
    pub desired_maximum_frame_latency: u32,
    /// Physical key that requests window close when pressed. `None` disables
    /// keyboard exit entirely.
    pub quit_key: Option<KeyCode>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Hello Window".to_string(),
            width: 800,
            height: 600,
            present_mode: PresentMode::AutoVsync,
            alpha_mode: CompositeAlphaMode::Auto,
            surface_format: GlintWindow::default_surface_format(),
            desired_maximum_frame_latency: 2,
            quit_key: Some(KeyCode::KeyE),
        }
    }
}

/// The application's single render window: the winit [`Window`] plus the wgpu
/// [`Surface`] presented into it.
pub struct GlintWindow {
    window: Arc<Window>,
    surface: Surface<'static>,
    present_mode: PresentMode,
    alpha_mode: CompositeAlphaMode,
    surface_format: TextureFormat,
    desired_maximum_frame_latency: u32,
    quit_key: Option<KeyCode>,
    last_surface_size: [u32; 2],
    allowed_formats: Vec<TextureFormat>,
}

impl GlintWindow {
    /// Creates a new [`GlintWindow`] that owns the winit [`Window`](winit::window::Window).
    pub fn new(
        context: &DeviceContext,
        config: &WindowConfig,
        window: Arc<Window>,
    ) -> Result<GlintWindow, CreateSurfaceError> {
        let size = [window.inner_size().width, window.inner_size().height];
        let surface = context.instance().create_surface(window.clone())?;
        let formats = surface.get_capabilities(context.adapter()).formats;
        if !formats.contains(&config.surface_format) {
            panic!(
                "{:?} not allowed. Allowed formats: {:?}",
                config.surface_format, formats
            );
        }
        Ok(GlintWindow {
            window,
            surface,
            present_mode: config.present_mode,
            alpha_mode: config.alpha_mode,
            surface_format: config.surface_format,
            desired_maximum_frame_latency: config.desired_maximum_frame_latency,
            quit_key: config.quit_key,
            last_surface_size: size,
            allowed_formats: formats,
        })
    }

    /// Configure the surface after a resize event. The surface always ends up
    /// at exactly the given size.
    pub(crate) fn configure_surface_with_size(&mut self, device: &Device, size: PhysicalSize<u32>) {
        let config = surface_configuration(
            self.surface_format,
            size,
            self.present_mode,
            self.alpha_mode,
            self.desired_maximum_frame_latency,
        );
        self.surface.configure(device, &config);
        self.last_surface_size = [config.width, config.height];
    }

    /// Return allowed texture formats for this window [`Surface`](wgpu::Surface)
    pub fn allowed_formats(&self) -> &Vec<TextureFormat> {
        &self.allowed_formats
    }

    /// Return [`Surface`](wgpu::Surface) belonging to the window
    pub fn surface(&self) -> &Surface<'_> {
        &self.surface
    }

    /// Return [`Window`](winit::window::Window)
    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn surface_format(&self) -> TextureFormat {
        self.surface_format
    }

    pub fn surface_size(&self) -> [u32; 2] {
        self.last_surface_size
    }

    pub(crate) fn quit_key(&self) -> Option<KeyCode> {
        self.quit_key
    }

    /// Return default [`TextureFormat`](wgpu::TextureFormat)s
    pub fn default_surface_format() -> TextureFormat {
        #[cfg(target_os = "linux")]
        {
            let is_wayland = std::env::var("XDG_SESSION_TYPE")
                .map(|s| s == "wayland")
                .unwrap_or_else(|_| {
                    std::env::var("WAYLAND_DISPLAY")
                        .map(|s| !s.is_empty())
                        .unwrap_or(false)
                });

            if is_wayland {
                return TextureFormat::Bgra8Unorm;
            }
        }

        TextureFormat::Bgra8UnormSrgb
    }
}

pub(crate) fn surface_configuration(
    format: TextureFormat,
    size: PhysicalSize<u32>,
    present_mode: PresentMode,
    alpha_mode: CompositeAlphaMode,
    desired_maximum_frame_latency: u32,
) -> SurfaceConfiguration {
    SurfaceConfiguration {
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        format,
        width: size.width,
        height: size.height,
        present_mode,
        alpha_mode,
        view_formats: vec![],
        desired_maximum_frame_latency,
    }
}

/// Just a util struct to pass data required for rendering
pub struct RenderData<'a> {
    pub encoder: &'a mut CommandEncoder,
    pub window: &'a GlintWindow,
    pub frame: &'a SurfaceTexture,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_window_is_800_by_600() {
        let config = WindowConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.quit_key, Some(KeyCode::KeyE));
    }

    #[test]
    fn surface_configuration_matches_resize_dimensions() {
        for (w, h) in [(800, 600), (1, 1), (1920, 1080), (640, 479)] {
            let config = surface_configuration(
                TextureFormat::Bgra8UnormSrgb,
                PhysicalSize::new(w, h),
                PresentMode::AutoVsync,
                CompositeAlphaMode::Auto,
                2,
            );
            assert_eq!((config.width, config.height), (w, h));
        }
    }
}
