mod app;
pub mod device_context;
mod glint;

pub mod pipelines;
pub mod shader;
pub mod utils;
pub mod window;

// For convenience, export the graphics and windowing libs
pub use wgpu;
pub use winit;

pub use crate::{app::*, glint::*};
