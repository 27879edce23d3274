use wgpu::{util::DeviceExt, Buffer, Device, RenderPipeline, TextureFormat};

use crate::{
    pipelines::{Vertex, QUAD_INDICES, QUAD_VERTICES},
    shader::{self, ShaderError, ShaderStage},
};

pub const QUAD_VERTEX_SHADER: &str = include_str!("quad_vs.wgsl");
pub const QUAD_FRAGMENT_SHADER: &str = include_str!("quad_fs.wgsl");

/// The linked shader program for the tutorial quad plus its vertex and index
/// buffers. Buffers are created once here, never inside the render loop.
pub struct QuadPipeline {
    pub pipeline: RenderPipeline,
    vertices: Buffer,
    indices: Buffer,
}

impl QuadPipeline {
    /// Compiles the fixed vertex/fragment source pair and links them into a
    /// render pipeline targeting the given surface format. The shader modules
    /// are dropped after linking. A [`ShaderError`] from either stage or from
    /// linking is left to the caller; it does not have to be fatal.
    pub fn new(
        device: &Device,
        target_surface_format: TextureFormat,
    ) -> Result<QuadPipeline, ShaderError> {
        let vertex_module = shader::compile(device, ShaderStage::Vertex, QUAD_VERTEX_SHADER)?;
        let fragment_module = shader::compile(device, ShaderStage::Fragment, QUAD_FRAGMENT_SHADER)?;
        let pipeline = shader::link(
            device,
            &vertex_module,
            &fragment_module,
            &[Vertex::desc()],
            target_surface_format.into(),
        )?;
        let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Vertex Buffer"),
            contents: bytemuck::cast_slice(QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Index Buffer"),
            contents: bytemuck::cast_slice(QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });
        Ok(Self {
            pipeline,
            vertices,
            indices,
        })
    }

    /// Binds the pipeline and draws the quad into the given pass.
    pub fn draw(&self, rpass: &mut wgpu::RenderPass) {
        rpass.set_pipeline(&self.pipeline);
        rpass.set_vertex_buffer(0, self.vertices.slice(..));
        rpass.set_index_buffer(self.indices.slice(..), wgpu::IndexFormat::Uint16);
        rpass.draw_indexed(0..QUAD_INDICES.len() as u32, 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_shader_sources_are_valid_wgsl() {
        let vs = wgpu::naga::front::wgsl::parse_str(QUAD_VERTEX_SHADER)
            .expect("vertex shader should parse");
        assert!(vs.entry_points.iter().any(|ep| ep.name == "vs_main"));
        let fs = wgpu::naga::front::wgsl::parse_str(QUAD_FRAGMENT_SHADER)
            .expect("fragment shader should parse");
        assert!(fs.entry_points.iter().any(|ep| ep.name == "fs_main"));
    }
}
