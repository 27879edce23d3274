use bytemuck::{Pod, Zeroable};

/// A plain position vertex
#[repr(C)]
#[derive(Default, Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

impl Vertex {
    pub fn desc<'a>() -> wgpu::VertexBufferLayout<'a> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            }],
        }
    }
}

pub const QUAD_VERTICES: &[Vertex] = &[
    Vertex {
        position: [0.5, 0.5, 0.0], // top right
    },
    Vertex {
        position: [0.5, -0.5, 0.0], // bottom right
    },
    Vertex {
        position: [-0.5, -0.5, 0.0], // bottom left
    },
    Vertex {
        position: [-0.5, 0.5, 0.0], // top left
    },
];

pub const QUAD_INDICES: &[u16] = &[0, 1, 3, 1, 2, 3];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_is_four_corners() {
        assert_eq!(QUAD_VERTICES.len(), 4);
        for v in QUAD_VERTICES {
            assert_eq!(v.position[0].abs(), 0.5);
            assert_eq!(v.position[1].abs(), 0.5);
            assert_eq!(v.position[2], 0.0);
        }
    }

    #[test]
    fn quad_indices_form_two_triangles_within_bounds() {
        assert_eq!(QUAD_INDICES.len(), 6);
        assert!(QUAD_INDICES.iter().all(|&i| (i as usize) < QUAD_VERTICES.len()));
    }
}
