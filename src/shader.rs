use std::{borrow::Cow, fmt::Formatter};

use wgpu::{
    ColorTargetState, Device, RenderPipeline, ShaderModule, ShaderModuleDescriptor,
    VertexBufferLayout,
};

use crate::utils::wait_async;

/// Compile and link diagnostics never exceed this many bytes.
pub const MAX_LOG_LEN: usize = 512;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    pub fn name(&self) -> &'static str {
        match self {
            ShaderStage::Vertex => "VERTEX",
            ShaderStage::Fragment => "FRAGMENT",
        }
    }
}

/// A failed shader build. Carries the failing stage and a bounded-length
/// driver log. Compile and link failures are not fatal to the application;
/// the caller decides whether to render without the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderError {
    Compile { stage: ShaderStage, log: String },
    Link { log: String },
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Compile {
                stage,
                log,
            } => {
                write!(f, "ERROR::SHADER::{}::COMPILATION_FAILED\n{}", stage.name(), log)
            }
            ShaderError::Link {
                log,
            } => write!(f, "ERROR::SHADER::LINKING::FAILED\n{}", log),
        }
    }
}

/// Compiles a single WGSL shader stage. Validation errors are captured with an
/// error scope instead of reaching the device's uncaptured-error handler.
pub fn compile(device: &Device, stage: ShaderStage, source: &str) -> Result<ShaderModule, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let module = device.create_shader_module(ShaderModuleDescriptor {
        label: Some(stage.name()),
        source: wgpu::ShaderSource::Wgsl(Cow::Borrowed(source)),
    });
    match wait_async(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Compile {
            stage,
            log: truncate_log(&error.to_string()).to_owned(),
        }),
        None => Ok(module),
    }
}

/// Links a compiled vertex/fragment module pair into a render pipeline. The
/// modules are no longer needed once this returns and can be dropped.
pub fn link(
    device: &Device,
    vertex: &ShaderModule,
    fragment: &ShaderModule,
    buffers: &[VertexBufferLayout],
    target: ColorTargetState,
) -> Result<RenderPipeline, ShaderError> {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: None,
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    });
    let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: None,
        layout: Some(&layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some("vs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some("fs_main"),
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            targets: &[Some(target)],
        }),
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: None,
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    });
    match wait_async(device.pop_error_scope()) {
        Some(error) => Err(ShaderError::Link {
            log: truncate_log(&error.to_string()).to_owned(),
        }),
        None => Ok(pipeline),
    }
}

/// Bounds a driver log to [`MAX_LOG_LEN`] bytes without splitting a char.
pub fn truncate_log(log: &str) -> &str {
    if log.len() <= MAX_LOG_LEN {
        return log;
    }
    let mut end = MAX_LOG_LEN;
    while !log.is_char_boundary(end) {
        end -= 1;
    }
    &log[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_logs_are_untouched() {
        assert_eq!(truncate_log("expected ';'"), "expected ';'");
        assert_eq!(truncate_log(""), "");
    }

    #[test]
    fn long_logs_are_bounded() {
        let log = "x".repeat(2000);
        assert_eq!(truncate_log(&log).len(), MAX_LOG_LEN);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        // 510 ascii bytes then a 3-byte char straddling the limit
        let log = format!("{}ねこ", "x".repeat(510));
        let truncated = truncate_log(&log);
        assert!(truncated.len() <= MAX_LOG_LEN);
        assert_eq!(truncated, "x".repeat(510));
    }

    #[test]
    fn compile_failure_message_names_the_stage() {
        let err = ShaderError::Compile {
            stage: ShaderStage::Vertex,
            log: "unknown ident".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "ERROR::SHADER::VERTEX::COMPILATION_FAILED\nunknown ident"
        );
        let err = ShaderError::Compile {
            stage: ShaderStage::Fragment,
            log: "bad token".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "ERROR::SHADER::FRAGMENT::COMPILATION_FAILED\nbad token"
        );
    }

    #[test]
    fn link_failure_message() {
        let err = ShaderError::Link {
            log: "entry point mismatch".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "ERROR::SHADER::LINKING::FAILED\nentry point mismatch"
        );
    }
}
