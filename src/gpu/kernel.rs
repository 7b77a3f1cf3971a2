//! Wavefront stage kernel: compilation and dispatch
//!
//! The WGSL source lives in `shaders/lcs_wavefront.wgsl` and is versioned with
//! [`KERNEL_VERSION`]. Compilation runs inside a validation error scope so a
//! broken kernel surfaces as `LcsError::Build` carrying the compiler log
//! instead of an uncaptured device error.

use super::{GpuDevice, GpuTableBuffers};
use crate::algorithms::DiagonalStage;
use crate::error::{LcsError, Result};

/// Embedded WGSL source of the stage kernel
pub const KERNEL_SOURCE: &str = include_str!("shaders/lcs_wavefront.wgsl");

/// Bumped whenever the kernel's bindings or semantics change
pub const KERNEL_VERSION: u32 = 1;

/// Entry point name in [`KERNEL_SOURCE`]
pub const ENTRY_POINT: &str = "lcs_diagonal";

/// Invocations per workgroup (must match `@workgroup_size` in the shader)
pub const WORKGROUP_SIZE: u32 = 256;

/// Per-stage uniform (layout must match `StageParams` in the shader)
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct StageParams {
    /// Table columns (`n + 1`)
    pub cols: u32,
    /// Diagonal index `d`
    pub diagonal: u32,
    /// Smallest row on the diagonal
    pub first_row: u32,
    /// Number of cells on the diagonal
    pub width: u32,
}

impl StageParams {
    /// Uniform for `stage` in a table with `cols` columns
    ///
    /// # Errors
    ///
    /// Returns `Device` if any coordinate exceeds `u32`.
    pub fn for_stage(cols: usize, stage: DiagonalStage) -> Result<Self> {
        let narrow = |v: usize| {
            u32::try_from(v)
                .map_err(|_| LcsError::Device(format!("{v} exceeds u32 dispatch range")))
        };

        Ok(Self {
            cols: narrow(cols)?,
            diagonal: narrow(stage.diagonal)?,
            first_row: narrow(stage.first_row)?,
            width: narrow(stage.width())?,
        })
    }

    /// Workgroups needed to cover this stage
    #[must_use]
    pub const fn workgroups(&self) -> u32 {
        self.width.div_ceil(WORKGROUP_SIZE)
    }
}

/// Compiled stage kernel
#[derive(Debug)]
pub struct WavefrontKernel {
    pipeline: wgpu::ComputePipeline,
    bind_group_layout: wgpu::BindGroupLayout,
}

fn storage_entry(binding: u32, read_only: bool) -> wgpu::BindGroupLayoutEntry {
    wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    }
}

impl WavefrontKernel {
    /// Compile the embedded kernel
    ///
    /// # Errors
    ///
    /// Returns `Build` with the compiler diagnostic if compilation fails
    pub async fn compile(device: &GpuDevice) -> Result<Self> {
        Self::compile_source(device, KERNEL_SOURCE).await
    }

    /// Compile an arbitrary WGSL source exposing [`ENTRY_POINT`] with the
    /// kernel's bindings
    ///
    /// # Errors
    ///
    /// Returns `Build` with the compiler diagnostic if compilation fails
    pub async fn compile_source(device: &GpuDevice, source: &str) -> Result<Self> {
        let gpu = device.device();
        gpu.push_error_scope(wgpu::ErrorFilter::Validation);

        let shader_module = gpu.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("LCS Wavefront Shader"),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });

        let bind_group_layout = gpu.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("LCS Wavefront Bind Group Layout"),
            entries: &[
                // @binding(0): uniform params
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
                // @binding(1): seq_a (read)
                storage_entry(1, true),
                // @binding(2): seq_b (read)
                storage_entry(2, true),
                // @binding(3): table (read_write)
                storage_entry(3, false),
            ],
        });

        let pipeline_layout = gpu.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("LCS Wavefront Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = gpu.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some("LCS Wavefront Pipeline"),
            layout: Some(&pipeline_layout),
            module: &shader_module,
            entry_point: ENTRY_POINT,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
            cache: None,
        });

        if let Some(err) = gpu.pop_error_scope().await {
            return Err(LcsError::Build {
                log: err.to_string(),
            });
        }

        log::debug!("compiled LCS wavefront kernel v{KERNEL_VERSION}");
        Ok(Self {
            pipeline,
            bind_group_layout,
        })
    }

    /// Bind one problem's buffers to the kernel
    #[must_use]
    pub fn bind(&self, device: &GpuDevice, buffers: &GpuTableBuffers) -> wgpu::BindGroup {
        device
            .device()
            .create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("LCS Wavefront Bind Group"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: buffers.params.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: buffers.seq_a.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: buffers.seq_b.as_entire_binding(),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: buffers.table.as_entire_binding(),
                    },
                ],
            })
    }

    /// Submit one stage; the returned index is its completion token
    pub fn dispatch(
        &self,
        device: &GpuDevice,
        buffers: &GpuTableBuffers,
        bind_group: &wgpu::BindGroup,
        params: &StageParams,
    ) -> wgpu::SubmissionIndex {
        buffers.write_params(device, params);

        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("LCS Wavefront Command Encoder"),
            });

        {
            let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("LCS Wavefront Stage"),
                timestamp_writes: None,
            });

            compute_pass.set_pipeline(&self.pipeline);
            compute_pass.set_bind_group(0, bind_group, &[]);
            compute_pass.dispatch_workgroups(params.workgroups(), 1, 1);
        }

        device.queue().submit(Some(encoder.finish()))
    }
}
