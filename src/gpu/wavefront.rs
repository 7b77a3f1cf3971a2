//! GPU wavefront executor
//!
//! One dispatch per diagonal. Each stage is submitted on its own and the host
//! waits on that submission before writing the next stage's uniform, so the
//! device never sees two diagonals in flight.

use super::{GpuDevice, GpuMemoryLimits, GpuTableBuffers, StageParams, WavefrontKernel};
use crate::algorithms::{DiagonalStage, StageExecutor};
use crate::backend::BackendKind;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};

struct ActiveFill {
    buffers: GpuTableBuffers,
    bind_group: wgpu::BindGroup,
}

/// Device, compiled kernel, and the buffers of the fill in progress
pub struct GpuWavefront {
    device: GpuDevice,
    kernel: WavefrontKernel,
    limits: GpuMemoryLimits,
    active: Option<ActiveFill>,
}

impl std::fmt::Debug for GpuWavefront {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuWavefront")
            .field("adapter", &self.device.info().name)
            .field("limits", &self.limits)
            .field("active", &self.active.is_some())
            .finish_non_exhaustive()
    }
}

impl GpuWavefront {
    /// Acquire a device and compile the stage kernel
    ///
    /// # Errors
    ///
    /// - `DeviceUnavailable` if no adapter or device can be acquired
    /// - `Build` if the kernel fails to compile
    pub async fn acquire() -> Result<Self> {
        let device = GpuDevice::new().await?;
        Self::with_device(device).await
    }

    /// Compile the stage kernel on an already-acquired device
    ///
    /// # Errors
    ///
    /// Returns `Build` if the kernel fails to compile
    pub async fn with_device(device: GpuDevice) -> Result<Self> {
        let kernel = WavefrontKernel::compile(&device).await?;
        let limits = GpuMemoryLimits::detect(&device);

        let info = device.info();
        log::info!("GPU backend: {} ({:?})", info.name, info.backend);

        Ok(Self {
            device,
            kernel,
            limits,
            active: None,
        })
    }

    /// Replace the detected limits applied to incoming problems
    #[cfg(test)]
    #[must_use]
    pub(crate) fn with_limits(mut self, limits: GpuMemoryLimits) -> Self {
        self.limits = limits;
        self
    }
}

impl StageExecutor for GpuWavefront {
    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn prepare(&mut self, pair: &EncodedPair, table: &DpTable) -> Result<()> {
        self.limits.check_problem(pair.m(), pair.n())?;

        let buffers = GpuTableBuffers::upload(&self.device, pair, table)?;
        let bind_group = self.kernel.bind(&self.device, &buffers);
        self.active = Some(ActiveFill {
            buffers,
            bind_group,
        });
        Ok(())
    }

    fn run_stage(
        &mut self,
        _pair: &EncodedPair,
        table: &mut DpTable,
        stage: DiagonalStage,
    ) -> Result<()> {
        let active = self
            .active
            .as_ref()
            .ok_or_else(|| LcsError::Device("stage dispatched before prepare".to_string()))?;

        let params = StageParams::for_stage(table.cols(), stage)?;
        let token = self
            .kernel
            .dispatch(&self.device, &active.buffers, &active.bind_group, &params);
        self.device.wait(token);
        Ok(())
    }

    fn finish(&mut self, table: &mut DpTable) -> Result<()> {
        let active = self
            .active
            .take()
            .ok_or_else(|| LcsError::Device("finish called before prepare".to_string()))?;

        let cells = active.buffers.download(&self.device)?;
        if cells.len() != table.len() {
            return Err(LcsError::Device(format!(
                "downloaded {} cells, expected {}",
                cells.len(),
                table.len()
            )));
        }
        table.as_mut_slice().copy_from_slice(&cells);
        Ok(())
    }
}
