//! GPU wavefront backend
//!
//! # Architecture
//!
//! - `device`: adapter selection, device/queue lifecycle, buffer allocation, waits
//! - `buffer`: codes, padded table and stage uniform on the device
//! - `kernel`: WGSL stage kernel (`shaders/lcs_wavefront.wgsl`), compile + dispatch
//! - `memory`: device limits that decide whether a problem fits
//! - `wavefront`: [`StageExecutor`](crate::algorithms::StageExecutor) over the above
//!
//! # Feature Flag
//!
//! This module is only available with the `gpu` feature flag:
//! ```bash
//! cargo build --features gpu
//! ```

mod buffer;
mod device;
mod kernel;
mod memory;
mod wavefront;

pub use buffer::GpuTableBuffers;
pub use device::{GpuDevice, GpuDeviceError};
pub use kernel::{
    StageParams, WavefrontKernel, ENTRY_POINT, KERNEL_SOURCE, KERNEL_VERSION, WORKGROUP_SIZE,
};
pub use memory::GpuMemoryLimits;
pub use wavefront::GpuWavefront;
