//! Device limits for wavefront tables
//!
//! The whole `(m+1) x (n+1)` table must sit in one storage binding, and the
//! widest diagonal must fit in one dispatch dimension.

use super::kernel::WORKGROUP_SIZE;
use super::GpuDevice;
use crate::error::{LcsError, Result};

/// Limits that bound which problems the GPU backend accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpuMemoryLimits {
    /// Largest buffer the device will allocate (bytes)
    pub max_buffer_size: u64,

    /// Largest storage buffer binding (bytes)
    pub max_storage_binding: u64,

    /// Largest workgroup count per dispatch dimension
    pub max_workgroups_per_dim: u32,
}

impl GpuMemoryLimits {
    /// Read limits from the acquired device
    #[must_use]
    pub fn detect(device: &GpuDevice) -> Self {
        let limits = device.device().limits();

        Self {
            max_buffer_size: limits.max_buffer_size,
            max_storage_binding: u64::from(limits.max_storage_buffer_binding_size),
            max_workgroups_per_dim: limits.max_compute_workgroups_per_dimension,
        }
    }

    /// Bytes needed for the table of an `m x n` problem
    #[must_use]
    pub fn table_bytes(m: usize, n: usize) -> Option<u64> {
        let cells = m.checked_add(1)?.checked_mul(n.checked_add(1)?)?;
        let bytes = cells.checked_mul(std::mem::size_of::<i32>())?;
        u64::try_from(bytes).ok()
    }

    /// Check that an `m x n` problem can run on this device
    ///
    /// # Errors
    ///
    /// Returns `Device` describing the exceeded limit; the caller degrades to
    /// a CPU fill.
    pub fn check_problem(&self, m: usize, n: usize) -> Result<()> {
        let bytes = Self::table_bytes(m, n)
            .ok_or_else(|| LcsError::Device(format!("{m}x{n} table size overflows")))?;

        let binding_limit = self.max_storage_binding.min(self.max_buffer_size);
        if bytes > binding_limit {
            return Err(LcsError::Device(format!(
                "{m}x{n} table needs {bytes} bytes, storage binding limit is {binding_limit}"
            )));
        }

        let widest = m.min(n) as u64;
        let workgroups = widest.div_ceil(u64::from(WORKGROUP_SIZE));
        if workgroups > u64::from(self.max_workgroups_per_dim) {
            return Err(LcsError::Device(format!(
                "diagonal of {widest} cells needs {workgroups} workgroups, limit is {}",
                self.max_workgroups_per_dim
            )));
        }

        Ok(())
    }
}
