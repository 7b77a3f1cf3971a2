//! Shared host/device buffers for one wavefront fill
//!
//! Handles uploading the symbol codes and the padded table to GPU storage,
//! rewriting the per-stage uniform, and downloading the table afterwards.

use super::kernel::StageParams;
use super::GpuDevice;
use crate::error::{LcsError, Result};
use crate::storage::{DpTable, EncodedPair};

/// GPU buffers for one `m x n` problem
///
/// Manages GPU-side storage of:
/// - Symbol codes for `a` and `b` (read-only)
/// - The padded table (read/write, row-major, `i32` cells)
/// - The stage uniform (`cols`, `diagonal`, `first_row`, `width`)
#[derive(Debug)]
pub struct GpuTableBuffers {
    /// Number of table cells
    pub num_cells: usize,

    /// GPU buffer for codes of `a` (size: `m`)
    pub seq_a: wgpu::Buffer,

    /// GPU buffer for codes of `b` (size: `n`)
    pub seq_b: wgpu::Buffer,

    /// GPU buffer for the table (size: `(m+1) * (n+1)`)
    pub table: wgpu::Buffer,

    /// Uniform buffer for the current stage
    pub params: wgpu::Buffer,
}

impl GpuTableBuffers {
    /// Upload codes and the padded table
    ///
    /// Both sequences must be non-empty; empty storage bindings are invalid.
    ///
    /// # Errors
    ///
    /// Returns `Device` if either sequence is empty.
    pub fn upload(device: &GpuDevice, pair: &EncodedPair, table: &DpTable) -> Result<Self> {
        if pair.a.is_empty() || pair.b.is_empty() {
            return Err(LcsError::Device(
                "cannot bind an empty sequence buffer".to_string(),
            ));
        }

        let seq_a = device.create_buffer_init(
            "LCS seq_a",
            bytemuck::cast_slice(&pair.a),
            wgpu::BufferUsages::STORAGE,
        );

        let seq_b = device.create_buffer_init(
            "LCS seq_b",
            bytemuck::cast_slice(&pair.b),
            wgpu::BufferUsages::STORAGE,
        );

        let table_buffer = device.create_buffer_init(
            "LCS table",
            bytemuck::cast_slice(table.as_slice()),
            wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_SRC
                | wgpu::BufferUsages::COPY_DST,
        );

        let params = device.create_buffer_init(
            "LCS stage params",
            bytemuck::bytes_of(&StageParams::default()),
            wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        );

        Ok(Self {
            num_cells: table.len(),
            seq_a,
            seq_b,
            table: table_buffer,
            params,
        })
    }

    /// Queue a params rewrite; applied before the next submission
    pub fn write_params(&self, device: &GpuDevice, params: &StageParams) {
        device
            .queue()
            .write_buffer(&self.params, 0, bytemuck::bytes_of(params));
    }

    /// Read the whole table back from the device
    ///
    /// # Errors
    ///
    /// Returns `Device` if the staging buffer cannot be mapped
    pub fn download(&self, device: &GpuDevice) -> Result<Vec<i32>> {
        let size = (self.num_cells * std::mem::size_of::<i32>()) as u64;
        let staging_buffer = device.create_buffer(
            "LCS table staging",
            size,
            wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        );

        let mut encoder = device
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("LCS table readback"),
            });
        encoder.copy_buffer_to_buffer(&self.table, 0, &staging_buffer, 0, size);
        device.queue().submit(Some(encoder.finish()));

        let buffer_slice = staging_buffer.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();

        buffer_slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = tx.send(result);
        });

        device.wait_idle();
        rx.recv()
            .map_err(|e| LcsError::Device(format!("map callback dropped: {e}")))?
            .map_err(|e| LcsError::Device(format!("buffer mapping failed: {e}")))?;

        let data = buffer_slice.get_mapped_range();
        let cells: Vec<i32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        staging_buffer.unmap();

        Ok(cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SequencePair;

    #[tokio::test]
    #[serial_test::serial]
    async fn test_upload_download_roundtrip_keeps_padding() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_upload_download_roundtrip_keeps_padding: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let pair = SequencePair::from_strs("ABC", "AB").encode();
        let table = DpTable::initialize(3, 2).unwrap();

        let buffers = GpuTableBuffers::upload(&device, &pair, &table).unwrap();
        assert_eq!(buffers.num_cells, 12);

        let cells = buffers.download(&device).unwrap();
        assert_eq!(cells, table.as_slice());
    }

    #[tokio::test]
    #[serial_test::serial]
    async fn test_upload_rejects_empty_sequence() {
        if !GpuDevice::is_gpu_available().await {
            eprintln!("⚠️  Skipping test_upload_rejects_empty_sequence: GPU not available");
            return;
        }

        let device = GpuDevice::new().await.unwrap();
        let pair = SequencePair::from_strs("", "AB").encode();
        let table = DpTable::initialize(0, 2).unwrap();

        let err = GpuTableBuffers::upload(&device, &pair, &table).unwrap_err();
        assert!(matches!(err, LcsError::Device(_)));
    }
}
