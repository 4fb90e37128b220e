//! GPU device context acquisition.

use crate::gpu::errors::{GpuError, GpuResult};
use log::info;
use pollster::FutureExt;

/// An open handle to a GPU device and its submission queue.
///
/// One context is created per process and shared by every compiled module;
/// dropping it releases the device.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
}

impl GpuContext {
    /// Opens the highest-performance available adapter.
    ///
    /// Fails with [`GpuError::DeviceNotAvailable`] when no compatible
    /// adapter exists on the machine.
    pub fn new() -> GpuResult<Self> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor::default());
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .block_on()
            .ok_or_else(|| GpuError::DeviceNotAvailable {
                message: "no compatible adapter found".to_string(),
            })?;

        let adapter_info = adapter.get_info();
        info!(
            "Using adapter {} ({:?})",
            adapter_info.name, adapter_info.backend
        );

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor::default(), None)
            .block_on()
            .map_err(|e| GpuError::DeviceRequestFailed {
                message: e.to_string(),
            })?;

        Ok(GpuContext { device, queue })
    }
}
