// ============================================================
// Layer 5 — Backend Selection
// ============================================================
// The model code is generic over `B: Backend`; the concrete
// backend is picked once at runtime from --gpu-id:
//
//   gpu_id <  0  →  NdArray on the CPU
//   gpu_id >= 0  →  Wgpu on WgpuDevice::DiscreteGpu(gpu_id)
//
// Work that needs a backend implements BackendTask so the
// dispatch lives in exactly one place.

use anyhow::Result;
use burn::{
    backend::{ndarray::NdArrayDevice, wgpu::WgpuDevice, NdArray, Wgpu},
    prelude::*,
};

pub type CpuBackend = NdArray;
pub type GpuBackend = Wgpu;

/// A unit of work that can run on any Burn backend.
pub trait BackendTask {
    type Output;

    fn run<B: Backend>(self, device: B::Device) -> Result<Self::Output>;
}

pub fn run_on_device<T: BackendTask>(gpu_id: i32, task: T) -> Result<T::Output> {
    if gpu_id < 0 {
        tracing::info!("Using CPU (ndarray backend)");
        task.run::<CpuBackend>(NdArrayDevice::Cpu)
    } else {
        let device = WgpuDevice::DiscreteGpu(gpu_id as usize);
        tracing::info!("Using WGPU device: {:?}", device);
        task.run::<GpuBackend>(device)
    }
}
