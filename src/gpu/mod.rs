//! GPU backend: device context, graph lowering and compiled modules.
//!
//! The backend compiles a validated [`crate::graph::OpGraph`] into a wgpu
//! compute pipeline. Each operator has a dedicated WGSL shader; lowering
//! packs the operator's attributes and shapes into a uniform parameter
//! block and sizes the dispatch. Execution is synchronous: every
//! [`module::CompiledModule::run`] call blocks until the queue is idle,
//! which is what the latency measurements rely on.

pub mod context;
pub mod errors;
pub mod lowering;
pub mod module;
pub mod shaders;

pub use context::GpuContext;
pub use errors::{GpuError, GpuResult};
pub use module::CompiledModule;
