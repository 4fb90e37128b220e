//! Compiled GPU modules: pipeline creation, named input binding, execution.

use crate::gpu::context::GpuContext;
use crate::gpu::errors::{GpuError, GpuResult};
use crate::gpu::lowering::lower;
use crate::graph::OpGraph;
use crate::shape::Shape;
use log::debug;
use wgpu::util::DeviceExt;

/// A named input tensor backed by a device buffer.
struct InputBinding {
    name: String,
    expected_len: usize,
    buffer: wgpu::Buffer,
}

/// A graph compiled into a GPU compute pipeline.
///
/// The module owns one storage buffer per declared input, a uniform
/// parameter block and the output buffer. Inputs are bound by their
/// declared names via [`CompiledModule::set_input`]; [`CompiledModule::run`]
/// executes one dispatch and blocks until the queue is idle. All buffers
/// are released when the module is dropped.
pub struct CompiledModule<'a> {
    context: &'a GpuContext,
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    inputs: Vec<InputBinding>,
    output_buffer: wgpu::Buffer,
    staging_buffer: wgpu::Buffer,
    workgroups: u32,
    output_shape: Shape,
}

impl<'a> CompiledModule<'a> {
    /// Compiles a single-operator graph for the given device context.
    ///
    /// Shape inference runs first, so invalid graphs are rejected before
    /// any GPU resource is created. Input buffers start zero-filled.
    pub fn compile(context: &'a GpuContext, graph: &OpGraph) -> GpuResult<Self> {
        let lowered = lower(graph)?;
        let device = &context.device;
        debug!(
            "Compiling {} for GPU: {} workgroup(s), output shape {}",
            lowered.label, lowered.workgroups, lowered.output_shape
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(lowered.label),
            source: wgpu::ShaderSource::Wgsl(lowered.shader_source.into()),
        });

        // Binding 0: uniform params; 1..=N: inputs; N+1: output.
        let mut layout_entries = vec![wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }];
        for index in 0..graph.inputs.len() {
            layout_entries.push(wgpu::BindGroupLayoutEntry {
                binding: (index + 1) as u32,
                visibility: wgpu::ShaderStages::COMPUTE,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Storage { read_only: true },
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            });
        }
        layout_entries.push(wgpu::BindGroupLayoutEntry {
            binding: (graph.inputs.len() + 1) as u32,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Storage { read_only: false },
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        });

        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some(lowered.label),
                entries: &layout_entries,
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(lowered.label),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
            label: Some(lowered.label),
            layout: Some(&pipeline_layout),
            module: &shader,
            entry_point: Some("main"),
            compilation_options: Default::default(),
            cache: None,
        });

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Params Buffer"),
            contents: &lowered.params_bytes,
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let inputs: Vec<InputBinding> = graph
            .inputs
            .iter()
            .map(|var| {
                let expected_len = var.shape.num_elements();
                let buffer = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some(var.name.as_str()),
                    size: (expected_len * std::mem::size_of::<f32>()) as u64,
                    usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                InputBinding {
                    name: var.name.clone(),
                    expected_len,
                    buffer,
                }
            })
            .collect();

        let output_size =
            (lowered.output_shape.num_elements() * std::mem::size_of::<f32>()) as u64;
        let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Output Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let staging_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Staging Buffer"),
            size: output_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut bind_entries = vec![wgpu::BindGroupEntry {
            binding: 0,
            resource: params_buffer.as_entire_binding(),
        }];
        for (index, input) in inputs.iter().enumerate() {
            bind_entries.push(wgpu::BindGroupEntry {
                binding: (index + 1) as u32,
                resource: input.buffer.as_entire_binding(),
            });
        }
        bind_entries.push(wgpu::BindGroupEntry {
            binding: (inputs.len() + 1) as u32,
            resource: output_buffer.as_entire_binding(),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(lowered.label),
            layout: &bind_group_layout,
            entries: &bind_entries,
        });

        Ok(CompiledModule {
            context,
            pipeline,
            bind_group,
            inputs,
            output_buffer,
            staging_buffer,
            workgroups: lowered.workgroups,
            output_shape: lowered.output_shape,
        })
    }

    /// Shape of the output tensor this module produces.
    pub fn output_shape(&self) -> &Shape {
        &self.output_shape
    }

    /// Uploads input data under its declared name.
    pub fn set_input(&self, name: &str, data: &[f32]) -> GpuResult<()> {
        let binding = self
            .inputs
            .iter()
            .find(|input| input.name == name)
            .ok_or_else(|| GpuError::UnknownInput {
                name: name.to_string(),
            })?;
        if data.len() != binding.expected_len {
            return Err(GpuError::InputSizeMismatch {
                name: name.to_string(),
                provided: data.len(),
                expected: binding.expected_len,
            });
        }
        self.context
            .queue
            .write_buffer(&binding.buffer, 0, bytemuck::cast_slice(data));
        Ok(())
    }

    /// Executes one dispatch and blocks until the device is idle.
    pub fn run(&self) -> GpuResult<()> {
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor::default());
            pass.set_pipeline(&self.pipeline);
            pass.set_bind_group(0, &self.bind_group, &[]);
            pass.dispatch_workgroups(self.workgroups, 1, 1);
        }
        self.context.queue.submit(Some(encoder.finish()));
        self.context.device.poll(wgpu::Maintain::Wait);
        Ok(())
    }

    /// Copies the output tensor back to host memory.
    pub fn read_output(&self) -> GpuResult<Vec<f32>> {
        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor::default());
        encoder.copy_buffer_to_buffer(
            &self.output_buffer,
            0,
            &self.staging_buffer,
            0,
            self.output_buffer.size(),
        );
        self.context.queue.submit(Some(encoder.finish()));

        let slice = self.staging_buffer.slice(..);
        let (sender, receiver) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.context.device.poll(wgpu::Maintain::Wait);
        receiver
            .recv()
            .map_err(|e| GpuError::OutputReadFailed {
                message: e.to_string(),
            })?
            .map_err(|e| GpuError::OutputReadFailed {
                message: e.to_string(),
            })?;

        let data = slice.get_mapped_range();
        let output: Vec<f32> = bytemuck::cast_slice(&data).to_vec();
        drop(data);
        self.staging_buffer.unmap();
        Ok(output)
    }
}
