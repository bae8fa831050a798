use std::mem::size_of;

use bytemuck::{bytes_of, cast_slice, Pod, Zeroable};
use glam::{const_vec3, const_vec4, Mat4, Vec3, Vec4};
use log::debug;
use wgpu::util::DeviceExt;

use super::camera::{CameraExt, TransformExt};
use crate::entity::PointLayer;

const QUAD_VERTICES: [Vec3; 4] = [
    const_vec3!([-0.5, -0.5, 0.]),
    const_vec3!([-0.5, 0.5, 0.]),
    const_vec3!([0.5, -0.5, 0.]),
    const_vec3!([0.5, 0.5, 0.]),
];
const QUAD_INDICES: [u16; 6] = [0, 2, 1, 1, 2, 3];

const CLOUD_COLOR: Vec4 = const_vec4!([0.62, 0.78, 1.0, 0.9]);
const DUST_COLOR: Vec4 = const_vec4!([1.0, 1.0, 1.0, 0.35]);
const DUST_SIZE_FACTOR: f32 = 0.6;

#[derive(Debug, Copy, Clone, Default, Pod, Zeroable)]
#[repr(C)]
struct Uniforms {
    mv_mat: Mat4,
    p_mat: Mat4,
    color: Vec4,
    particle_size: f32,
    _pad0: [u8; 12],
}

impl Uniforms {
    fn new(layer: &PointLayer, color: Vec4, particle_size: f32) -> Self {
        Self {
            mv_mat: layer.camera.view_matrix() * layer.transform.model_matrix(),
            p_mat: layer.camera.proj_matrix(),
            color,
            particle_size,
            ..Default::default()
        }
    }
}

fn instances(positions: &[f32]) -> Vec<Vec4> {
    positions
        .chunks_exact(3)
        .map(|p| Vec4::new(p[0], p[1], p[2], 1.0))
        .collect()
}

/// One instanced draw: its own positions and uniforms.
struct Cloud {
    uniform_buffer: wgpu::Buffer,
    instance_buffer: wgpu::Buffer,
    capacity: u32,
    bind_group: wgpu::BindGroup,
}

impl Cloud {
    fn new(device: &wgpu::Device, layout: &wgpu::BindGroupLayout, label: &str, capacity: u32) -> Self {
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Instance Buffer", label)),
            size: (size_of::<Vec4>() as u64) * capacity.max(1) as u64,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::STORAGE,
            mapped_at_creation: false,
        });
        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            size: size_of::<Uniforms>() as _,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: None,
            layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: instance_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: uniform_buffer.as_entire_binding(),
                },
            ],
        });
        Self {
            uniform_buffer,
            instance_buffer,
            capacity,
            bind_group,
        }
    }

    fn write(&self, queue: &wgpu::Queue, uniforms: &Uniforms, positions: &[f32]) -> u32 {
        let count = ((positions.len() / 3) as u32).min(self.capacity);
        queue.write_buffer(&self.uniform_buffer, 0, bytes_of(uniforms));
        if count > 0 {
            queue.write_buffer(
                &self.instance_buffer,
                0,
                cast_slice(&instances(&positions[..count as usize * 3])),
            );
        }
        count
    }
}

/// Draws the live point cloud and, when visible, the decorative dust.
pub struct PointRenderer {
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    render_pipeline: wgpu::RenderPipeline,
    cloud: Cloud,
    dust: Cloud,
    cloud_count: u32,
    dust_count: u32,
}

impl PointRenderer {
    pub fn new(
        device: &wgpu::Device,
        color_format: wgpu::TextureFormat,
        cloud_capacity: u32,
        dust_capacity: u32,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Vertex Buffer"),
            contents: bytes_of(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Point Index Buffer"),
            contents: bytes_of(&QUAD_INDICES),
            usage: wgpu::BufferUsages::INDEX,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: None,
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Vec4>() as _),
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: wgpu::BufferSize::new(size_of::<Uniforms>() as _),
                    },
                    count: None,
                },
            ],
        });

        let shader_module = device.create_shader_module(&wgpu::include_wgsl!("points.wgsl"));

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let render_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Point Render Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader_module,
                entry_point: "vs_main",
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: size_of::<Vec3>() as _,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &[wgpu::VertexAttribute {
                        format: wgpu::VertexFormat::Float32x3,
                        offset: 0,
                        shader_location: 0,
                    }],
                }],
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader_module,
                entry_point: "fs_main",
                targets: &[wgpu::ColorTargetState {
                    format: color_format,
                    // Additive, so overlapping points glow.
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::SrcAlpha,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                }],
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
        });

        debug!(
            "Point renderer built for {} particles and {} dust",
            cloud_capacity, dust_capacity
        );

        Self {
            vertex_buffer,
            index_buffer,
            cloud: Cloud::new(device, &bind_group_layout, "Point Cloud", cloud_capacity),
            dust: Cloud::new(device, &bind_group_layout, "Dust", dust_capacity),
            render_pipeline,
            cloud_count: 0,
            dust_count: 0,
        }
    }

    /// Whether the buffers fit `layer` without reallocating.
    pub fn fits(&self, layer: &PointLayer) -> bool {
        (layer.positions.len() / 3) as u32 == self.cloud.capacity
            && layer.dust.map_or(true, |d| (d.len() / 3) as u32 <= self.dust.capacity)
    }

    pub fn update(&mut self, queue: &wgpu::Queue, layer: &PointLayer) {
        let uniforms = Uniforms::new(layer, CLOUD_COLOR, layer.particle_size);
        self.cloud_count = self.cloud.write(queue, &uniforms, layer.positions);

        self.dust_count = match layer.dust {
            Some(dust) => {
                let uniforms = Uniforms::new(layer, DUST_COLOR, layer.particle_size * DUST_SIZE_FACTOR);
                self.dust.write(queue, &uniforms, dust)
            }
            None => 0,
        };
    }

    pub fn draw<'rpass>(&'rpass self, rpass: &mut impl wgpu::util::RenderEncoder<'rpass>) {
        rpass.set_pipeline(&self.render_pipeline);
        rpass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        rpass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint16);
        for (cloud, count) in [(&self.dust, self.dust_count), (&self.cloud, self.cloud_count)] {
            if count == 0 {
                continue;
            }
            rpass.set_bind_group(0, &cloud.bind_group, &[]);
            rpass.draw_indexed(0..(QUAD_INDICES.len() as _), 0, 0..count);
        }
    }
}
