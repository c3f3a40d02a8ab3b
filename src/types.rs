/// Trace shader uniform buffer data for GPU.
///
/// Layout mirrors `Trace` in `trace.wgsl`; every vec3 is packed with a
/// trailing scalar so the struct needs no explicit padding before the vec2s.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TraceUniform {
    pub position: [f32; 3],
    pub fov: f32,
    pub direction: [f32; 3],
    pub sample_part: f32,
    pub up: [f32; 3],
    pub time: f32,
    pub right: [f32; 3],
    pub sample_count: u32,
    pub viewport_size: [f32; 2],
    pub seed1: [f32; 2],
    pub seed2: [f32; 2],
    pub _pad: [f32; 2],
}
