use crate::accumulation::{FramePlan, Target};
use crate::session::SessionStatus;
use crate::uniforms::ShaderUniforms;

use super::screenshot::CapturedImage;

/// Pair of fixed-resolution off-screen targets the accumulation loop ping-pongs between
pub trait RenderTargetPair {
    /// Shade one frame into `plan.write`, blending with `plan.read`
    fn render(&mut self, plan: &FramePlan, uniforms: &ShaderUniforms) -> anyhow::Result<()>;

    /// Show `target` on screen, with the status overlay if one is enabled
    fn present(&mut self, target: Target, status: &SessionStatus) -> anyhow::Result<()>;

    /// Copy the contents of `target` back to the host
    fn capture(&mut self, target: Target) -> anyhow::Result<CapturedImage>;
}
