//! Rendering module
//!
//! `scene` paints a simulation snapshot onto any [`Surface`]; `sdf_pipeline`
//! draws the recorded frame with WebGPU using signed distance fields.

pub mod scene;
pub mod sdf_pipeline;

pub use scene::{DrawCmd, DrawList, Rgba, Surface, colors, paint};
pub use sdf_pipeline::SdfRenderState;
