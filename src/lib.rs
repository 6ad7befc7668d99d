pub mod core;
pub mod pipeline;
pub mod sink;
pub mod source;
pub mod transform;

pub use crate::core::*;
pub use crate::pipeline::{Pipeline, PipelineConfig};
