//! The rendering engine: catalog, topology, contexts, pipeline, orchestration.

pub mod context_builder;
pub mod generator;
pub mod override_topology;
pub mod render_pipeline;
pub mod template_catalog;

pub use context_builder::ContextBuilder;
pub use generator::{RunReport, generate};
pub use override_topology::OverrideTopology;
pub use render_pipeline::{JobFailure, JobOutcome, RenderPipeline, WriteStatus, WrittenFile};
pub use template_catalog::{RenderFailure, TemplateCatalog};
