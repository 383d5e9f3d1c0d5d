pub mod pipeline;
pub mod renderer;

pub use pipeline::DocPipeline;
pub use renderer::{ApiDocRenderer, DocSections, ResponseDoc};
