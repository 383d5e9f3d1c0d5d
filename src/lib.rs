//! Turns a captured `curl` command, and optionally the JSON it returned,
//! into an apiDoc comment block.

pub mod apidoc;
pub mod curl;
pub mod error;
pub mod models;
pub mod shape;
pub mod web;

pub use apidoc::DocPipeline;
pub use error::DocError;
pub use models::{DocMeta, DocRequest, GeneratedDoc, RequestDescriptor};
