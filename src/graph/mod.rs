//! Declarative audio-processing graphs
//!
//! Descriptions are plain data: a keyed set of node specs and their
//! connections. The builder compiles generated parameters into them; an
//! engine realizes them as live processing.

pub mod builder;
mod description;
mod node;

pub use description::GraphDescription;
pub use node::{Connection, NodeKind, NodeSpec, ParamTarget, ParamValue};
