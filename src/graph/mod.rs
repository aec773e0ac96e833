//! The canonical in-memory transformation graph and its validity engine.

mod convert;
mod model;
mod propagate;

pub use model::{Edge, NodeData, ViewGraph};
