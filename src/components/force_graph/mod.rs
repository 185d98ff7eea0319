mod component;
mod error;
mod interaction;
mod render;
mod scale;
mod simulation;
mod state;
mod types;

pub use component::ForceGraphCanvas;
pub use error::GraphError;
pub use types::GraphData;
