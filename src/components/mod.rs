pub mod comparison;
pub mod force_graph;
