pub mod cli;
pub mod graph;
pub mod path;
pub mod solver;
