pub mod assistant;
pub mod classifier;
