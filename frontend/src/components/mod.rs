pub mod assistant;
pub mod features;
pub mod footer;
pub mod handlers;
pub mod hero;
pub mod live_demo;
pub mod metrics;
pub mod navbar;
pub mod results;
pub mod utils;
