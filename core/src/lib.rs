// Skin Analysis - Core Library

pub mod camera;
pub mod config;
pub mod errors;
pub mod flow;
pub mod media;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod symptoms;
pub mod validation;

pub use camera::*;
pub use config::*;
pub use errors::*;
pub use flow::*;
pub use media::*;
pub use models::*;
pub use normalize::*;
pub use progress::*;
pub use symptoms::*;
pub use validation::*;
