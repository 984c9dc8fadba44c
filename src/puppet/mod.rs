//! `.inp` puppet files and the native engine built on them.

pub mod container;
mod engine;
pub mod params;
mod renderer;
pub mod texture;

pub use engine::PuppetEngine;
pub use renderer::PuppetRenderer;
