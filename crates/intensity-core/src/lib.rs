pub mod adapter;
pub mod bridge;
pub mod config;
pub mod constants;
pub mod controller;
pub mod feedback;
pub mod geometry;
pub mod keys;
pub mod state;
pub mod synth;

pub use adapter::*;
pub use bridge::*;
pub use config::*;
pub use controller::*;
pub use feedback::*;
pub use geometry::*;
pub use keys::*;
pub use state::*;
pub use synth::*;
