// Library crate: exposes the editor core for integration tests and scripting.
// The binary only wires logging, settings and the script runner around it.

pub mod build;
pub mod codec;
pub mod error;
pub mod harness;
pub mod plugins;
pub mod script;
pub mod state;
pub mod validation;

/// Mesh data and the render-side scene membership.
pub mod viewport {
    pub mod mesh;
    pub mod scene;
}
