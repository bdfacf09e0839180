//! Components and their requirements
//!
//! A component is a named unit of setup (an integration) described by a
//! TOML manifest. Loading one makes sure its dependencies are set up and
//! its package requirements are installed.

pub mod loader;
pub mod manifest;

pub use loader::ComponentLoader;
pub use manifest::{ComponentManifest, ComponentMeta};
