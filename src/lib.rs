//! Requisite - component requirement installer
//!
//! Ensures the Python packages a component needs are installed before the
//! component is set up. Installs are serialized behind one lock and run
//! through pip with options derived from the host environment.

pub mod cli;
pub mod component;
pub mod config;
pub mod environment;
pub mod error;
pub mod package;
pub mod requirements;
pub mod ui;

pub use error::{RequisiteError, RequisiteResult};
