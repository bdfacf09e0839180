//! CLI command implementations

pub mod check;
pub mod component;
pub mod config;
pub mod install;
pub mod status;

pub use check::execute as check;
pub use component::execute as component;
pub use config::execute as config;
pub use install::execute as install;
pub use status::execute as status;
