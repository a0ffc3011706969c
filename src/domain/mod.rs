//! Domain logic - version arithmetic independent of the file tree

pub mod version;
pub mod window;

pub use version::CompatVersion;
pub use window::VersionWindow;
