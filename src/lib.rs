pub mod boundary;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod git;
pub mod sync;
pub mod ui;
pub mod updaters;

pub use error::{Result, UpdateCompatError};
