pub mod cli;
pub mod config;
pub mod data_loader;
pub mod dataset;
pub mod error;
pub mod evaluation;
pub mod io;
pub mod mocap;
pub mod prediction;
pub mod procrustes;
pub mod scale;
pub mod skeleton;
pub mod types;

pub use error::{EvalError, LookupError, Result};
