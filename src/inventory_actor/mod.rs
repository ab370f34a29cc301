//! The warehouse manager task: owns all inventory state and the data file.

mod service;

pub use service::*;
