//! Durable storage of the inventory as a flat text file.

pub mod codec;
mod data_file;

pub use data_file::*;
