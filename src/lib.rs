pub mod types;
pub mod config;
pub mod eras;
pub mod data;
pub mod geometry;
pub mod historical;
pub mod geodata;
pub mod render;
