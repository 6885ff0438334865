//! Report module - plots, console tables and run summary

pub mod export;
pub mod sink;
pub mod summary;
pub mod tables;

pub use export::*;
pub use sink::*;
pub use summary::*;
