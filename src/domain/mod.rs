//! Domain layer: pure classification logic, no I/O.

pub mod catalog;
pub mod classification;
pub mod foundation;
