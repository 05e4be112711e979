//! Dept Compass - Adaptive Department Classification Engine
//!
//! This crate places a user into the best-matching department by asking a
//! sequence of Likert-scale questions, updating an inferred trait profile
//! after each answer, and deciding after every answer whether to ask another
//! question or to stop and report a result.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
