//! qibla_core - Pure no_std logic for the Qibla compass
//!
//! This crate contains the platform-agnostic geodesy, heading smoothing,
//! alignment evaluation and session state machine. Hosts supply location
//! fixes and heading samples as events; nothing here performs I/O or logs.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Injected configuration**: Parameters become a [`session::SessionConfig`]
//!   passed to each session
//!
//! # Modules
//!
//! - [`geo`]: Geographic points, great-circle bearing and distance
//! - [`heading`]: Heading samples and the circular exponential filter
//! - [`alignment`]: Target-versus-heading alignment evaluation
//! - [`session`]: Direction session state machine and snapshots
//! - [`parameters`]: Parameter store and compass parameters

#![no_std]

pub mod alignment;
pub mod geo;
pub mod heading;
pub mod parameters;
pub mod session;
