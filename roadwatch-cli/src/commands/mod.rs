//! CLI command implementations.
//!
//! Each subcommand has its own module with argument definitions and handlers.
//!
//! # Command Modules
//!
//! - [`ahead`] - One-shot "what's ahead" incident report
//! - [`config`] - Configuration management (path, init, show)
//! - [`replay`] - Drive the real tracker from a dummy route
//! - [`simulate`] - Drive a built-in path with the virtual car

pub mod ahead;
pub mod common;
pub mod config;
pub mod replay;
pub mod simulate;
