//! Package orchestration and coordination.
//!
//! This module provides the main [`Bundler`] orchestrator that turns package
//! definitions into Linux packages.
//!
//! # Overview
//!
//! For each package definition the bundler:
//! 1. Selects Linux and iOS binaries matching the definition's build filter
//! 2. Groups them by platform
//! 3. Runs one task per (format, platform group) under a bounded budget
//! 4. Assembles a [`PackageInfo`](crate::bundler::PackageInfo) and hands it to
//!    the format's packager
//! 5. Hashes and records each package in the artifact store
//!
//! # Module Organization
//!
//! - [`assembler`] - Per-task descriptor assembly and packaging
//! - [`checksum`] - SHA256 checksum calculation for packages
//! - [`coordinator`] - Bounded concurrent task runner
//! - [`orchestrator`] - Main [`Bundler`] struct
//! - [`recorder`] - Artifact store updates
//! - [`signing`] - Signing passphrase lookup

pub mod assembler;
mod checksum;
pub mod coordinator;
mod orchestrator;
mod recorder;
pub mod signing;

pub use assembler::{PackageTask, TaskOutcome, with_extension};
pub use coordinator::run_bounded;
pub use orchestrator::Bundler;
pub use signing::passphrase_from_env;
