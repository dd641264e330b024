//! Unpublish workflow for npm registries
//!
//! Removes a whole package, or one version of it, and repairs the package's
//! dist-tags when versions remain.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Resolver   │────▶│  Registry   │────▶│  Mutation   │────▶│  Executor   │
//! │ (arg/local) │     │   (fetch)   │     │   (plan)    │     │ (write+OTP) │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!                                                                    │
//!                                                                    ▼
//!                                                             ┌─────────────┐
//!                                                             │   Cleanup   │
//!                                                             │  (tarball)  │
//!                                                             └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`command`]: The end-to-end workflow
//! - [`resolver`]: Turns arguments or the local manifest into a target
//! - [`spec`]: `[@scope/]name[@version]` parsing and name validation
//! - [`manifest`]: Local package.json reading
//! - [`packument`]: The registry's package document
//! - [`mutation`]: Pure decision of what to change
//! - [`executor`]: Applies a plan through the registry
//! - [`cleanup`]: Deletes the tarball of a removed version
//! - [`otp`]: One-time password sources and the bounded retry
//! - [`registry`]: Registry trait for reads and writes
//! - [`registries`]: Concrete registry implementations
//! - [`report`]: Status line output
//! - [`semver`]: Loose version ordering
//! - [`error`]: Error types

pub mod cleanup;
pub mod command;
pub mod error;
pub mod executor;
pub mod manifest;
pub mod mutation;
pub mod otp;
pub mod packument;
pub mod registries;
pub mod registry;
pub mod report;
pub mod resolver;
pub mod semver;
pub mod spec;
