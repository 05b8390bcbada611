// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Chartforge
//!
//! Generates per-service Helm charts from a shared platform library chart and
//! syncs them into one umbrella chart.
//!
//! ## Overview
//!
//! Every service describes itself in a `configuration.yml`. Chartforge:
//!
//! - Merges that configuration over the library chart's default values
//! - Writes a complete chart that depends on the library chart
//! - Emits template references only for the features a service enables
//! - Collects many service charts as dependencies of an umbrella chart
//!
//! ## Architecture
//!
//! A run is a single deterministic transformation:
//!
//! 1. **Load**: the configuration is parsed and its required fields checked
//! 2. **Merge**: the configuration is deep-merged over the library defaults
//! 3. **Synthesize**: the chart is written into a staging directory and
//!    swapped into place
//!
//! `sync` repeats this for every discovered service and then rewrites the
//! umbrella descriptor's dependency list.
//!
//! ## Modules
//!
//! - [`config`]: Configuration loading and validation
//! - [`merge`]: Deep merge of nested value trees
//! - [`chart`]: Base library handling and chart synthesis
//! - [`umbrella`]: Service discovery and umbrella dependency sync
//! - [`report`]: Structured run results
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! service:
//!   name: orders
//!   port: 8080
//!
//! deployment:
//!   image: ghcr.io/acme/orders:1.4.2
//!
//! ingress:
//!   enabled: true
//!   host: orders.example.com
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod chart;
pub mod cli;
pub mod config;
pub mod error;
pub mod merge;
pub mod report;
pub mod umbrella;

// ============================================================================
// Re-exports
// ============================================================================

pub use chart::{
    generate_chart, BaseLibrary, ChartDescriptor, ChartSynthesizer, DependencyEntry, TemplateRef,
};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigLoader, ServiceConfig};
pub use error::{ChartforgeError, ErrorKind, Result};
pub use merge::{merge, NestedTree};
pub use report::{Diagnostic, SyncReport, SynthesisReport};
pub use umbrella::DependencyAggregator;
