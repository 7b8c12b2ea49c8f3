//! NuGet v3 registration synthesis
//!
//! This module owns everything on the v3 side of the bridge:
//!
//! - [`version`]: NuGet v2 version string normalization into one total order
//! - [`types`]: the Index/Page/Leaf document tree and identifier forms
//! - [`dependency`]: v2 dependency string decoding into dependency groups
//! - [`assembler`]: partitioning version records into registration pages
//! - [`error`]: synthesis and page lookup error types

pub mod assembler;
pub mod dependency;
pub mod error;
pub mod types;
pub mod version;
