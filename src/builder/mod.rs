//! Native extension build descriptors.
//!
//! This module resolves what the external compiler driver needs to build
//! the extension module on the current platform.

pub mod descriptor;

pub use descriptor::{resolve, BuildDescriptor, DescriptorError, FlagSet, PlatformLayout};
