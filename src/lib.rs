//! extbuild - build descriptors for native Python extensions
//!
//! This crate discovers the C++ sources of an extension module, queries the
//! host Python installation and resolves a platform-specific build
//! descriptor (include paths, libraries, compiler flags) for the external
//! extension-building toolchain.

pub mod builder;
pub mod core;
pub mod ops;
pub mod util;

pub use builder::{BuildDescriptor, DescriptorError};
pub use crate::core::{DiscoveredSources, HostPythonInfo, Platform};
pub use ops::{plan_extension, ExtensionPlan, PlanOptions};
pub use util::config::Config;
