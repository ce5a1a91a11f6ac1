//! High-level operations.
//!
//! This module contains the implementation of extbuild commands.

pub mod plan;

pub use plan::{
    discover_project_sources, plan_extension, project_version, ExtensionPlan, PlanOptions,
};
