//! # PluginPlay Module Manager
//!
//! The registry tying PluginPlay together. A [`ModuleManager`] assigns
//! each module a unique string key and exposes the call graph
//! operations in terms of keys: registering, retrieving, copying,
//! renaming, rewiring, and running.
//!
//! Modules are stored by shared handle, so binding a registered module
//! into several submodule callback points makes those points alias one
//! instance. [`ModuleManager::copy_module`] is the escape hatch: it
//! deep copies the instance, breaking the aliasing and unlocking the
//! copy for reconfiguration.

mod error;
mod manager;

pub use error::ManagerError;
pub use manager::ModuleManager;
