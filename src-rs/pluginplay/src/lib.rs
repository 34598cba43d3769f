//! # PluginPlay
//!
//! PluginPlay assembles scientific workflows out of swappable pieces.
//! A workflow is a call graph whose nodes are [`Module`]s: user-written
//! callbacks wrapped with the metadata needed to dispatch to them
//! without knowing which implementation is wired in. The edges of the
//! graph are property types ([`PropertyType`]): positional
//! input/output contracts that make any two modules declaring the same
//! contract interchangeable at a call site.
//!
//! A [`ModuleManager`] holds the graph under string keys and exposes
//! the graph-level operations: registering and retrieving modules,
//! rewiring submodule callback points by key, copying nodes to break
//! aliasing, and running a node as a given property type.
//!
//! This crate is the single-import facade; each concern also lives in
//! its own crate for consumers that want a narrower dependency.

pub use pluginplay_manager::{ManagerError, ModuleManager};
pub use pluginplay_module::{
    CallbackError, Module, ModuleBuilder, ModuleCallback, ModuleError, ModuleHandle, NotReady,
    SubmodKey, SubmodMap,
};
pub use pluginplay_property_type::{
    PropertyType, PropertyTypeError, PropertyTypeInput, UnwrappedValues,
};
pub use pluginplay_shared::error::{AsPluginPlayError, Context, PluginPlayError};
pub use pluginplay_value::{Value, ValueError};
