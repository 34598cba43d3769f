//! # PluginPlay Module
//!
//! This crate provides the central abstraction of PluginPlay: the
//! [`Module`], a user-supplied callback wrapped with the metadata the
//! registry needs to dispatch to it safely.
//!
//! ## Overview
//!
//! A module carries:
//!
//! - the callback itself (a [`ModuleCallback`], absent on
//!   default-constructed modules),
//! - the set of property types the callback is certified to implement,
//! - module-specific inputs (with optional bound values) and extra
//!   result names beyond those declared by the property types,
//! - a table of named submodule callback points ([`SubmodMap`]), each
//!   tagged with the property type a bound submodule must satisfy,
//! - citations and a description for attribution and UIs,
//! - a one-way lock flag and an optional memoization cache.
//!
//! ## Lifecycle
//!
//! A module starts **unlocked**: inputs can be rebound with
//! [`Module::change_input`] and submodule points rewired with
//! [`Module::change_submod`]. Calling [`Module::lock`] (or running the
//! module, which locks as a side effect) transitions it to **locked**,
//! after which its metadata never changes again for the life of the
//! instance. A locked module is never unlocked; [`Module::unlocked_copy`]
//! produces an independent, mutable clone instead.
//!
//! Readiness is checked before anything runs: [`Module::list_not_ready`]
//! reports the unset inputs and unready submodule points, and
//! [`Module::ready`] answers whether a given property type's positional
//! arguments would cover everything that is still missing.

mod builder;
mod callback;
mod error;
mod module;
mod submod;

pub use builder::ModuleBuilder;
pub use callback::{CallbackError, ModuleCallback};
pub use error::{ModuleError, NotReady};
pub use module::{Module, ModuleHandle};
pub use submod::{SubmodKey, SubmodMap};
