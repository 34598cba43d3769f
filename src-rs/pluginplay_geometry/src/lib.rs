//! # PluginPlay Geometry
//!
//! A worked plugin collection: modules computing areas and volumes of
//! simple shapes, wired together through PluginPlay.
//!
//! The collection exists to exercise and demonstrate every dispatch
//! feature of the registry with arithmetic simple enough to check by
//! hand. [`load_modules`] registers the collection with a
//! [`ModuleManager`], after which the usual flow looks like
//!
//! ```
//! use pluginplay_geometry::{load_modules, property_types};
//! use pluginplay_manager::ModuleManager;
//! use pluginplay_property_type::UnwrappedValues;
//! use pluginplay_value::Value;
//!
//! let mut mm = ModuleManager::new();
//! load_modules(&mut mm).expect("collection keys are unused");
//!
//! let area = mm
//!     .run_as(
//!         &property_types::area(),
//!         "Area of a triangle",
//!         &[Value::from(1.2), Value::from(3.4)],
//!     )
//!     .expect("module is ready");
//! assert_eq!(area, UnwrappedValues::Single(Value::from(0.5 * 1.2 * 3.4)));
//! ```

pub mod modules;
pub mod property_types;

use pluginplay_manager::{ManagerError, ModuleManager};

/// Registers the geometry collection with a registry.
///
/// # Errors
///
/// Returns `ManagerError::KeyInUse` if any of the collection's keys is
/// already assigned in `mm`.
pub fn load_modules(mm: &mut ModuleManager) -> Result<(), ManagerError> {
    mm.add_module("Area of a triangle", modules::triangle())?;
    mm.add_module("Area of a square", modules::square())?;
    mm.add_module("Area of a rectangle", modules::rectangle())?;
    mm.add_module("Area of a circle", modules::circle())?;
    mm.add_module("Volume of a prism", modules::prism_volume_by_submod())?;
    mm.add_module("Volume of a cylinder", modules::cylinder())?;
    Ok(())
}
