use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;
use tracing::debug;

use pluginplay_module::{Module, ModuleHandle};
use pluginplay_property_type::{PropertyType, UnwrappedValues};
use pluginplay_value::Value;

use crate::error::ManagerError;

/// The keyed registry of the [`Module`] instances known to PluginPlay.
///
/// Each node of the call graph is assigned a unique label called its
/// module key. Instead of specifying a path through the call graph,
/// most operations refer to a node by its key.
///
/// Registered modules are held by shared handle. [`get`](Self::get)
/// returns the handle itself, and [`change_submod`](Self::change_submod)
/// binds it into the target's callback point, so binding the same key
/// at two points makes them alias one instance. Use
/// [`copy_module`](Self::copy_module) when independent instances are
/// wanted.
#[derive(Debug, Default)]
pub struct ModuleManager {
    modules: IndexMap<String, ModuleHandle>,
}

impl ModuleManager {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            modules: IndexMap::new(),
        }
    }

    fn assert_has_key(&self, key: &str) -> Result<(), ManagerError> {
        if self.modules.contains_key(key) {
            Ok(())
        } else {
            Err(ManagerError::UnknownKey(key.to_string()))
        }
    }

    fn assert_key_is_free(&self, key: &str) -> Result<(), ManagerError> {
        if self.modules.contains_key(key) {
            Err(ManagerError::KeyInUse(key.to_string()))
        } else {
            Ok(())
        }
    }

    /// Returns the number of registered modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Returns true if no modules are registered.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Iterates over the registered module keys in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.modules.keys().map(String::as_str)
    }

    /// Determines if a module is registered under a key.
    pub fn contains(&self, key: &str) -> bool {
        self.modules.contains_key(key)
    }

    /// Registers a module under the provided key.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::KeyInUse` if `key` is already assigned.
    pub fn add_module(&mut self, key: impl Into<String>, module: Module) -> Result<(), ManagerError> {
        let key = key.into();
        self.assert_key_is_free(&key)?;
        debug!(key, "registering module");
        self.modules.insert(key, Rc::new(RefCell::new(module)));
        Ok(())
    }

    /// Retrieves the handle of the module registered under `key`.
    ///
    /// The handle refers to the registered instance itself, not a copy.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::UnknownKey` if no module is registered
    /// under `key`.
    pub fn get(&self, key: &str) -> Result<ModuleHandle, ManagerError> {
        self.modules
            .get(key)
            .map(Rc::clone)
            .ok_or_else(|| ManagerError::UnknownKey(key.to_string()))
    }

    /// Deep copies the module under `old_key` and registers the copy
    /// under `new_key`.
    ///
    /// If two callback points are bound to the same module key they
    /// alias each other. This breaks the aliasing: the copy shares
    /// nothing with the original and starts unlocked, so its inputs can
    /// be changed even when the original is locked.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::UnknownKey` if there is no module under
    /// `old_key`, and `ManagerError::KeyInUse` if `new_key` is already
    /// assigned.
    pub fn copy_module(&mut self, old_key: &str, new_key: impl Into<String>) -> Result<(), ManagerError> {
        let new_key = new_key.into();
        self.assert_has_key(old_key)?;
        self.assert_key_is_free(&new_key)?;

        let copy = self.modules[old_key].borrow().unlocked_copy();
        debug!(old_key, new_key, "copying module");
        self.modules.insert(new_key, Rc::new(RefCell::new(copy)));
        Ok(())
    }

    /// Removes the module registered under `key`, if any.
    ///
    /// Erasing is idempotent. If the module is bound as a submodule
    /// somewhere, that binding keeps the instance alive; erasing only
    /// drops the registry's key.
    pub fn erase(&mut self, key: &str) {
        if self.modules.shift_remove(key).is_some() {
            debug!(key, "erasing module");
        }
    }

    /// Changes the key of a module.
    ///
    /// After this call the module is no longer stored under `old_key`,
    /// leaving that key free for use again. The rename goes through a
    /// deep copy, so handles previously obtained for `old_key` no
    /// longer alias the registered instance.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::UnknownKey` if there is no module under
    /// `old_key`, and `ManagerError::KeyInUse` if `new_key` is already
    /// assigned.
    pub fn rename_module(&mut self, old_key: &str, new_key: impl Into<String>) -> Result<(), ManagerError> {
        self.copy_module(old_key, new_key)?;
        self.erase(old_key);
        Ok(())
    }

    /// Changes an input of the module registered under `key`.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::UnknownKey` if no module is registered
    /// under `key`, or `ManagerError::Module` wrapping whatever
    /// [`Module::change_input`] fails with.
    pub fn change_input(
        &mut self,
        key: &str,
        input: &str,
        value: impl Into<Value>,
    ) -> Result<(), ManagerError> {
        self.assert_has_key(key)?;
        self.modules[key]
            .borrow_mut()
            .change_input(input, value.into())?;
        Ok(())
    }

    /// Binds the module registered under `submod_key` at the callback
    /// point `point` of the module registered under `key`.
    ///
    /// The binding is by handle: the callback point aliases the
    /// registered instance, and later changes to that instance are seen
    /// through the point. Unlike going through [`Module::change_submod`]
    /// directly, the wiring here is done purely with keys.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::UnknownKey` if either key is
    /// unregistered, or `ManagerError::Module` wrapping whatever
    /// [`Module::change_submod`] fails with.
    pub fn change_submod(
        &mut self,
        key: &str,
        point: &str,
        submod_key: &str,
    ) -> Result<(), ManagerError> {
        self.assert_has_key(key)?;
        self.assert_has_key(submod_key)?;

        let submod = Rc::clone(&self.modules[submod_key]);
        debug!(key, point, submod_key, "binding submodule");
        self.modules[key].borrow_mut().change_submod(point, &submod)?;
        Ok(())
    }

    /// Runs the module registered under `key` as the given property
    /// type.
    ///
    /// A convenience wrapper over [`get`](Self::get) plus
    /// [`Module::run_as`]; the module is locked as a side effect.
    ///
    /// # Errors
    ///
    /// Returns `ManagerError::UnknownKey` if no module is registered
    /// under `key`, or `ManagerError::Module` wrapping whatever
    /// [`Module::run_as`] fails with.
    pub fn run_as(
        &mut self,
        property_type: &PropertyType,
        key: &str,
        args: &[Value],
    ) -> Result<UnwrappedValues, ManagerError> {
        self.assert_has_key(key)?;
        Ok(self.modules[key].borrow_mut().run_as(property_type, args)?)
    }
}

#[cfg(test)]
mod tests {
    use pluginplay_module::{CallbackError, ModuleError, SubmodMap};
    use pluginplay_property_type::{PropertyTypeError, PropertyTypeInput};

    use super::*;

    mod helper {
        use super::*;

        /// `area (base, height)`
        pub fn area() -> PropertyType {
            PropertyType::new(
                [
                    PropertyTypeInput::required("base"),
                    PropertyTypeInput::required("height"),
                ],
                ["area"],
            )
        }

        /// `volume (base, height, width)`
        pub fn prism_volume() -> PropertyType {
            PropertyType::new(
                [
                    PropertyTypeInput::required("base"),
                    PropertyTypeInput::required("height"),
                    PropertyTypeInput::required("width"),
                ],
                ["volume"],
            )
        }

        pub fn rectangle() -> Module {
            Module::builder()
                .callback_name("Rectangle")
                .property_type(area())
                .callback(
                    |inputs: &IndexMap<String, Value>, _: &SubmodMap| {
                        let area = inputs["base"]
                            .checked_mul(&inputs["height"])
                            .map_err(|e| CallbackError::new(e.to_string()))?;
                        Ok(IndexMap::from([("area".to_string(), area)]))
                    },
                )
                .build()
        }

        pub fn triangle() -> Module {
            Module::builder()
                .callback_name("Triangle")
                .property_type(area())
                .callback(
                    |inputs: &IndexMap<String, Value>, _: &SubmodMap| {
                        let area = inputs["base"]
                            .checked_mul(&inputs["height"])
                            .and_then(|bh| bh.checked_mul(&Value::from(0.5)))
                            .map_err(|e| CallbackError::new(e.to_string()))?;
                        Ok(IndexMap::from([("area".to_string(), area)]))
                    },
                )
                .build()
        }

        pub fn prism() -> Module {
            Module::builder()
                .callback_name("PrismVolumeBySubmod")
                .description("Computes the volume of a prism")
                .property_type(prism_volume())
                .submod("area", area())
                .callback(
                    |inputs: &IndexMap<String, Value>, submods: &SubmodMap| {
                        let pt = prism_volume();
                        let values = pt
                            .unwrap_inputs(inputs)
                            .map_err(|e| CallbackError::new(e.to_string()))?
                            .into_values();
                        let [base, height, width] = values.try_into().map_err(|_| {
                            CallbackError::new("expected base, height, and width")
                        })?;
                        let area = submods
                            .run_as("area", &area(), &[base, height])
                            .map_err(|e| CallbackError::new(e.to_string()))?
                            .into_single()
                            .ok_or_else(|| CallbackError::new("expected a single area"))?;
                        let volume = area
                            .checked_mul(&width)
                            .map_err(|e| CallbackError::new(e.to_string()))?;
                        Ok(IndexMap::from([("volume".to_string(), volume)]))
                    },
                )
                .build()
        }

        pub fn manager() -> ModuleManager {
            let mut mm = ModuleManager::new();
            mm.add_module("Rectangle", rectangle())
                .expect("fresh manager has no keys");
            mm.add_module("Triangle", triangle())
                .expect("key is unused");
            mm.add_module("Prism", prism()).expect("key is unused");
            mm
        }
    }

    #[test]
    fn starts_empty() {
        let mm = ModuleManager::new();
        assert!(mm.is_empty());
        assert_eq!(mm.len(), 0);
        assert!(!mm.contains("Rectangle"));
    }

    #[test]
    fn add_module_rejects_used_keys() {
        let mut mm = helper::manager();
        assert_eq!(mm.len(), 3);
        assert!(mm.contains("Rectangle"));
        assert_eq!(
            mm.add_module("Rectangle", helper::rectangle()),
            Err(ManagerError::KeyInUse("Rectangle".to_string()))
        );
    }

    #[test]
    fn get_returns_the_registered_instance() {
        let mm = helper::manager();
        assert_eq!(
            mm.get("not a key"),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );

        // Two gets alias the same instance.
        let first = mm.get("Rectangle").expect("key is registered");
        let second = mm.get("Rectangle").expect("key is registered");
        assert!(Rc::ptr_eq(&first, &second));

        first
            .borrow_mut()
            .change_input("base", Value::from(7.0))
            .expect("base is declared by the area property type");
        assert_eq!(
            second.borrow().inputs().expect("callback is bound")["base"],
            Some(Value::from(7.0))
        );
    }

    #[test]
    fn keys_preserve_registration_order() {
        let mm = helper::manager();
        let keys: Vec<_> = mm.keys().collect();
        assert_eq!(keys, ["Rectangle", "Triangle", "Prism"]);
    }

    #[test]
    fn copy_module_breaks_aliasing() {
        let mut mm = helper::manager();
        mm.change_input("Rectangle", "base", 2.0)
            .expect("base is declared by the area property type");

        mm.copy_module("Rectangle", "Rectangle copy")
            .expect("keys are valid");

        // The copy kept the bound inputs but shares no state.
        mm.change_input("Rectangle copy", "base", 9.0)
            .expect("the copy is unlocked");
        let original = mm.get("Rectangle").expect("key is registered");
        assert_eq!(
            original.borrow().inputs().expect("callback is bound")["base"],
            Some(Value::from(2.0))
        );

        assert_eq!(
            mm.copy_module("not a key", "whatever"),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );
        assert_eq!(
            mm.copy_module("Rectangle", "Triangle"),
            Err(ManagerError::KeyInUse("Triangle".to_string()))
        );
    }

    #[test]
    fn copy_of_locked_module_is_unlocked() {
        let mut mm = helper::manager();
        mm.get("Rectangle")
            .expect("key is registered")
            .borrow_mut()
            .lock()
            .expect("no submodule points to satisfy");

        mm.copy_module("Rectangle", "Rectangle copy")
            .expect("keys are valid");
        let copy = mm.get("Rectangle copy").expect("key is registered");
        assert!(!copy.borrow().locked());

        // The original stays locked.
        assert_eq!(
            mm.change_input("Rectangle", "base", 1.0),
            Err(ManagerError::Module(ModuleError::Locked))
        );
        mm.change_input("Rectangle copy", "base", 1.0)
            .expect("the copy is unlocked");
    }

    #[test]
    fn erase_is_idempotent() {
        let mut mm = helper::manager();
        mm.erase("Rectangle");
        assert!(!mm.contains("Rectangle"));
        mm.erase("Rectangle");
        assert_eq!(mm.len(), 2);
    }

    #[test]
    fn erase_leaves_bound_submodules_alive() {
        let mut mm = helper::manager();
        mm.change_submod("Prism", "area", "Triangle")
            .expect("keys and point are valid");
        mm.erase("Triangle");

        // The prism still runs through its bound triangle.
        let volume = mm
            .run_as(
                &helper::prism_volume(),
                "Prism",
                &[Value::from(1.2), Value::from(3.4), Value::from(5.0)],
            )
            .expect("submodule binding survived the erase");
        assert_eq!(
            volume,
            UnwrappedValues::Single(Value::from(0.5 * 1.2 * 3.4 * 5.0))
        );
    }

    #[test]
    fn rename_module_frees_the_old_key() {
        let mut mm = helper::manager();
        mm.rename_module("Rectangle", "Box side")
            .expect("keys are valid");
        assert!(!mm.contains("Rectangle"));
        assert!(mm.contains("Box side"));
        assert_eq!(mm.len(), 3);

        assert_eq!(
            mm.rename_module("not a key", "whatever"),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );
        assert_eq!(
            mm.rename_module("Box side", "Triangle"),
            Err(ManagerError::KeyInUse("Triangle".to_string()))
        );
    }

    #[test]
    fn change_input_validates_both_keys() {
        let mut mm = helper::manager();
        assert_eq!(
            mm.change_input("not a key", "base", 1.0),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );
        assert_eq!(
            mm.change_input("Rectangle", "not an input", 1.0),
            Err(ManagerError::Module(ModuleError::UnknownInput(
                "not an input".to_string()
            )))
        );
        mm.change_input("Rectangle", "base", 1.0)
            .expect("base is declared by the area property type");
    }

    #[test]
    fn change_submod_binds_by_reference() {
        let mut mm = helper::manager();
        mm.change_submod("Prism", "area", "Triangle")
            .expect("keys and point are valid");

        // The callback point aliases the registered triangle.
        let prism = mm.get("Prism").expect("key is registered");
        let triangle = mm.get("Triangle").expect("key is registered");
        let prism_ref = prism.borrow();
        let bound = prism_ref
            .submods()
            .expect("callback is bound")
            .get("area", &helper::area())
            .expect("point was just bound");
        assert!(Rc::ptr_eq(bound, &triangle));
    }

    #[test]
    fn change_submod_validates_keys_and_point() {
        let mut mm = helper::manager();
        assert_eq!(
            mm.change_submod("not a key", "area", "Triangle"),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );
        assert_eq!(
            mm.change_submod("Prism", "area", "not a key"),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );
        assert_eq!(
            mm.change_submod("Prism", "not a point", "Triangle"),
            Err(ManagerError::Module(ModuleError::UnknownSubmod(
                "not a point".to_string()
            )))
        );
    }

    #[test]
    fn run_as_dispatches_by_key() {
        let mut mm = helper::manager();
        let area = mm
            .run_as(
                &helper::area(),
                "Triangle",
                &[Value::from(1.2), Value::from(3.4)],
            )
            .expect("module is ready");
        assert_eq!(area, UnwrappedValues::Single(Value::from(0.5 * 1.2 * 3.4)));

        // Running locks the registered instance.
        assert!(
            mm.get("Triangle")
                .expect("key is registered")
                .borrow()
                .locked()
        );

        assert_eq!(
            mm.run_as(&helper::area(), "not a key", &[]),
            Err(ManagerError::UnknownKey("not a key".to_string()))
        );
        assert_eq!(
            mm.run_as(&helper::area(), "Triangle", &vec![Value::from(1.0); 3]),
            Err(ManagerError::Module(ModuleError::PropertyType(
                PropertyTypeError::TooManyArguments { max: 2, actual: 3 }
            )))
        );
    }
}
