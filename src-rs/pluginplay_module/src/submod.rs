use std::rc::Rc;

use indexmap::IndexMap;

use pluginplay_property_type::{PropertyType, UnwrappedValues};
use pluginplay_value::Value;

use crate::error::ModuleError;
use crate::module::ModuleHandle;

/// The compound key of a submodule callback point: the point's name and
/// the property type a bound module must satisfy there.
///
/// A single point name may in general be satisfiable by several
/// property-type shapes, which is why the property type is part of the
/// key rather than an attribute of the binding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmodKey {
    point: String,
    property_type: PropertyType,
}

impl SubmodKey {
    /// Creates a key for the given point name and required property
    /// type.
    pub fn new(point: impl Into<String>, property_type: PropertyType) -> Self {
        Self {
            point: point.into(),
            property_type,
        }
    }

    /// Returns the name of the callback point.
    pub fn point(&self) -> &str {
        &self.point
    }

    /// Returns the property type a module bound here must satisfy.
    pub fn property_type(&self) -> &PropertyType {
        &self.property_type
    }
}

/// The submodule callback points of a module and their bindings.
///
/// Callbacks receive a reference to this table and invoke their
/// submodules through [`SubmodMap::run_as`]; the registry wires bindings
/// through `Module::change_submod`.
#[derive(Debug, Clone, Default)]
pub struct SubmodMap {
    entries: IndexMap<SubmodKey, Option<ModuleHandle>>,
}

impl SubmodMap {
    pub(crate) fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Returns true if no callback points are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the number of declared callback points.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over the declared points and their bindings.
    pub fn iter(&self) -> indexmap::map::Iter<'_, SubmodKey, Option<ModuleHandle>> {
        self.entries.iter()
    }

    /// Returns true if a point with the given name is declared.
    pub fn has_point(&self, point: &str) -> bool {
        self.entries.keys().any(|key| key.point() == point)
    }

    /// Returns the module bound at the given point for the given
    /// property type, if the point exists and is bound.
    pub fn get(&self, point: &str, property_type: &PropertyType) -> Option<&ModuleHandle> {
        self.entries
            .iter()
            .find(|(key, _)| key.point() == point && key.property_type() == property_type)
            .and_then(|(_, bound)| bound.as_ref())
    }

    /// Runs the module bound at the given point as the given property
    /// type.
    ///
    /// This is the call a module callback makes to defer part of its
    /// computation to whatever module the user wired into the point.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::UnknownSubmod` if no point with this name
    /// and property type is declared.
    ///
    /// Returns `ModuleError::UnboundSubmod` if the point exists but no
    /// module is bound to it. Readiness checks upstream make this
    /// unreachable in a module that was allowed to run.
    ///
    /// Any failure of the submodule itself propagates unchanged.
    pub fn run_as(
        &self,
        point: &str,
        property_type: &PropertyType,
        args: &[Value],
    ) -> Result<UnwrappedValues, ModuleError> {
        let entry = self
            .entries
            .iter()
            .find(|(key, _)| key.point() == point && key.property_type() == property_type);
        match entry {
            Some((_, Some(handle))) => handle.borrow_mut().run_as(property_type, args),
            Some((_, None)) => Err(ModuleError::UnboundSubmod(point.to_string())),
            None => Err(ModuleError::UnknownSubmod(point.to_string())),
        }
    }

    pub(crate) fn declare(&mut self, key: SubmodKey, bound: Option<ModuleHandle>) {
        self.entries.insert(key, bound);
    }

    /// Binds `handle` at every declared point with the given name.
    /// Returns false if no such point exists.
    pub(crate) fn bind(&mut self, point: &str, handle: &ModuleHandle) -> bool {
        let mut found = false;
        for (key, bound) in &mut self.entries {
            if key.point() == point {
                *bound = Some(Rc::clone(handle));
                found = true;
            }
        }
        found
    }

    /// Clones the table, recursively deep-copying every bound module so
    /// the copy shares no state with the original.
    pub(crate) fn deep_copy(&self) -> Self {
        let entries = self
            .entries
            .iter()
            .map(|(key, bound)| {
                let copied = bound
                    .as_ref()
                    .map(|handle| Rc::new(std::cell::RefCell::new(handle.borrow().deep_clone())));
                (key.clone(), copied)
            })
            .collect();
        Self { entries }
    }

    /// Hashes the identity of each binding into `hasher`. Used for
    /// memoization keys, where "which module instance is wired in"
    /// matters but its internal state does not.
    pub(crate) fn hash_identities<H: std::hash::Hasher>(&self, hasher: &mut H) {
        use std::hash::Hash;

        for (key, bound) in &self.entries {
            key.hash(hasher);
            match bound {
                Some(handle) => (Rc::as_ptr(handle) as usize).hash(hasher),
                None => 0_usize.hash(hasher),
            }
        }
    }
}

// Bindings compare by module value (or pointer identity as a shortcut),
// matching how module equality treats its submodule graph.
impl PartialEq for SubmodMap {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().all(|(key, bound)| {
                other
                    .entries
                    .get(key)
                    .is_some_and(|other_bound| match (bound, other_bound) {
                        (None, None) => true,
                        (Some(lhs), Some(rhs)) => {
                            Rc::ptr_eq(lhs, rhs) || *lhs.borrow() == *rhs.borrow()
                        }
                        _ => false,
                    })
            })
    }
}
