use std::cell::RefCell;
use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use tracing::{debug, trace};

use pluginplay_property_type::{PropertyType, PropertyTypeInput, UnwrappedValues};
use pluginplay_value::Value;

use crate::builder::ModuleBuilder;
use crate::callback::ModuleCallback;
use crate::error::{ModuleError, NotReady};
use crate::submod::SubmodMap;

/// A shared handle to a module.
///
/// The registry hands these out when binding submodules: two callback
/// points bound to the same handle alias the same instance, and a
/// mutation through one is visible through the other until a copy
/// breaks the alias.
pub type ModuleHandle = Rc<RefCell<Module>>;

/// Encapsulates one computation, its declared contracts, and its wiring
/// to other computations.
///
/// See the [crate-level documentation](crate) for the lifecycle. The
/// short version: configure while unlocked, then [`lock`](Self::lock)
/// (or just [`run`](Self::run), which locks as a side effect), after
/// which the metadata is frozen for the life of the instance.
#[derive(Clone)]
pub struct Module {
    pub(crate) callback: Option<Rc<dyn ModuleCallback>>,
    pub(crate) callback_name: Option<String>,
    pub(crate) citations: Vec<String>,
    pub(crate) description: Option<String>,
    pub(crate) inputs: IndexMap<String, Option<Value>>,
    pub(crate) property_types: IndexSet<PropertyType>,
    pub(crate) results: IndexSet<String>,
    pub(crate) submods: SubmodMap,
    pub(crate) unlocked: bool,
    pub(crate) memoizable: bool,
    pub(crate) cache: HashMap<u64, IndexMap<String, Value>>,
}

impl Module {
    /// Creates a module with no callback and no metadata.
    ///
    /// A default-constructed module exists so instances can be created
    /// before configuration; every metadata-reading operation on it
    /// fails with `ModuleError::NoCallback` until a callback is bound
    /// through [`builder`](Self::builder).
    pub fn new() -> Self {
        Self {
            callback: None,
            callback_name: None,
            citations: Vec::new(),
            description: None,
            inputs: IndexMap::new(),
            property_types: IndexSet::new(),
            results: IndexSet::new(),
            submods: SubmodMap::new(),
            unlocked: true,
            memoizable: true,
            cache: HashMap::new(),
        }
    }

    /// Starts building a configured module.
    pub fn builder() -> ModuleBuilder {
        ModuleBuilder::new()
    }

    fn assert_has_module(&self) -> Result<(), ModuleError> {
        if self.has_module() {
            Ok(())
        } else {
            Err(ModuleError::NoCallback)
        }
    }

    fn assert_unlocked(&self) -> Result<(), ModuleError> {
        if self.locked() {
            Err(ModuleError::Locked)
        } else {
            Ok(())
        }
    }

    /// Determines if this module actually wraps a callback.
    pub fn has_module(&self) -> bool {
        self.callback.is_some()
    }

    /// Determines if the module has a description.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn has_description(&self) -> Result<bool, ModuleError> {
        self.assert_has_module()?;
        Ok(self.description.is_some())
    }

    /// If a module is locked its state can no longer change.
    ///
    /// Modules may be read or run by several logical callers once
    /// locked; locking first is what makes that safe.
    pub fn locked(&self) -> bool {
        !self.unlocked
    }

    /// Makes a deep copy of this module which can be modified.
    ///
    /// The copy shares nothing with the original: bound submodules are
    /// recursively cloned, so rewiring the copy never disturbs the
    /// original. Only the top-level copy is unlocked; cloned submodules
    /// keep their own lock state.
    pub fn unlocked_copy(&self) -> Self {
        let mut copy = self.deep_clone();
        copy.unlocked = true;
        copy
    }

    pub(crate) fn deep_clone(&self) -> Self {
        let mut copy = self.clone();
        copy.submods = self.submods.deep_copy();
        copy
    }

    /// Reports which inputs and submodule callback points are not set.
    ///
    /// Inputs are not ready when unset (`None`), whether declared by
    /// the module itself or required (no default) by any of its
    /// property types. A callback point is not ready when unbound or
    /// when its bound module reports not-ready for the point's property
    /// type.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound, here
    /// or on a bound submodule being queried.
    pub fn list_not_ready(&self) -> Result<NotReady, ModuleError> {
        self.assert_has_module()?;

        let mut not_ready = NotReady::default();
        for property_type in &self.property_types {
            for input in property_type.inputs() {
                if input.default().is_none() {
                    not_ready.inputs.insert(input.name().to_string());
                }
            }
        }
        for (name, value) in &self.inputs {
            if value.is_none() {
                not_ready.inputs.insert(name.clone());
            }
        }
        for (key, bound) in self.submods.iter() {
            match bound {
                None => {
                    not_ready.submods.insert(key.point().to_string());
                }
                Some(handle) => {
                    if !handle.borrow().ready(key.property_type())? {
                        not_ready.submods.insert(key.point().to_string());
                    }
                }
            }
        }

        Ok(not_ready)
    }

    /// Readiness given a set of input names the caller will supply.
    fn ready_given<'a>(
        &self,
        provided: impl IntoIterator<Item = &'a str>,
    ) -> Result<bool, ModuleError> {
        let mut not_ready = self.list_not_ready()?;

        // If any of the submodules aren't ready then this module isn't.
        if !not_ready.submods.is_empty() {
            return Ok(false);
        }

        for name in provided {
            not_ready.inputs.shift_remove(name);
        }

        Ok(not_ready.inputs.is_empty())
    }

    /// Determines if the module is ready to be run as `property_type`.
    ///
    /// A module is ready to run as a property type exactly when every
    /// submodule point is independently ready and the only unset inputs
    /// are ones that property type will supply positionally. Which
    /// names count is decided per call, by the requested property type
    /// alone, not by the union across all declared property types.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn ready(&self, property_type: &PropertyType) -> Result<bool, ModuleError> {
        self.ready_given(
            property_type
                .inputs()
                .iter()
                .map(PropertyTypeInput::name),
        )
    }

    /// Locks the module, freezing its state for the rest of its life.
    ///
    /// Locking is not recursive: bound submodules keep their own lock
    /// state. Locking an already-locked module is a no-op.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    ///
    /// Returns `ModuleError::NotReady` if any submodule callback point
    /// is unbound or its bound module is not ready for the point's
    /// property type.
    pub fn lock(&mut self) -> Result<(), ModuleError> {
        self.assert_has_module()?;

        for (key, bound) in self.submods.iter() {
            let ready = match bound {
                Some(handle) => handle.borrow().ready(key.property_type())?,
                None => false,
            };
            if !ready {
                let mut not_ready = NotReady::default();
                not_ready.submods.insert(key.point().to_string());
                return Err(ModuleError::NotReady(not_ready));
            }
        }

        if self.unlocked {
            debug!(
                module = self.callback_name.as_deref().unwrap_or("<unnamed>"),
                "locking module"
            );
        }
        self.unlocked = false;
        Ok(())
    }

    /// Runs the module with the provided call-site inputs.
    ///
    /// The callback receives the union of the module's bound inputs and
    /// `inputs` (call-site values win), plus the bound submodules. As a
    /// side effect the module is locked if it was not already.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    ///
    /// Returns `ModuleError::NotReady` (listing what is missing) if the
    /// union of bound and supplied inputs leaves anything unset, or a
    /// submodule is not ready.
    ///
    /// Returns `ModuleError::Callback` if the callback itself fails;
    /// the callback's error is propagated unmodified.
    pub fn run(
        &mut self,
        inputs: &IndexMap<String, Value>,
    ) -> Result<IndexMap<String, Value>, ModuleError> {
        self.assert_has_module()?;

        if !self.ready_given(inputs.keys().map(String::as_str))? {
            let mut not_ready = self.list_not_ready()?;
            for name in inputs.keys() {
                not_ready.inputs.shift_remove(name.as_str());
            }
            return Err(ModuleError::NotReady(not_ready));
        }

        self.lock()?;

        let merged = self.effective_inputs(inputs);

        let cache_key = self.memoizable.then(|| self.cache_key(&merged));
        if let Some(key) = cache_key {
            if let Some(hit) = self.cache.get(&key) {
                trace!(
                    module = self.callback_name.as_deref().unwrap_or("<unnamed>"),
                    "memoized result"
                );
                return Ok(hit.clone());
            }
        }

        let callback = match &self.callback {
            Some(callback) => Rc::clone(callback),
            None => return Err(ModuleError::NoCallback),
        };
        debug!(
            module = self.callback_name.as_deref().unwrap_or("<unnamed>"),
            "running module"
        );
        let results = callback.call(&merged, &self.submods)?;

        if let Some(key) = cache_key {
            self.cache.insert(key, results.clone());
        }

        Ok(results)
    }

    /// Runs the module as the specified property type.
    ///
    /// The positional arguments are marshaled into a keyed map via the
    /// property type, the module is [`run`](Self::run), and the result
    /// map is unwrapped back into the property type's positional return
    /// shape.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::UnsatisfiedPropertyType` if the module
    /// does not declare `property_type`, plus everything
    /// [`run`](Self::run) can fail with.
    pub fn run_as(
        &mut self,
        property_type: &PropertyType,
        args: &[Value],
    ) -> Result<UnwrappedValues, ModuleError> {
        if !self.property_types.contains(property_type) {
            return Err(ModuleError::UnsatisfiedPropertyType);
        }

        let mut inputs = IndexMap::new();
        property_type.wrap_inputs(&mut inputs, args)?;
        let results = self.run(&inputs)?;
        Ok(property_type.unwrap_results(&results)?)
    }

    /// The union of the module's bound inputs and the call-site inputs.
    fn effective_inputs(&self, inputs: &IndexMap<String, Value>) -> IndexMap<String, Value> {
        let mut merged = IndexMap::new();
        for (name, value) in &self.inputs {
            if let Some(value) = value {
                merged.insert(name.clone(), value.clone());
            }
        }
        for (name, value) in inputs {
            merged.insert(name.clone(), value.clone());
        }
        merged
    }

    /// Memoization key: structural hash of the effective inputs plus
    /// the identity of each bound submodule.
    fn cache_key(&self, inputs: &IndexMap<String, Value>) -> u64 {
        let mut hasher = DefaultHasher::new();
        let mut names: Vec<&String> = inputs.keys().collect();
        names.sort();
        for name in names {
            name.hash(&mut hasher);
            inputs[name.as_str()].hash(&mut hasher);
        }
        self.submods.hash_identities(&mut hasher);
        hasher.finish()
    }

    /// Changes the value of an input.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    ///
    /// Returns `ModuleError::Locked` if the module is locked.
    ///
    /// Returns `ModuleError::UnknownInput` if `key` is not among the
    /// declared inputs (module-specific or property-type).
    pub fn change_input(&mut self, key: &str, value: Value) -> Result<(), ModuleError> {
        self.assert_has_module()?;
        self.assert_unlocked()?;

        let declared = self.inputs.contains_key(key)
            || self
                .property_types
                .iter()
                .any(|pt| pt.inputs().iter().any(|input| input.name() == key));
        if !declared {
            return Err(ModuleError::UnknownInput(key.to_string()));
        }

        self.inputs.insert(key.to_string(), Some(value));
        Ok(())
    }

    /// Changes the module bound at a submodule callback point.
    ///
    /// Every declared point with the given name is rebound. The binding
    /// is by shared handle; callers wanting an independent instance
    /// copy the module first.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    ///
    /// Returns `ModuleError::Locked` if the module is locked.
    ///
    /// Returns `ModuleError::UnknownSubmod` if no point named `point`
    /// is declared.
    pub fn change_submod(&mut self, point: &str, new_module: &ModuleHandle) -> Result<(), ModuleError> {
        self.assert_has_module()?;
        self.assert_unlocked()?;

        if !self.submods.bind(point, new_module) {
            return Err(ModuleError::UnknownSubmod(point.to_string()));
        }
        Ok(())
    }

    /// Forgets all the results the module has computed.
    pub fn reset_cache(&mut self) {
        self.cache = HashMap::new();
    }

    /// Determines if calls to the module can be memoized.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn is_memoizable(&self) -> Result<bool, ModuleError> {
        self.assert_has_module()?;
        Ok(self.memoizable)
    }

    /// Makes the module actually run every time it is called.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn turn_off_memoization(&mut self) -> Result<(), ModuleError> {
        self.assert_has_module()?;
        self.memoizable = false;
        Ok(())
    }

    /// Lets the module elide runs whose inputs it has already seen.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn turn_on_memoization(&mut self) -> Result<(), ModuleError> {
        self.assert_has_module()?;
        self.memoizable = true;
        Ok(())
    }

    /// The inputs the module recognizes: module-specific ones plus
    /// those declared by every bound property type. A value set on the
    /// module wins over a property-type declaration of the same name,
    /// matching what [`run`](Self::run) hands the callback; the
    /// property type only contributes names the module has not set.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn inputs(&self) -> Result<IndexMap<String, Option<Value>>, ModuleError> {
        self.assert_has_module()?;
        let mut merged = self.inputs.clone();
        for property_type in &self.property_types {
            for input in property_type.inputs() {
                merged
                    .entry(input.name().to_string())
                    .or_insert_with(|| input.default().cloned());
            }
        }
        Ok(merged)
    }

    /// The results the module can compute: module-specific ones plus
    /// those declared by every bound property type.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn results(&self) -> Result<IndexSet<String>, ModuleError> {
        self.assert_has_module()?;
        let mut merged = self.results.clone();
        for property_type in &self.property_types {
            for result in property_type.results() {
                merged.insert(result.clone());
            }
        }
        Ok(merged)
    }

    /// The property types the module satisfies.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn property_types(&self) -> Result<&IndexSet<PropertyType>, ModuleError> {
        self.assert_has_module()?;
        Ok(&self.property_types)
    }

    /// The submodule callback points of the module.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn submods(&self) -> Result<&SubmodMap, ModuleError> {
        self.assert_has_module()?;
        Ok(&self.submods)
    }

    /// The literature references users of this module should cite.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn citations(&self) -> Result<&[String], ModuleError> {
        self.assert_has_module()?;
        Ok(&self.citations)
    }

    /// The description of what the module does.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    ///
    /// Returns `ModuleError::DescriptionNotSet` if no description was
    /// provided.
    pub fn description(&self) -> Result<&str, ModuleError> {
        self.assert_has_module()?;
        self.description
            .as_deref()
            .ok_or(ModuleError::DescriptionNotSet)
    }

    /// The distinguishing name of the wrapped callback, if one was set.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::NoCallback` if no callback is bound.
    pub fn callback_name(&self) -> Result<Option<&str>, ModuleError> {
        self.assert_has_module()?;
        Ok(self.callback_name.as_deref())
    }
}

impl Default for Module {
    fn default() -> Self {
        Self::new()
    }
}

// Equality covers lock state, callback identity, and the full metadata
// state. memoizable and cache are deliberately excluded: two modules
// that differ only in caching are the same module.
impl PartialEq for Module {
    fn eq(&self, other: &Self) -> bool {
        let callback_eq = match (&self.callback, &other.callback) {
            (None, None) => true,
            (Some(lhs), Some(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => false,
        };

        self.unlocked == other.unlocked
            && callback_eq
            && self.callback_name == other.callback_name
            && self.citations == other.citations
            && self.description == other.description
            && self.inputs == other.inputs
            && self.property_types == other.property_types
            && self.results == other.results
            && self.submods == other.submods
    }
}

impl std::fmt::Debug for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Module")
            .field("has_callback", &self.callback.is_some())
            .field("callback_name", &self.callback_name)
            .field("citations", &self.citations)
            .field("description", &self.description)
            .field("inputs", &self.inputs)
            .field("property_types", &self.property_types)
            .field("results", &self.results)
            .field("submods", &self.submods)
            .field("unlocked", &self.unlocked)
            .field("memoizable", &self.memoizable)
            .field("cached_results", &self.cache.len())
            .finish()
    }
}
