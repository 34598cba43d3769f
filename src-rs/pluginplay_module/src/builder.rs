use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};

use pluginplay_property_type::PropertyType;
use pluginplay_value::Value;

use crate::callback::ModuleCallback;
use crate::module::Module;
use crate::submod::{SubmodKey, SubmodMap};

/// Assembles the configuration of a [`Module`].
///
/// Modules are initialized by the plugin collection that provides them.
/// The builder enumerates every piece of state a module can carry, so a
/// plugin declares its callback, contracts, and wiring explicitly
/// instead of smuggling them through a loosely-typed map:
///
/// ```
/// # use indexmap::IndexMap;
/// # use pluginplay_module::{Module, SubmodMap};
/// # use pluginplay_property_type::{PropertyType, PropertyTypeInput};
/// # use pluginplay_value::Value;
/// # let area = PropertyType::new(
/// #     [PropertyTypeInput::required("base"), PropertyTypeInput::required("height")],
/// #     ["area"],
/// # );
/// let triangle = Module::builder()
///     .callback_name("Triangle")
///     .property_type(area)
///     .callback(|inputs: &IndexMap<String, Value>, _: &SubmodMap| {
///         let area = inputs["base"]
///             .checked_mul(&inputs["height"])
///             .and_then(|bh| bh.checked_mul(&Value::from(0.5)))
///             .map_err(|e| pluginplay_module::CallbackError::new(e.to_string()))?;
///         Ok(IndexMap::from([("area".to_string(), area)]))
///     })
///     .build();
/// ```
#[derive(Default)]
pub struct ModuleBuilder {
    callback: Option<Rc<dyn ModuleCallback>>,
    callback_name: Option<String>,
    citations: Vec<String>,
    description: Option<String>,
    inputs: IndexMap<String, Option<Value>>,
    property_types: IndexSet<PropertyType>,
    results: IndexSet<String>,
    submods: SubmodMap,
}

impl ModuleBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sets the callback the module wraps.
    pub fn callback(mut self, callback: impl ModuleCallback + 'static) -> Self {
        self.callback = Some(Rc::new(callback));
        self
    }

    /// Sets a distinguishing name for the wrapped callback.
    pub fn callback_name(mut self, name: impl Into<String>) -> Self {
        self.callback_name = Some(name.into());
        self
    }

    /// Adds a literature reference users of the module should cite.
    pub fn citation(mut self, citation: impl Into<String>) -> Self {
        self.citations.push(citation.into());
        self
    }

    /// Sets a detailed description of what the callback does.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declares a module-specific input with no bound value.
    pub fn input(mut self, name: impl Into<String>) -> Self {
        self.inputs.insert(name.into(), None);
        self
    }

    /// Declares a module-specific input with a bound value.
    pub fn input_with_value(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.inputs.insert(name.into(), Some(value.into()));
        self
    }

    /// Declares a property type the callback can be run as.
    pub fn property_type(mut self, property_type: PropertyType) -> Self {
        self.property_types.insert(property_type);
        self
    }

    /// Declares an additional result the callback returns beyond those
    /// of its property types.
    pub fn result(mut self, name: impl Into<String>) -> Self {
        self.results.insert(name.into());
        self
    }

    /// Declares an unbound submodule callback point.
    pub fn submod(mut self, point: impl Into<String>, property_type: PropertyType) -> Self {
        self.submods
            .declare(SubmodKey::new(point, property_type), None);
        self
    }

    /// Declares a submodule callback point with a module already bound
    /// to it.
    pub fn bound_submod(
        mut self,
        point: impl Into<String>,
        property_type: PropertyType,
        module: Module,
    ) -> Self {
        self.submods.declare(
            SubmodKey::new(point, property_type),
            Some(Rc::new(RefCell::new(module))),
        );
        self
    }

    /// Builds the module. The result starts unlocked and memoizable
    /// with an empty cache.
    pub fn build(self) -> Module {
        Module {
            callback: self.callback,
            callback_name: self.callback_name,
            citations: self.citations,
            description: self.description,
            inputs: self.inputs,
            property_types: self.property_types,
            results: self.results,
            submods: self.submods,
            unlocked: true,
            memoizable: true,
            cache: std::collections::HashMap::new(),
        }
    }
}
