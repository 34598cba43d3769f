//! # PluginPlay Property Types
//!
//! Every module in PluginPlay is ultimately invoked through a keyed-map
//! calling convention: a map from input names to values goes in, a map
//! from result names to values comes out. A [`PropertyType`] layers a
//! stable positional calling convention over that, so a module that can
//! compute, say, an area can be called as
//!
//! ```
//! # use pluginplay_property_type::{PropertyType, PropertyTypeInput, UnwrappedValues};
//! # use pluginplay_value::Value;
//! # use indexmap::IndexMap;
//! let area = PropertyType::new(
//!     [
//!         PropertyTypeInput::required("base"),
//!         PropertyTypeInput::required("height"),
//!     ],
//!     ["area"],
//! );
//!
//! let mut inputs = IndexMap::new();
//! area.wrap_inputs(&mut inputs, &[Value::from(1.2), Value::from(3.4)])
//!     .expect("two arguments fit two declared inputs");
//! assert_eq!(inputs.get("base"), Some(&Value::from(1.2)));
//! ```
//!
//! rather than by spelling the input names at every call site. Two
//! modules declaring the same property type are interchangeable at that
//! call site, which is what lets front ends swap implementations without
//! touching the pipeline.
//!
//! Property types are immutable after construction and compare
//! structurally: two instances declaring the same inputs (with the same
//! defaults) and the same results are the same property type, wherever
//! they were built. Hashing is consistent with that equality, so
//! property types can key the submodule tables inside modules.

mod error;
mod unwrapped;

use indexmap::IndexMap;
use pluginplay_value::Value;

pub use error::PropertyTypeError;
pub use unwrapped::UnwrappedValues;

/// One declared input of a [`PropertyType`]: a name and an optional
/// default value.
///
/// Inputs without a default must be supplied positionally at every
/// call; inputs with a default may be omitted from the tail of the
/// argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyTypeInput {
    name: String,
    default: Option<Value>,
}

impl PropertyTypeInput {
    /// Declares an input with no default value.
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Declares an input with a default value.
    pub fn with_default(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    /// Returns the name of the input.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default value of the input, if one was declared.
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// An ordered input/output contract defining a positional calling
/// convention over the keyed-map convention used internally by modules.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyType {
    inputs: Vec<PropertyTypeInput>,
    results: Vec<String>,
}

impl PropertyType {
    /// Creates a property type from its declared inputs and results.
    ///
    /// Declaration order is the positional order at call sites.
    ///
    /// # Panics
    ///
    /// Panics if two inputs or two results share a name. Duplicate
    /// names are a defect in the plugin declaring the property type,
    /// not a runtime condition.
    pub fn new(
        inputs: impl IntoIterator<Item = PropertyTypeInput>,
        results: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        let inputs: Vec<_> = inputs.into_iter().collect();
        let results: Vec<String> = results.into_iter().map(Into::into).collect();

        for (i, input) in inputs.iter().enumerate() {
            assert!(
                !inputs[..i].iter().any(|other| other.name == input.name),
                "duplicate input name: {}",
                input.name
            );
        }
        for (i, result) in results.iter().enumerate() {
            assert!(
                !results[..i].contains(result),
                "duplicate result name: {result}"
            );
        }

        Self { inputs, results }
    }

    /// Returns the declared inputs in positional order.
    pub fn inputs(&self) -> &[PropertyTypeInput] {
        &self.inputs
    }

    /// Returns the declared result names in positional order.
    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// Merges positional arguments into the provided input map.
    ///
    /// The first `args.len()` declared inputs take the given values;
    /// the remaining declared inputs take their default values. Keys in
    /// `inputs` that are not declared by this property type are left
    /// untouched; declared keys already present are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `PropertyTypeError::TooManyArguments` if more arguments
    /// are supplied than inputs are declared.
    ///
    /// Returns `PropertyTypeError::MissingDefault` if a declared input
    /// beyond the supplied arguments has no default value.
    pub fn wrap_inputs(
        &self,
        inputs: &mut IndexMap<String, Value>,
        args: &[Value],
    ) -> Result<(), PropertyTypeError> {
        if args.len() > self.inputs.len() {
            return Err(PropertyTypeError::TooManyArguments {
                max: self.inputs.len(),
                actual: args.len(),
            });
        }

        for (input, arg) in self.inputs.iter().zip(args) {
            inputs.insert(input.name.clone(), arg.clone());
        }

        // Remaining declared inputs are default initialized.
        for input in &self.inputs[args.len()..] {
            let Some(default) = &input.default else {
                return Err(PropertyTypeError::MissingDefault(input.name.clone()));
            };
            inputs.insert(input.name.clone(), default.clone());
        }

        Ok(())
    }

    /// Merges positional return values into the provided result map.
    ///
    /// Unlike inputs, results have no defaults: exactly one value per
    /// declared result must be supplied. Keys in `results` that are not
    /// declared by this property type are left untouched; declared keys
    /// already present are overwritten.
    ///
    /// # Errors
    ///
    /// Returns `PropertyTypeError::ResultArityMismatch` if the number of
    /// values differs from the number of declared results.
    pub fn wrap_results(
        &self,
        results: &mut IndexMap<String, Value>,
        values: &[Value],
    ) -> Result<(), PropertyTypeError> {
        if values.len() != self.results.len() {
            return Err(PropertyTypeError::ResultArityMismatch {
                expected: self.results.len(),
                actual: values.len(),
            });
        }

        for (name, value) in self.results.iter().zip(values) {
            results.insert(name.clone(), value.clone());
        }

        Ok(())
    }

    /// Pulls the declared inputs out of a keyed map, in declared order.
    ///
    /// This is the inverse of [`wrap_inputs`](Self::wrap_inputs) and is
    /// what module callbacks use to destructure the input map they are
    /// handed.
    ///
    /// # Errors
    ///
    /// Returns `PropertyTypeError::MissingInput` if a declared input is
    /// absent from the map.
    pub fn unwrap_inputs(
        &self,
        inputs: &IndexMap<String, Value>,
    ) -> Result<UnwrappedValues, PropertyTypeError> {
        let mut values = Vec::with_capacity(self.inputs.len());
        for input in &self.inputs {
            let Some(value) = inputs.get(&input.name) else {
                return Err(PropertyTypeError::MissingInput(input.name.clone()));
            };
            values.push(value.clone());
        }
        Ok(UnwrappedValues::from_values(values))
    }

    /// Pulls the declared results out of a keyed map, in declared order.
    ///
    /// # Errors
    ///
    /// Returns `PropertyTypeError::MissingResult` if a declared result
    /// is absent from the map.
    pub fn unwrap_results(
        &self,
        results: &IndexMap<String, Value>,
    ) -> Result<UnwrappedValues, PropertyTypeError> {
        let mut values = Vec::with_capacity(self.results.len());
        for name in &self.results {
            let Some(value) = results.get(name) else {
                return Err(PropertyTypeError::MissingResult(name.clone()));
            };
            values.push(value.clone());
        }
        Ok(UnwrappedValues::from_values(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod helper {
        use super::*;

        /// Effective signature: `result 0 (input 0)`
        pub fn pt0() -> PropertyType {
            PropertyType::new([PropertyTypeInput::required("input 0")], ["result 0"])
        }

        /// Effective signature: `result 0 (input 0, input 1 = 42)`
        pub fn pt1() -> PropertyType {
            PropertyType::new(
                [
                    PropertyTypeInput::required("input 0"),
                    PropertyTypeInput::with_default("input 1", 42.0),
                ],
                ["result 0"],
            )
        }

        /// Effective signature: `result 0, result 1 (input 0, input 1 = 42)`
        pub fn pt2() -> PropertyType {
            PropertyType::new(
                [
                    PropertyTypeInput::required("input 0"),
                    PropertyTypeInput::with_default("input 1", 42.0),
                ],
                ["result 0", "result 1"],
            )
        }
    }

    #[test]
    fn declared_inputs() {
        let pt1 = helper::pt1();
        let inputs = pt1.inputs();
        assert_eq!(inputs.len(), 2);
        assert_eq!(inputs[0].name(), "input 0");
        assert_eq!(inputs[0].default(), None);
        assert_eq!(inputs[1].name(), "input 1");
        assert_eq!(inputs[1].default(), Some(&Value::from(42.0)));
    }

    #[test]
    fn declared_results() {
        assert_eq!(helper::pt0().results(), ["result 0"]);
        assert_eq!(helper::pt2().results(), ["result 0", "result 1"]);
    }

    #[test]
    #[should_panic(expected = "duplicate input name")]
    fn duplicate_input_names_panic() {
        let _ = PropertyType::new(
            [
                PropertyTypeInput::required("x"),
                PropertyTypeInput::required("x"),
            ],
            ["y"],
        );
    }

    #[test]
    fn wrap_inputs_fills_positionally() {
        let mut inputs = IndexMap::new();
        helper::pt0()
            .wrap_inputs(&mut inputs, &[Value::from(2.0)])
            .expect("one argument fits one declared input");
        assert_eq!(inputs, IndexMap::from([("input 0".to_string(), Value::from(2.0))]));
    }

    #[test]
    fn wrap_inputs_overwrites_and_defaults() {
        // Overwrites an existing declared key and fills the default.
        let mut inputs = IndexMap::from([("input 0".to_string(), Value::from(10.0))]);
        helper::pt1()
            .wrap_inputs(&mut inputs, &[Value::from(2.0)])
            .expect("default covers the second input");
        assert_eq!(
            inputs,
            IndexMap::from([
                ("input 0".to_string(), Value::from(2.0)),
                ("input 1".to_string(), Value::from(42.0)),
            ])
        );
    }

    #[test]
    fn wrap_inputs_leaves_unrecognized_keys_alone() {
        let mut inputs = IndexMap::from([("hello".to_string(), Value::from("world"))]);
        helper::pt2()
            .wrap_inputs(&mut inputs, &[Value::from(2.0), Value::from(10.0)])
            .expect("two arguments fit two declared inputs");
        assert_eq!(inputs.get("hello"), Some(&Value::from("world")));
        assert_eq!(inputs.get("input 0"), Some(&Value::from(2.0)));
        assert_eq!(inputs.get("input 1"), Some(&Value::from(10.0)));
    }

    #[test]
    fn wrap_inputs_boundaries() {
        let pt0 = helper::pt0();

        let mut inputs = IndexMap::new();
        assert_eq!(
            pt0.wrap_inputs(&mut inputs, &[Value::from(2.0), Value::from(3.0)]),
            Err(PropertyTypeError::TooManyArguments { max: 1, actual: 2 })
        );

        let mut inputs = IndexMap::new();
        assert_eq!(
            pt0.wrap_inputs(&mut inputs, &[]),
            Err(PropertyTypeError::MissingDefault("input 0".to_string()))
        );
    }

    #[test]
    fn wrap_results_exact_arity() {
        let mut results = IndexMap::new();
        helper::pt0()
            .wrap_results(&mut results, &[Value::from(3.0)])
            .expect("one value fits one declared result");
        assert_eq!(results.get("result 0"), Some(&Value::from(3.0)));

        // Overrides the existing result, leaves foreign keys alone.
        let mut results = IndexMap::from([
            ("result 0".to_string(), Value::from(1.0)),
            ("result a".to_string(), Value::from(9.0)),
        ]);
        helper::pt2()
            .wrap_results(&mut results, &[Value::from(2.0), Value::from(42.0)])
            .expect("two values fit two declared results");
        assert_eq!(results.get("result 0"), Some(&Value::from(2.0)));
        assert_eq!(results.get("result 1"), Some(&Value::from(42.0)));
        assert_eq!(results.get("result a"), Some(&Value::from(9.0)));

        let mut results = IndexMap::new();
        assert_eq!(
            helper::pt0().wrap_results(&mut results, &[Value::from(1.0), Value::from(2.0)]),
            Err(PropertyTypeError::ResultArityMismatch {
                expected: 1,
                actual: 2
            })
        );
        assert_eq!(
            helper::pt0().wrap_results(&mut results, &[]),
            Err(PropertyTypeError::ResultArityMismatch {
                expected: 1,
                actual: 0
            })
        );
    }

    #[test]
    fn unwrap_inputs_shapes() {
        let inputs = IndexMap::from([
            ("input 0".to_string(), Value::from(0.0)),
            ("input 1".to_string(), Value::from(1.0)),
            ("input 2".to_string(), Value::from(2.0)),
        ]);

        // One declared input unwraps bare.
        assert_eq!(
            helper::pt0().unwrap_inputs(&inputs),
            Ok(UnwrappedValues::Single(Value::from(0.0)))
        );

        // Multiple declared inputs unwrap as an ordered sequence.
        assert_eq!(
            helper::pt1().unwrap_inputs(&inputs),
            Ok(UnwrappedValues::Multiple(vec![
                Value::from(0.0),
                Value::from(1.0)
            ]))
        );

        assert_eq!(
            helper::pt0().unwrap_inputs(&IndexMap::new()),
            Err(PropertyTypeError::MissingInput("input 0".to_string()))
        );
    }

    #[test]
    fn unwrap_results_shapes() {
        let results = IndexMap::from([
            ("result 0".to_string(), Value::from(0.0)),
            ("result 1".to_string(), Value::from(1.0)),
        ]);

        assert_eq!(
            helper::pt0().unwrap_results(&results),
            Ok(UnwrappedValues::Single(Value::from(0.0)))
        );
        assert_eq!(
            helper::pt2().unwrap_results(&results),
            Ok(UnwrappedValues::Multiple(vec![
                Value::from(0.0),
                Value::from(1.0)
            ]))
        );
        assert_eq!(
            helper::pt0().unwrap_results(&IndexMap::new()),
            Err(PropertyTypeError::MissingResult("result 0".to_string()))
        );
    }

    #[test]
    fn wrap_then_unwrap_round_trips() {
        let pt2 = helper::pt2();
        let args = [Value::from(7.0), Value::from(8.0)];

        let mut inputs = IndexMap::new();
        pt2.wrap_inputs(&mut inputs, &args)
            .expect("two arguments fit two declared inputs");
        assert_eq!(
            pt2.unwrap_inputs(&inputs),
            Ok(UnwrappedValues::Multiple(args.to_vec()))
        );
    }

    #[test]
    fn unwrapped_values_as_slice() {
        // Both shapes expose a uniform slice view for callers that do
        // not care about the single-value asymmetry.
        let single = UnwrappedValues::Single(Value::from(1.0));
        assert_eq!(single.values(), &[Value::from(1.0)]);

        let multiple =
            UnwrappedValues::Multiple(vec![Value::from(1.0), Value::from(2.0)]);
        assert_eq!(multiple.values(), &[Value::from(1.0), Value::from(2.0)]);
    }

    #[test]
    fn structural_comparison() {
        assert_eq!(helper::pt0(), helper::pt0());

        // Different default value.
        let diff_default =
            PropertyType::new([PropertyTypeInput::with_default("input 0", 42.0)], ["result 0"]);
        assert_ne!(helper::pt0(), diff_default);

        // Different inputs.
        assert_ne!(helper::pt0(), helper::pt1());

        // Different results.
        assert_ne!(helper::pt1(), helper::pt2());
    }

    #[test]
    fn hash_consistent_with_equality() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let hash_of = |pt: &PropertyType| {
            let mut hasher = DefaultHasher::new();
            pt.hash(&mut hasher);
            hasher.finish()
        };

        assert_eq!(hash_of(&helper::pt1()), hash_of(&helper::pt1()));
    }
}
