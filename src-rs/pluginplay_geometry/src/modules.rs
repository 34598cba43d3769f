//! The modules of the geometry collection.

use indexmap::IndexMap;

use pluginplay_module::{CallbackError, Module, SubmodMap};
use pluginplay_value::Value;

use crate::property_types::{area, cylinder_volume, prism_volume};

/// Computes the area of a triangle from its base and height.
pub fn triangle() -> Module {
    Module::builder()
        .callback_name("Triangle")
        .property_type(area())
        .callback(|inputs: &IndexMap<String, Value>, _: &SubmodMap| {
            let area = inputs["base"]
                .checked_mul(&inputs["height"])
                .and_then(|bh| bh.checked_mul(&Value::from(0.5)))
                .map_err(|e| CallbackError::new(e.to_string()))?;
            Ok(IndexMap::from([("area".to_string(), area)]))
        })
        .build()
}

/// Computes the area of a square, insisting that base and height agree.
pub fn square() -> Module {
    Module::builder()
        .callback_name("Square")
        .property_type(area())
        .callback(|inputs: &IndexMap<String, Value>, _: &SubmodMap| {
            let equal = inputs["base"]
                .checked_eq(&inputs["height"])
                .map_err(|e| CallbackError::new(e.to_string()))?;
            if !equal {
                return Err(CallbackError::new("Expected base == height"));
            }
            let area = inputs["base"]
                .checked_pow(&Value::from(2.0))
                .map_err(|e| CallbackError::new(e.to_string()))?;
            Ok(IndexMap::from([("area".to_string(), area)]))
        })
        .build()
}

/// Computes the area of a rectangle from its base and height.
pub fn rectangle() -> Module {
    Module::builder()
        .callback_name("Rectangle")
        .property_type(area())
        .callback(|inputs: &IndexMap<String, Value>, _: &SubmodMap| {
            let area = inputs["base"]
                .checked_mul(&inputs["height"])
                .map_err(|e| CallbackError::new(e.to_string()))?;
            Ok(IndexMap::from([("area".to_string(), area)]))
        })
        .build()
}

/// Computes the area of a circle.
///
/// The [`area`] contract has no radius, so the callback insists that
/// base and height agree and treats them as the radius. The value of pi
/// is a module-specific input bound at construction; users who want a
/// cruder or finer constant can rebind it without touching the
/// callback.
pub fn circle() -> Module {
    Module::builder()
        .callback_name("Circle")
        .property_type(area())
        .input_with_value("pi", std::f64::consts::PI)
        .callback(|inputs: &IndexMap<String, Value>, _: &SubmodMap| {
            let equal = inputs["base"]
                .checked_eq(&inputs["height"])
                .map_err(|e| CallbackError::new(e.to_string()))?;
            if !equal {
                return Err(CallbackError::new("Expected base == height"));
            }
            let area = inputs["base"]
                .checked_mul(&inputs["base"])
                .and_then(|r2| r2.checked_mul(&inputs["pi"]))
                .map_err(|e| CallbackError::new(e.to_string()))?;
            Ok(IndexMap::from([("area".to_string(), area)]))
        })
        .build()
}

/// Computes the volume of a cylinder by deferring the area of the cross
/// section to the `circleArea` callback point, which comes pre-bound to
/// [`circle`].
pub fn cylinder() -> Module {
    Module::builder()
        .callback_name("Cylinder")
        .property_type(cylinder_volume())
        .bound_submod("circleArea", area(), circle())
        .callback(|inputs: &IndexMap<String, Value>, submods: &SubmodMap| {
            let radius = inputs["radius"].clone();
            let area = submods
                .run_as("circleArea", &area(), &[radius.clone(), radius])
                .map_err(|e| CallbackError::new(e.to_string()))?
                .into_single()
                .ok_or_else(|| CallbackError::new("expected a single area"))?;
            let volume = area
                .checked_mul(&inputs["height"])
                .map_err(|e| CallbackError::new(e.to_string()))?;
            Ok(IndexMap::from([("volume".to_string(), volume)]))
        })
        .build()
}

/// Computes the volume of a prism by deferring the area of the base to
/// the `area` callback point.
///
/// The point ships unbound. Which area module belongs there depends on
/// the shape of the base, so the user wires one in before running.
pub fn prism_volume_by_submod() -> Module {
    Module::builder()
        .callback_name("PrismVolumeBySubmod")
        .description("Computes the volume of a prism")
        .property_type(prism_volume())
        .submod("area", area())
        .callback(|inputs: &IndexMap<String, Value>, submods: &SubmodMap| {
            let values = prism_volume()
                .unwrap_inputs(inputs)
                .map_err(|e| CallbackError::new(e.to_string()))?
                .into_values();
            let [base, height, width] = values
                .try_into()
                .map_err(|_| CallbackError::new("expected base, height, and width"))?;
            let base_area = submods
                .run_as("area", &area(), &[base, height])
                .map_err(|e| CallbackError::new(e.to_string()))?
                .into_single()
                .ok_or_else(|| CallbackError::new("expected a single area"))?;
            let volume = base_area
                .checked_mul(&width)
                .map_err(|e| CallbackError::new(e.to_string()))?;
            Ok(IndexMap::from([("volume".to_string(), volume)]))
        })
        .build()
}
