//! The property types of the geometry collection.

use pluginplay_property_type::{PropertyType, PropertyTypeInput};

/// `area (base, height)`: the area of a two-dimensional shape.
pub fn area() -> PropertyType {
    PropertyType::new(
        [
            PropertyTypeInput::required("base"),
            PropertyTypeInput::required("height"),
        ],
        ["area"],
    )
}

/// `volume (base, height, width)`: the volume of a prism.
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

/// `volume (height, radius)`: the volume of a cylinder.
pub fn cylinder_volume() -> PropertyType {
    PropertyType::new(
        [
            PropertyTypeInput::required("height"),
            PropertyTypeInput::required("radius"),
        ],
        ["volume"],
    )
}
