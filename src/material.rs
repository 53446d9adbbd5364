//! Material property tables shared by every entity of a given kind.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::errors::CatalogError;

/// Enumerated material kinds available to the sandbox.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MaterialKind {
    /// Softwood timber.
    Wood,
    /// Quarried stone.
    Stone,
    /// Structural steel.
    Steel,
    /// Placeholder material for development scenes.
    Debug,
}

/// Strength and stiffness values in pascals.
///
/// Every field must be strictly positive; `elastic_modulus` and
/// `compressive_strength` are divisors in the stress evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MechanicalProperties {
    /// Compressive strength.
    pub compressive_strength: f64,
    /// Tensile strength.
    pub tensile_strength: f64,
    /// Flexural strength (modulus of rupture).
    pub flexural_strength: f64,
    /// Shear strength.
    pub shear_strength: f64,
    /// Elastic modulus.
    pub elastic_modulus: f64,
}

/// Thermal behavior of a material.
///
/// Carried for completeness; the load simulation does not read these.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThermalProperties {
    /// Thermal conduction in watts per metre-kelvin.
    pub conduction: f64,
    /// Heat capacity in joules per kilogram-kelvin.
    pub capacity: f64,
    /// Length multiplier per kelvin increase.
    pub expansion: f64,
    /// Thermal resistance in square-metre-kelvin per watt.
    pub resistance: f64,
    /// Relative flammability.
    pub flammability: f64,
}

/// Embodied cost of a material, per kilogram.
///
/// Carried for completeness; the load simulation does not read these.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialCost {
    /// Embodied carbon in kilograms of CO2.
    pub carbon: f64,
    /// Embodied energy in kilowatt-hours.
    pub energy: f64,
    /// Monetary cost in USD.
    pub cash: f64,
}

/// Full property table for one material kind.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialProperties {
    /// The kind this table describes.
    pub kind: MaterialKind,
    /// Density in kilograms per cubic metre.
    pub density: f64,
    /// Static friction coefficient.
    pub static_friction: f64,
    /// Dynamic friction coefficient.
    pub dynamic_friction: f64,
    /// Restitution coefficient.
    pub restitution: f64,
    /// Thermal behavior.
    pub thermal: ThermalProperties,
    /// Embodied cost per kilogram.
    pub cost: MaterialCost,
    /// Strength and stiffness values.
    pub mechanical: MechanicalProperties,
    /// Base render tint for entities of this material.
    pub tint: Color,
}

/// Immutable lookup table from material kind to its property table.
///
/// Built once at startup and shared by reference across the scene; entities
/// store only their [`MaterialKind`] key.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MaterialCatalog {
    /// Property tables keyed by kind.
    materials: BTreeMap<MaterialKind, MaterialProperties>,
}

impl MaterialCatalog {
    /// Build the default catalog covering every material kind.
    #[must_use]
    pub fn builtin() -> Self {
        let materials = [wood(), stone(), steel(), debug()]
            .into_iter()
            .map(|properties| (properties.kind, properties))
            .collect();
        Self { materials }
    }

    /// Look up the property table for a kind.
    #[must_use]
    pub fn get(&self, kind: MaterialKind) -> Option<&MaterialProperties> {
        self.materials.get(&kind)
    }

    /// Deserialize a catalog from JSON.
    ///
    /// The result should be passed through [`MaterialCatalog::validate`]
    /// before use, since external tables may carry non-physical values.
    ///
    /// # Errors
    ///
    /// Returns the underlying [`serde_json::Error`] when the document does
    /// not describe a catalog.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the catalog invariants.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::MissingMaterial`] when a kind has no entry,
    /// and [`CatalogError::NonPositiveMechanicalProperty`] or
    /// [`CatalogError::NonPositiveDensity`] when an entry carries a value
    /// that would break the stress evaluator.
    pub fn validate(&self) -> Result<(), CatalogError> {
        for kind in [
            MaterialKind::Wood,
            MaterialKind::Stone,
            MaterialKind::Steel,
            MaterialKind::Debug,
        ] {
            let properties = self
                .materials
                .get(&kind)
                .ok_or(CatalogError::MissingMaterial(kind))?;
            if properties.density <= 0.0 || properties.density.is_nan() {
                return Err(CatalogError::NonPositiveDensity {
                    kind,
                    density: properties.density,
                });
            }
            let mechanical = properties.mechanical;
            for (property, value) in [
                ("compressive strength", mechanical.compressive_strength),
                ("tensile strength", mechanical.tensile_strength),
                ("flexural strength", mechanical.flexural_strength),
                ("shear strength", mechanical.shear_strength),
                ("elastic modulus", mechanical.elastic_modulus),
            ] {
                if value <= 0.0 || value.is_nan() {
                    return Err(CatalogError::NonPositiveMechanicalProperty {
                        kind,
                        property,
                        value,
                    });
                }
            }
        }
        Ok(())
    }
}

impl Default for MaterialCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Softwood timber table.
fn wood() -> MaterialProperties {
    MaterialProperties {
        kind: MaterialKind::Wood,
        density: 600.0,
        static_friction: 0.5,
        dynamic_friction: 0.4,
        restitution: 0.0,
        thermal: ThermalProperties {
            conduction: 0.144,
            capacity: 2380.0,
            expansion: 3.5e-6,
            resistance: 0.1176,
            flammability: 100.0,
        },
        cost: MaterialCost {
            carbon: 1.8,
            energy: 6.0,
            cash: 11.0,
        },
        mechanical: MechanicalProperties {
            compressive_strength: 8_600.0,
            tensile_strength: 5.5e6,
            flexural_strength: 9.9e4,
            shear_strength: 1.23e7,
            elastic_modulus: 1.256e10,
        },
        tint: Color::rgb(0.55, 0.38, 0.21),
    }
}

/// Quarried stone table, granite-like values.
fn stone() -> MaterialProperties {
    MaterialProperties {
        kind: MaterialKind::Stone,
        density: 2_400.0,
        static_friction: 0.6,
        dynamic_friction: 0.5,
        restitution: 0.0,
        thermal: ThermalProperties {
            conduction: 1.7,
            capacity: 840.0,
            expansion: 8.0e-6,
            resistance: 0.08,
            flammability: 0.01,
        },
        cost: MaterialCost {
            carbon: 0.09,
            energy: 0.3,
            cash: 0.07,
        },
        mechanical: MechanicalProperties {
            compressive_strength: 8.0e7,
            tensile_strength: 5.0e6,
            flexural_strength: 1.5e7,
            shear_strength: 2.0e7,
            elastic_modulus: 5.0e10,
        },
        tint: Color::rgb(0.52, 0.52, 0.5),
    }
}

/// Structural steel table.
fn steel() -> MaterialProperties {
    MaterialProperties {
        kind: MaterialKind::Steel,
        density: 8_000.0,
        static_friction: 0.74,
        dynamic_friction: 0.57,
        restitution: 0.0,
        thermal: ThermalProperties {
            conduction: 50.0,
            capacity: 500.0,
            expansion: 1.2e-5,
            resistance: 0.17,
            flammability: 0.45,
        },
        cost: MaterialCost {
            carbon: 2.0,
            energy: 7.0,
            cash: 1.25,
        },
        mechanical: MechanicalProperties {
            compressive_strength: 5.0e6,
            tensile_strength: 6.0e8,
            flexural_strength: 7.0e8,
            shear_strength: 3.0e8,
            elastic_modulus: 2.0e11,
        },
        tint: Color::rgb(0.6, 0.6, 0.65),
    }
}

/// Placeholder table for development scenes.
///
/// Unit mechanical values keep the strict-positivity invariant without
/// pretending to model a real material.
fn debug() -> MaterialProperties {
    MaterialProperties {
        kind: MaterialKind::Debug,
        density: 1.0,
        static_friction: 0.0,
        dynamic_friction: 0.0,
        restitution: 0.0,
        thermal: ThermalProperties {
            conduction: 1.0,
            capacity: 1.0,
            expansion: 1.0,
            resistance: 1.0,
            flammability: 1.0,
        },
        cost: MaterialCost {
            carbon: 0.0,
            energy: 0.0,
            cash: 0.0,
        },
        mechanical: MechanicalProperties {
            compressive_strength: 1.0,
            tensile_strength: 1.0,
            flexural_strength: 1.0,
            shear_strength: 1.0,
            elastic_modulus: 1.0,
        },
        tint: Color::rgb(0.1, 0.35, 0.9),
    }
}
