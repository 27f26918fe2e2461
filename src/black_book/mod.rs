//! The Black Book - face milling data reference
//!
//! Cutting speed and feed-per-tooth recommendations for squaring raw stock
//! with an indexable or solid face mill. Values are metric:
//! - Vc in metres per minute
//! - fz in millimetres per tooth
//! - tool diameters in millimetres
//!
//! The book is handed to the configuration step as a [`CuttingDataLookup`];
//! nothing in the planner or assembler reads it directly.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

pub mod calculations;
pub mod materials;

pub use calculations::*;
pub use materials::*;

/// Cutting tool material type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolMaterial {
    HSS,           // High Speed Steel
    Carbide,       // Uncoated carbide inserts
    CoatedCarbide, // TiAlN, AlTiN coated inserts
}

impl std::fmt::Display for ToolMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ToolMaterial::HSS => write!(f, "HSS"),
            ToolMaterial::Carbide => write!(f, "Carbide"),
            ToolMaterial::CoatedCarbide => write!(f, "Coated Carbide"),
        }
    }
}

/// Face mill geometry as the lookup needs it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolGeometry {
    pub diameter: f64, // mm
    pub flute_count: u8,
    pub tool_material: ToolMaterial,
    pub max_rpm: Option<f64>,
}

/// Recommended cutting data for one material/tool pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CuttingData {
    pub rpm: u32,
    pub feed_rate: f64,     // mm/min
    pub feed_per_tooth: f64, // mm
    pub cutting_speed: f64, // m/min, actual at `rpm`
    pub coolant_recommended: bool,
    pub warnings: Vec<String>,
}

/// Source of feed and speed recommendations for the configuration step
pub trait CuttingDataLookup {
    fn cutting_data(
        &self,
        material: &str,
        tool: &ToolGeometry,
    ) -> Result<CuttingData, BlackBookError>;
}

/// The Black Book - main interface
pub struct BlackBook {
    materials: HashMap<String, MaterialData>,
}

impl BlackBook {
    pub fn new() -> Self {
        Self {
            materials: materials::load_material_database(),
        }
    }

    fn material(&self, name: &str) -> Result<&MaterialData, BlackBookError> {
        self.materials
            .get(name)
            .ok_or_else(|| BlackBookError::UnknownMaterial(name.to_string()))
    }

    /// Get Vc range (min, max) for material and tool material
    pub fn get_speed_range(
        &self,
        material_name: &str,
        tool_material: ToolMaterial,
    ) -> Result<(f64, f64), BlackBookError> {
        let (min, max, _) = calculations::lookup_cutting_speed(self.material(material_name)?, tool_material);
        Ok((min, max))
    }

    /// Get recommended feed per tooth for a face mill diameter
    pub fn get_feed_per_tooth(
        &self,
        material_name: &str,
        tool_diameter: f64,
        tool_material: ToolMaterial,
    ) -> Result<f64, BlackBookError> {
        Ok(calculations::lookup_feed_per_tooth(
            self.material(material_name)?,
            tool_diameter,
            tool_material,
        ))
    }

    /// List all available materials, sorted by name
    pub fn list_materials(&self) -> Vec<&String> {
        let mut names: Vec<_> = self.materials.keys().collect();
        names.sort();
        names
    }

    /// Search materials by category
    pub fn materials_by_category(&self, category: MaterialCategory) -> Vec<&MaterialData> {
        self.materials
            .values()
            .filter(|m| m.category == category)
            .collect()
    }
}

impl CuttingDataLookup for BlackBook {
    fn cutting_data(
        &self,
        material: &str,
        tool: &ToolGeometry,
    ) -> Result<CuttingData, BlackBookError> {
        calculations::compute_cutting_data(self.material(material)?, tool)
    }
}

impl Default for BlackBook {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BlackBookError {
    #[error("unknown material: {0}")]
    UnknownMaterial(String),

    #[error("invalid tool diameter: {0}")]
    InvalidToolDiameter(f64),

    #[error("invalid flute count: {0}")]
    InvalidFluteCount(u8),
}
