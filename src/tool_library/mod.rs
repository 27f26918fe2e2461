//! Tool Library - JSON-based face mill definitions
//!
//! Tools can be defined in a separate JSON file and referenced from a job
//! by ID or name: `tool 10 "FM_50_6FL"`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::black_book::{self, ToolGeometry};

/// Tool type classification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToolType {
    #[serde(rename = "face_mill", alias = "facemill", alias = "FACE_MILL")]
    #[default]
    FaceMill,
    #[serde(rename = "shell_mill", alias = "shellmill", alias = "SHELL_MILL")]
    ShellMill,
    #[serde(rename = "fly_cutter", alias = "flycutter", alias = "FLY_CUTTER")]
    FlyCutter,
    #[serde(rename = "end_mill", alias = "endmill", alias = "END_MILL")]
    EndMill,
}

/// Insert coating types
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToolCoating {
    #[serde(rename = "none", alias = "NONE")]
    #[default]
    None,
    #[serde(rename = "TiN", alias = "TIN")]
    TiN,
    #[serde(rename = "TiAlN", alias = "TIALN")]
    TiAlN,
    #[serde(rename = "AlTiN", alias = "ALTIN")]
    AlTiN,
    #[serde(rename = "diamond", alias = "DIAMOND", alias = "PCD")]
    Diamond,
}

/// Coolant type for tool
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum CoolantType {
    #[serde(rename = "none", alias = "NONE")]
    None,
    #[serde(rename = "flood", alias = "FLOOD")]
    #[default]
    Flood,
    #[serde(rename = "mist", alias = "MIST")]
    Mist,
    #[serde(rename = "air", alias = "AIR")]
    Air,
}

/// Cutter material as spelled in library files
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ToolMaterial {
    #[serde(rename = "hss", alias = "HSS")]
    HSS,
    #[serde(rename = "carbide", alias = "CARBIDE")]
    #[default]
    Carbide,
    #[serde(rename = "coated_carbide", alias = "coated", alias = "COATED_CARBIDE")]
    CoatedCarbide,
}

impl From<ToolMaterial> for black_book::ToolMaterial {
    fn from(material: ToolMaterial) -> Self {
        match material {
            ToolMaterial::HSS => black_book::ToolMaterial::HSS,
            ToolMaterial::Carbide => black_book::ToolMaterial::Carbide,
            ToolMaterial::CoatedCarbide => black_book::ToolMaterial::CoatedCarbide,
        }
    }
}

/// Tool definition from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Tool ID (string identifier like "FM_50_6FL")
    #[serde(rename = "tool_id")]
    pub id: String,

    /// Human-readable name (e.g., "50mm 6-Insert Face Mill")
    pub name: String,

    #[serde(rename = "type", default)]
    pub tool_type: ToolType,

    /// Cutter diameter in mm
    pub diameter: f64,

    /// Number of inserts or flutes
    #[serde(rename = "flute_count")]
    pub flutes: u8,

    #[serde(default)]
    pub material: ToolMaterial,

    /// Optional: Maximum spindle RPM for the body
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rpm: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coating: Option<ToolCoating>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub coolant_type: Option<CoolantType>,
}

impl ToolDefinition {
    /// Geometry handed to the cutting-data lookup
    pub fn geometry(&self) -> ToolGeometry {
        ToolGeometry {
            diameter: self.diameter,
            flute_count: self.flutes,
            tool_material: self.material.into(),
            max_rpm: self.max_rpm,
        }
    }
}

#[derive(Error, Debug)]
pub enum ToolLibraryError {
    #[error("cannot read tool library {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid tool library JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Tool library - collection of tool definitions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolLibrary {
    /// Tools indexed by ID
    #[serde(flatten)]
    pub tools: HashMap<String, ToolDefinition>,
}

impl ToolLibrary {
    /// Load tool library from JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ToolLibraryError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ToolLibraryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ToolLibraryError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Get tool by ID string (e.g., "FM_50_6FL")
    pub fn get_by_id(&self, id: &str) -> Option<&ToolDefinition> {
        self.tools.get(id)
    }

    /// Get tool by name (case-insensitive partial match)
    pub fn get_by_name(&self, name: &str) -> Option<&ToolDefinition> {
        let name_lower = name.to_lowercase();
        // Sorted so a partial match resolves the same way every run
        self.list().into_iter().find(|t| {
            let tool_name = t.name.to_lowercase();
            tool_name == name_lower || tool_name.contains(&name_lower)
        })
    }

    /// Get tool by ID or name
    pub fn get(&self, id_or_name: &str) -> Option<&ToolDefinition> {
        self.get_by_id(id_or_name)
            .or_else(|| self.get_by_name(id_or_name))
    }

    /// Get tools by type
    pub fn get_by_type(&self, tool_type: ToolType) -> Vec<&ToolDefinition> {
        self.list()
            .into_iter()
            .filter(|t| t.tool_type == tool_type)
            .collect()
    }

    /// List all tools, sorted by ID
    pub fn list(&self) -> Vec<&ToolDefinition> {
        let mut tools: Vec<_> = self.tools.values().collect();
        tools.sort_by(|a, b| a.id.cmp(&b.id));
        tools
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

const DEFAULT_LIBRARY: &str = r#"{
    "FM_40_5FL": {
        "tool_id": "FM_40_5FL",
        "name": "40mm 5-Insert Face Mill",
        "type": "face_mill",
        "diameter": 40.0,
        "flute_count": 5,
        "material": "carbide",
        "coating": "TiAlN",
        "max_rpm": 12000,
        "coolant_type": "flood"
    },
    "FM_50_6FL": {
        "tool_id": "FM_50_6FL",
        "name": "50mm 6-Insert Face Mill",
        "type": "face_mill",
        "diameter": 50.0,
        "flute_count": 6,
        "material": "carbide",
        "coating": "TiAlN",
        "max_rpm": 10000,
        "coolant_type": "flood"
    },
    "FM_63_5FL": {
        "tool_id": "FM_63_5FL",
        "name": "63mm 5-Insert Face Mill",
        "type": "face_mill",
        "diameter": 63.0,
        "flute_count": 5,
        "material": "coated_carbide",
        "coating": "AlTiN",
        "max_rpm": 8000,
        "coolant_type": "flood"
    },
    "SM_80_6FL": {
        "tool_id": "SM_80_6FL",
        "name": "80mm 6-Insert Shell Mill",
        "type": "shell_mill",
        "diameter": 80.0,
        "flute_count": 6,
        "material": "coated_carbide",
        "coating": "AlTiN",
        "max_rpm": 6000,
        "coolant_type": "flood"
    },
    "FC_100_1FL": {
        "tool_id": "FC_100_1FL",
        "name": "100mm Fly Cutter",
        "type": "fly_cutter",
        "diameter": 100.0,
        "flute_count": 1,
        "material": "hss",
        "max_rpm": 2500,
        "coolant_type": "mist"
    }
}"#;

/// Default tool library with common face mill sizes
pub fn default_tool_library() -> ToolLibrary {
    ToolLibrary::from_json(DEFAULT_LIBRARY).unwrap_or_default()
}
