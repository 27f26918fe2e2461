/// Syntax tree for `.blank` job descriptions
/// Every statement is optional at parse time; the config step decides what is mandatory.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct JobFile {
    pub units: Option<Units>,
    pub work_offset: Option<WorkOffset>,
    pub material: Option<String>,
    pub part: Option<PartDims>,
    pub stock: Option<StockDims>,
    pub parallels: Option<Parallels>,
    pub tool: Option<ToolRef>,
    pub spindle_rpm: Option<f64>,
    pub feed_rate: Option<f64>,
    pub depth_of_cut: Option<f64>,
    pub safe: Option<SafeDistances>,
    pub cleanup: Option<CleanupSpec>,
    pub mirror_y: Option<bool>,
    pub reapply_offset: Option<bool>,
    pub debug: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,    // G21
    Imperial,  // G20
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WorkOffset {
    #[default]
    G54,
    G55,
    G56,
    G57,
    G58,
    G59,
}

impl WorkOffset {
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            54 => Some(WorkOffset::G54),
            55 => Some(WorkOffset::G55),
            56 => Some(WorkOffset::G56),
            57 => Some(WorkOffset::G57),
            58 => Some(WorkOffset::G58),
            59 => Some(WorkOffset::G59),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            WorkOffset::G54 => "G54",
            WorkOffset::G55 => "G55",
            WorkOffset::G56 => "G56",
            WorkOffset::G57 => "G57",
            WorkOffset::G58 => "G58",
            WorkOffset::G59 => "G59",
        }
    }
}

/// `part long <n> short <n> thickness <n>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartDims {
    pub long: f64,
    pub short: f64,
    pub thickness: f64,
}

/// `stock long <n> short <n>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StockDims {
    pub long: f64,
    pub short: f64,
}

/// `parallels long <n> short <n>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Parallels {
    pub long: f64,
    pub short: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolRef {
    pub number: u8,
    pub source: ToolSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ToolSource {
    /// `tool 10 dia 40`
    Diameter(f64),
    /// `tool 10 "FM_40_5FL"`
    Library(String),
}

/// `safe z <n> x <n>`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SafeDistances {
    pub z: f64,
    pub x: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CleanupSpec {
    Standard,
    Wide,
    Custom { fraction: f64, min: f64, max: f64 },
}
