//! Blanking job configuration
//!
//! `JobConfig` is the record the planner and assembler consume. It is built
//! either by deserializing JSON directly or from a parsed `.blank` job via
//! [`build`], which is the only place the material lookup and tool library
//! are consulted.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::ast::{CleanupSpec, JobFile, ToolSource, Units, WorkOffset};
use crate::black_book::{BlackBookError, CuttingDataLookup, ToolGeometry, ToolMaterial};
use crate::tool_library::ToolLibrary;

/// Target dimensions of the finished blank (mm)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorkpieceGeometry {
    pub long_nominal: f64,
    pub short_nominal: f64,
    pub thickness: f64,
}

/// As-sawn dimensions of the raw stock
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawStock {
    pub long_actual: f64,
    pub short_actual: f64,
}

/// Parallel blocks under the part, one height per edge setup
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FixtureOffsets {
    pub parallel_block_long: f64,
    pub parallel_block_short: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToolParameters {
    /// T-number, also used as the H register for the length offset
    pub number: u8,
    pub diameter: f64,
}

impl ToolParameters {
    pub fn radius(&self) -> f64 {
        self.diameter / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CuttingParameters {
    pub feed_rate: f64,
    pub spindle_speed: f64,
    pub depth_of_cut: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyParameters {
    /// Clearance above the highest face of the part
    pub safe_z_distance: f64,
    /// Clearance between the tool periphery and the part before entry
    pub safe_tool_distance: f64,
}

impl Default for SafetyParameters {
    fn default() -> Self {
        Self {
            safe_z_distance: 10.0,
            safe_tool_distance: 5.0,
        }
    }
}

/// Skim depth is `allowance * fraction`, clamped into `[min, max]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CleanupPolicy {
    pub fraction: f64,
    pub min: f64,
    pub max: f64,
}

impl CleanupPolicy {
    pub const STANDARD: CleanupPolicy = CleanupPolicy {
        fraction: 0.1,
        min: 0.1,
        max: 0.5,
    };

    pub const WIDE: CleanupPolicy = CleanupPolicy {
        fraction: 0.1,
        min: 0.1,
        max: 1.0,
    };

    pub fn clamp(&self, allowance: f64) -> f64 {
        (allowance * self.fraction).clamp(self.min, self.max)
    }
}

impl Default for CleanupPolicy {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Where the Y sweep line sits for each edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YConvention {
    /// Long edge at +thickness/2, short edge at -thickness/2
    #[default]
    Mirrored,
    /// Both edges at +thickness/2
    Uniform,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgramConventions {
    pub units: Units,
    pub work_offset: WorkOffset,
    pub y_convention: YConvention,
    pub reapply_tool_offset: bool,
}

impl Default for ProgramConventions {
    fn default() -> Self {
        Self {
            units: Units::Metric,
            work_offset: WorkOffset::G54,
            y_convention: YConvention::Mirrored,
            reapply_tool_offset: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobConfig {
    pub workpiece: WorkpieceGeometry,
    pub stock: RawStock,
    #[serde(default)]
    pub fixture: FixtureOffsets,
    pub tool: ToolParameters,
    pub cutting: CuttingParameters,
    #[serde(default)]
    pub safety: SafetyParameters,
    #[serde(default)]
    pub cleanup: CleanupPolicy,
    #[serde(default)]
    pub conventions: ProgramConventions,
    #[serde(default)]
    pub debug: bool,
}

impl JobConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required statement: {0}")]
    Missing(&'static str),

    #[error("tool '{0}' not found in tool library")]
    UnknownTool(String),

    #[error("cutting data lookup failed: {0}")]
    Lookup(#[from] BlackBookError),

    #[error("invalid JSON job record: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flute count and tool material assumed for a bare `tool N dia D` statement
const DEFAULT_FLUTES: u8 = 5;

/// Resolve a parsed job into a configuration record.
///
/// Feed and spindle speed come from the job when given; otherwise they are
/// looked up for the job's material and tool. The lookup and library are
/// injected so the core never reads a global table.
pub fn build(
    job: &JobFile,
    lookup: &dyn CuttingDataLookup,
    tools: &ToolLibrary,
) -> Result<JobConfig, ConfigError> {
    let part = job.part.ok_or(ConfigError::Missing("part"))?;
    let stock = job.stock.ok_or(ConfigError::Missing("stock"))?;
    let tool_ref = job.tool.as_ref().ok_or(ConfigError::Missing("tool"))?;
    let depth_of_cut = job.depth_of_cut.ok_or(ConfigError::Missing("depth"))?;

    let geometry = match &tool_ref.source {
        ToolSource::Diameter(diameter) => ToolGeometry {
            diameter: *diameter,
            flute_count: DEFAULT_FLUTES,
            tool_material: ToolMaterial::Carbide,
            max_rpm: None,
        },
        ToolSource::Library(id) => {
            let def = tools
                .get(id)
                .ok_or_else(|| ConfigError::UnknownTool(id.clone()))?;
            debug!(tool = %def.id, diameter = def.diameter, "resolved tool from library");
            def.geometry()
        }
    };

    let (feed_rate, spindle_speed) = match (job.feed_rate, job.spindle_rpm) {
        (Some(feed), Some(rpm)) => (feed, rpm),
        (feed, rpm) => {
            let material = job.material.as_deref().ok_or(if feed.is_none() {
                ConfigError::Missing("feed")
            } else {
                ConfigError::Missing("spindle rpm")
            })?;
            let data = lookup.cutting_data(material, &geometry)?;
            for warning in &data.warnings {
                warn!(material, "{}", warning);
            }
            (
                feed.unwrap_or(data.feed_rate),
                rpm.unwrap_or(data.rpm as f64),
            )
        }
    };

    let parallels = job.parallels.unwrap_or(crate::ast::Parallels {
        long: 0.0,
        short: 0.0,
    });

    let safety = job
        .safe
        .map(|s| SafetyParameters {
            safe_z_distance: s.z,
            safe_tool_distance: s.x,
        })
        .unwrap_or_default();

    let cleanup = match job.cleanup {
        None | Some(CleanupSpec::Standard) => CleanupPolicy::STANDARD,
        Some(CleanupSpec::Wide) => CleanupPolicy::WIDE,
        Some(CleanupSpec::Custom { fraction, min, max }) => CleanupPolicy { fraction, min, max },
    };

    let defaults = ProgramConventions::default();
    let conventions = ProgramConventions {
        units: job.units.unwrap_or(defaults.units),
        work_offset: job.work_offset.unwrap_or(defaults.work_offset),
        y_convention: match job.mirror_y {
            Some(false) => YConvention::Uniform,
            _ => YConvention::Mirrored,
        },
        reapply_tool_offset: job.reapply_offset.unwrap_or(defaults.reapply_tool_offset),
    };

    Ok(JobConfig {
        workpiece: WorkpieceGeometry {
            long_nominal: part.long,
            short_nominal: part.short,
            thickness: part.thickness,
        },
        stock: RawStock {
            long_actual: stock.long,
            short_actual: stock.short,
        },
        fixture: FixtureOffsets {
            parallel_block_long: parallels.long,
            parallel_block_short: parallels.short,
        },
        tool: ToolParameters {
            number: tool_ref.number,
            diameter: geometry.diameter,
        },
        cutting: CuttingParameters {
            feed_rate,
            spindle_speed,
            depth_of_cut,
        },
        safety,
        cleanup,
        conventions,
        debug: job.debug.unwrap_or(false),
    })
}
