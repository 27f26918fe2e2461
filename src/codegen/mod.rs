//! Blanking program assembler
//! Turns a validated job record into the ordered machine command sequence

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::JobConfig;
use crate::planner::{self, PlanError};
use crate::validator::{ValidationError, Validator};

pub mod command;
pub mod edge;

pub use command::{Boundary, Command, ZeroReturn};
pub use edge::{Direction, Edge, EdgeSetup, Pass};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum GenerateError {
    #[error("invalid configuration: {}", join_errors(.0))]
    InvalidConfig(Vec<ValidationError>),

    #[error("pass planning failed: {0}")]
    Plan(#[from] PlanError),

    #[error("program phase {to:?} cannot follow {from:?}")]
    PhaseOrder { from: Phase, to: Phase },
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Logical machine state while the program runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Idle,
    Positioning,
    CuttingCleanup,
    CuttingAdjustment,
    Paused,
    Finished,
}

impl Phase {
    pub fn can_transition_to(self, next: Phase) -> bool {
        use Phase::*;
        matches!(
            (self, next),
            (Idle, Positioning)
                | (Positioning, CuttingCleanup)
                | (Positioning, CuttingAdjustment)
                | (Positioning, Finished)
                | (CuttingCleanup, Positioning)
                | (CuttingAdjustment, Paused)
                | (Paused, Positioning)
        )
    }
}

#[derive(Debug)]
pub(crate) struct PhaseTracker {
    trace: Vec<Phase>,
}

impl PhaseTracker {
    fn new() -> Self {
        Self {
            trace: vec![Phase::Idle],
        }
    }

    fn current(&self) -> Phase {
        self.trace.last().copied().unwrap_or(Phase::Idle)
    }

    pub(crate) fn advance(&mut self, next: Phase) -> Result<(), GenerateError> {
        let from = self.current();
        if !from.can_transition_to(next) {
            return Err(GenerateError::PhaseOrder { from, to: next });
        }
        self.trace.push(next);
        Ok(())
    }
}

/// Diagnostic numbers for one edge, produced when the job asks for debug output
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeSummary {
    pub edge: Edge,
    pub cleanup_depth: f64,
    pub remaining: f64,
    pub pass_count: usize,
}

impl std::fmt::Display for EdgeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: clean-up {:.2}, remaining {:.2}, {} adjustment passes",
            self.edge, self.cleanup_depth, self.remaining, self.pass_count
        )
    }
}

/// Widest face a single sweep clears, as a fraction of the cutter diameter
pub const STEP_OVER_RATIO: f64 = 0.65;

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub commands: Vec<Command>,
    /// Empty unless the job set `debug`
    pub summaries: Vec<EdgeSummary>,
    pub phases: Vec<Phase>,
    /// Conditions the program does not handle but still generates for
    pub warnings: Vec<String>,
}

/// Each edge is cut in one row at mid-thickness
fn coverage_warning(config: &JobConfig) -> Option<String> {
    let row_width = config.tool.diameter * STEP_OVER_RATIO;
    let thickness = config.workpiece.thickness;
    (thickness > row_width).then(|| {
        format!(
            "thickness {:.2} is wider than the {:.2} a D{:.2} cutter clears in one row; edge faces will be left partly uncut",
            thickness, row_width, config.tool.diameter
        )
    })
}

/// Build the full blanking program: header, long edge, short edge, footer
pub fn assemble(config: &JobConfig) -> Result<Program, GenerateError> {
    Validator::new()
        .validate_config(config)
        .map_err(GenerateError::InvalidConfig)?;

    let mut commands = Vec::new();
    let mut phases = PhaseTracker::new();
    let mut summaries = Vec::new();
    let mut warnings = Vec::new();

    if let Some(warning) = coverage_warning(config) {
        warn!("{}", warning);
        warnings.push(warning);
    }

    let long = EdgeSetup::new(Edge::Long, config);
    let short = EdgeSetup::new(Edge::Short, config);

    // Plan both edges before emitting anything
    let long_plan = planner::plan(long.allowance, config.cutting.depth_of_cut, &config.cleanup)?;
    let short_plan = planner::plan(short.allowance, config.cutting.depth_of_cut, &config.cleanup)?;

    phases.advance(Phase::Positioning)?;
    emit_header(&mut commands, config, &long);

    let edges = [
        (&long, &long_plan, Some(Edge::Short)),
        (&short, &short_plan, None),
    ];
    for (setup, plan, next) in edges {
        if setup.edge == Edge::Short {
            commands.push(Command::ToolOffset {
                tool: config.tool.number,
                z: setup.safe_z,
            });
        }
        edge::emit_edge(&mut commands, &mut phases, setup, plan, config, next)?;

        if config.debug {
            let summary = EdgeSummary {
                edge: setup.edge,
                cleanup_depth: plan.cleanup_depth,
                remaining: plan.remaining(),
                pass_count: plan.pass_count(),
            };
            info!("{}", summary);
            summaries.push(summary);
        }
    }

    emit_footer(&mut commands, &short);
    phases.advance(Phase::Finished)?;

    info!(
        commands = commands.len(),
        long_passes = long_plan.pass_count(),
        short_passes = short_plan.pass_count(),
        "assembled blanking program"
    );

    Ok(Program {
        commands,
        summaries,
        phases: phases.trace,
        warnings,
    })
}

fn emit_header(out: &mut Vec<Command>, config: &JobConfig, long: &EdgeSetup) {
    let w = &config.workpiece;
    out.push(Command::ProgramBoundary(Boundary::Delimiter));
    out.push(Command::Comment(format!(
        "blank {:.2} x {:.2} x {:.2}",
        w.long_nominal, w.short_nominal, w.thickness
    )));
    out.push(Command::Setup {
        units: config.conventions.units,
    });
    out.push(Command::AxisZeroReturn(ZeroReturn::All));
    out.push(Command::CoordinateReset(config.conventions.work_offset));
    out.push(Command::Comment(format!(
        "T{} face mill D{:.2}",
        config.tool.number, config.tool.diameter
    )));
    out.push(Command::ToolChange {
        tool: config.tool.number,
    });
    out.push(Command::SpindleOn {
        rpm: config.cutting.spindle_speed,
    });
    out.push(Command::ToolOffset {
        tool: config.tool.number,
        z: long.safe_z,
    });
}

fn emit_footer(out: &mut Vec<Command>, last: &EdgeSetup) {
    out.push(Command::rapid_z(last.safe_z));
    out.push(Command::CoolantOff);
    out.push(Command::SpindleOff);
    out.push(Command::rapid_xy(0.0, 0.0));
    out.push(Command::ProgramBoundary(Boundary::End));
    out.push(Command::ProgramBoundary(Boundary::Delimiter));
}
