//! Command sequence for one edge: clean-up skim, then two zigzag blocks,
//! one per clamp orientation.

use serde::Serialize;
use tracing::debug;

use crate::config::{JobConfig, YConvention};
use crate::planner::EdgePlan;

use super::command::{Command, ZeroReturn};
use super::{GenerateError, Phase, PhaseTracker};

/// X overtravel past the far end of the part on a forward sweep
pub const OVERTRAVEL: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Edge {
    Long,
    Short,
}

impl Edge {
    pub fn name(self) -> &'static str {
        match self {
            Edge::Long => "long",
            Edge::Short => "short",
        }
    }
}

impl std::fmt::Display for Edge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} edge", self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Forward,
    Reverse,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Reverse,
            Direction::Reverse => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pass {
    pub depth: f64,
    pub direction: Direction,
    pub feed_rate: f64,
}

/// Positions and heights for cutting one edge, derived from the job record
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSetup {
    pub edge: Edge,
    /// Stock above the nominal dimension this edge squares to
    pub allowance: f64,
    /// Z of depth zero: opposite nominal plus the parallels for this edge
    pub reference_z: f64,
    /// Clearance height above the raw stock, also the tool offset height
    pub safe_z: f64,
    pub y: f64,
    pub start_x: f64,
    pub end_x: f64,
}

impl EdgeSetup {
    pub fn new(edge: Edge, config: &JobConfig) -> Self {
        let w = &config.workpiece;
        let s = &config.stock;
        let (sweep, opposite_nominal, opposite_actual, fixture) = match edge {
            Edge::Long => (
                w.long_nominal,
                w.short_nominal,
                s.short_actual,
                config.fixture.parallel_block_long,
            ),
            Edge::Short => (
                w.short_nominal,
                w.long_nominal,
                s.long_actual,
                config.fixture.parallel_block_short,
            ),
        };

        let half_thickness = w.thickness / 2.0;
        let y = match (edge, config.conventions.y_convention) {
            (Edge::Short, YConvention::Mirrored) => -half_thickness,
            _ => half_thickness,
        };

        let radius = config.tool.radius();
        Self {
            edge,
            allowance: opposite_actual - opposite_nominal,
            reference_z: opposite_nominal + fixture,
            safe_z: opposite_actual.max(opposite_nominal) + fixture + config.safety.safe_z_distance,
            y,
            start_x: -(config.safety.safe_tool_distance + radius),
            end_x: sweep + OVERTRAVEL + radius,
        }
    }

    pub fn pass_z(&self, depth: f64) -> f64 {
        self.reference_z - depth
    }

    fn sweep_target(&self, direction: Direction) -> f64 {
        match direction {
            Direction::Forward => self.end_x,
            Direction::Reverse => self.start_x,
        }
    }
}

/// Split the adjustment depths into the two clamp-orientation blocks and
/// assign directions and feeds.
///
/// Each block starts forward and alternates; the final pass of a block cuts at
/// half feed. Direction is not flipped after the last pass of the last block.
pub fn zigzag(plan: &EdgePlan, feed_rate: f64) -> [Vec<Pass>; 2] {
    let split = plan.first_half_len();
    let (first, second) = plan.adjustment_depths.split_at(split);
    let halves = [first, second];
    let last_block = halves.iter().rposition(|h| !h.is_empty());

    let mut blocks: [Vec<Pass>; 2] = [Vec::new(), Vec::new()];
    for (b, depths) in halves.iter().enumerate() {
        let mut direction = Direction::Forward;
        for (i, &depth) in depths.iter().enumerate() {
            let last_in_block = i + 1 == depths.len();
            blocks[b].push(Pass {
                depth,
                direction,
                feed_rate: if last_in_block { feed_rate / 2.0 } else { feed_rate },
            });
            if !(last_in_block && Some(b) == last_block) {
                direction = direction.flipped();
            }
        }
    }
    blocks
}

/// Emit the full command sequence for one edge into `out`
///
/// `next` is the edge cut after this one, if any. Its own tool offset follows
/// the last pause, so this edge's offset is not re-applied there.
pub(crate) fn emit_edge(
    out: &mut Vec<Command>,
    phases: &mut PhaseTracker,
    setup: &EdgeSetup,
    plan: &EdgePlan,
    config: &JobConfig,
    next: Option<Edge>,
) -> Result<(), GenerateError> {
    let feed = config.cutting.feed_rate;
    let plunge_feed = feed / 2.0;

    debug!(
        edge = setup.edge.name(),
        allowance = setup.allowance,
        safe_z = setup.safe_z,
        y = setup.y,
        "emitting edge"
    );

    out.push(Command::Comment(format!(
        "{} - allowance {:.2}, {} passes",
        setup.edge,
        setup.allowance,
        plan.pass_count()
    )));

    // Clean-up skim shares the first clamp orientation, so no pause follows it
    phases.advance(Phase::CuttingCleanup)?;
    out.push(Command::Comment(format!("clean-up {:.2}", plan.cleanup_depth)));
    approach(out, setup);
    if plan.cleanup_depth > 0.0 {
        out.push(Command::feed_z(setup.pass_z(plan.cleanup_depth), plunge_feed));
        out.push(Command::feed_x(setup.end_x, plunge_feed));
    }
    out.push(Command::rapid_z(setup.safe_z));
    out.push(Command::CoolantOff);
    phases.advance(Phase::Positioning)?;

    for (n, block) in zigzag(plan, feed).iter().enumerate() {
        phases.advance(Phase::CuttingAdjustment)?;
        out.push(Command::Comment(format!("clamp orientation {}", n + 1)));
        approach(out, setup);
        for pass in block {
            out.push(Command::feed_z(setup.pass_z(pass.depth), plunge_feed));
            out.push(Command::feed_x(setup.sweep_target(pass.direction), pass.feed_rate));
        }
        out.push(Command::rapid_z(setup.safe_z));
        out.push(Command::CoolantOff);

        let reclamp = match (n, next) {
            (0, _) => Reclamp::Rotate,
            (_, Some(edge)) => Reclamp::NextEdge(edge),
            (_, None) => Reclamp::Unload,
        };
        phases.advance(Phase::Paused)?;
        operator_pause(out, setup, config, reclamp);
        phases.advance(Phase::Positioning)?;
    }

    Ok(())
}

fn approach(out: &mut Vec<Command>, setup: &EdgeSetup) {
    out.push(Command::rapid_z(setup.safe_z));
    out.push(Command::rapid_xy(setup.start_x, setup.y));
    out.push(Command::CoolantOn);
}

/// What the operator does with the part at a pause
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reclamp {
    /// Between the two halves of one edge
    Rotate,
    NextEdge(Edge),
    Unload,
}

impl Reclamp {
    fn instruction(self) -> String {
        match self {
            Reclamp::Rotate => "rotate part 180 degrees".to_string(),
            Reclamp::NextEdge(edge) => format!("re-clamp part for {}", edge),
            Reclamp::Unload => "unload part".to_string(),
        }
    }
}

fn operator_pause(
    out: &mut Vec<Command>,
    setup: &EdgeSetup,
    config: &JobConfig,
    reclamp: Reclamp,
) {
    out.push(Command::AxisZeroReturn(ZeroReturn::Z));
    out.push(Command::SpindleOff);
    out.push(Command::Comment(reclamp.instruction()));
    out.push(Command::Pause);
    out.push(Command::SpindleOn {
        rpm: config.cutting.spindle_speed,
    });
    out.push(Command::CoordinateReset(config.conventions.work_offset));
    let next_edge_offset_follows = matches!(reclamp, Reclamp::NextEdge(_));
    if config.conventions.reapply_tool_offset && !next_edge_offset_follows {
        out.push(Command::ToolOffset {
            tool: config.tool.number,
            z: setup.safe_z,
        });
    }
}
