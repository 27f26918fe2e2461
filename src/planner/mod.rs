//! Pass planning for one edge
//!
//! Splits an edge's stock allowance into a shallow clean-up skim and a
//! sequence of cumulative adjustment depths, the last of which lands exactly
//! on the allowance.

use thiserror::Error;
use tracing::debug;

use crate::config::CleanupPolicy;

/// Remainders below this are float noise, not another pass
const REMAINDER_EPSILON: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanError {
    #[error("depth of cut must be positive, got {0}")]
    InvalidDepthOfCut(f64),

    #[error("stock allowance must be a finite number, got {0}")]
    NonFiniteAllowance(f64),

    #[error("invalid cleanup policy: fraction {fraction} in [{min}, {max}]")]
    InvalidPolicy { fraction: f64, min: f64, max: f64 },
}

/// Depths for one edge, all measured from the raw-stock surface
#[derive(Debug, Clone, PartialEq)]
pub struct EdgePlan {
    pub allowance: f64,
    pub cleanup_depth: f64,
    /// Cumulative depth after each adjustment pass, non-decreasing
    pub adjustment_depths: Vec<f64>,
}

impl EdgePlan {
    /// Stock left after the clean-up skim
    pub fn remaining(&self) -> f64 {
        (self.allowance - self.cleanup_depth).max(0.0)
    }

    pub fn pass_count(&self) -> usize {
        self.adjustment_depths.len()
    }

    /// Number of passes in the first clamp orientation
    pub fn first_half_len(&self) -> usize {
        self.pass_count().div_ceil(2)
    }
}

pub fn plan(
    allowance: f64,
    depth_of_cut: f64,
    policy: &CleanupPolicy,
) -> Result<EdgePlan, PlanError> {
    if !(depth_of_cut.is_finite() && depth_of_cut > 0.0) {
        return Err(PlanError::InvalidDepthOfCut(depth_of_cut));
    }
    if !allowance.is_finite() {
        return Err(PlanError::NonFiniteAllowance(allowance));
    }
    let policy_ok = [policy.fraction, policy.min, policy.max]
        .iter()
        .all(|v| v.is_finite())
        && policy.min <= policy.max;
    if !policy_ok {
        return Err(PlanError::InvalidPolicy {
            fraction: policy.fraction,
            min: policy.min,
            max: policy.max,
        });
    }

    if allowance <= 0.0 {
        debug!(allowance, "no stock to remove");
        return Ok(EdgePlan {
            allowance,
            cleanup_depth: 0.0,
            adjustment_depths: Vec::new(),
        });
    }

    let cleanup_depth = policy.clamp(allowance);
    let remaining = allowance - cleanup_depth;

    let passes = if remaining <= 0.0 {
        0
    } else {
        let whole = (remaining / depth_of_cut).floor();
        let remainder = remaining - whole * depth_of_cut;
        whole as usize + usize::from(remainder > REMAINDER_EPSILON)
    };

    let mut adjustment_depths = (1..=passes)
        .map(|i| (cleanup_depth + i as f64 * depth_of_cut).min(allowance))
        .collect::<Vec<_>>();
    // The summed depth can round just short of the allowance
    if let Some(last) = adjustment_depths.last_mut() {
        *last = allowance;
    }

    debug!(
        allowance,
        cleanup_depth,
        remaining,
        passes,
        "planned edge"
    );

    Ok(EdgePlan {
        allowance,
        cleanup_depth,
        adjustment_depths,
    })
}
