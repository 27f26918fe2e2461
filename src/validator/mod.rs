use thiserror::Error;

use crate::config::JobConfig;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    #[error("{field} must be positive, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("tool number must be between 1 and 99, got {number}")]
    ToolNumber { number: u8 },

    #[error("cleanup band is inverted: min {min} is above max {max}")]
    CleanupBand { min: f64, max: f64 },

    #[error("spindle speed out of range: {rpm} RPM (max: {max})")]
    SpindleSpeed { rpm: f64, max: f64 },

    #[error("feed rate out of range: {feed} (max: {max})")]
    FeedRate { feed: f64, max: f64 },
}

impl ValidationError {
    /// Dotted path of the offending configuration field
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::NotFinite { field, .. }
            | ValidationError::NotPositive { field, .. }
            | ValidationError::Negative { field, .. } => field,
            ValidationError::ToolNumber { .. } => "tool.number",
            ValidationError::CleanupBand { .. } => "cleanup.min",
            ValidationError::SpindleSpeed { .. } => "cutting.spindle_speed",
            ValidationError::FeedRate { .. } => "cutting.feed_rate",
        }
    }
}

pub struct Validator {
    max_spindle_rpm: f64,
    max_feed_rate: f64,
}

impl Default for Validator {
    fn default() -> Self {
        Self {
            max_spindle_rpm: 20000.0,
            max_feed_rate: 20000.0,
        }
    }
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limits(max_rpm: f64, max_feed: f64) -> Self {
        Self {
            max_spindle_rpm: max_rpm,
            max_feed_rate: max_feed,
        }
    }

    /// Check every field of a job record, collecting all failures
    pub fn validate_config(&self, config: &JobConfig) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let positive = [
            ("workpiece.long_nominal", config.workpiece.long_nominal),
            ("workpiece.short_nominal", config.workpiece.short_nominal),
            ("workpiece.thickness", config.workpiece.thickness),
            ("stock.long_actual", config.stock.long_actual),
            ("stock.short_actual", config.stock.short_actual),
            ("tool.diameter", config.tool.diameter),
            ("cutting.feed_rate", config.cutting.feed_rate),
            ("cutting.spindle_speed", config.cutting.spindle_speed),
            ("cutting.depth_of_cut", config.cutting.depth_of_cut),
            ("safety.safe_z_distance", config.safety.safe_z_distance),
            ("safety.safe_tool_distance", config.safety.safe_tool_distance),
        ];
        for (field, value) in positive {
            if let Err(e) = check_positive(field, value) {
                errors.push(e);
            }
        }

        let non_negative = [
            ("fixture.parallel_block_long", config.fixture.parallel_block_long),
            ("fixture.parallel_block_short", config.fixture.parallel_block_short),
            ("cleanup.fraction", config.cleanup.fraction),
            ("cleanup.min", config.cleanup.min),
            ("cleanup.max", config.cleanup.max),
        ];
        for (field, value) in non_negative {
            if let Err(e) = check_non_negative(field, value) {
                errors.push(e);
            }
        }

        if config.cleanup.min > config.cleanup.max {
            errors.push(ValidationError::CleanupBand {
                min: config.cleanup.min,
                max: config.cleanup.max,
            });
        }

        if !(1..=99).contains(&config.tool.number) {
            errors.push(ValidationError::ToolNumber {
                number: config.tool.number,
            });
        }

        if config.cutting.spindle_speed > self.max_spindle_rpm {
            errors.push(ValidationError::SpindleSpeed {
                rpm: config.cutting.spindle_speed,
                max: self.max_spindle_rpm,
            });
        }

        if config.cutting.feed_rate > self.max_feed_rate {
            errors.push(ValidationError::FeedRate {
                feed: config.cutting.feed_rate,
                max: self.max_feed_rate,
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

fn check_positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value <= 0.0 {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(())
}

fn check_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite { field, value });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::*;

    fn plate() -> JobConfig {
        JobConfig {
            workpiece: WorkpieceGeometry {
                long_nominal: 150.0,
                short_nominal: 50.0,
                thickness: 20.0,
            },
            stock: RawStock {
                long_actual: 155.0,
                short_actual: 54.0,
            },
            fixture: FixtureOffsets::default(),
            tool: ToolParameters {
                number: 10,
                diameter: 40.0,
            },
            cutting: CuttingParameters {
                feed_rate: 500.0,
                spindle_speed: 2000.0,
                depth_of_cut: 1.0,
            },
            safety: SafetyParameters::default(),
            cleanup: CleanupPolicy::STANDARD,
            conventions: ProgramConventions::default(),
            debug: false,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(Validator::new().validate_config(&plate()).is_ok());
    }

    #[test]
    fn test_zero_depth_of_cut_names_field() {
        let mut cfg = plate();
        cfg.cutting.depth_of_cut = 0.0;
        let errors = Validator::new().validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::NotPositive {
                field: "cutting.depth_of_cut",
                value: 0.0
            }]
        );
        assert_eq!(errors[0].field(), "cutting.depth_of_cut");
    }

    #[test]
    fn test_fixture_may_be_zero_but_not_negative() {
        let mut cfg = plate();
        cfg.fixture.parallel_block_long = 0.0;
        cfg.fixture.parallel_block_short = -2.0;
        let errors = Validator::new().validate_config(&cfg).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "fixture.parallel_block_short");
    }

    #[test]
    fn test_collects_every_error() {
        let mut cfg = plate();
        cfg.workpiece.thickness = -1.0;
        cfg.tool.diameter = f64::NAN;
        cfg.tool.number = 0;
        cfg.cleanup = CleanupPolicy {
            fraction: 0.1,
            min: 0.8,
            max: 0.2,
        };
        let errors = Validator::new().validate_config(&cfg).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field()).collect();
        assert_eq!(
            fields,
            vec!["workpiece.thickness", "tool.diameter", "cleanup.min", "tool.number"]
        );
        assert!(matches!(errors[1], ValidationError::NotFinite { .. }));
    }

    #[test]
    fn test_machine_limits() {
        let validator = Validator::with_limits(6000.0, 1000.0);
        let mut cfg = plate();
        cfg.cutting.spindle_speed = 8000.0;
        cfg.cutting.feed_rate = 1200.0;
        let errors = validator.validate_config(&cfg).unwrap_err();
        assert_eq!(
            errors,
            vec![
                ValidationError::SpindleSpeed { rpm: 8000.0, max: 6000.0 },
                ValidationError::FeedRate { feed: 1200.0, max: 1000.0 },
            ]
        );
    }
}
