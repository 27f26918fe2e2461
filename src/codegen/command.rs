//! Abstract machine commands
//!
//! The assembler produces these; a post-processor turns each into one line.

use serde::Serialize;

use crate::ast::{Units, WorkOffset};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Boundary {
    /// `%` tape delimiter, opens the program and closes it again after the end word
    Delimiter,
    /// Program end and rewind
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ZeroReturn {
    Z,
    All,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Command {
    ProgramBoundary(Boundary),
    Comment(String),
    /// Units, absolute positioning, plane and modal cancels
    Setup { units: Units },
    AxisZeroReturn(ZeroReturn),
    CoordinateReset(WorkOffset),
    ToolChange { tool: u8 },
    SpindleOn { rpm: f64 },
    SpindleOff,
    /// Tool length offset from register `tool`, moving to `z`
    ToolOffset { tool: u8, z: f64 },
    CoolantOn,
    CoolantOff,
    Rapid {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
    },
    Linear {
        x: Option<f64>,
        y: Option<f64>,
        z: Option<f64>,
        feed: f64,
    },
    /// Program stop for the operator
    Pause,
}

impl Command {
    pub fn rapid_z(z: f64) -> Self {
        Command::Rapid {
            x: None,
            y: None,
            z: Some(z),
        }
    }

    pub fn rapid_xy(x: f64, y: f64) -> Self {
        Command::Rapid {
            x: Some(x),
            y: Some(y),
            z: None,
        }
    }

    pub fn feed_z(z: f64, feed: f64) -> Self {
        Command::Linear {
            x: None,
            y: None,
            z: Some(z),
            feed,
        }
    }

    pub fn feed_x(x: f64, feed: f64) -> Self {
        Command::Linear {
            x: Some(x),
            y: None,
            z: None,
            feed,
        }
    }

    /// Lines that never carry a sequence number
    pub fn is_unnumbered(&self) -> bool {
        matches!(
            self,
            Command::Comment(_) | Command::ProgramBoundary(Boundary::Delimiter)
        )
    }

    /// Plunge: a feed move along Z only
    pub fn is_plunge(&self) -> bool {
        matches!(
            self,
            Command::Linear {
                x: None,
                y: None,
                z: Some(_),
                ..
            }
        )
    }

    /// Cutting sweep: a feed move along X only
    pub fn is_sweep(&self) -> bool {
        matches!(
            self,
            Command::Linear {
                x: Some(_),
                y: None,
                z: None,
                ..
            }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_classification() {
        assert!(Command::feed_z(-1.0, 100.0).is_plunge());
        assert!(!Command::feed_z(-1.0, 100.0).is_sweep());
        assert!(Command::feed_x(120.0, 200.0).is_sweep());
        assert!(!Command::rapid_z(30.0).is_plunge());
    }

    #[test]
    fn test_unnumbered_lines() {
        assert!(Command::Comment("x".into()).is_unnumbered());
        assert!(Command::ProgramBoundary(Boundary::Delimiter).is_unnumbered());
        assert!(!Command::ProgramBoundary(Boundary::End).is_unnumbered());
        assert!(!Command::Pause.is_unnumbered());
    }
}
