//! Post-processors for machine-specific G-code output
//!
//! Each controller dialect maps the abstract command set to one text line
//! per command. Rendering is stateless apart from optional sequence numbers,
//! which restart on every call.

use crate::ast::{Units, WorkOffset};
use crate::codegen::{Boundary, Command, ZeroReturn};

pub mod haas;
pub mod linuxcnc;
pub mod mach3;

#[derive(Debug, Clone, PartialEq)]
pub struct GCodeOutput {
    pub lines: Vec<String>,
    pub line_number: u32,
    pub step: u32,
    numbered: bool,
}

impl GCodeOutput {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            line_number: 10,
            step: 10,
            numbered: false,
        }
    }

    /// Buffer that prefixes N-words, starting at N0010
    pub fn numbered() -> Self {
        Self {
            numbered: true,
            ..Self::new()
        }
    }

    pub fn emit(&mut self, code: &str) {
        if self.numbered {
            self.lines.push(format!("N{:04} {}", self.line_number, code));
            self.line_number += self.step;
        } else {
            self.lines.push(code.to_string());
        }
    }

    /// Comments and tape delimiters never carry an N-word
    pub fn emit_unnumbered(&mut self, line: String) {
        self.lines.push(line);
    }
}

impl Default for GCodeOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for GCodeOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lines.join("\n"))
    }
}

/// Two-decimal coordinate or feed word value; never prints `-0.00`
pub fn format_value(value: f64) -> String {
    let text = format!("{:.2}", value);
    if text == "-0.00" {
        "0.00".to_string()
    } else {
        text
    }
}

fn axis_words(x: Option<f64>, y: Option<f64>, z: Option<f64>) -> String {
    let mut words = String::new();
    for (axis, value) in [('X', x), ('Y', y), ('Z', z)] {
        if let Some(v) = value {
            words.push_str(&format!(" {}{}", axis, format_value(v)));
        }
    }
    words
}

fn units_code(units: Units) -> &'static str {
    match units {
        Units::Metric => "G21",
        Units::Imperial => "G20",
    }
}

/// Post-processor trait - implemented for each controller type
pub trait PostProcessor {
    /// Machine/controller name
    fn name(&self) -> &str;

    /// Whether output lines carry N-word sequence numbers
    fn line_numbers(&self) -> bool {
        false
    }

    fn comment(&self, text: &str) -> String {
        format!("({})", text.replace('(', "[").replace(')', "]").to_uppercase())
    }

    fn setup(&self, units: Units) -> String {
        format!("{} G90 G17 G40 G49 G80", units_code(units))
    }

    fn zero_return(&self, axes: ZeroReturn) -> String {
        match axes {
            ZeroReturn::Z => "G53 G00 Z0.00".to_string(),
            ZeroReturn::All => "G53 G00 X0.00 Y0.00 Z0.00".to_string(),
        }
    }

    fn coordinate_reset(&self, offset: WorkOffset) -> String {
        offset.code().to_string()
    }

    /// Render one command as one line
    fn render_command(&self, command: &Command) -> String {
        match command {
            Command::ProgramBoundary(Boundary::Delimiter) => "%".to_string(),
            Command::ProgramBoundary(Boundary::End) => "M30".to_string(),
            Command::Comment(text) => self.comment(text),
            Command::Setup { units } => self.setup(*units),
            Command::AxisZeroReturn(axes) => self.zero_return(*axes),
            Command::CoordinateReset(offset) => self.coordinate_reset(*offset),
            Command::ToolChange { tool } => format!("T{} M06", tool),
            Command::SpindleOn { rpm } => format!("M03 S{:.0}", rpm),
            Command::SpindleOff => "M05".to_string(),
            Command::ToolOffset { tool, z } => format!("G43 H{} Z{}", tool, format_value(*z)),
            Command::CoolantOn => "M08".to_string(),
            Command::CoolantOff => "M09".to_string(),
            Command::Rapid { x, y, z } => format!("G00{}", axis_words(*x, *y, *z)),
            Command::Linear { x, y, z, feed } => {
                format!("G01{} F{}", axis_words(*x, *y, *z), format_value(*feed))
            }
            Command::Pause => "M00".to_string(),
        }
    }

    /// Render a full command sequence
    fn render(&self, commands: &[Command]) -> GCodeOutput {
        let mut output = if self.line_numbers() {
            GCodeOutput::numbered()
        } else {
            GCodeOutput::new()
        };
        for command in commands {
            let line = self.render_command(command);
            if command.is_unnumbered() {
                output.emit_unnumbered(line);
            } else {
                output.emit(&line);
            }
        }
        output
    }
}

/// Available post-processors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum PostProcessorType {
    /// Fanuc-compatible (default)
    #[default]
    Generic,
    Haas,
    #[value(name = "linuxcnc")]
    LinuxCNC,
    /// Mach3/Mach4, numbered lines
    Mach3,
}

impl PostProcessorType {
    /// Get the post-processor implementation
    pub fn get_processor(&self) -> Box<dyn PostProcessor> {
        match self {
            PostProcessorType::Generic => Box::new(GenericPost),
            PostProcessorType::Mach3 => Box::new(mach3::Mach3Post),
            PostProcessorType::LinuxCNC => Box::new(linuxcnc::LinuxCncPost),
            PostProcessorType::Haas => Box::new(haas::HaasPost),
        }
    }
}

/// Generic/Fanuc-compatible post-processor (default)
pub struct GenericPost;

impl PostProcessor for GenericPost {
    fn name(&self) -> &str {
        "Generic Fanuc"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(12.0), "12.00");
        assert_eq!(format_value(-25.126), "-25.13");
        assert_eq!(format_value(-0.001), "0.00");
        assert_eq!(format_value(0.005), "0.01");
    }

    #[test]
    fn test_generic_lines() {
        let post = GenericPost;
        let cases = [
            (Command::ProgramBoundary(Boundary::Delimiter), "%"),
            (Command::ProgramBoundary(Boundary::End), "M30"),
            (Command::Comment("rotate (180)".into()), "(ROTATE [180])"),
            (Command::Setup { units: Units::Metric }, "G21 G90 G17 G40 G49 G80"),
            (Command::Setup { units: Units::Imperial }, "G20 G90 G17 G40 G49 G80"),
            (Command::AxisZeroReturn(ZeroReturn::Z), "G53 G00 Z0.00"),
            (Command::AxisZeroReturn(ZeroReturn::All), "G53 G00 X0.00 Y0.00 Z0.00"),
            (Command::CoordinateReset(WorkOffset::G55), "G55"),
            (Command::ToolChange { tool: 10 }, "T10 M06"),
            (Command::SpindleOn { rpm: 2387.4 }, "M03 S2387"),
            (Command::SpindleOff, "M05"),
            (Command::ToolOffset { tool: 10, z: 75.0 }, "G43 H10 Z75.00"),
            (Command::CoolantOn, "M08"),
            (Command::CoolantOff, "M09"),
            (Command::rapid_xy(-25.0, -10.0), "G00 X-25.00 Y-10.00"),
            (Command::feed_z(59.5, 200.0), "G01 Z59.50 F200.00"),
            (Command::feed_x(175.0, 400.0), "G01 X175.00 F400.00"),
            (Command::Pause, "M00"),
        ];
        for (command, expected) in cases {
            assert_eq!(post.render_command(&command), expected);
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let commands = vec![
            Command::ProgramBoundary(Boundary::Delimiter),
            Command::Comment("blank".into()),
            Command::rapid_z(30.0),
            Command::feed_z(-0.0, 150.0),
            Command::ProgramBoundary(Boundary::End),
            Command::ProgramBoundary(Boundary::Delimiter),
        ];
        for kind in [
            PostProcessorType::Generic,
            PostProcessorType::Haas,
            PostProcessorType::LinuxCNC,
            PostProcessorType::Mach3,
        ] {
            let post = kind.get_processor();
            assert_eq!(post.render(&commands), post.render(&commands), "{}", post.name());
        }
    }

    #[test]
    fn test_output_display() {
        let output = GenericPost.render(&[
            Command::ProgramBoundary(Boundary::Delimiter),
            Command::SpindleOff,
        ]);
        assert_eq!(output.to_string(), "%\nM05");
    }
}
