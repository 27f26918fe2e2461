//! Haas post-processor
//!
//! Haas is Fanuc-compatible; feed-per-minute mode is stated explicitly and
//! the machine-coordinate home move lifts Z before X/Y.

use crate::ast::Units;
use crate::codegen::ZeroReturn;
use crate::post::{units_code, PostProcessor};

pub struct HaasPost;

impl PostProcessor for HaasPost {
    fn name(&self) -> &str {
        "Haas"
    }

    fn setup(&self, units: Units) -> String {
        format!("{} G90 G94 G17 G40 G49 G80", units_code(units))
    }

    fn zero_return(&self, axes: ZeroReturn) -> String {
        match axes {
            ZeroReturn::Z => "G53 G00 Z0.00".to_string(),
            ZeroReturn::All => "G53 G00 Z0.00 X0.00 Y0.00".to_string(),
        }
    }
}
