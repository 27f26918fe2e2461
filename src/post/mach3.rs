//! Mach3/Mach4 post-processor
//!
//! Mach3 wants sequence numbers on motion and machine lines, `;` comments,
//! and an explicit G92 clear alongside the work offset.

use crate::ast::WorkOffset;
use crate::post::PostProcessor;

pub struct Mach3Post;

impl PostProcessor for Mach3Post {
    fn name(&self) -> &str {
        "Mach3"
    }

    fn line_numbers(&self) -> bool {
        true
    }

    fn comment(&self, text: &str) -> String {
        format!("; {}", text)
    }

    fn coordinate_reset(&self, offset: WorkOffset) -> String {
        format!("G92.1 {}", offset.code())
    }
}
