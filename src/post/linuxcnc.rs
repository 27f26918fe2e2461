//! LinuxCNC post-processor
//!
//! LinuxCNC is mostly Fanuc-compatible. Comments use `;`, G92 offsets are
//! cleared with each work offset reset, and G28 homes all axes.

use crate::ast::WorkOffset;
use crate::codegen::ZeroReturn;
use crate::post::PostProcessor;

pub struct LinuxCncPost;

impl PostProcessor for LinuxCncPost {
    fn name(&self) -> &str {
        "LinuxCNC"
    }

    fn comment(&self, text: &str) -> String {
        format!("; {}", text)
    }

    fn zero_return(&self, axes: ZeroReturn) -> String {
        match axes {
            ZeroReturn::Z => "G53 G00 Z0.00".to_string(),
            ZeroReturn::All => "G28".to_string(),
        }
    }

    fn coordinate_reset(&self, offset: WorkOffset) -> String {
        format!("G92.1 {}", offset.code())
    }
}
