//! Cutting data calculations

use super::*;
use std::f64::consts::PI;

/// Compute spindle speed and table feed for a face mill in a material
pub fn compute_cutting_data(
    material: &MaterialData,
    tool: &ToolGeometry,
) -> Result<CuttingData, BlackBookError> {
    if !tool.diameter.is_finite() || tool.diameter <= 0.0 {
        return Err(BlackBookError::InvalidToolDiameter(tool.diameter));
    }
    if tool.flute_count == 0 {
        return Err(BlackBookError::InvalidFluteCount(tool.flute_count));
    }

    let (vc_min, _vc_max, vc_rec) = lookup_cutting_speed(material, tool.tool_material);
    let fz = lookup_feed_per_tooth(material, tool.diameter, tool.tool_material);

    let mut warnings = Vec::new();

    // n = Vc * 1000 / (pi * D)
    let mut rpm = spindle_speed(vc_rec, tool.diameter);
    if let Some(max_rpm) = tool.max_rpm {
        if rpm > max_rpm {
            warnings.push(format!(
                "Spindle speed capped at {:.0} RPM by tool limit (wanted {:.0})",
                max_rpm, rpm
            ));
            rpm = max_rpm;
        }
    }
    let rpm = rpm as u32;

    // vf = n * fz * z
    let feed_rate = rpm as f64 * fz * tool.flute_count as f64;
    let actual_vc = rpm as f64 * PI * tool.diameter / 1000.0;

    if actual_vc < vc_min {
        warnings.push(format!(
            "Cutting speed {:.0} m/min is below minimum {:.0} for {}",
            actual_vc, vc_min, material.name
        ));
    }

    let (smallest, largest) = (FACE_MILL_DIAMETERS[0], FACE_MILL_DIAMETERS[FACE_MILL_DIAMETERS.len() - 1]);
    if tool.diameter < smallest || tool.diameter > largest {
        warnings.push(format!(
            "Cutter diameter {:.1} mm is outside the {:.0}-{:.0} mm table, feed per tooth held at the nearest size",
            tool.diameter, smallest, largest
        ));
    }

    if material.coolant_required {
        warnings.push(format!("{} requires flood coolant", material.name));
    }

    Ok(CuttingData {
        rpm,
        feed_rate,
        feed_per_tooth: fz,
        cutting_speed: actual_vc,
        coolant_recommended: material.coolant_required,
        warnings,
    })
}

/// Spindle speed for a cutting speed (m/min) and diameter (mm)
pub fn spindle_speed(cutting_speed: f64, diameter: f64) -> f64 {
    cutting_speed * 1000.0 / (PI * diameter)
}

/// Look up Vc range for material and tool
pub fn lookup_cutting_speed(material: &MaterialData, tool_material: ToolMaterial) -> (f64, f64, f64) {
    match tool_material {
        ToolMaterial::HSS => material.vc_hss,
        ToolMaterial::Carbide => material.vc_carbide,
        ToolMaterial::CoatedCarbide => material.vc_coated,
    }
}

/// Look up feed per tooth for cutter diameter, interpolating between table sizes
pub fn lookup_feed_per_tooth(
    material: &MaterialData,
    tool_diameter: f64,
    tool_material: ToolMaterial,
) -> f64 {
    let table = &material.fz_carbide;
    let last = FACE_MILL_DIAMETERS.len() - 1;

    let fz = if tool_diameter <= FACE_MILL_DIAMETERS[0] {
        table[0]
    } else if tool_diameter >= FACE_MILL_DIAMETERS[last] {
        table[last]
    } else {
        // First table size at or above the cutter
        let upper = FACE_MILL_DIAMETERS
            .iter()
            .position(|&d| d >= tool_diameter)
            .unwrap_or(last);
        let lower = upper.saturating_sub(1);
        let (dia_low, dia_high) = (FACE_MILL_DIAMETERS[lower], FACE_MILL_DIAMETERS[upper]);
        if dia_high == tool_diameter || dia_high == dia_low {
            table[upper]
        } else {
            let pct = (tool_diameter - dia_low) / (dia_high - dia_low);
            table[lower] + (table[upper] - table[lower]) * pct
        }
    };

    match tool_material {
        ToolMaterial::HSS => fz * HSS_FEED_FACTOR,
        ToolMaterial::Carbide | ToolMaterial::CoatedCarbide => fz,
    }
}
