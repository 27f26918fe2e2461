//! Material database - face milling values for common shop stock

use serde::{Deserialize, Serialize};

/// Material category for grouping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MaterialCategory {
    NonFerrous,
    SteelLowAlloy,
    SteelHighAlloy,
    StainlessAustenitic,
    CastIron,
    Titanium,
    Plastic,
}

/// Complete material cutting data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterialData {
    pub name: String,
    pub category: MaterialCategory,
    pub description: String,

    // Vc ranges by tool material (min, max, recommended), m/min
    pub vc_hss: (f64, f64, f64),
    pub vc_carbide: (f64, f64, f64),
    pub vc_coated: (f64, f64, f64),

    // Carbide feed per tooth by cutter diameter, see FACE_MILL_DIAMETERS
    pub fz_carbide: Vec<f64>,

    pub coolant_required: bool,
}

/// Cutter diameters (mm) the feed-per-tooth tables are indexed by
pub const FACE_MILL_DIAMETERS: [f64; 8] = [25.0, 32.0, 40.0, 50.0, 63.0, 80.0, 100.0, 125.0];

/// HSS cutters take a lighter bite than carbide inserts
pub const HSS_FEED_FACTOR: f64 = 0.6;

fn insert(db: &mut std::collections::HashMap<String, MaterialData>, data: MaterialData) {
    db.insert(data.name.clone(), data);
}

/// Load the complete material database
pub fn load_material_database() -> std::collections::HashMap<String, MaterialData> {
    let mut db = std::collections::HashMap::new();

    // NON-FERROUS MATERIALS
    // =====================

    insert(&mut db, MaterialData {
        name: "Aluminum 6061-T6".to_string(),
        category: MaterialCategory::NonFerrous,
        description: "General purpose aluminum plate and bar".to_string(),
        vc_hss: (150.0, 300.0, 200.0),
        vc_carbide: (300.0, 800.0, 500.0),
        vc_coated: (400.0, 1000.0, 600.0),
        fz_carbide: vec![0.08, 0.10, 0.12, 0.14, 0.15, 0.16, 0.18, 0.20],
        coolant_required: false,
    });

    insert(&mut db, MaterialData {
        name: "Aluminum 7075-T6".to_string(),
        category: MaterialCategory::NonFerrous,
        description: "High strength aircraft aluminum".to_string(),
        vc_hss: (120.0, 250.0, 180.0),
        vc_carbide: (300.0, 700.0, 450.0),
        vc_coated: (350.0, 900.0, 550.0),
        fz_carbide: vec![0.08, 0.10, 0.11, 0.13, 0.14, 0.15, 0.17, 0.18],
        coolant_required: false,
    });

    insert(&mut db, MaterialData {
        name: "Brass C360".to_string(),
        category: MaterialCategory::NonFerrous,
        description: "Free machining brass".to_string(),
        vc_hss: (60.0, 120.0, 90.0),
        vc_carbide: (150.0, 400.0, 250.0),
        vc_coated: (200.0, 450.0, 300.0),
        fz_carbide: vec![0.06, 0.08, 0.10, 0.12, 0.13, 0.14, 0.15, 0.16],
        coolant_required: false,
    });

    // STEELS
    // ======

    insert(&mut db, MaterialData {
        name: "Steel 1018".to_string(),
        category: MaterialCategory::SteelLowAlloy,
        description: "Low carbon mild steel, cold drawn".to_string(),
        vc_hss: (25.0, 40.0, 30.0),
        vc_carbide: (150.0, 300.0, 200.0),
        vc_coated: (180.0, 350.0, 250.0),
        fz_carbide: vec![0.08, 0.10, 0.12, 0.14, 0.15, 0.16, 0.18, 0.20],
        coolant_required: false,
    });

    insert(&mut db, MaterialData {
        name: "Steel 4140".to_string(),
        category: MaterialCategory::SteelHighAlloy,
        description: "Chromoly, pre-hardened 28-32 HRC".to_string(),
        vc_hss: (18.0, 30.0, 24.0),
        vc_carbide: (120.0, 220.0, 160.0),
        vc_coated: (150.0, 260.0, 190.0),
        fz_carbide: vec![0.07, 0.09, 0.10, 0.12, 0.13, 0.14, 0.15, 0.16],
        coolant_required: false,
    });

    insert(&mut db, MaterialData {
        name: "Stainless 304".to_string(),
        category: MaterialCategory::StainlessAustenitic,
        description: "Austenitic stainless, work hardens".to_string(),
        vc_hss: (12.0, 25.0, 18.0),
        vc_carbide: (100.0, 180.0, 140.0),
        vc_coated: (120.0, 220.0, 160.0),
        fz_carbide: vec![0.06, 0.08, 0.09, 0.10, 0.11, 0.12, 0.13, 0.14],
        coolant_required: true,
    });

    insert(&mut db, MaterialData {
        name: "Cast Iron Gray".to_string(),
        category: MaterialCategory::CastIron,
        description: "Gray cast iron class 30, machined dry".to_string(),
        vc_hss: (20.0, 35.0, 25.0),
        vc_carbide: (100.0, 250.0, 180.0),
        vc_coated: (150.0, 300.0, 220.0),
        fz_carbide: vec![0.10, 0.12, 0.14, 0.16, 0.18, 0.20, 0.22, 0.24],
        coolant_required: false,
    });

    // DIFFICULT MATERIALS
    // ===================

    insert(&mut db, MaterialData {
        name: "Titanium Ti-6Al-4V".to_string(),
        category: MaterialCategory::Titanium,
        description: "Grade 5 titanium".to_string(),
        vc_hss: (8.0, 15.0, 10.0),
        vc_carbide: (40.0, 80.0, 55.0),
        vc_coated: (50.0, 100.0, 70.0),
        fz_carbide: vec![0.05, 0.06, 0.07, 0.08, 0.09, 0.10, 0.10, 0.11],
        coolant_required: true,
    });

    // PLASTICS
    // ========

    insert(&mut db, MaterialData {
        name: "Acetal POM".to_string(),
        category: MaterialCategory::Plastic,
        description: "Delrin and similar acetal copolymers".to_string(),
        vc_hss: (100.0, 250.0, 150.0),
        vc_carbide: (200.0, 500.0, 300.0),
        vc_coated: (200.0, 500.0, 300.0),
        fz_carbide: vec![0.10, 0.12, 0.15, 0.18, 0.20, 0.22, 0.25, 0.28],
        coolant_required: false,
    });

    db
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_match_diameters() {
        for material in load_material_database().values() {
            assert_eq!(
                material.fz_carbide.len(),
                FACE_MILL_DIAMETERS.len(),
                "{} feed table length",
                material.name
            );
            for (min, max, rec) in [material.vc_hss, material.vc_carbide, material.vc_coated] {
                assert!(min <= rec && rec <= max, "{} speed range out of order", material.name);
            }
        }
    }
}
