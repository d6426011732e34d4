//! Tests for the report module.

use assembly_model::{DiscoveryConfig, Model};
use assembly_test_harness::oracle::check_interface_areas;
use assembly_test_harness::{ModelReport, cube_grid};

fn grid_model() -> Model {
    let mut model = Model::new();
    let blocks = model.add_group("blocks").unwrap();
    for cube in cube_grid(2, 2, 1.0).unwrap() {
        model.add_element_under(blocks, cube).unwrap();
    }
    model.find_interactions(&DiscoveryConfig::default());
    model
}

#[test]
fn empty_model_report() {
    let report = ModelReport::from_model(&Model::new());
    let text = report.to_text();
    assert!(text.starts_with("=== Assembly Model Report ==="));
    assert!(text.contains("Tree (1 groups, 0 leaves)"), "{text}");
    assert!(text.contains("Elements (0 registered)"));
    assert!(text.contains("Interactions: 0 edges"));
    assert!(!text.contains("Bounding Box"));
    assert!(report.all_passed());
}

#[test]
fn report_lists_tree_and_elements() {
    let report = ModelReport::from_model(&grid_model());
    let text = report.to_text();
    assert!(text.contains("Tree (2 groups, 4 leaves)"), "{text}");
    assert!(text.contains("  model/"));
    assert!(text.contains("    blocks/"));
    assert!(text.contains("BLOCK x4"));
}

#[test]
fn report_contains_interaction_summary() {
    let report = ModelReport::from_model(&grid_model());
    assert_eq!(report.edge_count, 4);
    assert_eq!(report.interface_count, 4);
    approx::assert_abs_diff_eq!(report.total_interface_area, 4.0, epsilon = 1e-6);
    assert!(report.to_text().contains("4 edges, 4 interfaces, total area 4.000"));
}

#[test]
fn report_contains_bounding_box() {
    let text = ModelReport::from_model(&grid_model()).to_text();
    assert!(
        text.contains("Bounding Box: (-0.5, -0.5, -0.5) -> (1.5, 1.5, 0.5)"),
        "{text}"
    );
}

#[test]
fn report_contains_oracle_results() {
    let model = grid_model();
    let report = ModelReport::from_model(&model).with_verdicts([check_interface_areas(&model, 0.5)]);
    let text = report.to_text();
    assert!(text.contains("Oracle Results (5 checks)"), "{text}");
    assert!(text.contains("[PASS] leaves_registered"));
    assert!(text.contains("[PASS] interface_areas"));
    assert!(report.all_passed());
}

#[test]
fn display_matches_to_text() {
    let report = ModelReport::from_model(&grid_model());
    assert_eq!(format!("{report}"), report.to_text());
}
