//! End-to-end scenarios over fixtures, discovery, the model algebra and the
//! spatial index.

use assembly_element::{Element, ElementId};
use assembly_geometry::{Frame, Point3d};
use assembly_model::{Attributes, DiscoveryConfig, DiscoveryMode, InteractionGraph, Model};
use assembly_spatial::KdTree;
use assembly_test_harness::assertions::*;
use assembly_test_harness::helpers::edges_as_indices;
use assembly_test_harness::oracle::{check_connected, check_save_load_round_trip};
use assembly_test_harness::{ArchParams, arch_blocks, check_model_consistency, cube_grid};

// ── Helper Functions ────────────────────────────────────────────────────────

fn block(name: &str, x: f64) -> Element {
    Element::from_box(name, Frame::world_at(Point3d::new(x, 0.0, 0.0)), 1.0, 1.0, 1.0).unwrap()
}

fn arch_model() -> (Model, Vec<ElementId>) {
    let mut model = Model::new();
    let blocks = model.add_group("blocks").unwrap();
    let ids = arch_blocks(&ArchParams::default())
        .unwrap()
        .into_iter()
        .map(|b| model.add_element_under(blocks, b).unwrap())
        .collect();
    (model, ids)
}

fn grid_config(mode: DiscoveryMode) -> DiscoveryConfig {
    DiscoveryConfig::default()
        .with_mode(mode)
        .with_aabb_inflation(0.01)
        .with_tmax(1e-3)
        .with_amin(0.5)
}

// ── Arch ────────────────────────────────────────────────────────────────────

#[test]
fn arch_of_five_voussoirs_chained_by_hand() {
    let (mut model, ids) = arch_model();
    for i in 0..4 {
        model.add_interaction(ids[i], ids[i + 1], None).unwrap();
    }

    assert_eq!(model.registry().len(), 5);
    assert_edges_eq(&model, &ids, &[(0, 1), (1, 2), (2, 3), (3, 4)], "arch edges").unwrap();
    assert_path_eq(&model, &ids, 0, 4, &[0, 1, 2, 3, 4], "arch path").unwrap();
    assert_group_holds(&model, &["blocks"], &ids, &[0, 1, 2, 3, 4], "arch tree").unwrap();
    check_model_consistency(&model).unwrap();
}

#[test]
fn arch_joints_are_discovered() {
    let (mut model, ids) = arch_model();
    let report = model.find_interactions(&DiscoveryConfig::default());

    assert_eq!(report.accepted.len(), 4);
    assert_edges_eq(&model, &ids, &[(0, 1), (1, 2), (2, 3), (3, 4)], "arch discovery").unwrap();
    // Each joint is a full radial section: thickness times depth.
    for i in 0..4 {
        assert_interface_area(&model, &ids, (i, i + 1), 5.0, 1e-6, "arch joint").unwrap();
    }
    assert!(check_connected(&model).passed);
    assert!(check_save_load_round_trip(&model).passed);
}

// ── Discovery ───────────────────────────────────────────────────────────────

#[test]
fn grid_of_four_cubes_brute_force() {
    let mut model = Model::new();
    let ids = model.add_elements(cube_grid(2, 2, 1.0).unwrap()).unwrap();
    model.find_interactions(&grid_config(DiscoveryMode::BruteForce));

    assert_edges_eq(&model, &ids, &[(0, 1), (0, 2), (1, 3), (2, 3)], "rook graph").unwrap();
    for edge in [(0, 1), (0, 2), (1, 3), (2, 3)] {
        assert_interface_area(&model, &ids, edge, 1.0, 1e-6, "grid contact").unwrap();
    }
    let along_x = model.interaction(ids[0], ids[1]).unwrap().interface.as_ref().unwrap();
    assert!(along_x.normal().x.abs() > 1.0 - 1e-9);
    let along_y = model.interaction(ids[0], ids[2]).unwrap().interface.as_ref().unwrap();
    assert!(along_y.normal().y.abs() > 1.0 - 1e-9);
}

#[test]
fn grid_discovery_modes_agree() {
    let mut reference = None;
    for mode in [DiscoveryMode::BruteForce, DiscoveryMode::KdTree, DiscoveryMode::AabbTree] {
        let mut model = Model::new();
        let ids = model.add_elements(cube_grid(3, 2, 1.0).unwrap()).unwrap();
        model.find_interactions(&grid_config(mode));
        let edges = edges_as_indices(&model, &ids).unwrap();
        assert_eq!(edges.len(), 7, "{mode:?}");
        match &reference {
            None => reference = Some(edges),
            Some(r) => assert_eq!(r, &edges, "{mode:?}"),
        }
    }
}

// ── Algebra ─────────────────────────────────────────────────────────────────

#[test]
fn merge_unites_overlapping_groups() {
    let mut a = Model::new();
    let structures = a.add_group("structures").unwrap();
    let timber = a.add_group_under(structures, "timber", Attributes::new()).unwrap();
    let e0 = a.add_element_under(timber, block("BEAM", 0.0)).unwrap();
    let e1 = a.add_element_under(timber, block("PLATE", 1.0)).unwrap();

    let mut b = Model::new();
    let structures_b = b.add_group("structures").unwrap();
    let timber_b = b.add_group_under(structures_b, "timber", Attributes::new()).unwrap();
    let e2 = b.add_element_under(timber_b, block("COLUMN", 2.0)).unwrap();

    a.merge(&b).unwrap();

    let ids = [e0, e1, e2];
    assert_group_holds(&a, &["structures", "timber"], &ids, &[0, 2, 1], "merged timber").unwrap();
    let root_children = a.tree().children(a.root());
    assert_eq!(root_children.len(), 1);
    assert_eq!(a.tree().children(root_children[0]).len(), 1);
    assert_eq!(a.element_count(), 3);
    check_model_consistency(&a).unwrap();
}

#[test]
fn prune_hoists_deep_leaf() {
    let mut model = Model::new();
    let a = model.add_group("a").unwrap();
    let b = model.add_group_under(a, "b", Attributes::new()).unwrap();
    let c = model.add_group_under(b, "c", Attributes::new()).unwrap();
    let e = model.add_element_under(c, block("BLOCK", 0.0)).unwrap();

    model.prune(2);

    assert_group_holds(&model, &["a"], &[e], &[0], "pruned").unwrap();
    assert_eq!(model.tree().children(model.find_group(&["a"]).unwrap()).len(), 1);
    assert!(model.find_group(&["a", "b"]).is_none());
    assert_eq!(model.tree().groups().len(), 2);
    check_model_consistency(&model).unwrap();
}

// ── Spatial Index ───────────────────────────────────────────────────────────

#[test]
fn knn_ties_break_by_insertion_order() {
    let points = [
        Point3d::new(0.0, 0.0, 0.0),
        Point3d::new(1.0, 0.0, 0.0),
        Point3d::new(0.0, 1.0, 0.0),
        Point3d::new(0.0, 0.0, 1.0),
    ];
    let tree = KdTree::new(points.into_iter().enumerate().map(|(i, p)| (p, i)));
    let found: Vec<usize> = tree.knn(&Point3d::ORIGIN, 3).iter().map(|n| *n.payload).collect();
    assert_eq!(found, vec![0, 1, 2]);
}

// ── Shortest Path ───────────────────────────────────────────────────────────

fn diamond(a: u128, b: u128, c: u128, d: u128) -> Vec<ElementId> {
    let [a, b, c, d] = [a, b, c, d].map(ElementId::from_u128);
    let mut g = InteractionGraph::new();
    for v in [a, b, c, d] {
        g.add_vertex(v);
    }
    for (x, y) in [(a, b), (a, c), (b, d), (c, d)] {
        g.add_edge(x, y, None);
    }
    g.shortest_path(a, d)
}

#[test]
fn shortest_path_prefers_smaller_identity() {
    let id = ElementId::from_u128;
    // B < C: through B.
    assert_eq!(diamond(1, 2, 3, 4), vec![id(1), id(2), id(4)]);
    // B > C: through C.
    assert_eq!(diamond(1, 3, 2, 4), vec![id(1), id(2), id(4)]);
}

#[test]
fn shortest_path_on_model_is_deterministic() {
    let mut model = Model::new();
    let ids = model
        .add_elements((0..4).map(|i| block("BLOCK", 3.0 * i as f64)))
        .unwrap();
    let (a, b, c, d) = (ids[0], ids[1], ids[2], ids[3]);
    for (x, y) in [(a, b), (a, c), (b, d), (c, d)] {
        model.add_interaction(x, y, None).unwrap();
    }
    let expected = if b < c { vec![a, b, d] } else { vec![a, c, d] };
    for _ in 0..3 {
        assert_eq!(model.find_shortest_path(a, d, false).elements, expected);
    }
}
