//! Property-based tests over generated fixtures.

use proptest::prelude::*;

use assembly_model::{DiscoveryConfig, DiscoveryMode, Model};
use assembly_test_harness::helpers::edges_as_indices;
use assembly_test_harness::{ArchParams, arch_blocks, check_model_consistency, cube_grid};

// ---------------------------------------------------------------------------
// 1. Any cube grid discovers exactly its rook graph
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn cube_grid_yields_rook_graph(nx in 1usize..4, ny in 1usize..4, size in 0.5f64..3.0) {
        let mut model = Model::new();
        let ids = model.add_elements(cube_grid(nx, ny, size).unwrap()).unwrap();
        let config = DiscoveryConfig::default()
            .with_mode(DiscoveryMode::BruteForce)
            .with_aabb_inflation(0.01)
            .with_amin(0.25 * size * size);
        model.find_interactions(&config);

        let edges = edges_as_indices(&model, &ids).unwrap();
        prop_assert_eq!(edges.len(), (nx - 1) * ny + nx * (ny - 1));
        for (a, b) in edges {
            let (ia, ja) = (a % nx, a / nx);
            let (ib, jb) = (b % nx, b / nx);
            prop_assert_eq!(ia.abs_diff(ib) + ja.abs_diff(jb), 1);
        }
        prop_assert!(check_model_consistency(&model).is_ok());
    }
}

// ---------------------------------------------------------------------------
// 2. Arches of any division chain their voussoirs
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn arch_discovery_chains_voussoirs(n in 2usize..9, rise in 0.5f64..5.0) {
        let params = ArchParams { n, rise, ..ArchParams::default() };
        let mut model = Model::new();
        let ids = model.add_elements(arch_blocks(&params).unwrap()).unwrap();
        model.find_interactions(&DiscoveryConfig::default());

        let edges = edges_as_indices(&model, &ids).unwrap();
        let chain: std::collections::BTreeSet<(usize, usize)> = (0..n - 1).map(|i| (i, i + 1)).collect();
        prop_assert_eq!(edges, chain);
    }
}
