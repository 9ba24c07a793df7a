//! Validates the horoptic row solver: chain termination, the flat-depth
//! horopter baseline, and hidden-surface monotonicity

use stereogrammer::algorithm::horoptic::{HoropticParams, HoropticRows, follow_chain};

const LINE_WIDTH: usize = 256;

fn params(remove_hidden_surfaces: bool) -> HoropticParams {
    HoropticParams {
        line_width: LINE_WIDTH,
        midpoint: LINE_WIDTH / 2,
        separation: 64.0,
        field_depth: 1.0,
        remove_hidden_surfaces,
    }
}

fn constrained_count(links: &[usize]) -> usize {
    links
        .iter()
        .enumerate()
        .filter(|&(i, &link)| i != link)
        .count()
}

#[test]
fn test_every_chain_resolves_within_the_hop_bound() {
    let rows = HoropticRows::new(params(false));

    // A noisy but deterministic depth line
    let depth_line: Vec<f32> = (0..LINE_WIDTH)
        .map(|i| ((i * 37) % 256) as f32 / 255.0)
        .collect();

    let Ok(constraints) = rows.solve_row(&depth_line) else {
        unreachable!("row solve should succeed for in-range depths");
    };

    for i in 0..LINE_WIDTH {
        let root = follow_chain(&constraints.links, i);
        assert!(
            root.is_ok(),
            "constraint chain from pixel {i} must terminate within the hop bound"
        );
    }
}

#[test]
fn test_flat_depth_line_is_shaped_by_the_horopter_alone() {
    // With a flat far-plane depth line the only displacement left is the
    // horopter's own curvature; the solve must still succeed and its links
    // must be symmetric about the midpoint
    let rows = HoropticRows::new(HoropticParams {
        line_width: LINE_WIDTH,
        midpoint: LINE_WIDTH / 2,
        separation: 128.0,
        field_depth: 0.3333,
        remove_hidden_surfaces: false,
    });

    let depth_line = vec![0.0f32; LINE_WIDTH];
    let Ok(first) = rows.solve_row(&depth_line) else {
        unreachable!("flat depth line must solve");
    };
    let Ok(second) = rows.solve_row(&depth_line) else {
        unreachable!("flat depth line must solve");
    };

    assert_eq!(
        first.links, second.links,
        "identical inputs must produce identical constraints"
    );
    assert_eq!(first.hidden, 0, "nothing can be hidden on a flat plane");
    assert!(
        constrained_count(&first.links) > 0,
        "the horopter baseline must constrain some pixels"
    );
}

#[test]
fn test_hidden_surface_removal_never_adds_visible_assignments() {
    // A tall pillar near the center occludes far-plane pixels outside it
    let depth_line: Vec<f32> = (0..LINE_WIDTH)
        .map(|i| {
            if i.abs_diff(LINE_WIDTH / 2) < 20 {
                0.9
            } else {
                0.0
            }
        })
        .collect();

    let Ok(without) = HoropticRows::new(params(false)).solve_row(&depth_line) else {
        unreachable!("solve without hidden-surface removal must succeed");
    };
    let Ok(with) = HoropticRows::new(params(true)).solve_row(&depth_line) else {
        unreachable!("solve with hidden-surface removal must succeed");
    };

    assert_eq!(
        without.hidden, 0,
        "the hidden counter only advances when the test is enabled"
    );
    assert!(
        with.hidden > 0,
        "the pillar must hide at least one far-plane pixel"
    );
    assert!(
        constrained_count(&with.links) <= constrained_count(&without.links),
        "hidden-surface removal may only reduce visible assignments"
    );
}

#[test]
fn test_centre_out_order_is_reused_across_rows() {
    let rows = HoropticRows::new(params(false));
    let order: Vec<usize> = rows.centre_out().to_vec();

    assert_eq!(order.len(), LINE_WIDTH);
    assert_eq!(order.first().copied(), Some(LINE_WIDTH / 2));

    // Alternating outward steps of increasing distance
    assert_eq!(order.get(1).copied(), Some(LINE_WIDTH / 2 - 1));
    assert_eq!(order.get(2).copied(), Some(LINE_WIDTH / 2 + 1));
    assert_eq!(order.get(3).copied(), Some(LINE_WIDTH / 2 - 2));
}
