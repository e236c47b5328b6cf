//! Multi-body pattern detection over an aspect graph.
//!
//! Detection is a two-phase pipeline: every independent pattern is found
//! first, then Kites are built by extending the finished Grand Trines.
//! Bodies are enumerated in ascending `Body` order, so each grouping is
//! visited once and the result does not depend on how the graph's input
//! map was ordered.

use crate::aspects::{AspectGraph, AspectKind};
use crate::bodies::Body;
use crate::patterns::types::{GrandCross, GrandTrine, Kite, PatternSet, TSquare, Yod};

/// Find every Yod, T-Square, Grand Trine, Grand Cross and Kite.
///
/// Never fails: a graph with too few bodies simply yields empty lists.
pub fn detect_patterns(graph: &AspectGraph) -> PatternSet<'_> {
    let grand_trines = find_grand_trines(graph);
    let kites = find_kites(graph, &grand_trines);

    let patterns = PatternSet {
        yods: find_yods(graph),
        t_squares: find_t_squares(graph),
        grand_trines,
        grand_crosses: find_grand_crosses(graph),
        kites,
    };
    log::debug!(
        "Detected {} patterns among {} bodies",
        patterns.len(),
        graph.bodies().len()
    );
    patterns
}

/// Sextile base with a third body quincunx both ends.
pub fn find_yods(graph: &AspectGraph) -> Vec<Yod<'_>> {
    let mut yods = Vec::new();
    for sextile in graph.edges_of(AspectKind::Sextile) {
        let (a, b) = (sextile.body_a, sextile.body_b);
        for &apex in graph.bodies() {
            if apex == a || apex == b {
                continue;
            }
            if let (Some(q1), Some(q2)) = (
                graph.edge(a, apex, AspectKind::Quincunx),
                graph.edge(b, apex, AspectKind::Quincunx),
            ) {
                yods.push(Yod {
                    apex,
                    base: [a, b],
                    sextile,
                    quincunxes: [q1, q2],
                });
            }
        }
    }
    yods
}

/// Opposition base with a third body square both ends.
pub fn find_t_squares(graph: &AspectGraph) -> Vec<TSquare<'_>> {
    let mut t_squares = Vec::new();
    for opposition in graph.edges_of(AspectKind::Opposition) {
        let (a, b) = (opposition.body_a, opposition.body_b);
        for &apex in graph.bodies() {
            if apex == a || apex == b {
                continue;
            }
            if let (Some(s1), Some(s2)) = (
                graph.edge(a, apex, AspectKind::Square),
                graph.edge(b, apex, AspectKind::Square),
            ) {
                t_squares.push(TSquare {
                    apex,
                    base: [a, b],
                    opposition,
                    squares: [s1, s2],
                });
            }
        }
    }
    t_squares
}

pub fn find_grand_trines(graph: &AspectGraph) -> Vec<GrandTrine<'_>> {
    let bodies = graph.bodies();
    let n = bodies.len();
    let mut grand_trines = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            let Some(ab) = graph.edge(bodies[i], bodies[j], AspectKind::Trine) else {
                continue;
            };
            for k in (j + 1)..n {
                let (a, b, c) = (bodies[i], bodies[j], bodies[k]);
                if let (Some(bc), Some(ac)) = (
                    graph.edge(b, c, AspectKind::Trine),
                    graph.edge(a, c, AspectKind::Trine),
                ) {
                    grand_trines.push(GrandTrine {
                        bodies: [a, b, c],
                        trines: [ab, bc, ac],
                    });
                }
            }
        }
    }
    grand_trines
}

pub fn find_grand_crosses(graph: &AspectGraph) -> Vec<GrandCross<'_>> {
    let bodies = graph.bodies();
    let n = bodies.len();
    let mut crosses = Vec::new();

    for i in 0..n {
        for j in (i + 1)..n {
            for k in (j + 1)..n {
                for l in (k + 1)..n {
                    let quad = [bodies[i], bodies[j], bodies[k], bodies[l]];
                    if let Some(cross) = grand_cross_of(graph, quad) {
                        crosses.push(cross);
                    }
                }
            }
        }
    }
    crosses
}

/// Test the three ways four bodies can split into two opposing pairs.
fn grand_cross_of(graph: &AspectGraph, quad: [Body; 4]) -> Option<GrandCross<'_>> {
    const PAIRINGS: [[(usize, usize); 2]; 3] = [
        [(0, 1), (2, 3)],
        [(0, 2), (1, 3)],
        [(0, 3), (1, 2)],
    ];

    for [(p, q), (r, s)] in PAIRINGS {
        let (Some(opp1), Some(opp2)) = (
            graph.edge(quad[p], quad[q], AspectKind::Opposition),
            graph.edge(quad[r], quad[s], AspectKind::Opposition),
        ) else {
            continue;
        };

        // Each end of one opposition squares both ends of the other
        let squares = [
            graph.edge(quad[p], quad[r], AspectKind::Square),
            graph.edge(quad[r], quad[q], AspectKind::Square),
            graph.edge(quad[q], quad[s], AspectKind::Square),
            graph.edge(quad[s], quad[p], AspectKind::Square),
        ];
        if let [Some(s1), Some(s2), Some(s3), Some(s4)] = squares {
            return Some(GrandCross {
                bodies: quad,
                oppositions: [opp1, opp2],
                squares: [s1, s2, s3, s4],
            });
        }
    }
    None
}

/// Extend each Grand Trine with any body opposite one vertex and sextile
/// to the other two.
pub fn find_kites<'a>(graph: &'a AspectGraph, grand_trines: &[GrandTrine<'a>]) -> Vec<Kite<'a>> {
    let mut kites = Vec::new();

    for grand_trine in grand_trines {
        for &tail in graph.bodies() {
            if grand_trine.bodies.contains(&tail) {
                continue;
            }
            for head_idx in 0..3 {
                let head = grand_trine.bodies[head_idx];
                let wing_a = grand_trine.bodies[(head_idx + 1) % 3];
                let wing_b = grand_trine.bodies[(head_idx + 2) % 3];

                if let (Some(opposition), Some(s1), Some(s2)) = (
                    graph.edge(tail, head, AspectKind::Opposition),
                    graph.edge(tail, wing_a, AspectKind::Sextile),
                    graph.edge(tail, wing_b, AspectKind::Sextile),
                ) {
                    kites.push(Kite {
                        grand_trine: grand_trine.clone(),
                        tail,
                        head,
                        opposition,
                        sextiles: [s1, s2],
                    });
                }
            }
        }
    }
    kites
}
