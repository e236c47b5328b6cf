use crate::aspects::calculator::AspectCalculator;
use crate::aspects::types::{AspectInstance, AspectKind, OrbConfig};
use crate::bodies::Body;
use crate::ephemeris::Position;
use std::collections::{BTreeSet, HashMap};

/// Undirected aspect graph over one body set: at most one edge per pair.
#[derive(Debug, Clone, Default)]
pub struct AspectGraph {
    bodies: Vec<Body>,
    aspects: Vec<AspectInstance>,
    index: HashMap<(Body, Body), usize>,
}

fn pair_key(a: Body, b: Body) -> (Body, Body) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl AspectGraph {
    /// Evaluate every pair of `positions` and index the result.
    pub fn build<'a, I>(positions: I, orbs: &OrbConfig) -> Self
    where
        I: IntoIterator<Item = (&'a Body, &'a Position)> + Clone,
    {
        let aspects = AspectCalculator::new(orbs.clone()).compute_aspects(positions.clone());
        Self::from_aspects(aspects, positions)
    }

    /// Index a precomputed aspect list.
    ///
    /// Bodies without a finite position are left out, along with every
    /// aspect touching them. A second aspect for an already-linked pair is
    /// dropped.
    pub fn from_aspects<'a, I>(aspects: Vec<AspectInstance>, positions: I) -> Self
    where
        I: IntoIterator<Item = (&'a Body, &'a Position)>,
    {
        let bodies: BTreeSet<Body> = positions
            .into_iter()
            .filter(|(_, pos)| pos.is_valid())
            .map(|(body, _)| *body)
            .collect();

        let mut graph = AspectGraph {
            bodies: bodies.iter().copied().collect(),
            aspects: Vec::with_capacity(aspects.len()),
            index: HashMap::new(),
        };

        for aspect in aspects {
            if !bodies.contains(&aspect.body_a) || !bodies.contains(&aspect.body_b) {
                continue;
            }
            if aspect.body_a == aspect.body_b || !aspect.orb.is_finite() {
                continue;
            }
            let key = pair_key(aspect.body_a, aspect.body_b);
            if graph.index.contains_key(&key) {
                continue;
            }
            graph.index.insert(key, graph.aspects.len());
            graph.aspects.push(aspect);
        }

        graph
    }

    /// Bodies in the graph, in `Body` order.
    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn aspects(&self) -> &[AspectInstance] {
        &self.aspects
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// The aspect linking two bodies, in either argument order.
    pub fn aspect_between(&self, a: Body, b: Body) -> Option<&AspectInstance> {
        self.index
            .get(&pair_key(a, b))
            .map(|&i| &self.aspects[i])
    }

    /// The aspect linking two bodies if it is of `kind`.
    pub fn edge(&self, a: Body, b: Body, kind: AspectKind) -> Option<&AspectInstance> {
        self.aspect_between(a, b).filter(|aspect| aspect.kind() == kind)
    }

    pub fn edges_of(&self, kind: AspectKind) -> impl Iterator<Item = &AspectInstance> {
        self.aspects.iter().filter(move |aspect| aspect.kind() == kind)
    }
}
