use crate::aspects::AspectInstance;
use crate::bodies::Body;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Yod,
    TSquare,
    GrandTrine,
    GrandCross,
    Kite,
}

impl PatternKind {
    pub fn name(self) -> &'static str {
        match self {
            PatternKind::Yod => "Yod",
            PatternKind::TSquare => "T-Square",
            PatternKind::GrandTrine => "Grand Trine",
            PatternKind::GrandCross => "Grand Cross",
            PatternKind::Kite => "Kite",
        }
    }
}

/// Two bodies in sextile, both quincunx a third.
#[derive(Debug, Clone, PartialEq)]
pub struct Yod<'a> {
    pub apex: Body,
    pub base: [Body; 2],
    pub sextile: &'a AspectInstance,
    pub quincunxes: [&'a AspectInstance; 2],
}

/// An opposition with a third body square to both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct TSquare<'a> {
    pub apex: Body,
    pub base: [Body; 2],
    pub opposition: &'a AspectInstance,
    pub squares: [&'a AspectInstance; 2],
}

/// Three bodies mutually in trine.
#[derive(Debug, Clone, PartialEq)]
pub struct GrandTrine<'a> {
    pub bodies: [Body; 3],
    pub trines: [&'a AspectInstance; 3],
}

/// Two crossing oppositions joined by four squares.
#[derive(Debug, Clone, PartialEq)]
pub struct GrandCross<'a> {
    pub bodies: [Body; 4],
    pub oppositions: [&'a AspectInstance; 2],
    pub squares: [&'a AspectInstance; 4],
}

/// A Grand Trine plus a body opposite one vertex and sextile the other two.
#[derive(Debug, Clone, PartialEq)]
pub struct Kite<'a> {
    pub grand_trine: GrandTrine<'a>,
    /// The added body.
    pub tail: Body,
    /// The trine vertex the tail opposes.
    pub head: Body,
    pub opposition: &'a AspectInstance,
    pub sextiles: [&'a AspectInstance; 2],
}

/// Any detected configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Pattern<'a> {
    Yod(Yod<'a>),
    TSquare(TSquare<'a>),
    GrandTrine(GrandTrine<'a>),
    GrandCross(GrandCross<'a>),
    Kite(Kite<'a>),
}

impl<'a> Pattern<'a> {
    pub fn kind(&self) -> PatternKind {
        match self {
            Pattern::Yod(_) => PatternKind::Yod,
            Pattern::TSquare(_) => PatternKind::TSquare,
            Pattern::GrandTrine(_) => PatternKind::GrandTrine,
            Pattern::GrandCross(_) => PatternKind::GrandCross,
            Pattern::Kite(_) => PatternKind::Kite,
        }
    }

    pub fn bodies(&self) -> Vec<Body> {
        match self {
            Pattern::Yod(y) => vec![y.base[0], y.base[1], y.apex],
            Pattern::TSquare(t) => vec![t.base[0], t.base[1], t.apex],
            Pattern::GrandTrine(g) => g.bodies.to_vec(),
            Pattern::GrandCross(g) => g.bodies.to_vec(),
            Pattern::Kite(k) => {
                let mut bodies = k.grand_trine.bodies.to_vec();
                bodies.push(k.tail);
                bodies
            }
        }
    }

    pub fn aspects(&self) -> Vec<&'a AspectInstance> {
        match self {
            Pattern::Yod(y) => vec![y.sextile, y.quincunxes[0], y.quincunxes[1]],
            Pattern::TSquare(t) => vec![t.opposition, t.squares[0], t.squares[1]],
            Pattern::GrandTrine(g) => g.trines.to_vec(),
            Pattern::GrandCross(g) => {
                let mut aspects = g.oppositions.to_vec();
                aspects.extend_from_slice(&g.squares);
                aspects
            }
            Pattern::Kite(k) => {
                let mut aspects = k.grand_trine.trines.to_vec();
                aspects.push(k.opposition);
                aspects.extend_from_slice(&k.sextiles);
                aspects
            }
        }
    }

    pub fn description(&self) -> String {
        match self {
            Pattern::Yod(y) => format!(
                "Yod: {} sextile {}, both quincunx {} (apex)",
                y.base[0].name(),
                y.base[1].name(),
                y.apex.name()
            ),
            Pattern::TSquare(t) => format!(
                "T-Square: {} opposite {}, both square {} (apex)",
                t.base[0].name(),
                t.base[1].name(),
                t.apex.name()
            ),
            Pattern::GrandTrine(g) => format!(
                "Grand Trine: {}, {} and {}",
                g.bodies[0].name(),
                g.bodies[1].name(),
                g.bodies[2].name()
            ),
            Pattern::GrandCross(g) => format!(
                "Grand Cross: {}, {}, {} and {}",
                g.bodies[0].name(),
                g.bodies[1].name(),
                g.bodies[2].name(),
                g.bodies[3].name()
            ),
            Pattern::Kite(k) => format!(
                "Kite: Grand Trine of {}, {} and {} with {} opposite {}",
                k.grand_trine.bodies[0].name(),
                k.grand_trine.bodies[1].name(),
                k.grand_trine.bodies[2].name(),
                k.tail.name(),
                k.head.name()
            ),
        }
    }

    pub fn summary(&self) -> PatternSummary {
        PatternSummary {
            kind: self.kind(),
            bodies: self.bodies(),
            description: self.description(),
        }
    }
}

/// Owned, serializable view of a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternSummary {
    pub kind: PatternKind,
    pub bodies: Vec<Body>,
    pub description: String,
}

/// Every pattern found in one aspect graph.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatternSet<'a> {
    pub yods: Vec<Yod<'a>>,
    pub t_squares: Vec<TSquare<'a>>,
    pub grand_trines: Vec<GrandTrine<'a>>,
    pub grand_crosses: Vec<GrandCross<'a>>,
    pub kites: Vec<Kite<'a>>,
}

impl<'a> PatternSet<'a> {
    pub fn len(&self) -> usize {
        self.yods.len()
            + self.t_squares.len()
            + self.grand_trines.len()
            + self.grand_crosses.len()
            + self.kites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All patterns, grouped by kind in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = Pattern<'a>> + '_ {
        self.yods
            .iter()
            .cloned()
            .map(Pattern::Yod)
            .chain(self.t_squares.iter().cloned().map(Pattern::TSquare))
            .chain(self.grand_trines.iter().cloned().map(Pattern::GrandTrine))
            .chain(self.grand_crosses.iter().cloned().map(Pattern::GrandCross))
            .chain(self.kites.iter().cloned().map(Pattern::Kite))
    }

    pub fn summaries(&self) -> Vec<PatternSummary> {
        self.iter().map(|p| p.summary()).collect()
    }
}
