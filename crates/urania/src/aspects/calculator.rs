use crate::angles::{shortest_arc, signed_delta};
use crate::aspects::types::{AspectDefinition, AspectInstance, OrbConfig, TieBreak};
use crate::bodies::Body;
use crate::ephemeris::Position;
use std::collections::BTreeMap;

/// Orb below which an aspect is reported as exact.
const EXACT_ORB: f64 = 0.1;

/// Orbs closer than this to zero count as the exact point itself.
const EXACTNESS_EPSILON: f64 = 1e-12;

/// Match a separation against a set of aspect definitions.
///
/// Returns the matching definition and its orb (`|distance - angle|`).
/// `orb_for` supplies the allowed orb per definition.
pub fn match_aspect<'d, I, F>(
    lon1: f64,
    lon2: f64,
    definitions: I,
    tie_break: TieBreak,
    orb_for: F,
) -> Option<(&'d AspectDefinition, f64)>
where
    I: IntoIterator<Item = &'d AspectDefinition>,
    F: Fn(&AspectDefinition) -> f64,
{
    let distance = shortest_arc(lon1, lon2);
    let mut best: Option<(&AspectDefinition, f64)> = None;

    for def in definitions {
        let diff = (distance - def.angle).abs();
        if diff > orb_for(def) {
            continue;
        }
        match tie_break {
            TieBreak::TableOrder => return Some((def, diff)),
            TieBreak::Closest => {
                if best.map_or(true, |(_, best_diff)| diff < best_diff) {
                    best = Some((def, diff));
                }
            }
        }
    }

    best
}

/// Single-orb form of [`match_aspect`] over the full aspect table, tightest
/// match first.
pub fn find_aspect(lon1: f64, lon2: f64, orb: f64) -> Option<(&'static AspectDefinition, f64)> {
    match_aspect(
        lon1,
        lon2,
        crate::aspects::ASPECT_TABLE.iter(),
        TieBreak::Closest,
        |_| orb,
    )
}

/// Whether the orb between two moving bodies is shrinking.
///
/// `Some(true)` while applying, `Some(false)` while separating or when the
/// orb is constant, `None` when neither body moves. At exactness the aspect
/// is separating.
pub fn applying_state(a: &Position, b: &Position, aspect_angle: f64) -> Option<bool> {
    if a.speed == 0.0 && b.speed == 0.0 {
        return None;
    }

    // Where A sits relative to B: positive when A leads.
    let lead = signed_delta(b.longitude, a.longitude);
    let distance = lead.abs();
    let diff = distance - aspect_angle;
    if diff.abs() <= EXACTNESS_EPSILON {
        return Some(false);
    }

    let relative_speed = a.speed - b.speed;
    // Rate of change of the shortest-arc distance. At 0 any motion opens the
    // gap, at 180 any motion closes it.
    let distance_rate = if lead == 0.0 {
        relative_speed.abs()
    } else if lead == 180.0 {
        -relative_speed.abs()
    } else {
        lead.signum() * relative_speed
    };

    let orb_rate = diff.signum() * distance_rate;
    Some(orb_rate < 0.0)
}

/// Aspect calculator bound to an orb configuration.
#[derive(Debug, Clone, Default)]
pub struct AspectCalculator {
    orbs: OrbConfig,
}

impl AspectCalculator {
    pub fn new(orbs: OrbConfig) -> Self {
        Self { orbs }
    }

    pub fn orbs(&self) -> &OrbConfig {
        &self.orbs
    }

    /// Aspect between two positioned bodies, if any is within orb.
    pub fn calculate_aspect(
        &self,
        body_a: Body,
        pos_a: &Position,
        body_b: Body,
        pos_b: &Position,
    ) -> Option<AspectInstance> {
        if !pos_a.is_valid() || !pos_b.is_valid() {
            return None;
        }

        let (definition, orb) = match_aspect(
            pos_a.longitude,
            pos_b.longitude,
            self.orbs.active_definitions(),
            self.orbs.tie_break,
            |def| self.orbs.orb_for(def.kind, body_a, body_b),
        )?;

        Some(AspectInstance {
            body_a,
            body_b,
            definition: *definition,
            orb,
            applying: applying_state(pos_a, pos_b, definition.angle),
            is_exact: orb < EXACT_ORB,
            involves_retrograde: pos_a.is_retrograde() || pos_b.is_retrograde(),
        })
    }

    /// Aspects among every unordered pair of one body set.
    ///
    /// Bodies are visited in `Body` order regardless of the input's
    /// iteration order; pairs fixed by construction (the node axis) and
    /// bodies with non-finite positions are skipped.
    pub fn compute_aspects<'a, I>(&self, positions: I) -> Vec<AspectInstance>
    where
        I: IntoIterator<Item = (&'a Body, &'a Position)>,
    {
        let bodies = ordered_valid(positions);
        let mut aspects = Vec::new();

        for (i, (body_a, pos_a)) in bodies.iter().enumerate() {
            for (body_b, pos_b) in &bodies[i + 1..] {
                if Body::is_fixed_pair(*body_a, *body_b) {
                    continue;
                }
                if let Some(aspect) = self.calculate_aspect(*body_a, pos_a, *body_b, pos_b) {
                    aspects.push(aspect);
                }
            }
        }

        aspects
    }

    /// Aspects from every body of `set_a` to every body of `set_b`, e.g.
    /// transiting bodies to a natal chart. The same body on both sides is
    /// skipped.
    pub fn compute_cross_aspects<'a, 'b, A, B>(&self, set_a: A, set_b: B) -> Vec<AspectInstance>
    where
        A: IntoIterator<Item = (&'a Body, &'a Position)>,
        B: IntoIterator<Item = (&'b Body, &'b Position)>,
    {
        let side_a = ordered_valid(set_a);
        let side_b = ordered_valid(set_b);
        let mut aspects = Vec::new();

        for (body_a, pos_a) in &side_a {
            for (body_b, pos_b) in &side_b {
                if body_a == body_b {
                    continue;
                }
                if let Some(aspect) = self.calculate_aspect(*body_a, pos_a, *body_b, pos_b) {
                    aspects.push(aspect);
                }
            }
        }

        aspects
    }
}

/// Free-function form of [`AspectCalculator::compute_aspects`].
pub fn compute_aspects<'a, I>(positions: I, orbs: &OrbConfig) -> Vec<AspectInstance>
where
    I: IntoIterator<Item = (&'a Body, &'a Position)>,
{
    AspectCalculator::new(orbs.clone()).compute_aspects(positions)
}

fn ordered_valid<'a, I>(positions: I) -> Vec<(Body, Position)>
where
    I: IntoIterator<Item = (&'a Body, &'a Position)>,
{
    let ordered: BTreeMap<Body, Position> = positions
        .into_iter()
        .filter(|(body, pos)| {
            let keep = pos.is_valid();
            if !keep {
                log::debug!("Skipping {} with non-finite position", body);
            }
            keep
        })
        .map(|(body, pos)| (*body, *pos))
        .collect();
    ordered.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspects::AspectKind;

    fn pos(longitude: f64, speed: f64) -> Position {
        Position::new(longitude, speed)
    }

    #[test]
    fn a_leads_and_is_faster_applies_below_angle() {
        // A at 80, B at 0: 80 apart and widening toward 90
        assert_eq!(applying_state(&pos(80.0, 1.0), &pos(0.0, 0.5), 90.0), Some(true));
    }

    #[test]
    fn a_leads_and_is_slower_separates_below_angle() {
        assert_eq!(applying_state(&pos(80.0, 0.5), &pos(0.0, 1.0), 90.0), Some(false));
    }

    #[test]
    fn a_trails_and_is_faster_separates_below_angle() {
        // A catching up shrinks the 80 degree gap away from 90
        assert_eq!(applying_state(&pos(0.0, 1.0), &pos(80.0, 0.5), 90.0), Some(false));
    }

    #[test]
    fn a_trails_and_is_slower_applies_below_angle() {
        assert_eq!(applying_state(&pos(0.0, 0.5), &pos(80.0, 1.0), 90.0), Some(true));
    }

    #[test]
    fn quadrants_above_angle_flip() {
        // 100 apart: widening moves away from 90
        assert_eq!(applying_state(&pos(100.0, 1.0), &pos(0.0, 0.5), 90.0), Some(false));
        assert_eq!(applying_state(&pos(0.0, 1.0), &pos(100.0, 0.5), 90.0), Some(true));
    }

    #[test]
    fn wraparound_leader_detection() {
        // A at 350 trails B at 60 by 70 degrees; A faster closes the gap
        assert_eq!(applying_state(&pos(350.0, 1.0), &pos(60.0, 0.1), 90.0), Some(false));
        // The same geometry with B faster widens toward the square
        assert_eq!(applying_state(&pos(350.0, 0.1), &pos(60.0, 1.0), 90.0), Some(true));
    }

    #[test]
    fn exact_aspect_is_separating() {
        assert_eq!(applying_state(&pos(90.0, 1.0), &pos(0.0, 0.2), 90.0), Some(false));
        assert_eq!(applying_state(&pos(10.0, 1.0), &pos(10.0, 0.2), 0.0), Some(false));
    }

    #[test]
    fn conjunction_approach_from_behind() {
        assert_eq!(applying_state(&pos(8.0, 1.2), &pos(10.0, 0.1), 0.0), Some(true));
        assert_eq!(applying_state(&pos(12.0, 1.2), &pos(10.0, 0.1), 0.0), Some(false));
    }

    #[test]
    fn opposition_from_near_180() {
        // 178 apart, A leading and faster: gap grows toward 180
        assert_eq!(applying_state(&pos(178.0, 1.0), &pos(0.0, 0.0), 180.0), Some(true));
    }

    #[test]
    fn stationary_pair_has_no_direction() {
        assert_eq!(applying_state(&pos(90.0, 0.0), &pos(0.0, 0.0), 90.0), None);
    }

    #[test]
    fn closest_tie_break_prefers_tightest() {
        // 47 apart with a 20 degree orb: semisextile is 17 off, sextile 13
        let table = crate::aspects::ASPECT_TABLE.iter();
        let (def, orb) = match_aspect(47.0, 0.0, table, TieBreak::Closest, |_| 20.0).unwrap();
        assert_eq!(def.kind, AspectKind::Sextile);
        assert!((orb - 13.0).abs() < 1e-9);

        let table = crate::aspects::ASPECT_TABLE.iter();
        let (def, _) = match_aspect(47.0, 0.0, table, TieBreak::TableOrder, |_| 20.0).unwrap();
        assert_eq!(def.kind, AspectKind::Semisextile);
    }

    #[test]
    fn minor_aspects_can_be_excluded() {
        let calc = AspectCalculator::new(OrbConfig {
            include_minor: false,
            ..OrbConfig::uniform(3.0)
        });
        assert!(calc
            .calculate_aspect(Body::Sun, &pos(150.0, 1.0), Body::Moon, &pos(0.0, 13.0))
            .is_none());
    }
}
