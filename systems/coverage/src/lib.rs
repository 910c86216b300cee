#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pairwise circle-coverage solver that finds the densest strike point.

use arena_warden_core::Point;

/// Best strike point found by the solver, with its coverage count.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CoverageSpot {
    /// Chosen circle center; the board origin when nothing qualified.
    pub center: Point,
    /// Number of positions within the radius of `center`.
    pub covered: usize,
}

impl CoverageSpot {
    /// Reports whether the solver found an effective multi-target spot.
    ///
    /// A zero count means callers must fall back to single-target or idle
    /// behavior; the origin center is not a usable destination.
    #[must_use]
    pub const fn is_degenerate(&self) -> bool {
        self.covered == 0
    }
}

/// Finds the point whose circle of `radius` covers the most of `positions`.
///
/// Candidates are derived from unordered pairs no farther apart than
/// `radius`: the candidate center sits on the pair's perpendicular bisector
/// at the half-chord offset, on one canonical side only (the mirrored
/// candidate is deliberately not evaluated). Coverage counts are inclusive
/// at the boundary. Ties keep the first candidate in pair-enumeration
/// order, so identical input ordering always yields the identical result.
///
/// Fewer than two positions, or no qualifying pair, returns the origin with
/// a coverage count of zero.
#[must_use]
pub fn optimal_coverage(positions: &[Point], radius: i32) -> CoverageSpot {
    let mut best = CoverageSpot::default();
    if positions.len() < 2 {
        return best;
    }

    for (index, first) in positions.iter().enumerate() {
        for second in &positions[index + 1..] {
            let Some(center) = pair_candidate(*first, *second, radius) else {
                continue;
            };

            let covered = positions
                .iter()
                .filter(|position| position.distance(center) <= radius)
                .count();
            log::trace!(
                "coverage candidate {:?} covers {covered} (pair {:?} / {:?})",
                center,
                first,
                second
            );

            if covered > best.covered {
                best = CoverageSpot { center, covered };
            }
        }
    }

    best
}

/// Candidate circle center for one pair, on the canonical perpendicular side.
fn pair_candidate(first: Point, second: Point, radius: i32) -> Option<Point> {
    if first.distance(second) > radius {
        return None;
    }

    let midpoint = Point::new(
        (first.x() + second.x()) / 2,
        (first.y() + second.y()) / 2,
    );
    let half_chord = f64::from(first.distance(midpoint));
    let reach = f64::from(radius);
    let offset = (reach * reach - half_chord * half_chord).max(0.0).sqrt();
    let angle = f64::from(second.y() - first.y()).atan2(f64::from(second.x() - first.x()));

    Some(Point::new(
        midpoint.x() + (offset * angle.sin()) as i32,
        midpoint.y() - (offset * angle.cos()) as i32,
    ))
}
