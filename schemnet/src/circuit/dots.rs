//! Junction Dot Inference
//!
//! Dots mark where three or more wires meet. They are rendering aids only,
//! always re-derivable from schematic geometry, and independent of signal
//! identity.
//!
//! A dot lands wherever:
//! - a wire vertex lands on another wire, other than at that wire's first
//!   or last point (end-to-end contact is a plain series connection),
//! - a schematic port's origin lands on a wire, or
//! - an instance port lands on a wire.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use super::{wire_segments, ExtractError};
use crate::geometry::{ManhattanSegment, Point};
use crate::schematic::{ElementLibrary, Schematic};

/// Deduplicating dot set: x -> set of y.
/// Iterates in x-then-y order.
#[derive(Debug, Default)]
struct DotSet {
    dots: BTreeMap<i64, BTreeSet<i64>>,
}

impl DotSet {
    fn insert(&mut self, pt: Point) {
        self.dots.entry(pt.x).or_default().insert(pt.y);
    }

    fn into_points(self) -> Vec<Point> {
        self.dots
            .into_iter()
            .flat_map(|(x, ys)| ys.into_iter().map(move |y| Point::new(x, y)))
            .collect()
    }
}

fn lands_on(segments: &[ManhattanSegment], pt: &Point) -> bool {
    segments.iter().any(|seg| seg.contains(pt))
}

/// Infer the junction dots of `sch`, sorted x-then-y and deduplicated.
/// Fails only if a wire cannot be decomposed into Manhattan segments.
pub fn infer_dots(sch: &Schematic, library: &ElementLibrary) -> Result<Vec<Point>, ExtractError> {
    let segments = wire_segments(&sch.wires)?;
    let mut dots = DotSet::default();

    // Wire-on-wire junctions
    for (a, wire) in sch.wires.iter().enumerate() {
        for (b, other) in sch.wires.iter().enumerate() {
            if a == b {
                continue;
            }
            let (first, last) = (other.first(), other.last());
            for pt in &wire.points {
                if Some(pt) == first || Some(pt) == last {
                    continue;
                }
                if lands_on(&segments[b], pt) {
                    dots.insert(*pt);
                }
            }
        }
    }

    // Schematic ports
    for port in &sch.ports {
        let loc = port.location();
        if segments.iter().any(|segs| lands_on(segs, &loc)) {
            dots.insert(loc);
        }
    }

    // Instance ports. Kinds missing from the library contribute nothing here;
    // extraction is where they are reported.
    for instance in &sch.instances {
        for (_, loc) in library.instance_ports(instance).unwrap_or_default() {
            if segments.iter().any(|segs| lands_on(segs, &loc)) {
                dots.insert(loc);
            }
        }
    }

    Ok(dots.into_points())
}

/// Comparison of persisted dots against inferred ones
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DotReport {
    /// Inferred, but absent from the schematic
    pub missing: Vec<Point>,
    /// Present in the schematic, but not inferred
    pub extra: Vec<Point>,
}

impl DotReport {
    /// Compare `persisted` against `inferred`. Both outputs are sorted and deduplicated.
    pub fn compare(persisted: &[Point], inferred: &[Point]) -> Self {
        let persisted: BTreeSet<Point> = persisted.iter().copied().collect();
        let inferred: BTreeSet<Point> = inferred.iter().copied().collect();
        Self {
            missing: inferred.difference(&persisted).copied().collect(),
            extra: persisted.difference(&inferred).copied().collect(),
        }
    }

    pub fn is_consistent(&self) -> bool {
        self.missing.is_empty() && self.extra.is_empty()
    }

    /// Human-readable mismatch lines, empty when consistent
    pub fn messages(&self) -> Vec<String> {
        let missing = self
            .missing
            .iter()
            .map(|pt| format!("Junction dot missing at {}", pt));
        let extra = self
            .extra
            .iter()
            .map(|pt| format!("Unexpected junction dot at {}", pt));
        missing.chain(extra).collect()
    }
}

/// Check the schematic's persisted dots against the inferred set.
/// Mismatches are logged as warnings and returned in the report; they are never errors here.
pub fn check_dots(sch: &Schematic, library: &ElementLibrary) -> Result<DotReport, ExtractError> {
    let inferred = infer_dots(sch, library)?;
    Ok(report_dots(sch, &inferred))
}

/// Compare the schematic's persisted dots against an already-inferred set, logging mismatches.
pub fn report_dots(sch: &Schematic, inferred: &[Point]) -> DotReport {
    let report = DotReport::compare(&sch.dots, inferred);
    for message in report.messages() {
        warn!("{}: {}", sch.name, message);
    }
    report
}
