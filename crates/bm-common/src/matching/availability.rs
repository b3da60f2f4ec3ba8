use chrono::NaiveDate;

use crate::{Bounds, DateWindow};

fn is_point(hours: &Bounds<u32>) -> bool {
    hours.min == hours.max
}

/// Scores start date and weekly hours together.
///
/// - 0 when the hour ranges are disjoint or the candidate starts after the window closes.
/// - 1 when the candidate's start falls inside the window and the hours overlap.
/// - Otherwise the hour overlap over the hour union.
///
/// Ranges that only share an endpoint (`10..=20` and `20..=30`) count as disjoint. A single
/// point (`20..=20`) inside the other range counts as a full hour fit.
///
/// A missing window, start date or hour range on either side leaves that part unconstrained.
pub fn score_availability(
    window: Option<&DateWindow>,
    earliest: Option<NaiveDate>,
    assignment_hours: Option<&Bounds<u32>>,
    candidate_hours: Option<&Bounds<u32>>,
) -> f64 {
    let hour_ratio = match (assignment_hours, candidate_hours) {
        (Some(required), Some(offered)) => match required.overlap(offered) {
            Some(overlap) if overlap > 0.0 => overlap / required.union_len(offered),
            Some(_) if is_point(required) || is_point(offered) => 1.0,
            _ => return 0.0,
        },
        _ => 1.0,
    };

    let (window, earliest) = match (window, earliest) {
        (Some(window), Some(earliest)) => (window, earliest),
        _ => return 1.0,
    };

    if earliest > window.latest {
        return 0.0;
    }

    if window.contains(earliest) {
        1.0
    } else {
        hour_ratio
    }
}
