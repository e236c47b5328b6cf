use crate::scan::criteria::ScanCriteria;
use crate::scan::types::{ChartSample, DateRange, ScanResult, TimedSample};
use chrono::{DateTime, Duration, Utc};

/// Join time-ordered matches into ranges.
///
/// Single left-to-right pass: a match extends the open range while its gap
/// to the previous match is at most `max_gap` (a gap equal to the
/// threshold is contiguous), otherwise it closes the range and opens a new
/// one. Each entry is `(sample index, instant)`.
pub fn consolidate(matches: &[(usize, DateTime<Utc>)], max_gap: Duration) -> Vec<DateRange> {
    let mut ranges: Vec<DateRange> = Vec::new();
    let mut current: Option<DateRange> = None;

    for &(index, instant) in matches {
        current = Some(match current.take() {
            Some(mut range) if instant - range.end <= max_gap => {
                range.end = instant;
                range.end_sample = index;
                range.match_count += 1;
                range
            }
            open => {
                if let Some(done) = open {
                    ranges.push(done);
                }
                DateRange {
                    start: instant,
                    end: instant,
                    start_sample: index,
                    end_sample: index,
                    match_count: 1,
                }
            }
        });
    }

    ranges.extend(current);
    ranges
}

/// Filter samples with `predicate` and consolidate the hits.
///
/// Samples may arrive in any order; they are visited by instant (ties keep
/// input order) and ranges refer back to indices in `samples`.
pub fn scan_with<S, F>(samples: &[S], predicate: F, max_gap: Duration) -> ScanResult
where
    S: TimedSample,
    F: Fn(&S) -> bool,
{
    let mut order: Vec<usize> = (0..samples.len()).collect();
    order.sort_by_key(|&i| samples[i].instant());

    let matches: Vec<(usize, DateTime<Utc>)> = order
        .into_iter()
        .filter(|&i| predicate(&samples[i]))
        .map(|i| (i, samples[i].instant()))
        .collect();

    let ranges = consolidate(&matches, max_gap);
    ScanResult {
        total_matches: matches.len(),
        range_count: ranges.len(),
        ranges,
    }
}

/// Scan chart samples against a criteria set.
pub fn scan_range(samples: &[ChartSample], criteria: &ScanCriteria) -> ScanResult {
    let result = scan_with(samples, |s| criteria.matches(s), criteria.max_gap);
    log::debug!(
        "Scanned {} samples: {} matches in {} ranges",
        samples.len(),
        result.total_matches,
        result.range_count
    );
    result
}
