pub mod consolidate;
pub mod criteria;
pub mod sampler;
pub mod types;

pub use consolidate::{consolidate, scan_range, scan_with};
pub use criteria::{Criterion, ScanCriteria, DEFAULT_MAX_GAP_HOURS, ECLIPSE_MAX_GAP_HOURS};
pub use sampler::sample_series;
pub use types::{ChartSample, DateRange, EclipseEvent, EclipseKind, ScanResult, TimedSample};
