//! Astronomical event search and aspect-pattern engine.
//!
//! Finds exact instants at which a body crosses a target longitude
//! (seasonal ingresses, transits to natal points), evaluates aspects
//! between positioned bodies, recognizes multi-body aspect patterns and
//! consolidates predicate scans over time series into date ranges.
//!
//! Positions come from an [`EphemerisProvider`]; the crate ships a Swiss
//! Ephemeris adapter and accepts any other implementation.

pub mod angles;
pub mod aspects;
pub mod bodies;
pub mod ephemeris;
pub mod error;
pub mod patterns;
pub mod scan;
pub mod search;
pub mod time;

pub use angles::{normalize, shortest_arc, signed_delta, wrap_lerp, ZodiacSign};
pub use aspects::{
    compute_aspects, AspectCalculator, AspectDefinition, AspectGraph, AspectInstance, AspectKind,
    OrbConfig, TieBreak, ASPECT_TABLE,
};
pub use bodies::Body;
pub use ephemeris::{EphemerisConfig, EphemerisProvider, Position, SwissEphemerisAdapter};
pub use error::{Result, UraniaError};
pub use patterns::{detect_patterns, Pattern, PatternKind, PatternSet};
pub use scan::{scan_range, ChartSample, Criterion, DateRange, ScanCriteria, ScanResult};
pub use search::{
    find_exact_crossing, find_transit_hits, seasonal_ingresses, BisectionConfig, CancelToken,
    ExactHit, HitDedup, SeasonalPoint, TransitQuery, TransitSearchConfig,
};
