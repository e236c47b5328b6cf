use chrono::Duration;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use urania::scan::{Criterion, ScanCriteria};
use urania::search::{BisectionConfig, HitDedup, TransitSearchConfig};
use urania::{AspectKind, Body, EphemerisConfig, OrbConfig, TieBreak};

/// Everything `configs/urania.toml` can set, resolved to library types.
#[derive(Debug, Clone, Default)]
pub struct UraniaSettings {
    pub ephemeris: EphemerisConfig,
    pub orbs: OrbConfig,
    pub bisection: BisectionConfig,
    pub transit: TransitSearchConfig,
    pub scan: ScanSettings,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanSettings {
    pub max_gap_hours: i64,
    pub eclipse_max_gap_hours: i64,
    pub step_hours: i64,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            max_gap_hours: urania::scan::DEFAULT_MAX_GAP_HOURS,
            eclipse_max_gap_hours: urania::scan::ECLIPSE_MAX_GAP_HOURS,
            step_hours: 24,
        }
    }
}

impl ScanSettings {
    /// Criteria joined with the configured gaps.
    pub fn criteria(&self, criteria: Vec<Criterion>) -> ScanCriteria {
        ScanCriteria::with_gaps(
            criteria,
            Duration::hours(self.max_gap_hours),
            Duration::hours(self.eclipse_max_gap_hours),
        )
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct EphemerisToml {
    #[serde(default)]
    path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AspectsToml {
    #[serde(default)]
    default_orb: Option<f64>,
    #[serde(default)]
    include_minor: Option<bool>,
    /// "closest" or "table_order"
    #[serde(default)]
    tie_break: Option<String>,
    #[serde(default)]
    orbs: BTreeMap<String, f64>,
    #[serde(default)]
    body_orbs: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SearchToml {
    #[serde(default)]
    angle_epsilon_deg: Option<f64>,
    #[serde(default)]
    time_precision_seconds: Option<f64>,
    #[serde(default)]
    max_iterations: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct TransitToml {
    #[serde(default)]
    step_days: Option<f64>,
    #[serde(default)]
    pass_through_threshold_deg: Option<f64>,
    /// "cooldown" or "per_crossing"
    #[serde(default)]
    dedup: Option<String>,
    #[serde(default)]
    cooldown_days: Option<f64>,
    #[serde(default)]
    refine: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ScanToml {
    #[serde(default)]
    max_gap_hours: Option<i64>,
    #[serde(default)]
    eclipse_max_gap_hours: Option<i64>,
    #[serde(default)]
    step_hours: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RootConfigToml {
    #[serde(default)]
    ephemeris: EphemerisToml,
    #[serde(default)]
    aspects: AspectsToml,
    #[serde(default)]
    search: SearchToml,
    #[serde(default)]
    transit: TransitToml,
    #[serde(default)]
    scan: ScanToml,
}

/// Try the usual relative locations of `configs/urania.toml`, from the
/// workspace root or from inside a crate directory.
pub fn read_config_text() -> anyhow::Result<String> {
    let paths = ["configs/urania.toml", "../../configs/urania.toml"];
    for p in &paths {
        if let Ok(c) = fs::read_to_string(p) {
            return Ok(c);
        }
    }
    anyhow::bail!("Could not load urania.toml from {:?}", paths);
}

/// Load settings from `path`, or from the default locations when `None`.
pub fn load_settings(path: Option<&Path>) -> anyhow::Result<UraniaSettings> {
    let text = match path {
        Some(p) => fs::read_to_string(p)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", p.display()))?,
        None => read_config_text()?,
    };
    parse_settings(&text)
}

/// Parse TOML text. Absent sections and fields keep library defaults.
pub fn parse_settings(text: &str) -> anyhow::Result<UraniaSettings> {
    let root: RootConfigToml =
        toml::from_str(text).map_err(|e| anyhow::anyhow!("Failed to parse urania.toml: {e}"))?;

    let settings = UraniaSettings {
        ephemeris: EphemerisConfig {
            path: root.ephemeris.path,
        },
        orbs: orb_config(root.aspects)?,
        bisection: bisection_config(&root.search),
        transit: TransitSearchConfig::default(),
        scan: scan_settings(&root.scan)?,
    };
    let transit = transit_config(root.transit, settings.bisection)?;

    let settings = UraniaSettings { transit, ..settings };
    settings
        .orbs
        .validate()
        .map_err(|e| anyhow::anyhow!("[aspects]: {e}"))?;
    settings
        .transit
        .validate()
        .map_err(|e| anyhow::anyhow!("[transit]/[search]: {e}"))?;
    Ok(settings)
}

fn orb_config(cfg: AspectsToml) -> anyhow::Result<OrbConfig> {
    let defaults = OrbConfig::default();

    let mut aspect_orbs = HashMap::new();
    for (name, orb) in cfg.orbs {
        let kind: AspectKind = name
            .parse()
            .map_err(|e| anyhow::anyhow!("[aspects.orbs] {e}"))?;
        aspect_orbs.insert(kind, orb);
    }

    let mut body_orbs = HashMap::new();
    for (name, orb) in cfg.body_orbs {
        let body: Body = name
            .parse()
            .map_err(|e| anyhow::anyhow!("[aspects.body_orbs] {e}"))?;
        body_orbs.insert(body, orb);
    }

    let tie_break = match cfg.tie_break.as_deref() {
        None => defaults.tie_break,
        Some("closest") => TieBreak::Closest,
        Some("table_order") => TieBreak::TableOrder,
        Some(other) => anyhow::bail!(
            "aspects.tie_break must be \"closest\" or \"table_order\", got {other:?}"
        ),
    };

    Ok(OrbConfig {
        default_orb: cfg.default_orb.unwrap_or(defaults.default_orb),
        aspect_orbs,
        body_orbs,
        include_minor: cfg.include_minor.unwrap_or(defaults.include_minor),
        tie_break,
    })
}

fn bisection_config(cfg: &SearchToml) -> BisectionConfig {
    let defaults = BisectionConfig::default();
    BisectionConfig {
        angle_epsilon_deg: cfg.angle_epsilon_deg.unwrap_or(defaults.angle_epsilon_deg),
        time_precision_days: cfg
            .time_precision_seconds
            .map(|s| s / urania::time::SECONDS_PER_DAY)
            .unwrap_or(defaults.time_precision_days),
        max_iterations: cfg.max_iterations.unwrap_or(defaults.max_iterations),
    }
}

fn transit_config(
    cfg: TransitToml,
    bisection: BisectionConfig,
) -> anyhow::Result<TransitSearchConfig> {
    let defaults = TransitSearchConfig::default();

    let dedup = match (cfg.dedup.as_deref(), cfg.cooldown_days) {
        (None | Some("cooldown"), Some(days)) => HitDedup::Cooldown { days },
        (None | Some("cooldown"), None) => defaults.dedup,
        (Some("per_crossing"), None) => HitDedup::PerCrossing,
        (Some("per_crossing"), Some(_)) => {
            anyhow::bail!("transit.cooldown_days only applies with dedup = \"cooldown\"")
        }
        (Some(other), _) => anyhow::bail!(
            "transit.dedup must be \"cooldown\" or \"per_crossing\", got {other:?}"
        ),
    };

    Ok(TransitSearchConfig {
        step_days: cfg.step_days.or(defaults.step_days),
        pass_through_threshold_deg: cfg
            .pass_through_threshold_deg
            .or(defaults.pass_through_threshold_deg),
        dedup,
        refine: cfg.refine.unwrap_or(defaults.refine),
        bisection,
    })
}

fn scan_settings(cfg: &ScanToml) -> anyhow::Result<ScanSettings> {
    let defaults = ScanSettings::default();
    let settings = ScanSettings {
        max_gap_hours: cfg.max_gap_hours.unwrap_or(defaults.max_gap_hours),
        eclipse_max_gap_hours: cfg
            .eclipse_max_gap_hours
            .unwrap_or(defaults.eclipse_max_gap_hours),
        step_hours: cfg.step_hours.unwrap_or(defaults.step_hours),
    };
    if settings.max_gap_hours < 0 || settings.eclipse_max_gap_hours < 0 {
        anyhow::bail!("scan gaps must be non-negative");
    }
    if settings.step_hours <= 0 {
        anyhow::bail!("scan.step_hours must be positive, got {}", settings.step_hours);
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.orbs, OrbConfig::default());
        assert_eq!(settings.bisection, BisectionConfig::default());
        assert_eq!(settings.transit, TransitSearchConfig::default());
        assert_eq!(settings.scan, ScanSettings::default());
        assert!(settings.ephemeris.path.is_none());
    }

    #[test]
    fn parses_every_section() {
        let text = r#"
            [ephemeris]
            path = "/opt/ephe"

            [aspects]
            default_orb = 6.0
            include_minor = false
            tie_break = "table_order"

            [aspects.orbs]
            conjunction = 10.0
            quincunx = 2.0

            [aspects.body_orbs]
            moon = 12.0

            [search]
            angle_epsilon_deg = 0.001
            time_precision_seconds = 10.0

            [transit]
            step_days = 0.25
            dedup = "per_crossing"
            refine = false

            [scan]
            max_gap_hours = 48
        "#;

        let settings = parse_settings(text).unwrap();

        assert_eq!(settings.ephemeris.path, Some(PathBuf::from("/opt/ephe")));
        assert_eq!(settings.orbs.default_orb, 6.0);
        assert!(!settings.orbs.include_minor);
        assert_eq!(settings.orbs.tie_break, TieBreak::TableOrder);
        assert_eq!(settings.orbs.aspect_orbs.get(&AspectKind::Conjunction), Some(&10.0));
        assert_eq!(settings.orbs.body_orbs.get(&Body::Moon), Some(&12.0));
        assert!((settings.bisection.time_precision_days * 86_400.0 - 10.0).abs() < 1e-9);
        assert_eq!(settings.transit.dedup, HitDedup::PerCrossing);
        assert_eq!(settings.transit.step_days, Some(0.25));
        assert!(!settings.transit.refine);
        assert_eq!(settings.transit.bisection, settings.bisection);
        assert_eq!(settings.scan.max_gap_hours, 48);
        assert_eq!(settings.scan.eclipse_max_gap_hours, 24);
    }

    #[test]
    fn scan_gaps_reach_criteria() {
        let settings = parse_settings("[scan]\nmax_gap_hours = 48\neclipse_max_gap_hours = 12")
            .unwrap()
            .scan;

        let retrograde = settings.criteria(vec![Criterion::Retrograde { body: Body::Mars }]);
        assert_eq!(retrograde.max_gap, Duration::hours(48));

        let eclipse = settings.criteria(vec![Criterion::Eclipse {
            kind: None,
            sign: None,
        }]);
        assert_eq!(eclipse.max_gap, Duration::hours(12));
    }

    #[test]
    fn unknown_names_are_errors() {
        let err = parse_settings("[aspects.orbs]\nbiquintile = 2.0").unwrap_err();
        assert!(err.to_string().contains("biquintile"), "{err}");

        let err = parse_settings("[aspects.body_orbs]\nvulcan = 2.0").unwrap_err();
        assert!(err.to_string().contains("vulcan"), "{err}");

        assert!(parse_settings("[transit]\ndedup = \"sometimes\"").is_err());
        assert!(parse_settings("[transit]\nstep = 1.0").is_err());
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(parse_settings("[aspects]\ndefault_orb = -1.0").is_err());
        assert!(parse_settings("[search]\nmax_iterations = 0").is_err());
        assert!(parse_settings("[scan]\nstep_hours = 0").is_err());
        let conflicting = "[transit]\ndedup = \"per_crossing\"\ncooldown_days = 5.0";
        assert!(parse_settings(conflicting).is_err());
    }

    #[test]
    fn cooldown_days_override() {
        let settings = parse_settings("[transit]\ncooldown_days = 10.0").unwrap();
        assert_eq!(settings.transit.dedup, HitDedup::Cooldown { days: 10.0 });
    }
}
