use crate::bodies::Body;
use crate::ephemeris::types::{EphemerisConfig, EphemerisProvider, Position};
use crate::error::{Result, UraniaError};
use std::env;
use std::path::{Path, PathBuf};
use swisseph::swe::{calc_ut, set_ephe_path};

/// FLG_SWIEPH: use the Swiss Ephemeris data files.
const FLG_SWIEPH: u32 = 2;
/// FLG_SPEED: also compute speeds, without it `out[3]` is zero.
const FLG_SPEED: u32 = 256;

const DEFAULT_EPHEMERIS_PATH: &str = "/usr/local/share/swisseph";

/// Swiss Ephemeris backed position provider.
pub struct SwissEphemerisAdapter {
    ephemeris_path: PathBuf,
    flags: u32,
}

impl SwissEphemerisAdapter {
    /// Create an adapter from an explicit configuration.
    pub fn new(config: &EphemerisConfig) -> Result<Self> {
        let path = config.path.clone().unwrap_or_else(|| {
            env::var("SWISS_EPHEMERIS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_EPHEMERIS_PATH))
        });

        if !path.exists() {
            return Err(UraniaError::EphemerisPathNotFound {
                path: path.display().to_string(),
            });
        }

        // An existing path has no interior NUL, which set_ephe_path rejects
        let path_str = path.to_string_lossy();
        set_ephe_path(&path_str);
        log::info!("Swiss Ephemeris path set to {}", path_str);

        Ok(Self {
            ephemeris_path: path,
            flags: FLG_SWIEPH | FLG_SPEED,
        })
    }

    pub fn ephemeris_path(&self) -> &Path {
        &self.ephemeris_path
    }

    fn calc_body(&self, body: Body, code: i32, jd: f64) -> Result<Position> {
        let result = calc_ut(jd, code as u32, self.flags).map_err(|e| {
            UraniaError::CalculationFailed {
                body: body.id().to_string(),
                jd,
                message: format!("Swiss Ephemeris error: {}", e),
            }
        })?;

        let out = result.out;
        Ok(Position::new(out[0], out[3]))
    }
}

impl EphemerisProvider for SwissEphemerisAdapter {
    fn position(&self, body: Body, jd: f64) -> Result<Position> {
        if !jd.is_finite() {
            return Err(UraniaError::invalid_input(format!(
                "Julian Day must be finite, got {jd}"
            )));
        }
        match body.swiss_code() {
            Some(code) => self.calc_body(body, code, jd),
            None => {
                // South node mirrors the true north node
                let north = self.position(Body::NorthNode, jd)?;
                Ok(Position::new(north.longitude + 180.0, north.speed))
            }
        }
    }
}
