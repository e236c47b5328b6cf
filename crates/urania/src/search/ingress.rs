//! Seasonal and sign ingresses.

use crate::angles::ZodiacSign;
use crate::bodies::Body;
use crate::ephemeris::EphemerisProvider;
use crate::error::Result;
use crate::search::bisect::{find_exact_crossing, BisectionConfig};
use crate::search::types::ExactHit;
use crate::time::calendar_to_julian_day;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Half-width of the bracket around the approximate solar ingress date.
pub const SOLAR_INGRESS_WINDOW_DAYS: f64 = 2.0;

/// Equinoxes and solstices: the Sun crossing a cardinal longitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonalPoint {
    MarchEquinox,
    JuneSolstice,
    SeptemberEquinox,
    DecemberSolstice,
}

impl SeasonalPoint {
    pub const ALL: [SeasonalPoint; 4] = [
        SeasonalPoint::MarchEquinox,
        SeasonalPoint::JuneSolstice,
        SeasonalPoint::SeptemberEquinox,
        SeasonalPoint::DecemberSolstice,
    ];

    pub fn longitude(self) -> f64 {
        match self {
            SeasonalPoint::MarchEquinox => 0.0,
            SeasonalPoint::JuneSolstice => 90.0,
            SeasonalPoint::SeptemberEquinox => 180.0,
            SeasonalPoint::DecemberSolstice => 270.0,
        }
    }

    pub fn sign(self) -> ZodiacSign {
        ZodiacSign::from_longitude(self.longitude())
    }

    /// Approximate (month, day) of the crossing in the Gregorian calendar.
    pub fn approximate_date(self) -> (u32, u32) {
        match self {
            SeasonalPoint::MarchEquinox => (3, 20),
            SeasonalPoint::JuneSolstice => (6, 21),
            SeasonalPoint::SeptemberEquinox => (9, 22),
            SeasonalPoint::DecemberSolstice => (12, 21),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SeasonalPoint::MarchEquinox => "March Equinox",
            SeasonalPoint::JuneSolstice => "June Solstice",
            SeasonalPoint::SeptemberEquinox => "September Equinox",
            SeasonalPoint::DecemberSolstice => "December Solstice",
        }
    }
}

/// A located seasonal ingress.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ingress {
    pub point: SeasonalPoint,
    pub instant: DateTime<Utc>,
    pub hit: ExactHit,
}

/// Locate the Sun's crossing of `point` in `year`.
///
/// `Ok(None)` when the bracket around the approximate date holds no
/// crossing.
pub fn find_solar_ingress<P: EphemerisProvider + ?Sized>(
    provider: &P,
    point: SeasonalPoint,
    year: i32,
    config: &BisectionConfig,
) -> Result<Option<Ingress>> {
    let (month, day) = point.approximate_date();
    let approx_jd = calendar_to_julian_day(year, month, day)?;

    let Some(hit) = find_exact_crossing(
        provider,
        Body::Sun,
        point.longitude(),
        approx_jd,
        SOLAR_INGRESS_WINDOW_DAYS,
        config,
    )?
    else {
        log::debug!("No {} found near {}-{:02}-{:02}", point.name(), year, month, day);
        return Ok(None);
    };

    Ok(Some(Ingress {
        point,
        instant: hit.instant()?,
        hit,
    }))
}

/// All four seasonal ingresses of `year`, in calendar order. Points whose
/// bracket yields nothing are left out.
pub fn seasonal_ingresses<P: EphemerisProvider + ?Sized>(
    provider: &P,
    year: i32,
    config: &BisectionConfig,
) -> Result<Vec<Ingress>> {
    let mut ingresses = Vec::with_capacity(4);
    for point in SeasonalPoint::ALL {
        if let Some(ingress) = find_solar_ingress(provider, point, year, config)? {
            ingresses.push(ingress);
        }
    }
    Ok(ingresses)
}

/// Locate `body` entering `sign` within `window_days` of `approx_jd`.
pub fn find_sign_ingress<P: EphemerisProvider + ?Sized>(
    provider: &P,
    body: Body,
    sign: ZodiacSign,
    approx_jd: f64,
    window_days: f64,
    config: &BisectionConfig,
) -> Result<Option<ExactHit>> {
    find_exact_crossing(
        provider,
        body,
        sign.start_longitude(),
        approx_jd,
        window_days,
        config,
    )
}
