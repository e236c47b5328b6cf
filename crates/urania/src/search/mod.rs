pub mod bisect;
pub mod cancel;
pub mod ingress;
pub mod transit;
pub mod types;

pub use bisect::{bisect_crossing, find_exact_crossing, BisectionConfig};
pub use cancel::CancelToken;
pub use ingress::{
    find_sign_ingress, find_solar_ingress, seasonal_ingresses, Ingress, SeasonalPoint,
    SOLAR_INGRESS_WINDOW_DAYS,
};
pub use transit::{find_transit_hits, HitDedup, TransitQuery, TransitSearchConfig};
pub use types::ExactHit;
