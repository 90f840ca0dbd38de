//! Geographic coordinate type and geodesy helpers.
//!
//! `GeoPoint` uses `f64` latitude/longitude.  The motion model interpolates
//! linearly in degree space, so the extra precision keeps interpolated
//! positions exactly on the waypoints at segment boundaries.

use std::f64::consts::PI;

use rand::Rng;

/// Mean Earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6_371.0;

/// Kilometres per degree used when projecting a planar offset back to
/// degrees.  Conventional equatorial figure, not derived from the sphere.
pub const KM_PER_DEGREE: f64 = 111.32;

/// A WGS-84 geographic coordinate in degrees.
///
/// Ranges are not enforced; a point is *usable* when both components are
/// finite (see [`GeoPoint::is_finite`]).
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// `true` if both components are finite numbers.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }

    /// Haversine great-circle distance in kilometres.
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        EARTH_RADIUS_KM * c
    }

    /// Initial forward azimuth from `self` towards `other`, in degrees
    /// `[0, 360)` clockwise from north.
    ///
    /// The bearing between identical points is undefined; this returns 0.
    pub fn bearing_deg(self, other: GeoPoint) -> f64 {
        if self == other {
            return 0.0;
        }
        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let y = d_lon.sin() * lat2.cos();
        let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lon.cos();
        normalize_heading(y.atan2(x).to_degrees())
    }

    /// Component-wise linear interpolation between `self` (`t = 0`) and
    /// `other` (`t = 1`).
    ///
    /// Not great-circle accurate; fine over the sub-kilometre segments of a
    /// street route.
    #[inline]
    pub fn lerp(self, other: GeoPoint, t: f64) -> GeoPoint {
        GeoPoint {
            lat: self.lat + (other.lat - self.lat) * t,
            lon: self.lon + (other.lon - self.lon) * t,
        }
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Wrap any angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_heading(deg: f64) -> f64 {
    let h = deg.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0.
    if h >= 360.0 { 0.0 } else { h }
}

/// Sample a point uniformly by area within `radius_km` of `center`.
///
/// Uses a local planar approximation: `r = R·√u`, `θ = 2π·v`, then projects
/// the offset back to degrees with the longitude term scaled by
/// `1 / cos(center.lat)`.  Accurate enough for radii under ~10 km.
///
/// Pass a seeded RNG (e.g. [`SimRng::inner`][crate::SimRng::inner]) for
/// reproducible output.
pub fn random_point_within_radius<R: Rng + ?Sized>(
    center:    GeoPoint,
    radius_km: f64,
    rng:       &mut R,
) -> GeoPoint {
    let u: f64 = rng.r#gen();
    let v: f64 = rng.r#gen();

    let r = radius_km * u.sqrt();
    let theta = 2.0 * PI * v;

    let d_lat = r * theta.cos() / KM_PER_DEGREE;
    let d_lon = r * theta.sin() / (KM_PER_DEGREE * center.lat.to_radians().cos());

    GeoPoint::new(center.lat + d_lat, center.lon + d_lon)
}
