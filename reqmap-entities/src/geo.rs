use itertools::Itertools;
use std::{fmt, num::ParseFloatError, str::FromStr};
use thiserror::Error;

pub type RawCoord = i32;

// Assumption: 2-complement binary representation
const RAW_COORD_INVALID: RawCoord = RawCoord::MIN;
const RAW_COORD_MAX: RawCoord = RawCoord::MAX;
const RAW_COORD_MIN: RawCoord = -RAW_COORD_MAX;

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Invalid number '{0}': {1}")]
    Number(String, ParseFloatError),
    #[error("Latitude out of range: {0}")]
    LatitudeRange(f64),
    #[error("Longitude out of range: {0}")]
    LongitudeRange(f64),
    #[error("Expected 'lat,lng' but got '{0}'")]
    Format(String),
}

macro_rules! fixed_point_coord {
    ($(#[$meta:meta])* $name:ident, $deg_max:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
        pub struct $name(RawCoord);

        impl $name {
            const INVALID: Self = Self(RAW_COORD_INVALID);
            const DEG_MAX: f64 = $deg_max;
            const DEG_MIN: f64 = -$deg_max;
            const TO_DEG: f64 = Self::DEG_MAX / RAW_COORD_MAX as f64;
            const FROM_DEG: f64 = RAW_COORD_MAX as f64 / Self::DEG_MAX;

            pub const fn max() -> Self {
                Self(RAW_COORD_MAX)
            }

            pub const fn min() -> Self {
                Self(RAW_COORD_MIN)
            }

            pub const fn to_raw(self) -> RawCoord {
                self.0
            }

            pub const fn from_raw(raw: RawCoord) -> Self {
                Self(raw)
            }

            pub fn is_valid(self) -> bool {
                self != Self::INVALID
            }

            pub fn to_deg(self) -> f64 {
                if !self.is_valid() {
                    return f64::NAN;
                }
                let deg = f64::from(self.0) * Self::TO_DEG;
                debug_assert!(deg >= Self::DEG_MIN);
                debug_assert!(deg <= Self::DEG_MAX);
                deg
            }

            pub fn to_rad(self) -> f64 {
                self.to_deg().to_radians()
            }

            pub fn from_deg<T: Into<f64>>(deg: T) -> Self {
                let deg = deg.into();
                debug_assert!(deg >= Self::DEG_MIN);
                debug_assert!(deg <= Self::DEG_MAX);
                let res = Self(f64::round(deg * Self::FROM_DEG) as RawCoord);
                debug_assert!(res.is_valid());
                res
            }

            /// Rejects values outside of the valid range, including NaN.
            pub fn try_from_deg<T: Into<f64>>(deg: T) -> Option<Self> {
                let deg = deg.into();
                (deg >= Self::DEG_MIN && deg <= Self::DEG_MAX).then(|| Self::from_deg(deg))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "{}", self.to_deg())
            }
        }
    };
}

fixed_point_coord!(
    /// Latitude as a compact fixed-point integer in the range [-90°, 90°].
    LatCoord,
    90.0
);

fixed_point_coord!(
    /// Longitude as a compact fixed-point integer in the range [-180°, 180°].
    LngCoord,
    180.0
);

/// A geographical position.
///
/// The default value is invalid and is never produced by
/// a successful geocoding lookup.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MapPoint {
    lat: LatCoord,
    lng: LngCoord,
}

impl MapPoint {
    pub const fn new(lat: LatCoord, lng: LngCoord) -> Self {
        Self { lat, lng }
    }

    pub const fn lat(self) -> LatCoord {
        self.lat
    }

    pub const fn lng(self) -> LngCoord {
        self.lng
    }

    pub fn is_valid(self) -> bool {
        self.lat.is_valid() && self.lng.is_valid()
    }

    pub fn to_lat_lng_deg(self) -> (f64, f64) {
        (self.lat.to_deg(), self.lng.to_deg())
    }

    pub fn to_lat_lng_rad(self) -> (f64, f64) {
        (self.lat.to_rad(), self.lng.to_rad())
    }

    pub fn from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(lat: LAT, lng: LNG) -> Self {
        Self::new(LatCoord::from_deg(lat), LngCoord::from_deg(lng))
    }

    pub fn try_from_lat_lng_deg<LAT: Into<f64>, LNG: Into<f64>>(
        lat: LAT,
        lng: LNG,
    ) -> Option<Self> {
        match (LatCoord::try_from_deg(lat), LngCoord::try_from_deg(lng)) {
            (Some(lat), Some(lng)) => Some(Self::new(lat, lng)),
            _ => None,
        }
    }

    fn parse_lat_lng_deg(lat_str: &str, lng_str: &str) -> Result<Self, ParseError> {
        let parse = |s: &str| {
            s.trim()
                .parse::<f64>()
                .map_err(|err| ParseError::Number(s.to_owned(), err))
        };
        let lat_deg = parse(lat_str)?;
        let lng_deg = parse(lng_str)?;
        let lat = LatCoord::try_from_deg(lat_deg).ok_or(ParseError::LatitudeRange(lat_deg))?;
        let lng = LngCoord::try_from_deg(lng_deg).ok_or(ParseError::LongitudeRange(lng_deg))?;
        Ok(Self::new(lat, lng))
    }

    /// Calculate the great-circle distance on the surface
    /// of the earth using a special case of the Vincenty
    /// formula for numerical accuracy.
    /// Reference: https://en.wikipedia.org/wiki/Great-circle_distance
    pub fn distance(p1: MapPoint, p2: MapPoint) -> Option<Distance> {
        if !p1.is_valid() || !p2.is_valid() {
            return None;
        }

        let (lat1_rad, lng1_rad) = p1.to_lat_lng_rad();
        let (lat2_rad, lng2_rad) = p2.to_lat_lng_rad();

        let (lat1_sin, lat1_cos) = lat1_rad.sin_cos();
        let (lat2_sin, lat2_cos) = lat2_rad.sin_cos();

        let dlng = (lng1_rad - lng2_rad).abs();
        let (dlng_sin, dlng_cos) = dlng.sin_cos();

        let nom1 = lat2_cos * dlng_sin;
        let nom2 = lat1_cos * lat2_sin - lat1_sin * lat2_cos * dlng_cos;

        let nom = (nom1 * nom1 + nom2 * nom2).sqrt();
        let denom = lat1_sin * lat2_sin + lat1_cos * lat2_cos * dlng_cos;

        Some(Distance::from_meters(
            MEAN_EARTH_RADIUS.to_meters() * nom.atan2(denom),
        ))
    }
}

impl fmt::Display for MapPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.lat, self.lng)
    }
}

impl FromStr for MapPoint {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lng) = s
            .split(',')
            .collect_tuple()
            .ok_or_else(|| ParseError::Format(s.to_owned()))?;
        Self::parse_lat_lng_deg(lat, lng)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Distance(f64);

impl Distance {
    pub const fn infinite() -> Self {
        Self(f64::INFINITY)
    }

    pub const fn from_meters(meters: f64) -> Self {
        Self(meters)
    }

    pub fn from_km(km: f64) -> Self {
        Self(km * 1000.0)
    }

    pub const fn to_meters(self) -> f64 {
        self.0
    }

    pub fn to_km(self) -> f64 {
        self.0 / 1000.0
    }

    pub fn is_valid(self) -> bool {
        self.0 >= 0.0
    }
}

impl fmt::Display for Distance {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:.3} km", self.to_km())
    }
}

const MEAN_EARTH_RADIUS: Distance = Distance::from_meters(6_371_200.0);

/// An axis-aligned bounding box.
///
/// Boxes spanning the antimeridian have a south-west longitude
/// greater than the north-east longitude.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MapBbox {
    sw: MapPoint,
    ne: MapPoint,
}

impl MapBbox {
    pub const fn new(sw: MapPoint, ne: MapPoint) -> Self {
        Self { sw, ne }
    }

    /// The smallest box containing all valid points.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = MapPoint>,
    {
        points
            .into_iter()
            .filter(|p| p.is_valid())
            .fold(None, |bbox: Option<Self>, p| {
                let bbox = match bbox {
                    None => Self::new(p, p),
                    Some(Self { sw, ne }) => Self::new(
                        MapPoint::new(sw.lat.min(p.lat), sw.lng.min(p.lng)),
                        MapPoint::new(ne.lat.max(p.lat), ne.lng.max(p.lng)),
                    ),
                };
                Some(bbox)
            })
    }

    pub const fn south_west(&self) -> MapPoint {
        self.sw
    }

    pub const fn north_east(&self) -> MapPoint {
        self.ne
    }

    pub fn is_valid(&self) -> bool {
        self.sw.is_valid() && self.ne.is_valid() && self.sw.lat() <= self.ne.lat()
    }
}

impl fmt::Display for MapBbox {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{}", self.sw, self.ne)
    }
}
