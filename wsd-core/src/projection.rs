//! Coordinate reference systems and their inverse projections to WGS84.
//!
//! Cell layers arrive in whatever CRS the GIS export used. Everything the
//! dashboard stores is WGS84 longitude/latitude (EPSG:4326), so projected
//! coordinates are inverted once at load time.
//!
//! # Supported systems
//!
//! - **Wgs84**: EPSG:4326 / OGC CRS84, passed through
//! - **WebMercator**: EPSG:3857 (and its legacy aliases 900913, 3785, 102100)
//! - **Utm**: WGS84 UTM zones (EPSG:326zz north, 327zz south) and NAD83 UTM
//!   zones (EPSG:269zz, datum difference ignored)

use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;
use thiserror::Error;

/// Problems reading or reprojecting a cell layer.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The declared CRS is not one we can invert
    #[error("unsupported coordinate reference system '{0}'")]
    UnsupportedCrs(String),

    /// GeoJSON could not be parsed
    #[error("invalid GeoJSON: {0}")]
    GeoJson(String),

    /// Valid GeoJSON, but not a FeatureCollection
    #[error("expected a FeatureCollection, found {0}")]
    NotFeatureCollection(&'static str),

    /// A position had fewer than two ordinates
    #[error("position with {0} ordinate(s)")]
    ShortPosition(usize),
}

/// Geographic bounding box in WGS84 coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoBoundingBox {
    /// Minimum longitude (western edge) in degrees
    pub min_lon: f64,
    /// Minimum latitude (southern edge) in degrees
    pub min_lat: f64,
    /// Maximum longitude (eastern edge) in degrees
    pub max_lon: f64,
    /// Maximum latitude (northern edge) in degrees
    pub max_lat: f64,
}

impl GeoBoundingBox {
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Degenerate box around a single position.
    pub fn from_point(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat, lon, lat)
    }

    /// Grow the box to include a position.
    pub fn include(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }

    /// Get the center of the bounding box as (lat, lon).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

/// Trait for coordinate projections.
pub trait CoordinateProjection {
    /// Convert geographic coordinates (lat, lon) to projected (x, y) in meters.
    fn geo_to_xy(&self, lat: f64, lon: f64) -> (f64, f64);

    /// Convert projected coordinates (x, y) to geographic (lat, lon).
    fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64);
}

/// Spherical Web Mercator (EPSG:3857).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WebMercator;

impl WebMercator {
    /// Sphere radius used by EPSG:3857 (the WGS84 semi-major axis).
    const R: f64 = 6_378_137.0;
}

impl CoordinateProjection for WebMercator {
    fn geo_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let x = Self::R * lon.to_radians();
        let y = Self::R * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln();
        (x, y)
    }

    fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let lon = (x / Self::R).to_degrees();
        let lat = (2.0 * (y / Self::R).exp().atan() - PI / 2.0).to_degrees();
        (lat, lon)
    }
}

/// UTM projection for a specific zone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UtmProjection {
    /// Central meridian in degrees
    central_meridian: f64,
    /// Scale factor at central meridian (0.9996 for UTM)
    scale_factor: f64,
    /// False easting in meters (500,000 for UTM)
    false_easting: f64,
    /// False northing in meters (0 north, 10,000,000 south)
    false_northing: f64,
    zone: u8,
    northern: bool,
}

impl UtmProjection {
    /// WGS84 equatorial radius in meters
    const A: f64 = 6_378_137.0;
    /// WGS84 flattening
    const F: f64 = 1.0 / 298.257_223_563;

    /// Create a UTM projection for a zone (1-60) and hemisphere.
    pub fn new(zone: u8, northern: bool) -> Option<Self> {
        if !(1..=60).contains(&zone) {
            return None;
        }
        let central_meridian = (zone as f64 - 1.0) * 6.0 - 180.0 + 3.0;
        Some(Self {
            central_meridian,
            scale_factor: 0.9996,
            false_easting: 500_000.0,
            false_northing: if northern { 0.0 } else { 10_000_000.0 },
            zone,
            northern,
        })
    }

    pub fn zone(&self) -> u8 {
        self.zone
    }

    pub fn is_northern(&self) -> bool {
        self.northern
    }
}

impl CoordinateProjection for UtmProjection {
    fn geo_to_xy(&self, lat: f64, lon: f64) -> (f64, f64) {
        let lat_rad = lat * PI / 180.0;
        let lon_rad = lon * PI / 180.0;
        let lon0_rad = self.central_meridian * PI / 180.0;

        let e2 = 2.0 * Self::F - Self::F * Self::F;
        let e_prime2 = e2 / (1.0 - e2);

        let n = Self::A / (1.0 - e2 * lat_rad.sin().powi(2)).sqrt();
        let t = lat_rad.tan().powi(2);
        let c = e_prime2 * lat_rad.cos().powi(2);
        let a_coef = (lon_rad - lon0_rad) * lat_rad.cos();

        // Meridian arc length
        let e4 = e2 * e2;
        let e6 = e4 * e2;
        let m = Self::A
            * ((1.0 - e2 / 4.0 - 3.0 * e4 / 64.0 - 5.0 * e6 / 256.0) * lat_rad
                - (3.0 * e2 / 8.0 + 3.0 * e4 / 32.0 + 45.0 * e6 / 1024.0) * (2.0 * lat_rad).sin()
                + (15.0 * e4 / 256.0 + 45.0 * e6 / 1024.0) * (4.0 * lat_rad).sin()
                - (35.0 * e6 / 3072.0) * (6.0 * lat_rad).sin());

        let x = self.scale_factor
            * n
            * (a_coef
                + (1.0 - t + c) * a_coef.powi(3) / 6.0
                + (5.0 - 18.0 * t + t * t + 72.0 * c - 58.0 * e_prime2) * a_coef.powi(5) / 120.0)
            + self.false_easting;

        let y = self.scale_factor
            * (m + n
                * lat_rad.tan()
                * (a_coef.powi(2) / 2.0
                    + (5.0 - t + 9.0 * c + 4.0 * c * c) * a_coef.powi(4) / 24.0
                    + (61.0 - 58.0 * t + t * t + 600.0 * c - 330.0 * e_prime2) * a_coef.powi(6)
                        / 720.0))
            + self.false_northing;

        (x, y)
    }

    fn xy_to_geo(&self, x: f64, y: f64) -> (f64, f64) {
        let x = x - self.false_easting;
        let y = y - self.false_northing;

        let e2 = 2.0 * Self::F - Self::F * Self::F;
        let e_prime2 = e2 / (1.0 - e2);
        let e1 = (1.0 - (1.0 - e2).sqrt()) / (1.0 + (1.0 - e2).sqrt());

        let m = y / self.scale_factor;
        let mu = m / (Self::A * (1.0 - e2 / 4.0 - 3.0 * e2 * e2 / 64.0 - 5.0 * e2 * e2 * e2 / 256.0));

        let phi1 = mu
            + (3.0 * e1 / 2.0 - 27.0 * e1.powi(3) / 32.0) * (2.0 * mu).sin()
            + (21.0 * e1 * e1 / 16.0 - 55.0 * e1.powi(4) / 32.0) * (4.0 * mu).sin()
            + (151.0 * e1.powi(3) / 96.0) * (6.0 * mu).sin()
            + (1097.0 * e1.powi(4) / 512.0) * (8.0 * mu).sin();

        let n1 = Self::A / (1.0 - e2 * phi1.sin().powi(2)).sqrt();
        let t1 = phi1.tan().powi(2);
        let c1 = e_prime2 * phi1.cos().powi(2);
        let r1 = Self::A * (1.0 - e2) / (1.0 - e2 * phi1.sin().powi(2)).powf(1.5);
        let d = x / (n1 * self.scale_factor);

        let lat = phi1
            - (n1 * phi1.tan() / r1)
                * (d * d / 2.0
                    - (5.0 + 3.0 * t1 + 10.0 * c1 - 4.0 * c1 * c1 - 9.0 * e_prime2) * d.powi(4)
                        / 24.0
                    + (61.0 + 90.0 * t1 + 298.0 * c1 + 45.0 * t1 * t1
                        - 252.0 * e_prime2
                        - 3.0 * c1 * c1)
                        * d.powi(6)
                        / 720.0);

        let lon = self.central_meridian * PI / 180.0
            + (d - (1.0 + 2.0 * t1 + c1) * d.powi(3) / 6.0
                + (5.0 - 2.0 * c1 + 28.0 * t1 - 3.0 * c1 * c1 + 8.0 * e_prime2 + 24.0 * t1 * t1)
                    * d.powi(5)
                    / 120.0)
                / phi1.cos();

        (lat * 180.0 / PI, lon * 180.0 / PI)
    }
}

/// A source coordinate reference system we know how to bring to WGS84.
///
/// NAD83 variants convert exactly like their WGS84 counterparts (the datum
/// shift is ignored) but keep their own EPSG code for display.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Crs {
    Wgs84,
    Nad83,
    WebMercator,
    Utm(UtmProjection),
    Nad83Utm(UtmProjection),
}

impl Crs {
    /// Parse an identifier such as `EPSG:32616`, `urn:ogc:def:crs:EPSG::3857`
    /// or `urn:ogc:def:crs:OGC:1.3:CRS84`.
    pub fn parse(name: &str) -> Result<Crs, GeometryError> {
        let trimmed = name.trim();
        let upper = trimmed.to_ascii_uppercase();
        if upper.ends_with("CRS84") {
            return Ok(Crs::Wgs84);
        }
        let code: u32 = upper
            .rsplit(':')
            .next()
            .and_then(|c| c.trim().parse().ok())
            .ok_or_else(|| GeometryError::UnsupportedCrs(trimmed.to_string()))?;
        Self::from_epsg(code).ok_or_else(|| GeometryError::UnsupportedCrs(trimmed.to_string()))
    }

    /// Map an EPSG code onto a supported system.
    pub fn from_epsg(code: u32) -> Option<Crs> {
        match code {
            4326 => Some(Crs::Wgs84),
            4269 => Some(Crs::Nad83),
            3857 | 900913 | 3785 | 102100 => Some(Crs::WebMercator),
            32601..=32660 => UtmProjection::new((code - 32600) as u8, true).map(Crs::Utm),
            32701..=32760 => UtmProjection::new((code - 32700) as u8, false).map(Crs::Utm),
            26901..=26923 => UtmProjection::new((code - 26900) as u8, true).map(Crs::Nad83Utm),
            _ => None,
        }
    }

    /// Convert a source position (x/easting, y/northing) to (lon, lat).
    pub fn to_lon_lat(&self, x: f64, y: f64) -> (f64, f64) {
        match self {
            Crs::Wgs84 | Crs::Nad83 => (x, y),
            Crs::WebMercator => {
                let (lat, lon) = WebMercator.xy_to_geo(x, y);
                (lon, lat)
            }
            Crs::Utm(utm) | Crs::Nad83Utm(utm) => {
                let (lat, lon) = utm.xy_to_geo(x, y);
                (lon, lat)
            }
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self, Crs::Wgs84 | Crs::Nad83)
    }
}

impl fmt::Display for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Crs::Wgs84 => write!(f, "EPSG:4326"),
            Crs::Nad83 => write!(f, "EPSG:4269"),
            Crs::WebMercator => write!(f, "EPSG:3857"),
            Crs::Utm(utm) => {
                let base = if utm.is_northern() { 32600 } else { 32700 };
                write!(f, "EPSG:{}", base + utm.zone() as u32)
            }
            Crs::Nad83Utm(utm) => write!(f, "EPSG:{}", 26900 + utm.zone() as u32),
        }
    }
}
