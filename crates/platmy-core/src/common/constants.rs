//! Physical constants in cgs units, matching the values the radiative
//! transfer engine works with.

pub const PI: f64 = std::f64::consts::PI;
/// Gravitational constant, cm^3 g^-1 s^-2.
pub const GRAVITATIONAL_CONSTANT: f64 = 6.674e-8;
/// Speed of light, cm s^-1.
pub const SPEED_OF_LIGHT: f64 = 2.997_924_58e10;
/// Equatorial Earth radius, cm.
pub const EARTH_RADIUS: f64 = 637_813_660.0;
pub const CM_PER_MICRON: f64 = 1.0e-4;
/// Bulk density assumed when no planet mass is given, g cm^-3.
pub const DEFAULT_BULK_DENSITY: f64 = 1.33;
