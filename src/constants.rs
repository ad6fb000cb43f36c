/// Earth mass (kg)
pub const EARTH_MASS_KG: f64 = 5.9722E24;

/// Newtonian constant of gravitation (m^3 kg-1 s-2)
pub const GRAVITATIONAL_CONSTANT: f64 = 6.6743015E-11;

/// Earth gravitational constant (m^3 s-2)
pub const EARTH_GRAVITATION_MU_M3_S2: f64 = EARTH_MASS_KG * GRAVITATIONAL_CONSTANT;

/// Speed of light in m.s⁻¹
pub const SPEED_OF_LIGHT_M_S: f64 = 299792458.0;

/// Pseudo range modulus: distance light travels in 1 ms (m).
/// Scales the integer ambiguity of the observables message.
pub const AMBIGUITY_RANGE_M: f64 = 299792.458;

/// Eccentricity scale factor (2^-33)
pub const ECCENTRICITY_SCALE: f64 = 1.0 / 8589934592.0;

/// Solar day duration (s), used as Earth rotation period
pub const SECONDS_PER_DAY: f64 = 86400.0;

/// GPS week duration (s)
pub const SECONDS_PER_WEEK: f64 = 604800.0;

/// Minimal number of satellites to resolve position and clock bias
pub const MIN_SATELLITES: usize = 4;
