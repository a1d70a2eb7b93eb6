// ---------------------------------------------------------------------------
// Exponential atmosphere with a hard ceiling
// ---------------------------------------------------------------------------

/// Sea-level reference density, folded with the drag normalisation used by
/// the max-drag model (kg/m^3 · 0.008).
pub const SEA_LEVEL_DENSITY: f64 = 1.223_094_855_487_4 * 0.008;

/// Density ratio below which the atmosphere is treated as vacuum.
const CEILING_RATIO: f64 = 1.0e6;

/// Altitude above which density is exactly zero, for a given scale height.
pub fn ceiling_altitude(scale_height: f64) -> f64 {
    scale_height * CEILING_RATIO.ln()
}

/// Fraction of sea-level density at `altitude`.
///
/// Below the surface the factor is held at 1. Between the surface and
/// `ceiling` it decays as `exp(-altitude / scale_height)`; at and above
/// `ceiling` it is exactly 0.
pub fn density_factor(altitude: f64, scale_height: f64, ceiling: f64) -> f64 {
    if altitude < 0.0 {
        1.0
    } else if altitude < ceiling {
        (-altitude / scale_height).exp()
    } else {
        0.0
    }
}

/// Air density at `altitude`, in the model's reference units.
pub fn density(altitude: f64, scale_height: f64, ceiling: f64) -> f64 {
    density_factor(altitude, scale_height, ceiling) * SEA_LEVEL_DENSITY
}
