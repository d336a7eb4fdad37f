// ─────────────────────────────────────────────────────────────────────
// G-Mode Kernel — Mode Classification Helpers
// ─────────────────────────────────────────────────────────────────────
//! Mode-classification parameter k and first-order (Ledoux) rotational
//! splitting of pulsation frequencies.

use std::f64::consts::PI;

use gmode_types::{GmodeError, GmodeResult};

/// Gravitational constant (cm³ g⁻¹ s⁻²).
pub const GRAVITATIONAL_CONSTANT_CGS: f64 = 6.67428e-8;

/// Mode-classification parameter k for degree `l` and azimuthal order `m`.
///
/// Gravity modes: `k = l − |m|`. Rossby modes: `k = −(l − |m| + 1)`.
pub fn mode_k(l: i32, m: i32, rossby: bool) -> GmodeResult<i32> {
    if l.abs() < m.abs() {
        return Err(GmodeError::Validation(format!(
            "degree l must be >= |m|, got (l, m) = ({l}, {m})"
        )));
    }
    let k = l - m.abs();
    Ok(if rossby { -(k + 1) } else { k })
}

/// Roche critical rotation frequency in cycles per second.
pub fn roche_critical_frequency(mass_g: f64, radius_cm: f64) -> f64 {
    (8.0 * GRAVITATIONAL_CONSTANT_CGS * mass_g / (27.0 * radius_cm.powi(3))).sqrt() / (2.0 * PI)
}

/// Shift frequencies (c/d) by first-order rotational splitting:
/// `f − m · Ω · (1 − β)`, with Ω = `omega_fraction` × Roche critical rate.
pub fn ledoux_splitting(
    frequencies: &[f64],
    betas: &[f64],
    mass_g: f64,
    radius_cm: f64,
    omega_fraction: f64,
    m: i32,
) -> GmodeResult<Vec<f64>> {
    if frequencies.len() != betas.len() {
        return Err(GmodeError::Validation(format!(
            "{} frequencies but {} Ledoux constants",
            frequencies.len(),
            betas.len()
        )));
    }
    if !(mass_g > 0.0 && radius_cm > 0.0) {
        return Err(GmodeError::Validation(format!(
            "mass and radius must be > 0, got M={mass_g} g, R={radius_cm} cm"
        )));
    }

    let omega_cd = omega_fraction * roche_critical_frequency(mass_g, radius_cm) * 86_400.0;
    Ok(frequencies
        .iter()
        .zip(betas)
        .map(|(f, beta)| f - m as f64 * omega_cd * (1.0 - beta))
        .collect())
}
