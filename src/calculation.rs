//! Conversion of raw result codes into temperatures.
//!
//! The object temperature follows the thermopile model of the TMP006 user
//! guide (SBOU107):
//!
//! ```text
//! S      = S0 * (1 + a1 * (Tdie - Tref) + a2 * (Tdie - Tref)^2)
//! Vos    = b0 + b1 * (Tdie - Tref) + b2 * (Tdie - Tref)^2
//! f(Vobj) = (Vobj - Vos) + c2 * (Vobj - Vos)^2
//! Tobj   = (Tdie^4 + f(Vobj) / S)^(1/4)
//! ```
//!
//! The constants are the generic calibration from the user guide. Results
//! are rounded half up to two decimals, and the order of operations is kept
//! stable so the same inputs always give the same output bits.

use num_traits::float::Float;

/// 1 LSB of the sensor voltage register, in nV.
const VOBJ_LSB_NV: f64 = 156.25;
/// 1 LSB of the die temperature register after dropping the two status bits.
const TDIE_LSB_C: f64 = 1.0 / 32.0;
const KELVIN_OFFSET: f64 = 273.15;
/// Tref, 25 °C in Kelvin.
const TREF_K: f64 = 298.15;

/// S0 in units of 1e-14.
const S0: f64 = 6.4;
const A1: f64 = 0.00175;
const A2: f64 = 0.00001678;
const B0: f64 = -0.0000294;
const B1: f64 = -0.00000057;
const B2: f64 = 0.00000000463;
const C2: f64 = 13.4;

/// Die temperature in °C, unrounded.
#[inline]
fn die_celsius(raw_ambient: i16) -> f64 {
    (raw_ambient >> 2) as f64 * TDIE_LSB_C
}

/// Rounds half up to two decimals.
#[inline]
pub(crate) fn round_centi(value: f64) -> f64 {
    Float::floor(value * 100.0 + 0.5) / 100.0
}

/// Die (ambient) temperature in °C, rounded to two decimals.
pub fn die_temperature(raw_ambient: i16) -> f64 {
    round_centi(die_celsius(raw_ambient))
}

/// Object temperature in °C, rounded to two decimals.
///
/// `raw_voltage` is the content of register 0x00, `raw_ambient` that of register 0x01.
pub fn object_temperature(raw_voltage: i16, raw_ambient: i16) -> f64 {
    let t_die = die_celsius(raw_ambient) + KELVIN_OFFSET;

    let mut v_obj = raw_voltage as f64 * VOBJ_LSB_NV;
    v_obj /= 1_000_000_000.0;

    let t_ref = t_die - TREF_K;

    let mut s = S0 * (1.0 + t_ref * (A1 - A2 * t_ref));
    s /= 10_000_000.0;
    s /= 10_000_000.0;

    let v_os = B0 + t_ref * (B1 + B2 * t_ref);

    let f_v_obj = (v_obj - v_os) * (1.0 + C2 * (v_obj - v_os));

    let t_obj = Float::sqrt(Float::sqrt(Float::powf(t_die, 4.0) + f_v_obj / s));

    round_centi(t_obj - KELVIN_OFFSET)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worked_example() {
        assert_eq!(0.68, object_temperature(-732, 2128));
        assert_eq!(16.63, die_temperature(2128));
    }

    #[test]
    fn die_temperature_drops_status_bits() {
        assert_eq!(die_temperature(2128), die_temperature(2128 | 0b11));
        assert_eq!(25.0, die_temperature(0x0C80));
        assert_eq!(-0.03, die_temperature(-4));
    }

    #[test]
    fn zero_voltage_reads_above_die_temperature() {
        // Vos is negative at Tref, so a zero reading still means a warmer object.
        assert_eq!(29.24, object_temperature(0, 0x0C80));
    }

    #[test]
    fn positive_voltage_means_warmer_object() {
        let cold = object_temperature(-732, 2128);
        let warm = object_temperature(732, 2128);
        assert!(warm > cold);
    }

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(16.63, round_centi(16.625));
        assert_eq!(-0.03, round_centi(-0.03125));
        assert_eq!(1.0, round_centi(0.999));
    }
}
