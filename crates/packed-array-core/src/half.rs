//! Half-precision (16-bit) floating point conversion.
//!
//! Used by the `decode_half`/`encode_half` byte-array accessors. Encoding
//! rounds to nearest, ties to even; values beyond the half range become
//! infinities and NaN payloads collapse to a quiet NaN.

/// Decode the raw bits of an IEEE 754 half-precision float.
///
/// # Example
///
/// ```
/// use packed_array_core::half::decode_f16;
///
/// assert_eq!(decode_f16(0x3C00), 1.0);
/// assert_eq!(decode_f16(0xC000), -2.0);
/// assert!(decode_f16(0x7C00).is_infinite());
/// assert!(decode_f16(0x7E00).is_nan());
/// ```
pub fn decode_f16(bits: u16) -> f32 {
    let sign = u32::from(bits & 0x8000) << 16;
    let exponent = u32::from((bits >> 10) & 0x1F);
    let fraction = u32::from(bits & 0x03FF);

    match exponent {
        // Subnormal or zero
        0 => {
            let magnitude = fraction as f32 * 2f32.powi(-24);
            if sign != 0 { -magnitude } else { magnitude }
        }
        // Infinity or NaN
        0x1F => f32::from_bits(sign | 0x7F80_0000 | (fraction << 13)),
        _ => f32::from_bits(sign | ((exponent + 112) << 23) | (fraction << 13)),
    }
}

/// Encode an `f32` as the raw bits of an IEEE 754 half-precision float.
///
/// # Example
///
/// ```
/// use packed_array_core::half::encode_f16;
///
/// assert_eq!(encode_f16(1.0), 0x3C00);
/// assert_eq!(encode_f16(65504.0), 0x7BFF);
/// assert_eq!(encode_f16(1.0e6), 0x7C00);
/// ```
pub fn encode_f16(value: f32) -> u16 {
    let bits = value.to_bits();
    let sign = ((bits >> 16) & 0x8000) as u16;
    let exponent = ((bits >> 23) & 0xFF) as i32;
    let mantissa = bits & 0x007F_FFFF;

    if exponent == 0xFF {
        let nan = if mantissa != 0 { 0x0200 } else { 0 };
        return sign | 0x7C00 | nan;
    }

    let half_exponent = exponent - 127 + 15;
    if half_exponent >= 0x1F {
        return sign | 0x7C00;
    }

    if half_exponent <= 0 {
        if half_exponent < -10 {
            return sign;
        }
        let full = mantissa | 0x0080_0000;
        let shift = (14 - half_exponent) as u32;
        let halfway = 1u32 << (shift - 1);
        let rest = full & ((1u32 << shift) - 1);
        let mut h = full >> shift;
        if rest > halfway || (rest == halfway && h & 1 == 1) {
            h += 1;
        }
        return sign | h as u16;
    }

    let rest = mantissa & 0x1FFF;
    let mut h = ((half_exponent as u32) << 10) | (mantissa >> 13);
    // A carry out of the mantissa correctly bumps the exponent (up to infinity).
    if rest > 0x1000 || (rest == 0x1000 && h & 1 == 1) {
        h += 1;
    }
    sign | h as u16
}
