// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Conversions for the 28.4 fixed-point representation: a two's-complement
//! 32-bit integer whose 4 least significant bits hold the binary fraction.

const FRACTION_BITS: i32 = 4;
const SCALE: f64 = (1 << FRACTION_BITS) as f64;

/// Returns the fixed-point representation of an integer.
#[inline]
pub fn of_int(i: i32) -> i32 {
    i << FRACTION_BITS
}

/// Decodes a fixed-point value as a double.
#[inline]
pub fn to_f64(q: i32) -> f64 {
    q as f64 / SCALE
}

/// Decodes a fixed-point value as a float.
#[inline]
pub fn to_f32(q: i32) -> f32 {
    to_f64(q) as f32
}

/// Encodes a double as the nearest fixed-point value.
#[inline]
pub fn from_f64(x: f64) -> i32 {
    (x * SCALE).round() as i32
}
