// (c) Copyright 2025 Mikołaj Kuranowski
// SPDX-License-Identifier: MIT

//! Extraction of bit fields from packed 32-bit words.
//!
//! Bit 0 is the least significant bit of the word. Both functions require
//! `0 < length <= 32` and `start + length <= 32`; anything else is a bug
//! in the caller and panics.

#[inline]
fn check_range(start: u32, length: u32) {
    assert!(
        length > 0 && start <= 32 && length <= 32 - start,
        "invalid bit range: start={start}, length={length}"
    );
}

/// Returns the `length`-bit field of `word` starting at bit `start`, zero-extended.
#[inline]
pub fn extract_unsigned(word: u32, start: u32, length: u32) -> u32 {
    check_range(start, length);
    (word << (32 - start - length)) >> (32 - length)
}

/// Returns the `length`-bit field of `word` starting at bit `start`, sign-extended
/// from its most significant bit.
#[inline]
pub fn extract_signed(word: u32, start: u32, length: u32) -> i32 {
    check_range(start, length);
    ((word << (32 - start - length)) as i32) >> (32 - length)
}
