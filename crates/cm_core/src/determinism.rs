//! Determinism utilities: total orders for text and rates.
//!
//! This module is **I/O-free**. Comparators here are total (no `partial_cmp`
//! escape hatches), so any sort built on them yields the same order for the
//! same input on every run and platform.

use core::cmp::Ordering;

use alloc::string::String;

/* -------------------------------------------------------------------------- */
/*                               Text ordering                                 */
/* -------------------------------------------------------------------------- */

/// Case-folded key for text comparisons.
#[inline]
pub fn fold_case(s: &str) -> String {
    s.to_lowercase()
}

/// Compare two strings case-insensitively (Unicode lowercase, then code point order).
pub fn cmp_text_ci(a: &str, b: &str) -> Ordering {
    // Fast path: pure ASCII needs no allocation.
    if a.is_ascii() && b.is_ascii() {
        let l = a.bytes().map(|c| c.to_ascii_lowercase());
        let r = b.bytes().map(|c| c.to_ascii_lowercase());
        return l.cmp(r);
    }
    fold_case(a).cmp(&fold_case(b))
}

/* -------------------------------------------------------------------------- */
/*                               Rate ordering                                 */
/* -------------------------------------------------------------------------- */

/// Total order over rates/amounts (IEEE-754 `totalOrder`; NaN sorts last).
#[inline]
pub fn cmp_rate(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

/// Apply a direction to an ascending comparison result.
#[inline]
pub fn directed(ord: Ordering, descending: bool) -> Ordering {
    if descending { ord.reverse() } else { ord }
}

/* ---------------------------------- Tests --------------------------------- */
