//! Display formatting shared by the renderers.
//!
//! Locale-neutral and ASCII apart from the "—" placeholder used for values
//! that are undefined (zero-impression aggregates) or absent.

use cm_core::DisplayBands;
use serde::Serialize;

/// Placeholder for undefined or empty values.
pub const DASH: &str = "—";

/// Percent with one decimal place: `94.2` → `"94.2%"`.
pub fn percent(rate: f64) -> String {
    if !rate.is_finite() {
        return DASH.to_string();
    }
    format!("{rate:.1}%")
}

/// `percent`, or the placeholder when the aggregate is undefined.
pub fn percent_opt(rate: Option<f64>) -> String {
    rate.map_or_else(|| DASH.to_string(), percent)
}

/// Compact currency: `$1.2M`, `$350K`, `$900`.
pub fn compact_currency(amount: f64) -> String {
    if !amount.is_finite() {
        return DASH.to_string();
    }
    let sign = if amount < 0.0 { "-" } else { "" };
    let v = amount.abs();
    let thousands = (v / 1_000.0).round();
    if v >= 1_000_000.0 || thousands >= 1_000.0 {
        format!("{sign}${:.1}M", v / 1_000_000.0)
    } else if v.round() >= 1_000.0 {
        format!("{sign}${thousands:.0}K")
    } else {
        format!("{sign}${v:.0}")
    }
}

/// Integer with comma thousands separators: `3500000` → `"3,500,000"`.
pub fn grouped<T: Into<u128>>(n: T) -> String {
    let s = n.into().to_string();
    let mut out = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Campaign table cells show the placeholder for zero values.
pub fn nonzero<T: PartialOrd + Default>(v: T, f: impl FnOnce(T) -> String) -> String {
    if v > T::default() { f(v) } else { DASH.to_string() }
}

/// `"1 campaign"`, `"3 campaigns"`.
pub fn counted(n: usize, noun: &str) -> String {
    if n == 1 { format!("{n} {noun}") } else { format!("{n} {noun}s") }
}

/// Colour band of an authentic-ad rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AarBand {
    Good,
    Fair,
    Poor,
    /// Undefined aggregate.
    None,
}

pub fn aar_band(rate: Option<f64>, bands: &DisplayBands) -> AarBand {
    match rate {
        None => AarBand::None,
        Some(r) if r >= bands.aar_good => AarBand::Good,
        Some(r) if r >= bands.aar_fair => AarBand::Fair,
        Some(_) => AarBand::Poor,
    }
}

/// Block rate strictly above the warning level is flagged.
pub fn block_rate_warning(rate: Option<f64>, bands: &DisplayBands) -> bool {
    rate.is_some_and(|r| r > bands.block_rate_warning)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_one_decimal() {
        assert_eq!(percent(94.2), "94.2%");
        assert_eq!(percent(0.0), "0.0%");
        assert_eq!(percent(100.0), "100.0%");
        assert_eq!(percent_opt(None), "—");
        assert_eq!(percent(f64::NAN), "—");
    }

    #[test]
    fn compact_currency_scales() {
        assert_eq!(compact_currency(1_200_000.0), "$1.2M");
        assert_eq!(compact_currency(350_000.0), "$350K");
        assert_eq!(compact_currency(900.0), "$900");
        assert_eq!(compact_currency(94_000.0), "$94K");
        assert_eq!(compact_currency(999_600.0), "$1.0M");
        assert_eq!(compact_currency(999.6), "$1K");
        assert_eq!(compact_currency(999.4), "$999");
        assert_eq!(compact_currency(0.0), "$0");
    }

    #[test]
    fn grouping() {
        assert_eq!(grouped(0u64), "0");
        assert_eq!(grouped(999u64), "999");
        assert_eq!(grouped(1_000u64), "1,000");
        assert_eq!(grouped(3_500_000u64), "3,500,000");
    }

    #[test]
    fn zero_cells_use_placeholder() {
        assert_eq!(nonzero(0u64, grouped), "—");
        assert_eq!(nonzero(12.5, percent), "12.5%");
        assert_eq!(counted(1, "campaign"), "1 campaign");
        assert_eq!(counted(0, "goal"), "0 goals");
    }

    #[test]
    fn bands_and_warning() {
        let b = DisplayBands::default();
        assert_eq!(aar_band(Some(90.0), &b), AarBand::Good);
        assert_eq!(aar_band(Some(89.9), &b), AarBand::Fair);
        assert_eq!(aar_band(Some(74.9), &b), AarBand::Poor);
        assert_eq!(aar_band(None, &b), AarBand::None);
        assert!(!block_rate_warning(Some(10.0), &b));
        assert!(block_rate_warning(Some(10.1), &b));
        assert!(!block_rate_warning(None, &b));
    }
}
