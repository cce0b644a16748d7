//! variables.rs — Closed domains (wire tokens explicit) and the analysis `Params`.
//!
//! Every string-typed field of the source records is a closed enumeration here.
//! Matching on them is exhaustive at the classifier and comparator boundaries,
//! so adding a variant is a compile error until every consumer handles it.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::errors::CoreError;

// ------------ Macros ------------

/// Define a closed enum with explicit wire tokens, `ALL` in declaration order,
/// `as_str`, `Display`, and `FromStr` (unknown token → `$err`).
macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident, $err:expr => {
        $($(#[$vmeta:meta])* $variant:ident = $token:literal),+ $(,)?
    }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub enum $name {
            $(
                $(#[$vmeta])*
                #[cfg_attr(feature = "serde", serde(rename = $token))]
                $variant,
            )+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $token,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($token => Ok($name::$variant),)+
                    _ => Err($err),
                }
            }
        }
    };
}

// ------------ Canonical enums (wire tokens explicit) ------------

wire_enum!(
    /// Lifecycle status shared by goals and campaigns.
    EntityStatus, CoreError::UnknownVariant("status") => {
        Draft  = "draft",
        Active = "active",
        Paused = "paused",
    }
);

wire_enum!(
    HealthStatus, CoreError::UnknownVariant("health status") => {
        OnTrack        = "on-track",
        AtRisk         = "at-risk",
        NeedsAttention = "needs-attention",
    }
);

wire_enum!(
    /// Media channel a goal or campaign runs on.
    Platform, CoreError::UnknownVariant("platform") => {
        OpenWeb  = "open-web",
        Meta     = "meta",
        TikTok   = "tiktok",
        YouTube  = "youtube",
        Ctv      = "ctv",
        Snapchat = "snapchat",
        LinkedIn = "linkedin",
        Twitch   = "twitch",
    }
);

impl Platform {
    /// Human label used by the presentation layer.
    pub const fn label(self) -> &'static str {
        match self {
            Platform::OpenWeb => "Open Web",
            Platform::Meta => "Meta",
            Platform::TikTok => "TikTok",
            Platform::YouTube => "YouTube",
            Platform::Ctv => "CTV",
            Platform::Snapchat => "Snapchat",
            Platform::LinkedIn => "LinkedIn",
            Platform::Twitch => "Twitch",
        }
    }
}

wire_enum!(
    MediaType, CoreError::UnknownVariant("media type") => {
        Display = "display",
        Social  = "social",
        Video   = "video",
        Ctv     = "ctv",
    }
);

impl MediaType {
    pub const fn label(self) -> &'static str {
        match self {
            MediaType::Display => "Display",
            MediaType::Social => "Social",
            MediaType::Video => "Video",
            MediaType::Ctv => "CTV",
        }
    }

    /// The quality signal this media type is judged on first.
    pub const fn metric_focus(self) -> &'static str {
        match self {
            MediaType::Display => "Block Rate & URL verification",
            MediaType::Social => "Feed-level Brand Safety analysis",
            MediaType::Video => "Viewability & Attention metrics",
            MediaType::Ctv => "Fraud (SIVT) & app-level verification",
        }
    }

    /// Platforms a goal of this media type may buy on, in offer order.
    pub const fn platforms(self) -> &'static [Platform] {
        match self {
            MediaType::Display => &[Platform::OpenWeb],
            MediaType::Social => &[Platform::Meta, Platform::TikTok, Platform::Snapchat],
            MediaType::Video => &[Platform::YouTube],
            MediaType::Ctv => &[Platform::Ctv],
        }
    }
}

wire_enum!(
    /// Quality pillars. Declaration order is the tie-break order for the
    /// primary driver.
    Pillar, CoreError::UnknownVariant("pillar") => {
        Fraud       = "Fraud",
        Viewability = "Viewability",
        Suitability = "Suitability",
        Geography   = "Geography",
    }
);

impl Pillar {
    /// Pass threshold (percent) when `Params` does not override it.
    pub fn default_threshold(self) -> f64 {
        match self {
            Pillar::Fraud => 98.0,
            Pillar::Viewability => 70.0,
            Pillar::Suitability => 95.0,
            Pillar::Geography => 95.0,
        }
    }

    /// Explanation shown next to a primary driver.
    pub const fn driver_label(self) -> &'static str {
        match self {
            Pillar::Fraud => "Fraud (Bot/SIVT traffic)",
            Pillar::Viewability => "Viewability (Below threshold)",
            Pillar::Suitability => "Suitability (Unsafe content)",
            Pillar::Geography => "Geography (Out of market)",
        }
    }
}

wire_enum!(
    /// Rate-type metrics that can be impression-weighted.
    RateMetric, CoreError::UnknownVariant("metric") => {
        AuthenticAdRate      = "authenticAdRate",
        BlockRate            = "blockRate",
        FraudRate            = "fraudRate",
        ViewabilityRate      = "viewabilityRate",
        BrandSuitabilityRate = "brandSuitabilityRate",
        InGeoRate            = "inGeoRate",
    }
);

wire_enum!(
    /// Sortable columns of the campaign table.
    SortKey, CoreError::InvalidSortKey => {
        Name            = "name",
        GoalName        = "goalName",
        AuthenticAdRate = "authenticAdRate",
        Impressions     = "impressions",
        Spend           = "spend",
        ViewabilityRate = "viewabilityRate",
    }
);

impl Default for SortKey {
    fn default() -> Self { SortKey::Name }
}

wire_enum!(
    /// Sortable columns of the goal list. Unsorted keeps goal list order.
    GoalSortKey, CoreError::InvalidSortKey => {
        Name            = "name",
        TotalSpend      = "totalSpend",
        AuthenticAdRate = "authenticAdRate",
        BlockRate       = "blockRate",
    }
);

wire_enum!(
    SortDirection, CoreError::UnknownVariant("sort direction") => {
        Asc  = "asc",
        Desc = "desc",
    }
);

impl SortDirection {
    pub const fn flipped(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl Default for SortDirection {
    fn default() -> Self { SortDirection::Asc }
}

// ------------ Filter selector ------------

/// A filter clause value: `all` (wildcard, no-op) or a single domain value.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Selector<T> {
    All,
    Only(T),
}

impl<T> Default for Selector<T> {
    fn default() -> Self { Selector::All }
}

impl<T: PartialEq> Selector<T> {
    /// `All` matches everything; `Only(v)` matches `v` exactly.
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selector::All => true,
            Selector::Only(v) => v == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }
}

impl<T> From<Option<T>> for Selector<T> {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(x) => Selector::Only(x),
            None => Selector::All,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::All => f.write_str("all"),
            Selector::Only(v) => v.fmt(f),
        }
    }
}

impl<T: FromStr<Err = CoreError>> FromStr for Selector<T> {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            Ok(Selector::All)
        } else {
            s.parse().map(Selector::Only)
        }
    }
}

// ------------ Params ------------

/// Pillar pass thresholds (percent).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct PillarThresholds {
    /// Minimum fraud-free rate (100 − fraudRate).
    pub fraud_free: f64,
    pub viewability: f64,
    pub suitability: f64,
    pub geography: f64,
}

impl PillarThresholds {
    pub fn get(&self, pillar: Pillar) -> f64 {
        match pillar {
            Pillar::Fraud => self.fraud_free,
            Pillar::Viewability => self.viewability,
            Pillar::Suitability => self.suitability,
            Pillar::Geography => self.geography,
        }
    }
}

impl Default for PillarThresholds {
    fn default() -> Self {
        Self {
            fraud_free: Pillar::Fraud.default_threshold(),
            viewability: Pillar::Viewability.default_threshold(),
            suitability: Pillar::Suitability.default_threshold(),
            geography: Pillar::Geography.default_threshold(),
        }
    }
}

/// Display bands used when colouring rates in the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct DisplayBands {
    /// AAR at or above this is "good".
    pub aar_good: f64,
    /// AAR at or above this (and below `aar_good`) is "fair".
    pub aar_fair: f64,
    /// Block rate strictly above this is flagged.
    pub block_rate_warning: f64,
}

impl Default for DisplayBands {
    fn default() -> Self {
        Self { aar_good: 90.0, aar_fair: 75.0, block_rate_warning: 10.0 }
    }
}

/// Caller-supplied overrides for a goal created in the current session.
/// Passed explicitly into the goal-list builder; never ambient state.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct GoalOverlay {
    /// Connected buying-platform label. An empty label means "not connected".
    pub connected_dsp: Option<String>,
    /// Replaces both `platform` and `platforms` of the goal.
    pub platform: Option<Platform>,
    pub media_type: Option<MediaType>,
    pub name: Option<String>,
}

/// Analysis parameters with safe defaults.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
pub struct Params {
    pub thresholds: PillarThresholds,
    pub bands: DisplayBands,
    pub overlay: Option<GoalOverlay>,
}

fn is_pct(v: f64) -> bool {
    v.is_finite() && (0.0..=100.0).contains(&v)
}

/// Domain checks for a loaded `Params`. Returns every violation, in field order.
pub fn validate_domains(p: &Params) -> Result<(), Vec<CoreError>> {
    let mut errs = Vec::new();
    let t = &p.thresholds;
    for (v, name) in [
        (t.fraud_free, "thresholds.fraudFree"),
        (t.viewability, "thresholds.viewability"),
        (t.suitability, "thresholds.suitability"),
        (t.geography, "thresholds.geography"),
        (p.bands.aar_good, "bands.aarGood"),
        (p.bands.aar_fair, "bands.aarFair"),
        (p.bands.block_rate_warning, "bands.blockRateWarning"),
    ] {
        if !is_pct(v) {
            errs.push(CoreError::DomainOutOfRange(name));
        }
    }
    if p.bands.aar_fair > p.bands.aar_good {
        errs.push(CoreError::DomainOutOfRange("bands.aarFair > bands.aarGood"));
    }
    if errs.is_empty() { Ok(()) } else { Err(errs) }
}
