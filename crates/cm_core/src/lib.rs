//! cm_core — Core types, closed domains, ordering helpers, and analysis parameters.
//!
//! This crate is **I/O-free**. It defines stable types/APIs used across the
//! engine (`cm_algo`, `cm_pipeline`, `cm_io`, `cm_report`, `cm_cli`).
//!
//! - Registry tokens: `GoalId`, `CampaignId`
//! - Closed domains: status, health, platform, media type, pillar, sort key/direction
//! - Entities: `Goal`, `Campaign`, and the read-only `FlatCampaign` projection
//! - Deterministic ordering helpers (case-insensitive text, total order on rates)
//! - `Params`: pillar thresholds, display bands, optional goal overlay
//!
//! Serialization derives are gated behind the `serde` feature.

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

pub mod errors {
    use core::fmt;

    /// Minimal error set for core-domain validation & parsing.
    #[derive(Clone, Copy, Debug, Eq, PartialEq)]
    pub enum CoreError {
        InvalidToken,
        /// A wire token did not name any variant of the given domain.
        UnknownVariant(&'static str),
        /// Sort requested on a key the comparator does not know.
        InvalidSortKey,
        InvalidQuery(&'static str),
        DomainOutOfRange(&'static str),
    }

    impl fmt::Display for CoreError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            match self {
                CoreError::InvalidToken => write!(f, "invalid token"),
                CoreError::UnknownVariant(k) => write!(f, "unknown {k}"),
                CoreError::InvalidSortKey => write!(f, "invalid sort key"),
                CoreError::InvalidQuery(k) => write!(f, "invalid query: {k}"),
                CoreError::DomainOutOfRange(k) => write!(f, "domain out of range: {k}"),
            }
        }
    }

    #[cfg(feature = "std")]
    impl std::error::Error for CoreError {}
}

pub mod tokens {
    //! Registry token types (`GoalId`, `CampaignId`) with strict charset.

    use crate::errors::CoreError;
    use alloc::string::{String, ToString};
    use core::fmt;
    use core::str::FromStr;

    fn is_token(s: &str) -> bool {
        let len = s.len();
        if !(1..=64).contains(&len) { return false; }
        s.bytes().all(|b| matches!(b,
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' |
            b'_' | b'-' | b':' | b'.'
        ))
    }

    macro_rules! def_token {
        ($name:ident) => {
            #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
            #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
            #[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
            pub struct $name(String);

            impl $name {
                pub fn as_str(&self) -> &str { &self.0 }
            }

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
            }

            impl FromStr for $name {
                type Err = CoreError;
                fn from_str(s: &str) -> Result<Self, Self::Err> {
                    if is_token(s) { Ok(Self(s.to_string())) } else { Err(CoreError::InvalidToken) }
                }
            }

            impl TryFrom<String> for $name {
                type Error = CoreError;
                fn try_from(s: String) -> Result<Self, Self::Error> {
                    if is_token(&s) { Ok(Self(s)) } else { Err(CoreError::InvalidToken) }
                }
            }

            impl From<$name> for String {
                fn from(v: $name) -> String { v.0 }
            }

            impl AsRef<str> for $name {
                fn as_ref(&self) -> &str { &self.0 }
            }
        }
    }

    def_token!(GoalId);
    def_token!(CampaignId);
}

pub mod determinism;
pub mod entities;
pub mod variables;

pub use entities::{Campaign, CampaignMetrics, FlatCampaign, Goal, GoalMetrics};
pub use errors::CoreError;
pub use tokens::{CampaignId, GoalId};
pub use variables::{
    validate_domains, DisplayBands, EntityStatus, GoalOverlay, HealthStatus, MediaType, Params,
    GoalSortKey, Pillar, PillarThresholds, Platform, RateMetric, Selector, SortDirection, SortKey,
};
