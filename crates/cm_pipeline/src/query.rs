//! View state ↔ URL query string.
//!
//! Keys are written in a fixed order and defaults are omitted, so
//! parse → serialize → parse round-trips exactly. Values are closed wire
//! tokens and need no percent-encoding. Unknown keys are ignored; for a
//! repeated key the first occurrence wins.

use core::fmt;
use core::str::FromStr;

use cm_core::{CoreError, EntityStatus, GoalSortKey, HealthStatus, Platform, Selector, SortDirection, SortKey};

use crate::filter::{CampaignFilter, GoalFilter};
use crate::sort::SortState;

/// Campaign table state: filters plus sort.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub status: Selector<EntityStatus>,
    pub platform: Selector<Platform>,
    pub sort: SortKey,
    pub dir: SortDirection,
}

impl ViewQuery {
    pub fn parse(q: &str) -> Result<Self, CoreError> {
        let mut out = Self::default();
        let mut seen = Seen::default();
        for (k, v) in pairs(q) {
            match k {
                "status" if seen.first(0) => out.status = parse_value(v, "status")?,
                "platform" if seen.first(1) => out.platform = parse_value(v, "platform")?,
                // An unknown sort column surfaces as InvalidSortKey.
                "sort" if seen.first(2) => out.sort = v.parse()?,
                "dir" if seen.first(3) => out.dir = parse_value(v, "dir")?,
                "status" | "platform" | "sort" | "dir" => {}
                other => tracing::debug!(key = other, "ignoring unknown query key"),
            }
        }
        Ok(out)
    }

    pub fn filter(&self) -> CampaignFilter {
        CampaignFilter { status: self.status, platform: self.platform }
    }

    pub fn sort_state(&self) -> SortState {
        SortState::new(self.sort, self.dir)
    }

    pub fn with_sort(self, s: SortState) -> Self {
        Self { sort: s.key, dir: s.dir, ..self }
    }

    /// Serialized form; empty when everything is at its default.
    pub fn to_query_string(&self) -> String {
        let mut w = QueryWriter::default();
        if let Selector::Only(s) = self.status {
            w.push("status", s.as_str());
        }
        if let Selector::Only(p) = self.platform {
            w.push("platform", p.as_str());
        }
        if self.sort != SortKey::default() {
            w.push("sort", self.sort.as_str());
        }
        if self.dir != SortDirection::default() {
            w.push("dir", self.dir.as_str());
        }
        w.finish()
    }
}

impl FromStr for ViewQuery {
    type Err = CoreError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ViewQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

/// Goal list state: health status and platform filters, optional column sort.
/// With no `sort` the list keeps its original order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GoalQuery {
    pub status: Selector<HealthStatus>,
    pub platform: Selector<Platform>,
    pub sort: Option<GoalSortKey>,
    pub dir: SortDirection,
}

impl GoalQuery {
    pub fn parse(q: &str) -> Result<Self, CoreError> {
        let mut out = Self::default();
        let mut seen = Seen::default();
        for (k, v) in pairs(q) {
            match k {
                "status" if seen.first(0) => out.status = parse_value(v, "status")?,
                "platform" if seen.first(1) => out.platform = parse_value(v, "platform")?,
                "sort" if seen.first(2) => out.sort = Some(v.parse()?),
                "dir" if seen.first(3) => out.dir = parse_value(v, "dir")?,
                "status" | "platform" | "sort" | "dir" => {}
                other => tracing::debug!(key = other, "ignoring unknown query key"),
            }
        }
        Ok(out)
    }

    /// Query linking to the goal list filtered on one platform.
    pub fn for_platform(p: Platform) -> Self {
        Self { platform: Selector::Only(p), ..Self::default() }
    }

    pub fn filter(&self) -> GoalFilter {
        GoalFilter { health: self.status, platform: self.platform }
    }

    pub fn to_query_string(&self) -> String {
        let mut w = QueryWriter::default();
        if let Selector::Only(s) = self.status {
            w.push("status", s.as_str());
        }
        if let Selector::Only(p) = self.platform {
            w.push("platform", p.as_str());
        }
        if let Some(k) = self.sort {
            w.push("sort", k.as_str());
        }
        if self.dir != SortDirection::default() {
            w.push("dir", self.dir.as_str());
        }
        w.finish()
    }
}

impl fmt::Display for GoalQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query_string())
    }
}

// ---------------- Helpers -----------------------------------------------------------------------

/// `key=value` pairs; a leading `?` and empty segments are skipped.
fn pairs(q: &str) -> impl Iterator<Item = (&str, &str)> {
    q.strip_prefix('?')
        .unwrap_or(q)
        .split('&')
        .filter(|s| !s.is_empty())
        .map(|s| s.split_once('=').unwrap_or((s, "")))
}

fn parse_value<T: FromStr<Err = CoreError>>(v: &str, key: &'static str) -> Result<T, CoreError> {
    v.parse().map_err(|_| CoreError::InvalidQuery(key))
}

/// First-occurrence tracker for up to 8 keys.
#[derive(Default)]
struct Seen(u8);

impl Seen {
    fn first(&mut self, slot: u8) -> bool {
        let bit = 1u8 << slot;
        let fresh = self.0 & bit == 0;
        self.0 |= bit;
        fresh
    }
}

#[derive(Default)]
struct QueryWriter(String);

impl QueryWriter {
    fn push(&mut self, k: &str, v: &str) {
        if !self.0.is_empty() {
            self.0.push('&');
        }
        self.0.push_str(k);
        self.0.push('=');
        self.0.push_str(v);
    }

    fn finish(self) -> String {
        self.0
    }
}
