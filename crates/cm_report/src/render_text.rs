//! render_text.rs — plain-text report (terminal output).
//! Sections: overview → channel mix (+ initiative total) → campaigns → goals → integrity.

use std::fmt::Write as _;

use crate::model::{CampaignRow, ChannelRow, GoalRow, RateCell, ReportModel};

/* ----------------------- small helpers ----------------------- */

/// Rate text with a trailing `!` when flagged.
fn rate(c: &RateCell) -> String {
    if c.warning { format!("{} !", c.text) } else { c.text.clone() }
}

/// Pad/truncate to a fixed column width (char-based).
fn col(s: &str, w: usize) -> String {
    let n = s.chars().count();
    if n > w {
        let mut t: String = s.chars().take(w.saturating_sub(1)).collect();
        t.push('…');
        t
    } else {
        format!("{s}{}", " ".repeat(w - n))
    }
}

fn rcol(s: &str, w: usize) -> String {
    let n = s.chars().count();
    if n >= w { s.to_string() } else { format!("{}{s}", " ".repeat(w - n)) }
}

/* ----------------------- builder ----------------------- */

pub struct TextBuilder {
    out: String,
}

impl Default for TextBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TextBuilder {
    pub fn new() -> Self {
        Self { out: String::with_capacity(4 * 1024) }
    }

    fn heading(&mut self, title: &str) {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let _ = writeln!(self.out, "{title}");
        let _ = writeln!(self.out, "{}", "-".repeat(title.chars().count()));
    }

    pub fn section_overview(&mut self, m: &ReportModel) {
        self.heading("Overview");
        for line in &m.overview.insights {
            let _ = writeln!(self.out, "  {line}");
        }
        if let Some(spend) = &m.overview.total_spend {
            let _ = writeln!(self.out, "  {}{spend}", col("Total Spend", 14));
        }
        let _ = writeln!(self.out, "  {}{}", col("Impressions", 14), m.overview.impressions);
        let _ = writeln!(self.out, "  {}{}", col("Block Rate", 14), rate(&m.overview.block_rate));
    }

    pub fn section_channels(&mut self, m: &ReportModel) {
        self.heading("Channel Mix");
        let _ = writeln!(
            self.out,
            "  {}{}{}{}  Primary Non-Authentic Driver",
            col("Platform", 18),
            col("Goals", 10),
            rcol("AAR", 8),
            rcol("Block Rate", 12),
        );
        for c in &m.channels {
            self.channel_line(c);
        }
        self.channel_line(&m.initiative_total);
    }

    fn channel_line(&mut self, c: &ChannelRow) {
        let _ = writeln!(
            self.out,
            "  {}{}{}{}  {}",
            col(&c.label, 18),
            col(&c.goals, 10),
            rcol(&c.aar.text, 8),
            rcol(&rate(&c.block_rate), 12),
            c.driver_label,
        );
    }

    pub fn section_campaigns(&mut self, m: &ReportModel) {
        let t = &m.campaigns;
        if t.query.is_empty() {
            self.heading("Campaigns");
        } else {
            self.heading(&format!("Campaigns ({})", t.query));
        }
        let _ = writeln!(self.out, "  {}", t.count_label);
        if let Some(msg) = t.empty_message {
            let _ = writeln!(self.out, "  {msg}");
            return;
        }
        let _ = writeln!(
            self.out,
            "  {}{}{}{}{}{}{}{}",
            col("Name", 26),
            col("Platform", 10),
            col("Goal", 22),
            col("Status", 8),
            rcol("AAR", 8),
            rcol("Impressions", 13),
            rcol("Spend", 9),
            rcol("Viewability", 13),
        );
        for r in &t.rows {
            self.campaign_line(r);
        }
    }

    fn campaign_line(&mut self, r: &CampaignRow) {
        let goal = if r.unassigned { "Unassigned" } else { r.goal.as_str() };
        let _ = writeln!(
            self.out,
            "  {}{}{}{}{}{}{}{}",
            col(&r.name, 26),
            col(r.platform, 10),
            col(goal, 22),
            col(r.status, 8),
            rcol(&r.aar.text, 8),
            rcol(&r.impressions, 13),
            rcol(&r.spend, 9),
            rcol(&r.viewability, 13),
        );
    }

    pub fn section_goals(&mut self, m: &ReportModel) {
        let g = &m.goals;
        if g.query.is_empty() {
            self.heading("Goals");
        } else {
            self.heading(&format!("Goals ({})", g.query));
        }
        let _ = writeln!(
            self.out,
            "  on-track {} · at-risk {} · needs-attention {}",
            g.counts.on_track, g.counts.at_risk, g.counts.needs_attention
        );
        for row in &g.rows {
            self.goal_line(row);
        }
    }

    fn goal_line(&mut self, g: &GoalRow) {
        let _ = writeln!(
            self.out,
            "  {}{}{}{}{}{}{}",
            col(&g.name, 26),
            col(g.platform.unwrap_or("—"), 10),
            col(g.media_type, 9),
            col(g.health, 17),
            rcol(g.spend.as_deref().unwrap_or(""), 8),
            rcol(&g.aar.text, 8),
            rcol(&rate(&g.block_rate), 10),
        );
    }

    pub fn section_integrity(&mut self, m: &ReportModel) {
        if let Some(sha) = &m.integrity.dataset_sha256 {
            let _ = writeln!(self.out, "\ndataset sha256: {sha}");
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

pub fn render_report_text(m: &ReportModel) -> String {
    let mut b = TextBuilder::new();
    b.section_overview(m);
    b.section_channels(m);
    b.section_campaigns(m);
    b.section_goals(m);
    b.section_integrity(m);
    b.finish()
}
