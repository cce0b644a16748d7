//! Goal list assembly with the session goal overlay.
//!
//! A goal created in the current session is prepended to the list with the
//! caller's overrides applied. Nothing here is ambient state: both the
//! template goal and the overlay are explicit inputs.

use cm_core::variables::GoalOverlay;
use cm_core::Goal;

/// Apply `overlay` to a copy of `template`.
///
/// The connected DSP is always taken from the overlay (an empty label means
/// "not connected"); platform, media type and name only when present. A
/// platform override replaces both `platform` and `platforms`.
pub fn apply_overlay(template: &Goal, overlay: &GoalOverlay) -> Goal {
    let mut g = template.clone();
    g.connected_dsp = overlay.connected_dsp.clone().filter(|s| !s.is_empty());
    if let Some(p) = overlay.platform {
        g.platform = Some(p);
        g.platforms = vec![p];
    }
    if let Some(m) = overlay.media_type {
        g.media_type = m;
    }
    if let Some(name) = overlay.name.as_ref().filter(|s| !s.is_empty()) {
        g.name = name.clone();
    }
    g
}

/// The goal list the dashboard works on: the overlaid session goal first
/// (when both a template and an overlay are supplied), then `goals`.
pub fn goal_list(goals: &[Goal], new_goal: Option<&Goal>, overlay: Option<&GoalOverlay>) -> Vec<Goal> {
    let mut out = Vec::with_capacity(goals.len() + 1);
    match (new_goal, overlay) {
        (Some(template), Some(ov)) => {
            if goals.iter().any(|g| g.id == template.id) {
                tracing::warn!(goal = %template.id, "session goal id already present; not prepended");
            } else {
                out.push(apply_overlay(template, ov));
            }
        }
        (None, Some(_)) => tracing::debug!("goal overlay supplied without a session goal template; ignored"),
        _ => {}
    }
    out.extend_from_slice(goals);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::goal_with;
    use cm_core::{MediaType, Platform};

    #[test]
    fn overlay_replaces_selected_fields() {
        let mut t = goal_with("new", "Draft goal", vec![]);
        t.connected_dsp = Some("Old DSP".into());
        let ov = GoalOverlay {
            connected_dsp: Some("The Trade Desk".into()),
            platform: Some(Platform::Ctv),
            media_type: Some(MediaType::Ctv),
            name: None,
        };
        let g = apply_overlay(&t, &ov);
        assert_eq!(g.connected_dsp.as_deref(), Some("The Trade Desk"));
        assert_eq!(g.platform, Some(Platform::Ctv));
        assert_eq!(g.platforms, vec![Platform::Ctv]);
        assert_eq!(g.media_type, MediaType::Ctv);
        assert_eq!(g.name, "Draft goal");
        // Template untouched.
        assert_eq!(t.platforms, vec![Platform::Meta]);
    }

    #[test]
    fn empty_dsp_label_disconnects() {
        let mut t = goal_with("new", "Draft", vec![]);
        t.connected_dsp = Some("Old DSP".into());
        let ov = GoalOverlay { connected_dsp: Some(String::new()), ..GoalOverlay::default() };
        assert_eq!(apply_overlay(&t, &ov).connected_dsp, None);
    }

    #[test]
    fn session_goal_is_prepended_only_with_overlay() {
        let goals = vec![goal_with("g1", "One", vec![]), goal_with("g2", "Two", vec![])];
        let t = goal_with("g5", "Five", vec![]);
        let ov = GoalOverlay { name: Some("Renamed".into()), ..GoalOverlay::default() };

        let list = goal_list(&goals, Some(&t), Some(&ov));
        let names: Vec<&str> = list.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, ["Renamed", "One", "Two"]);

        assert_eq!(goal_list(&goals, Some(&t), None).len(), 2);
        assert_eq!(goal_list(&goals, None, Some(&ov)).len(), 2);
    }

    #[test]
    fn duplicate_session_goal_is_not_prepended() {
        let goals = vec![goal_with("g1", "One", vec![])];
        let t = goal_with("g1", "Again", vec![]);
        let list = goal_list(&goals, Some(&t), Some(&GoalOverlay::default()));
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].name, "One");
    }
}
