//! Progression engine.
//!
//! Converts XP into levels and spendable points, validates and applies
//! talent upgrades, specialization changes, resets and bulk build
//! application. Combo detection re-runs here after every talent-level
//! change, so callers never have to remember to.

use crate::award;
use crate::combos::{self, ComboUnlock};
use crate::error::TalentError;
use crate::state::{
    empty_talent_matrix, talent_display_name, Branch, EventKind, HistoryEvent, TalentState,
    BASE_POINTS, MAX_TALENT_LEVEL, STATE_VERSION,
};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// XP required per level: `level = total_xp / 500 + 1`.
pub const XP_PER_LEVEL: u64 = 500;

/// One spendable point per 100 cumulative XP.
pub const XP_PER_POINT: u64 = 100;

/// Level implied by a cumulative XP total.
pub fn level_for_xp(total_xp: u64) -> u32 {
    (total_xp / XP_PER_LEVEL) as u32 + 1
}

/// Result of feeding XP into the engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct XpApplied {
    pub leveled_up: bool,
    pub points_granted: u32,
}

/// Add XP and recompute level and points.
///
/// Points are granted incrementally: `new_total/100 - old_total/100`.
/// Recomputing `total_xp / 100` from scratch would silently re-grant
/// points that were already spent on upgrades.
pub fn apply_xp(state: &mut TalentState, amount: u64) -> XpApplied {
    let old_xp = state.total_xp;
    state.total_xp += amount;

    let granted = (state.total_xp / XP_PER_POINT - old_xp / XP_PER_POINT) as u32;
    state.points_available += granted;

    // Levels only ever decrease through a reset. Bulk-applied builds seed a
    // level above the XP-derived one, so keep whichever is higher.
    let old_level = state.level;
    state.level = state.level.max(level_for_xp(state.total_xp));

    XpApplied {
        leveled_up: state.level > old_level,
        points_granted: granted,
    }
}

/// Case-insensitive talent lookup key: spaces and hyphens become underscores.
pub fn normalize_talent_id(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// Successful upgrade result.
#[derive(Debug, Clone)]
pub struct UpgradeOutcome {
    pub branch: Branch,
    pub talent: String,
    pub display_name: &'static str,
    pub new_level: u8,
    pub points_remaining: u32,
    /// Combos that became unlocked as a consequence of this upgrade.
    pub combos: Vec<ComboUnlock>,
}

/// Spend one point to raise a talent by one level.
pub fn upgrade_talent(state: &mut TalentState, name: &str) -> Result<UpgradeOutcome, TalentError> {
    let id = normalize_talent_id(name);

    let branch = state
        .talents
        .iter()
        .find_map(|(b, talents)| talents.contains_key(&id).then_some(*b))
        .ok_or_else(|| TalentError::TalentNotFound(name.to_string()))?;

    let current = state.talent_level(branch, &id);
    if current >= MAX_TALENT_LEVEL {
        return Err(TalentError::MaxLevelReached(MAX_TALENT_LEVEL));
    }
    if state.points_available < 1 {
        return Err(TalentError::InsufficientPoints);
    }

    let new_level = current + 1;
    if let Some(slot) = state.talents.get_mut(&branch).and_then(|t| t.get_mut(&id)) {
        *slot = new_level;
    }
    state.points_available -= 1;

    state.history.push(
        HistoryEvent::new(EventKind::Upgrade)
            .with_branch(branch)
            .with_talent(&id, new_level),
    );

    let combos = combos::unlock_combos(state);

    Ok(UpgradeOutcome {
        branch,
        talent: id.clone(),
        display_name: talent_display_name(&id).unwrap_or("Unknown"),
        new_level,
        points_remaining: state.points_available,
        combos,
    })
}

/// Successful specialization change.
#[derive(Debug, Clone)]
pub struct SpecializationOutcome {
    pub specialization: Branch,
    pub from: Option<Branch>,
    /// XP granted by the one-time `first_specialization` achievement (0 on
    /// later changes).
    pub achievement_xp: u64,
}

/// Choose (or change) the specialization branch.
pub fn set_specialization(
    state: &mut TalentState,
    branch: &str,
) -> Result<SpecializationOutcome, TalentError> {
    let branch: Branch = branch.parse()?;

    let from = state.specialization;
    state.specialization = Some(branch);

    // One-time achievement; a no-op with 0 XP when already held.
    let achievement = award::award_achievement(state, "first_specialization");

    state
        .history
        .push(HistoryEvent::new(EventKind::SpecializationChange).with_change(from, branch));

    Ok(SpecializationOutcome {
        specialization: branch,
        from,
        achievement_xp: achievement.awarded,
    })
}

/// Result of a full reset.
#[derive(Debug, Clone, Copy)]
pub struct ResetOutcome {
    /// Points refunded from spent talent levels.
    pub refunded: u32,
    /// Points available after the reset (base + refund).
    pub points_available: u32,
}

/// Wipe progression back to a fresh build, refunding spent points.
///
/// The only operation that decreases `total_xp` or `level`. The creation
/// timestamp survives; a `reset` event is appended to the history.
pub fn reset_progression(state: &mut TalentState) -> ResetOutcome {
    let refunded = state.grand_total();

    state.specialization = None;
    state.points_available = BASE_POINTS + refunded;
    state.total_xp = 0;
    state.level = 1;
    state.talents = empty_talent_matrix();
    state.combos_unlocked.clear();
    state.achievements.clear();
    state.history.push(HistoryEvent::new(EventKind::Reset));

    ResetOutcome {
        refunded,
        points_available: state.points_available,
    }
}

/// Construct a state from a complete talent-level matrix, as preset
/// application does.
///
/// All points are considered spent (`points_available = 0`); XP and level
/// are derived from the invested total. Combo detection runs before the
/// state is returned, so threshold-qualifying builds come back with their
/// combos (and combo XP) already applied.
pub fn apply_build(
    specialization: Option<Branch>,
    levels: &BTreeMap<Branch, BTreeMap<String, u8>>,
    created: Option<DateTime<Utc>>,
    preset: &str,
) -> TalentState {
    let now = Utc::now();
    let mut state = TalentState {
        version: STATE_VERSION.to_string(),
        total_xp: 0,
        level: 1,
        points_available: 0,
        specialization,
        talents: levels.clone(),
        combos_unlocked: Vec::new(),
        achievements: vec!["preset_applied".to_string()],
        history: vec![HistoryEvent::new(EventKind::PresetApplied).with_preset(preset)],
        created: created.unwrap_or(now),
        last_activity: now,
    };

    let grand = state.grand_total() as u64;
    state.total_xp = grand * XP_PER_POINT;
    state.level = 1 + (grand / 3) as u32;

    combos::unlock_combos(&mut state);
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::award;

    fn state_with_points(points: u32) -> TalentState {
        let mut state = TalentState::new();
        state.points_available = points;
        state
    }

    #[test]
    fn test_level_for_xp() {
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(499), 1);
        assert_eq!(level_for_xp(500), 2);
        assert_eq!(level_for_xp(2600), 6);
    }

    #[test]
    fn test_apply_xp_grants_points_incrementally() {
        let mut state = TalentState::new();
        let applied = apply_xp(&mut state, 250);
        assert_eq!(applied.points_granted, 2);
        assert_eq!(state.points_available, BASE_POINTS + 2);

        // Crossing no boundary grants nothing.
        let applied = apply_xp(&mut state, 40);
        assert_eq!(applied.points_granted, 0);

        // 250 + 40 + 10 crosses the 300 boundary.
        let applied = apply_xp(&mut state, 10);
        assert_eq!(applied.points_granted, 1);
        assert_eq!(state.total_xp, 300);
    }

    #[test]
    fn test_apply_xp_level_up() {
        let mut state = TalentState::new();
        assert!(!apply_xp(&mut state, 499).leveled_up);
        assert!(apply_xp(&mut state, 1).leveled_up);
        assert_eq!(state.level, 2);
    }

    #[test]
    fn test_point_conservation_over_mixed_sequence() {
        // points_available == base + total_xp/100 - successful upgrades,
        // for any sequence without a reset.
        let mut state = TalentState::new();
        let mut upgrades = 0u32;

        award::award_task(&mut state, true); // 50
        award::award_task(&mut state, false); // 25
        award::award_skill(&mut state, "git"); // 5 (no specialization)
        award::award_achievement(&mut state, "first_blood"); // 50
        assert!(upgrade_talent(&mut state, "git master").is_ok());
        upgrades += 1;
        award::award_task(&mut state, true); // 50
        award::award_task(&mut state, true); // 50
        assert!(upgrade_talent(&mut state, "git master").is_ok());
        upgrades += 1;
        award::award_skill(&mut state, "cron"); // 5

        assert_eq!(state.total_xp, 235);
        assert_eq!(
            state.points_available,
            BASE_POINTS + (state.total_xp / XP_PER_POINT) as u32 - upgrades
        );
    }

    #[test]
    fn test_upgrade_normalizes_identifier() {
        let mut state = state_with_points(3);
        let outcome = upgrade_talent(&mut state, "Threat Scanner").unwrap();
        assert_eq!(outcome.talent, "threat_scanner");
        assert_eq!(outcome.branch, Branch::Security);
        assert_eq!(outcome.new_level, 1);
        assert_eq!(outcome.points_remaining, 2);
        assert_eq!(outcome.display_name, "Threat Scanner");

        let outcome = upgrade_talent(&mut state, "auto-evolver").unwrap();
        assert_eq!(outcome.branch, Branch::Automation);
    }

    #[test]
    fn test_upgrade_unknown_talent() {
        let mut state = state_with_points(3);
        assert!(matches!(
            upgrade_talent(&mut state, "fireball"),
            Err(TalentError::TalentNotFound(_))
        ));
    }

    #[test]
    fn test_upgrade_at_max_level_never_mutates() {
        let mut state = state_with_points(10);
        for _ in 0..5 {
            upgrade_talent(&mut state, "web_hunter").unwrap();
        }
        let before_points = state.points_available;
        let before_history = state.history.len();

        assert!(matches!(
            upgrade_talent(&mut state, "web_hunter"),
            Err(TalentError::MaxLevelReached(5))
        ));
        assert_eq!(state.talent_level(Branch::Research, "web_hunter"), 5);
        assert_eq!(state.points_available, before_points);
        assert_eq!(state.history.len(), before_history);
    }

    #[test]
    fn test_upgrade_without_points() {
        let mut state = state_with_points(0);
        assert!(matches!(
            upgrade_talent(&mut state, "cron_master"),
            Err(TalentError::InsufficientPoints)
        ));
        assert_eq!(state.talent_level(Branch::Automation, "cron_master"), 0);
    }

    #[test]
    fn test_upgrade_appends_event() {
        let mut state = state_with_points(1);
        upgrade_talent(&mut state, "data_miner").unwrap();
        let event = state.history.last().unwrap();
        assert_eq!(event.action, EventKind::Upgrade);
        assert_eq!(event.talent.as_deref(), Some("data_miner"));
        assert_eq!(event.new_level, Some(1));
    }

    #[test]
    fn test_set_specialization() {
        let mut state = TalentState::new();
        let outcome = set_specialization(&mut state, "security").unwrap();
        assert_eq!(outcome.specialization, Branch::Security);
        assert_eq!(outcome.from, None);
        assert_eq!(outcome.achievement_xp, 50);
        assert!(state.has_achievement("first_specialization"));

        // Changing again records the previous branch and grants nothing.
        let outcome = set_specialization(&mut state, "research").unwrap();
        assert_eq!(outcome.from, Some(Branch::Security));
        assert_eq!(outcome.achievement_xp, 0);
        assert_eq!(
            state
                .achievements
                .iter()
                .filter(|a| *a == "first_specialization")
                .count(),
            1
        );
    }

    #[test]
    fn test_set_specialization_invalid_branch() {
        let mut state = TalentState::new();
        assert!(matches!(
            set_specialization(&mut state, "sorcery"),
            Err(TalentError::InvalidBranch(_))
        ));
        assert!(state.specialization.is_none());
    }

    #[test]
    fn test_reset_refunds_spent_points() {
        let mut state = state_with_points(10);
        for _ in 0..5 {
            upgrade_talent(&mut state, "threat_scanner").unwrap();
        }
        for _ in 0..5 {
            upgrade_talent(&mut state, "code_architect").unwrap();
        }
        apply_xp(&mut state, 700);
        set_specialization(&mut state, "security").unwrap();

        let outcome = reset_progression(&mut state);
        assert_eq!(outcome.refunded, 10);
        assert_eq!(outcome.points_available, BASE_POINTS + 10);
        assert_eq!(state.total_xp, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.grand_total(), 0);
        assert!(state.specialization.is_none());
        assert!(state.combos_unlocked.is_empty());
        assert!(state.achievements.is_empty());
        assert_eq!(state.history.last().unwrap().action, EventKind::Reset);
    }

    #[test]
    fn test_reset_preserves_creation_timestamp() {
        let mut state = TalentState::new();
        let created = state.created;
        reset_progression(&mut state);
        assert_eq!(state.created, created);
    }

    #[test]
    fn test_apply_build_derives_xp_and_level() {
        let mut levels = empty_talent_matrix();
        for id in Branch::Security.talent_ids() {
            *levels
                .get_mut(&Branch::Security)
                .unwrap()
                .get_mut(id)
                .unwrap() = 5;
        }

        let state = apply_build(Some(Branch::Security), &levels, None, "security-analyst");
        assert_eq!(state.grand_total(), 15);
        assert_eq!(state.total_xp, 1500);
        assert_eq!(state.level, 6);
        assert_eq!(state.points_available, 0);
        assert!(state.has_achievement("preset_applied"));
        assert_eq!(state.history[0].action, EventKind::PresetApplied);
        // Single-branch investment qualifies no combo.
        assert!(state.combos_unlocked.is_empty());
    }

    #[test]
    fn test_apply_build_unlocks_qualifying_combos() {
        let mut levels = empty_talent_matrix();
        for id in Branch::Security.talent_ids() {
            *levels
                .get_mut(&Branch::Security)
                .unwrap()
                .get_mut(id)
                .unwrap() = 1;
        }
        for id in Branch::Automation.talent_ids() {
            *levels
                .get_mut(&Branch::Automation)
                .unwrap()
                .get_mut(id)
                .unwrap() = 1;
        }

        // security=3, automation=3: auto_shield (and only it) qualifies.
        let state = apply_build(None, &levels, None, "custom");
        assert_eq!(state.combos_unlocked, vec!["auto_shield".to_string()]);
        // 6 points invested -> 600 XP, +100 combo XP crosses one boundary.
        assert_eq!(state.total_xp, 700);
        assert_eq!(state.points_available, 1);
    }
}
