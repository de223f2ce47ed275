//! XP award policy.
//!
//! Maps activities (skill use, task completion, achievements, daily
//! check-ins, combo unlocks) to XP amounts and applies them through the
//! progression engine. Suppressed awards (unmapped skill, repeat
//! achievement, already-claimed daily bonus) are benign zero-XP outcomes,
//! not errors.

use crate::classify;
use crate::engine;
use crate::state::{Branch, EventKind, HistoryEvent, TalentState};
use chrono::{DateTime, Utc};

/// Activities that earn XP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityKind {
    SkillUse,
    TaskComplete,
    TaskComplex,
    Achievement,
    DailyBonus,
    ComboUnlock,
}

impl ActivityKind {
    /// Base XP for the activity.
    pub const fn base_xp(self) -> u64 {
        match self {
            ActivityKind::SkillUse => 5,
            ActivityKind::TaskComplete => 25,
            ActivityKind::TaskComplex => 50,
            ActivityKind::Achievement => 50,
            ActivityKind::DailyBonus => 1,
            ActivityKind::ComboUnlock => 100,
        }
    }
}

/// Flat XP added on top of the multiplier when a skill lands in the
/// specialization branch.
pub const SPECIALIZATION_BONUS: u64 = 10;

/// Outcome of an award attempt.
#[derive(Debug, Clone)]
pub struct AwardOutcome {
    /// XP actually granted (0 when suppressed).
    pub awarded: u64,
    /// Branch the activity resolved to, if any.
    pub branch: Option<Branch>,
    pub total_xp: u64,
    pub level: u32,
    pub leveled_up: bool,
    pub points_granted: u32,
    /// Why the award was suppressed, when it was.
    pub reason: Option<&'static str>,
}

impl AwardOutcome {
    fn suppressed(state: &TalentState, reason: &'static str) -> Self {
        Self {
            awarded: 0,
            branch: None,
            total_xp: state.total_xp,
            level: state.level,
            leveled_up: false,
            points_granted: 0,
            reason: Some(reason),
        }
    }

    fn granted(state: &TalentState, awarded: u64, branch: Option<Branch>, applied: engine::XpApplied) -> Self {
        Self {
            awarded,
            branch,
            total_xp: state.total_xp,
            level: state.level,
            leveled_up: applied.leveled_up,
            points_granted: applied.points_granted,
            reason: None,
        }
    }
}

/// Award XP for using a skill.
///
/// The skill name is resolved to a branch by the classifier; unmapped
/// skills earn nothing and leave no history event. Skills landing in the
/// specialization branch earn `floor(base * 1.2) + 10`.
pub fn award_skill(state: &mut TalentState, skill_name: &str) -> AwardOutcome {
    let Some(branch) = classify::classify(skill_name) else {
        return AwardOutcome::suppressed(state, "skill not mapped to any branch");
    };

    let mut xp = ActivityKind::SkillUse.base_xp();
    if state.specialization == Some(branch) {
        xp = xp * 12 / 10 + SPECIALIZATION_BONUS;
    }

    let applied = engine::apply_xp(state, xp);
    state.history.push(
        HistoryEvent::new(EventKind::SkillXp)
            .with_skill(skill_name)
            .with_branch(branch)
            .with_xp(xp),
    );

    AwardOutcome::granted(state, xp, Some(branch), applied)
}

/// Award XP for a completed task.
pub fn award_task(state: &mut TalentState, complex: bool) -> AwardOutcome {
    let (kind, task_type) = if complex {
        (ActivityKind::TaskComplex, "complex")
    } else {
        (ActivityKind::TaskComplete, "normal")
    };
    let xp = kind.base_xp();

    let applied = engine::apply_xp(state, xp);
    state.history.push(
        HistoryEvent::new(EventKind::TaskXp)
            .with_task_type(task_type)
            .with_xp(xp),
    );

    AwardOutcome::granted(state, xp, None, applied)
}

/// Award XP for unlocking an achievement. One-time per achievement id.
pub fn award_achievement(state: &mut TalentState, name: &str) -> AwardOutcome {
    if state.has_achievement(name) {
        return AwardOutcome::suppressed(state, "achievement already unlocked");
    }

    state.achievements.push(name.to_string());
    let xp = ActivityKind::Achievement.base_xp();
    let applied = engine::apply_xp(state, xp);
    state.history.push(
        HistoryEvent::new(EventKind::Achievement)
            .with_name(name)
            .with_xp(xp),
    );

    AwardOutcome::granted(state, xp, None, applied)
}

/// Claim the daily check-in bonus. At most once per UTC calendar day.
pub fn daily_bonus(state: &mut TalentState) -> AwardOutcome {
    daily_bonus_at(state, Utc::now())
}

/// Daily bonus with an explicit clock, for day-rollover checks.
pub fn daily_bonus_at(state: &mut TalentState, now: DateTime<Utc>) -> AwardOutcome {
    let today = now.date_naive();
    let claimed = state
        .history
        .iter()
        .any(|e| e.action == EventKind::DailyBonus && e.timestamp.date_naive() == today);
    if claimed {
        return AwardOutcome::suppressed(state, "daily bonus already claimed");
    }

    let xp = ActivityKind::DailyBonus.base_xp();
    let applied = engine::apply_xp(state, xp);
    let mut event = HistoryEvent::new(EventKind::DailyBonus).with_xp(xp);
    event.timestamp = now;
    state.history.push(event);

    AwardOutcome::granted(state, xp, None, applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_base_amounts() {
        assert_eq!(ActivityKind::SkillUse.base_xp(), 5);
        assert_eq!(ActivityKind::TaskComplete.base_xp(), 25);
        assert_eq!(ActivityKind::TaskComplex.base_xp(), 50);
        assert_eq!(ActivityKind::Achievement.base_xp(), 50);
        assert_eq!(ActivityKind::DailyBonus.base_xp(), 1);
        assert_eq!(ActivityKind::ComboUnlock.base_xp(), 100);
    }

    #[test]
    fn test_skill_award_without_specialization() {
        let mut state = TalentState::new();
        let outcome = award_skill(&mut state, "git-summary");
        assert_eq!(outcome.awarded, 5);
        assert_eq!(outcome.branch, Some(Branch::Development));
        assert_eq!(state.total_xp, 5);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.history[0].action, EventKind::SkillXp);
    }

    #[test]
    fn test_skill_award_with_specialization_bonus() {
        let mut state = TalentState::new();
        state.specialization = Some(Branch::Security);
        // floor(5 * 1.2) + 10 = 16
        let outcome = award_skill(&mut state, "audit");
        assert_eq!(outcome.awarded, 16);
        assert_eq!(outcome.branch, Some(Branch::Security));
    }

    #[test]
    fn test_specialization_bonus_only_for_matching_branch() {
        let mut state = TalentState::new();
        state.specialization = Some(Branch::Security);
        let outcome = award_skill(&mut state, "cron");
        assert_eq!(outcome.awarded, 5);
        assert_eq!(outcome.branch, Some(Branch::Automation));
    }

    #[test]
    fn test_unmapped_skill_awards_nothing() {
        let mut state = TalentState::new();
        let outcome = award_skill(&mut state, "interpretive-dance");
        assert_eq!(outcome.awarded, 0);
        assert_eq!(outcome.reason, Some("skill not mapped to any branch"));
        assert!(state.history.is_empty());
        assert_eq!(state.total_xp, 0);
    }

    #[test]
    fn test_task_awards() {
        let mut state = TalentState::new();
        assert_eq!(award_task(&mut state, false).awarded, 25);
        assert_eq!(award_task(&mut state, true).awarded, 50);
        assert_eq!(state.total_xp, 75);
        assert_eq!(state.history[1].task_type.as_deref(), Some("complex"));
    }

    #[test]
    fn test_achievement_is_one_time() {
        let mut state = TalentState::new();
        let first = award_achievement(&mut state, "night_owl");
        assert_eq!(first.awarded, 50);
        assert!(state.has_achievement("night_owl"));

        let second = award_achievement(&mut state, "night_owl");
        assert_eq!(second.awarded, 0);
        assert_eq!(second.reason, Some("achievement already unlocked"));
        assert_eq!(
            state.achievements.iter().filter(|a| *a == "night_owl").count(),
            1
        );
        assert_eq!(state.total_xp, 50);
    }

    #[test]
    fn test_daily_bonus_once_per_day() {
        let mut state = TalentState::new();
        let now = noon();

        let first = daily_bonus_at(&mut state, now);
        assert_eq!(first.awarded, 1);

        let second = daily_bonus_at(&mut state, now + Duration::hours(2));
        assert_eq!(second.awarded, 0);
        assert_eq!(second.reason, Some("daily bonus already claimed"));
        assert_eq!(state.total_xp, 1);
    }

    #[test]
    fn test_daily_bonus_next_day_succeeds() {
        let mut state = TalentState::new();
        let now = noon();

        assert_eq!(daily_bonus_at(&mut state, now).awarded, 1);
        let tomorrow = daily_bonus_at(&mut state, now + Duration::days(1));
        assert_eq!(tomorrow.awarded, 1);
        assert_eq!(state.total_xp, 2);
    }

    #[test]
    fn test_award_reports_level_up_and_points() {
        let mut state = TalentState::new();
        state.total_xp = 480;
        state.level = 1;

        let outcome = award_task(&mut state, true);
        assert!(outcome.leveled_up);
        assert_eq!(outcome.level, 2);
        assert_eq!(outcome.points_granted, 1);
    }
}
