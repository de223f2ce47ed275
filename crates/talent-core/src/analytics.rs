//! Usage analytics.
//!
//! A second JSON document next to the talent state: per-day XP/skill/task
//! counters, per-skill and per-branch usage, and lifetime totals. The
//! summary derives a recent-activity window and spend recommendations
//! from the counters plus the current talent state.

use crate::error::TalentError;
use crate::state::{Branch, TalentState};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Default analytics file name, next to the state file.
pub const ANALYTICS_FILE: &str = ".talent-analytics.json";

/// Counters for a single calendar day.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DailyActivity {
    pub xp: u64,
    pub skills: u64,
    pub tasks: u64,
}

/// Accumulated usage counters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analytics {
    /// ISO date (`YYYY-MM-DD`) to that day's counters.
    pub daily: BTreeMap<String, DailyActivity>,
    pub skills_used: BTreeMap<String, u64>,
    pub branches_used: BTreeMap<Branch, u64>,
    pub achievements_unlocked: Vec<AchievementMark>,
    pub first_session: DateTime<Utc>,
    pub total_sessions: u64,
    pub total_xp_earned: u64,
    pub total_skills_used: u64,
    pub total_tasks_completed: u64,
}

/// Achievement name with its unlock time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementMark {
    pub name: String,
    pub timestamp: DateTime<Utc>,
}

impl Default for Analytics {
    fn default() -> Self {
        Self {
            daily: BTreeMap::new(),
            skills_used: BTreeMap::new(),
            branches_used: BTreeMap::new(),
            achievements_unlocked: Vec::new(),
            first_session: Utc::now(),
            total_sessions: 0,
            total_xp_earned: 0,
            total_skills_used: 0,
            total_tasks_completed: 0,
        }
    }
}

impl Analytics {
    fn day_entry(&mut self, now: DateTime<Utc>) -> &mut DailyActivity {
        self.daily
            .entry(now.format("%Y-%m-%d").to_string())
            .or_default()
    }

    /// Record one skill use and the XP it earned.
    pub fn track_skill(&mut self, skill: &str, branch: Option<Branch>, xp_earned: u64) {
        self.track_skill_at(skill, branch, xp_earned, Utc::now());
    }

    pub fn track_skill_at(
        &mut self,
        skill: &str,
        branch: Option<Branch>,
        xp_earned: u64,
        now: DateTime<Utc>,
    ) {
        let day = self.day_entry(now);
        day.xp += xp_earned;
        day.skills += 1;

        *self.skills_used.entry(skill.to_string()).or_insert(0) += 1;
        if let Some(branch) = branch {
            *self.branches_used.entry(branch).or_insert(0) += 1;
        }

        self.total_xp_earned += xp_earned;
        self.total_skills_used += 1;
        self.total_sessions += 1;
    }

    /// Record one completed task.
    pub fn track_task(&mut self, xp_earned: u64) {
        self.track_task_at(xp_earned, Utc::now());
    }

    pub fn track_task_at(&mut self, xp_earned: u64, now: DateTime<Utc>) {
        let day = self.day_entry(now);
        day.xp += xp_earned;
        day.tasks += 1;
        self.total_xp_earned += xp_earned;
        self.total_tasks_completed += 1;
    }

    /// Record an unlocked achievement.
    pub fn track_achievement(&mut self, name: &str) {
        self.achievements_unlocked.push(AchievementMark {
            name: name.to_string(),
            timestamp: Utc::now(),
        });
    }
}

/// Analytics store bound to one file path.
pub struct AnalyticsStore {
    path: PathBuf,
}

impl AnalyticsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn default_location() -> Self {
        let dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::new(dir.join(ANALYTICS_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the counters; absent file yields fresh counters.
    pub fn load(&self) -> Result<Analytics, TalentError> {
        if !self.path.exists() {
            return Ok(Analytics::default());
        }
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    pub fn save(&self, analytics: &Analytics) -> Result<(), TalentError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(analytics)?;
        fs::write(&self.path, data)?;
        Ok(())
    }
}

/// Kind of spend recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecommendationKind {
    /// Specialization branch is under-invested relative to usage.
    LevelUp,
    /// A heavily used branch has no investment at all.
    Invest,
    /// One or two points away from a combo threshold.
    Combo,
}

#[derive(Debug, Clone)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub branch: Option<Branch>,
    pub message: String,
}

/// Aggregated view over a recent window of days.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsSummary {
    pub total_xp_earned: u64,
    pub total_skills_used: u64,
    pub total_tasks_completed: u64,
    pub total_sessions: u64,
    pub recent: DailyActivity,
    pub recent_days: Vec<(String, DailyActivity)>,
    pub top_skills: Vec<(String, u64)>,
    pub by_branch: BTreeMap<Branch, u64>,
    pub achievements: usize,
    pub recommendations: Vec<Recommendation>,
}

/// Summarize the last `days` days of activity and derive recommendations.
pub fn summarize(
    analytics: &Analytics,
    state: Option<&TalentState>,
    days: i64,
) -> AnalyticsSummary {
    summarize_at(analytics, state, days, Utc::now())
}

pub fn summarize_at(
    analytics: &Analytics,
    state: Option<&TalentState>,
    days: i64,
    now: DateTime<Utc>,
) -> AnalyticsSummary {
    let cutoff = (now - Duration::days(days)).format("%Y-%m-%d").to_string();

    let mut recent = DailyActivity::default();
    let mut recent_days = Vec::new();
    for (date, day) in &analytics.daily {
        if date.as_str() >= cutoff.as_str() {
            recent.xp += day.xp;
            recent.skills += day.skills;
            recent.tasks += day.tasks;
            recent_days.push((date.clone(), *day));
        }
    }

    let mut top_skills: Vec<(String, u64)> = analytics
        .skills_used
        .iter()
        .map(|(name, &count)| (name.clone(), count))
        .collect();
    top_skills.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    top_skills.truncate(10);

    let recommendations = state
        .map(|s| recommend(analytics, s))
        .unwrap_or_default();

    AnalyticsSummary {
        total_xp_earned: analytics.total_xp_earned,
        total_skills_used: analytics.total_skills_used,
        total_tasks_completed: analytics.total_tasks_completed,
        total_sessions: analytics.total_sessions,
        recent,
        recent_days,
        top_skills,
        by_branch: analytics.branches_used.clone(),
        achievements: analytics.achievements_unlocked.len(),
        recommendations,
    }
}

fn recommend(analytics: &Analytics, state: &TalentState) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    for branch in Branch::ALL {
        let total = state.branch_total(branch);
        let usage = analytics.branches_used.get(&branch).copied().unwrap_or(0);

        if state.specialization == Some(branch) && total < 10 {
            recs.push(Recommendation {
                kind: RecommendationKind::LevelUp,
                branch: Some(branch),
                message: format!(
                    "Focus on {} talents - you use this branch {} times",
                    branch, usage
                ),
            });
        }

        if total == 0 && usage > 5 {
            recs.push(Recommendation {
                kind: RecommendationKind::Invest,
                branch: Some(branch),
                message: format!(
                    "Consider investing in {} - you've used it {} times",
                    branch, usage
                ),
            });
        }
    }

    let sec = state.branch_total(Branch::Security);
    let dev = state.branch_total(Branch::Development);
    let auto = state.branch_total(Branch::Automation);
    let res = state.branch_total(Branch::Research);

    if sec >= 3 && auto >= 2 && !state.has_combo("auto_shield") {
        recs.push(Recommendation {
            kind: RecommendationKind::Combo,
            branch: Some(Branch::Automation),
            message: "1 more point in Automation for Auto-Shield combo!".to_string(),
        });
    }
    if dev >= 4 && res >= 2 && !state.has_combo("code_oracle") {
        recs.push(Recommendation {
            kind: RecommendationKind::Combo,
            branch: Some(Branch::Development),
            message: "Close to Code Oracle combo - invest in Development and Research".to_string(),
        });
    }

    recs
}
