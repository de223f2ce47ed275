//! Talent tree state model.
//!
//! Single persisted record per agent: XP totals, per-branch talent levels,
//! specialization, unlocked combos, achievements and the append-only history.

use crate::error::TalentError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Schema tag carried in the persisted record. Not validated on load.
pub const STATE_VERSION: &str = "1.0.0";

/// Points granted at creation and on reset, before any refund.
pub const BASE_POINTS: u32 = 3;

/// Maximum level for a single talent.
pub const MAX_TALENT_LEVEL: u8 = 5;

/// The four talent branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Branch {
    Security,
    Development,
    Automation,
    Research,
}

impl Branch {
    /// All branches in display order.
    pub const ALL: [Branch; 4] = [
        Branch::Security,
        Branch::Development,
        Branch::Automation,
        Branch::Research,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Branch::Security => "security",
            Branch::Development => "development",
            Branch::Automation => "automation",
            Branch::Research => "research",
        }
    }

    /// The three talent ids belonging to this branch.
    pub fn talent_ids(&self) -> [&'static str; 3] {
        match self {
            Branch::Security => ["threat_scanner", "audit_master", "clawdstrike_ultimate"],
            Branch::Development => ["code_architect", "git_master", "refactor_legendary"],
            Branch::Automation => ["workflow_builder", "cron_master", "auto_evolver"],
            Branch::Research => ["web_hunter", "data_miner", "knowledge_synthesizer"],
        }
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Branch {
    type Err = TalentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "security" => Ok(Branch::Security),
            "development" => Ok(Branch::Development),
            "automation" => Ok(Branch::Automation),
            "research" => Ok(Branch::Research),
            other => Err(TalentError::InvalidBranch(other.to_string())),
        }
    }
}

/// Human-readable name for a talent id.
pub fn talent_display_name(id: &str) -> Option<&'static str> {
    match id {
        "threat_scanner" => Some("Threat Scanner"),
        "audit_master" => Some("Audit Master"),
        "clawdstrike_ultimate" => Some("ClawdStrike Ultimate"),
        "code_architect" => Some("Code Architect"),
        "git_master" => Some("Git Master"),
        "refactor_legendary" => Some("Refactor Legendary"),
        "workflow_builder" => Some("Workflow Builder"),
        "cron_master" => Some("Cron Master"),
        "auto_evolver" => Some("Auto-Evolver"),
        "web_hunter" => Some("Web Hunter"),
        "data_miner" => Some("Data Miner"),
        "knowledge_synthesizer" => Some("Knowledge Synthesizer"),
        _ => None,
    }
}

/// Action kind recorded in the history log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    SkillXp,
    TaskXp,
    Achievement,
    DailyBonus,
    ComboUnlock,
    Upgrade,
    SpecializationChange,
    Reset,
    PresetApplied,
}

/// One entry in the append-only history log.
///
/// Only the fields relevant to the action are populated; the rest are
/// omitted from the serialized record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEvent {
    pub action: EventKind,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xp: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branch: Option<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub talent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<Branch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,
}

impl HistoryEvent {
    pub fn new(action: EventKind) -> Self {
        Self {
            action,
            timestamp: Utc::now(),
            xp: None,
            skill: None,
            branch: None,
            talent: None,
            new_level: None,
            from: None,
            to: None,
            name: None,
            combo: None,
            task_type: None,
            preset: None,
        }
    }

    pub fn with_xp(mut self, xp: u64) -> Self {
        self.xp = Some(xp);
        self
    }

    pub fn with_skill(mut self, skill: &str) -> Self {
        self.skill = Some(skill.to_string());
        self
    }

    pub fn with_branch(mut self, branch: Branch) -> Self {
        self.branch = Some(branch);
        self
    }

    pub fn with_talent(mut self, talent: &str, new_level: u8) -> Self {
        self.talent = Some(talent.to_string());
        self.new_level = Some(new_level);
        self
    }

    pub fn with_change(mut self, from: Option<Branch>, to: Branch) -> Self {
        self.from = from;
        self.to = Some(to);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn with_combo(mut self, combo: &str) -> Self {
        self.combo = Some(combo.to_string());
        self
    }

    pub fn with_task_type(mut self, task_type: &str) -> Self {
        self.task_type = Some(task_type.to_string());
        self
    }

    pub fn with_preset(mut self, preset: &str) -> Self {
        self.preset = Some(preset.to_string());
        self
    }
}

/// The whole progression record for one agent.
///
/// Mutated exclusively through the engine and award operations; every
/// mutation is a read-modify-write of the full record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TalentState {
    pub version: String,
    pub total_xp: u64,
    pub level: u32,
    pub points_available: u32,
    pub specialization: Option<Branch>,
    pub talents: BTreeMap<Branch, BTreeMap<String, u8>>,
    pub combos_unlocked: Vec<String>,
    pub achievements: Vec<String>,
    pub history: Vec<HistoryEvent>,
    pub created: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl TalentState {
    /// Fresh state: level 1, base points, all talents at 0, no specialization.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            version: STATE_VERSION.to_string(),
            total_xp: 0,
            level: 1,
            points_available: BASE_POINTS,
            specialization: None,
            talents: empty_talent_matrix(),
            combos_unlocked: Vec::new(),
            achievements: Vec::new(),
            history: Vec::new(),
            created: now,
            last_activity: now,
        }
    }

    /// Level of a single talent, 0 if unknown.
    pub fn talent_level(&self, branch: Branch, talent: &str) -> u8 {
        self.talents
            .get(&branch)
            .and_then(|t| t.get(talent))
            .copied()
            .unwrap_or(0)
    }

    /// Sum of talent levels within one branch (0..=15).
    pub fn branch_total(&self, branch: Branch) -> u32 {
        self.talents
            .get(&branch)
            .map(|t| t.values().map(|&l| l as u32).sum())
            .unwrap_or(0)
    }

    /// Sum of all talent levels across all branches (0..=60).
    pub fn grand_total(&self) -> u32 {
        Branch::ALL.iter().map(|&b| self.branch_total(b)).sum()
    }

    pub fn has_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a == id)
    }

    pub fn has_combo(&self, id: &str) -> bool {
        self.combos_unlocked.iter().any(|c| c == id)
    }
}

impl Default for TalentState {
    fn default() -> Self {
        Self::new()
    }
}

/// All twelve talents at level 0.
pub fn empty_talent_matrix() -> BTreeMap<Branch, BTreeMap<String, u8>> {
    Branch::ALL
        .iter()
        .map(|&b| {
            let talents = b
                .talent_ids()
                .iter()
                .map(|id| (id.to_string(), 0u8))
                .collect();
            (b, talents)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state() {
        let state = TalentState::new();
        assert_eq!(state.level, 1);
        assert_eq!(state.total_xp, 0);
        assert_eq!(state.points_available, BASE_POINTS);
        assert!(state.specialization.is_none());
        assert_eq!(state.grand_total(), 0);
        assert_eq!(state.talents.len(), 4);
        for branch in Branch::ALL {
            assert_eq!(state.talents[&branch].len(), 3);
        }
    }

    #[test]
    fn test_branch_parse() {
        assert_eq!("security".parse::<Branch>().unwrap(), Branch::Security);
        assert_eq!(" Research ".parse::<Branch>().unwrap(), Branch::Research);
        assert!(matches!(
            "wizardry".parse::<Branch>(),
            Err(TalentError::InvalidBranch(_))
        ));
    }

    #[test]
    fn test_branch_totals() {
        let mut state = TalentState::new();
        *state
            .talents
            .get_mut(&Branch::Security)
            .unwrap()
            .get_mut("threat_scanner")
            .unwrap() = 3;
        *state
            .talents
            .get_mut(&Branch::Research)
            .unwrap()
            .get_mut("data_miner")
            .unwrap() = 2;
        assert_eq!(state.branch_total(Branch::Security), 3);
        assert_eq!(state.branch_total(Branch::Research), 2);
        assert_eq!(state.branch_total(Branch::Automation), 0);
        assert_eq!(state.grand_total(), 5);
    }

    #[test]
    fn test_every_talent_has_display_name() {
        for branch in Branch::ALL {
            for id in branch.talent_ids() {
                assert!(talent_display_name(id).is_some(), "missing name for {}", id);
            }
        }
    }

    #[test]
    fn test_state_serde_shape() {
        let state = TalentState::new();
        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains("\"total_xp\":0"));
        assert!(json.contains("\"points_available\":3"));
        assert!(json.contains("\"security\""));
        let back: TalentState = serde_json::from_str(&json).unwrap();
        assert_eq!(back.points_available, BASE_POINTS);
    }
}
