//! Preset builds: quick-start talent distributions for common roles.

use crate::engine;
use crate::error::TalentError;
use crate::state::{Branch, TalentState};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// A static preset: full talent matrix plus an optional specialization.
///
/// `levels` rows follow `Branch::ALL` order; columns follow each branch's
/// `talent_ids()` order.
#[derive(Debug, Clone, Copy)]
pub struct PresetDef {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub specialization: Option<Branch>,
    pub levels: [[u8; 3]; 4],
    pub recommended: &'static [&'static str],
    pub unlocks: &'static [&'static str],
}

impl PresetDef {
    /// Total talent points the preset invests.
    pub fn points_spent(&self) -> u32 {
        self.levels
            .iter()
            .flat_map(|row| row.iter())
            .map(|&l| l as u32)
            .sum()
    }
}

pub const PRESETS: &[PresetDef] = &[
    PresetDef {
        key: "security-analyst",
        name: "Security Analyst",
        description: "Maximize threat detection and auditing capabilities",
        specialization: Some(Branch::Security),
        levels: [[5, 5, 5], [0, 0, 0], [0, 0, 0], [0, 0, 0]],
        recommended: &["code_architect:2", "workflow_builder:2"],
        unlocks: &["Auto-Shield combo at Automation L3"],
    },
    PresetDef {
        key: "full-stack-dev",
        name: "Full-Stack Developer",
        description: "Optimized for coding, refactoring, and git mastery",
        specialization: Some(Branch::Development),
        levels: [[0, 0, 0], [5, 5, 5], [0, 0, 0], [0, 0, 0]],
        recommended: &["web_hunter:2", "threat_scanner:1"],
        unlocks: &["Code Oracle combo at Research L3"],
    },
    PresetDef {
        key: "automation-expert",
        name: "Automation Expert",
        description: "Master of workflows, scheduling, and self-improvement",
        specialization: Some(Branch::Automation),
        levels: [[0, 0, 0], [0, 0, 0], [5, 5, 5], [0, 0, 0]],
        recommended: &["threat_scanner:3", "code_architect:2"],
        unlocks: &["Megamind combo at any other branch L3"],
    },
    PresetDef {
        key: "researcher",
        name: "Research Specialist",
        description: "Deep search, data mining, and knowledge synthesis",
        specialization: Some(Branch::Research),
        levels: [[0, 0, 0], [0, 0, 0], [0, 0, 0], [5, 5, 5]],
        recommended: &["code_architect:3", "threat_scanner:2"],
        unlocks: &["Code Oracle combo at Development L5"],
    },
    PresetDef {
        key: "balanced",
        name: "Balanced Agent",
        description: "Well-rounded for general tasks",
        specialization: None,
        levels: [[2, 2, 1], [2, 2, 1], [2, 2, 1], [2, 2, 1]],
        recommended: &["Focus on one branch for combos"],
        unlocks: &["Ascended combo when all branches reach L9 total"],
    },
    PresetDef {
        key: "devops",
        name: "DevOps Engineer",
        description: "Development + Automation hybrid for CI/CD mastery",
        specialization: Some(Branch::Automation),
        levels: [[2, 1, 0], [3, 4, 2], [5, 5, 3], [1, 0, 0]],
        recommended: &["audit_master:2 for compliance"],
        unlocks: &["Auto-Shield + Megamind combos"],
    },
];

/// Preset lookup key: lowercase, spaces and underscores become hyphens.
fn normalize_key(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '_'], "-")
}

/// Find a preset by (normalized) key.
pub fn find_preset(name: &str) -> Option<&'static PresetDef> {
    let key = normalize_key(name);
    PRESETS.iter().find(|p| p.key == key)
}

/// Build a fresh state from a preset.
///
/// The creation timestamp of an existing state survives re-application;
/// everything else is replaced. All preset points are pre-spent.
pub fn apply_preset(
    name: &str,
    current: Option<&TalentState>,
) -> Result<TalentState, TalentError> {
    let preset = find_preset(name).ok_or_else(|| TalentError::UnknownPreset(name.to_string()))?;

    let levels = preset_matrix(preset);
    let created: Option<DateTime<Utc>> = current.map(|c| c.created);
    Ok(engine::apply_build(
        preset.specialization,
        &levels,
        created,
        preset.key,
    ))
}

fn preset_matrix(preset: &PresetDef) -> BTreeMap<Branch, BTreeMap<String, u8>> {
    Branch::ALL
        .iter()
        .zip(preset.levels.iter())
        .map(|(&branch, row)| {
            let talents = branch
                .talent_ids()
                .iter()
                .zip(row.iter())
                .map(|(id, &level)| (id.to_string(), level))
                .collect();
            (branch, talents)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_normalization() {
        assert!(find_preset("security-analyst").is_some());
        assert!(find_preset("Security Analyst").is_some());
        assert!(find_preset("full_stack_dev").is_some());
        assert!(find_preset("archmage").is_none());
    }

    #[test]
    fn test_unknown_preset_error() {
        assert!(matches!(
            apply_preset("archmage", None),
            Err(TalentError::UnknownPreset(_))
        ));
    }

    #[test]
    fn test_levels_respect_talent_cap() {
        for preset in PRESETS {
            for row in preset.levels {
                for level in row {
                    assert!(level <= 5, "{} exceeds max level", preset.key);
                }
            }
            assert!(preset.points_spent() <= 60);
        }
    }

    #[test]
    fn test_apply_security_analyst() {
        let state = apply_preset("security-analyst", None).unwrap();
        assert_eq!(state.specialization, Some(Branch::Security));
        assert_eq!(state.branch_total(Branch::Security), 15);
        assert_eq!(state.grand_total(), 15);
        assert_eq!(state.total_xp, 1500);
        assert_eq!(state.level, 6);
        assert_eq!(state.points_available, 0);
        assert!(state.has_achievement("preset_applied"));
        assert!(state.combos_unlocked.is_empty());
    }

    #[test]
    fn test_apply_devops_unlocks_hybrid_combos() {
        // security=3, development=9, automation=13, research=1:
        // auto_shield and megamind both qualify on application.
        let state = apply_preset("devops", None).unwrap();
        assert_eq!(state.grand_total(), 26);
        assert!(state.has_combo("auto_shield"));
        assert!(state.has_combo("megamind"));
        assert!(!state.has_combo("ascended"));
        // 2600 invested XP plus two 100 XP combo awards.
        assert_eq!(state.total_xp, 2800);
        assert_eq!(state.points_available, 2);
    }

    #[test]
    fn test_balanced_preset_has_no_specialization() {
        let state = apply_preset("balanced", None).unwrap();
        assert!(state.specialization.is_none());
        for branch in Branch::ALL {
            assert_eq!(state.branch_total(branch), 5);
        }
    }

    #[test]
    fn test_reapply_preserves_created() {
        let first = apply_preset("researcher", None).unwrap();
        let again = apply_preset("devops", Some(&first)).unwrap();
        assert_eq!(again.created, first.created);
    }
}
