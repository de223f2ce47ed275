//! Combo catalog and detection.
//!
//! Combos are one-time bonuses gated on per-branch talent totals.
//! `check_combos` is pure; `unlock_combos` records the unlock, awards the
//! combo XP and appends history events. Combo XP cannot change branch
//! totals, so detection never needs to re-run after awarding.

use crate::award::ActivityKind;
use crate::engine;
use crate::state::{Branch, EventKind, HistoryEvent, TalentState};

/// A combo definition: id plus display copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComboDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// All combos, in unlock-scan order.
pub const COMBOS: &[ComboDef] = &[
    ComboDef {
        id: "auto_shield",
        name: "Auto-Shield",
        description: "Automatic threat response",
    },
    ComboDef {
        id: "code_oracle",
        name: "Code Oracle",
        description: "Find optimal solutions",
    },
    ComboDef {
        id: "megamind",
        name: "Megamind",
        description: "Multi-agent orchestration",
    },
    ComboDef {
        id: "ascended",
        name: "Ascended",
        description: "Full agent potential unlocked",
    },
];

/// Per-branch talent totals, each 0..=15.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BranchTotals {
    pub security: u32,
    pub development: u32,
    pub automation: u32,
    pub research: u32,
}

impl BranchTotals {
    pub fn of(state: &TalentState) -> Self {
        Self {
            security: state.branch_total(Branch::Security),
            development: state.branch_total(Branch::Development),
            automation: state.branch_total(Branch::Automation),
            research: state.branch_total(Branch::Research),
        }
    }
}

/// Whether a combo's threshold predicate holds for the given totals.
fn qualifies(id: &str, t: &BranchTotals) -> bool {
    match id {
        "auto_shield" => t.security >= 3 && t.automation >= 3,
        "code_oracle" => t.development >= 5 && t.research >= 3,
        "megamind" => {
            t.automation >= 5 && (t.security >= 3 || t.development >= 3 || t.research >= 3)
        }
        "ascended" => {
            t.security >= 3 && t.development >= 3 && t.automation >= 3 && t.research >= 3
        }
        _ => false,
    }
}

/// Combos that qualify now and have not been unlocked yet.
pub fn check_combos(state: &TalentState) -> Vec<&'static ComboDef> {
    let totals = BranchTotals::of(state);
    COMBOS
        .iter()
        .filter(|c| qualifies(c.id, &totals) && !state.has_combo(c.id))
        .collect()
}

/// A combo applied to the state, with the XP it granted.
#[derive(Debug, Clone)]
pub struct ComboUnlock {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub xp: u64,
}

/// Apply every newly-qualifying combo: record the id, award the combo XP
/// and append a history event per unlock.
pub fn unlock_combos(state: &mut TalentState) -> Vec<ComboUnlock> {
    let new: Vec<&'static ComboDef> = check_combos(state);
    let mut unlocked = Vec::with_capacity(new.len());

    for combo in new {
        let xp = ActivityKind::ComboUnlock.base_xp();
        state.combos_unlocked.push(combo.id.to_string());
        engine::apply_xp(state, xp);
        state.history.push(
            HistoryEvent::new(EventKind::ComboUnlock)
                .with_combo(combo.id)
                .with_xp(xp),
        );
        unlocked.push(ComboUnlock {
            id: combo.id,
            name: combo.name,
            description: combo.description,
            xp,
        });
    }

    unlocked
}
