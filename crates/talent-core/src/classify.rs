//! Skill-to-branch classifier.
//!
//! A skill name is normalized (lowercase, hyphens to underscores) and
//! tested for substring containment against an ordered keyword table.
//! Keyword sets are not disjoint; the first match in table order wins,
//! so broader keywords sit after the specific ones in their block.

use crate::state::Branch;

/// Ordered (keyword, branch) table. Order is part of the contract.
pub const SKILL_KEYWORDS: &[(&str, Branch)] = &[
    // Security
    ("clawdstrike", Branch::Security),
    ("skillguard", Branch::Security),
    ("prompt_guard", Branch::Security),
    ("healthcheck", Branch::Security),
    ("security", Branch::Security),
    ("agent_security", Branch::Security),
    ("threat", Branch::Security),
    ("audit", Branch::Security),
    // Development
    ("git", Branch::Development),
    ("github", Branch::Development),
    ("git_summary", Branch::Development),
    ("git_workflows", Branch::Development),
    ("gitai", Branch::Development),
    ("coding_agent", Branch::Development),
    ("manim", Branch::Development),
    ("refactor", Branch::Development),
    ("code", Branch::Development),
    // Automation
    ("cron", Branch::Automation),
    ("agent_orchestrator", Branch::Automation),
    ("cc_godmode", Branch::Automation),
    ("evolver", Branch::Automation),
    ("deployment", Branch::Automation),
    ("deploy", Branch::Automation),
    ("docker", Branch::Automation),
    ("workflow", Branch::Automation),
    ("auto", Branch::Automation),
    // Research
    ("web_search", Branch::Research),
    ("web_fetch", Branch::Research),
    ("memory", Branch::Research),
    ("tenzing", Branch::Research),
    ("moltbook", Branch::Research),
    ("search", Branch::Research),
    ("research", Branch::Research),
    ("data", Branch::Research),
];

/// Resolve a free-form skill name to a branch, or `None` if unmapped.
pub fn classify(skill_name: &str) -> Option<Branch> {
    let normalized = skill_name.trim().to_lowercase().replace('-', "_");
    SKILL_KEYWORDS
        .iter()
        .find(|(keyword, _)| normalized.contains(keyword))
        .map(|&(_, branch)| branch)
}
