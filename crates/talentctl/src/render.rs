//! Terminal rendering - clean ASCII output, no emojis.

use owo_colors::OwoColorize;
use talent_core::analytics::AnalyticsSummary;
use talent_core::state::{talent_display_name, Branch, EventKind, TalentState, MAX_TALENT_LEVEL};

const SEPARATOR_WIDTH: usize = 64;

/// Generate a progress bar string like `[====------]`.
pub fn progress_bar(current: u32, max: u32, width: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((current as usize * width) / max as usize).min(width)
    };
    format!("[{}{}]", "=".repeat(filled), "-".repeat(width - filled))
}

fn colorize_branch(branch: Branch, text: &str) -> String {
    match branch {
        Branch::Security => text.red().to_string(),
        Branch::Development => text.green().to_string(),
        Branch::Automation => text.yellow().to_string(),
        Branch::Research => text.cyan().to_string(),
    }
}

fn spec_label(state: &TalentState) -> String {
    match state.specialization {
        Some(branch) => colorize_branch(branch, &branch.to_string().to_uppercase()),
        None => "None".to_string(),
    }
}

fn action_label(kind: EventKind) -> &'static str {
    match kind {
        EventKind::SkillXp => "skill_xp",
        EventKind::TaskXp => "task_xp",
        EventKind::Achievement => "achievement",
        EventKind::DailyBonus => "daily_bonus",
        EventKind::ComboUnlock => "combo_unlock",
        EventKind::Upgrade => "upgrade",
        EventKind::SpecializationChange => "specialization_change",
        EventKind::Reset => "reset",
        EventKind::PresetApplied => "preset_applied",
    }
}

/// One-line status, used after awards and in reminders.
pub fn summary_line(state: &TalentState) -> String {
    format!(
        "Lvl {} | XP {} | Spec: {} | Points: {} | Talents: {}/60",
        state.level,
        state.total_xp,
        state
            .specialization
            .map(|b| b.to_string())
            .unwrap_or_else(|| "None".to_string()),
        state.points_available,
        state.grand_total()
    )
}

/// Full talent tree view.
pub fn render_tree(state: &TalentState) -> String {
    let mut lines = Vec::new();

    lines.push("TALENT TREE".bold().to_string());
    lines.push("=".repeat(SEPARATOR_WIDTH));
    lines.push(format!(
        "Level: {}   XP: {}   Points: {}   Spec: {}",
        state.level,
        state.total_xp,
        state.points_available,
        spec_label(state)
    ));
    lines.push("=".repeat(SEPARATOR_WIDTH));

    for branch in Branch::ALL {
        let is_spec = state.specialization == Some(branch);
        let marker = if is_spec { "*" } else { " " };
        let total = state.branch_total(branch);
        let name = format!("{:<12}", branch.to_string().to_uppercase());

        lines.push(format!(
            "{} {} {} {:>2}/15{}",
            marker,
            colorize_branch(branch, &name),
            progress_bar(total, 15, 15),
            total,
            if is_spec { "  (specialized)" } else { "" }
        ));

        for id in branch.talent_ids() {
            let level = state.talent_level(branch, id);
            let name = talent_display_name(id).unwrap_or(id);
            lines.push(format!(
                "    {:<22} {} {}/{}",
                name,
                progress_bar(level as u32, MAX_TALENT_LEVEL as u32, 5),
                level,
                MAX_TALENT_LEVEL
            ));
        }
        lines.push(String::new());
    }

    if !state.combos_unlocked.is_empty() {
        lines.push("UNLOCKED COMBOS".bold().to_string());
        for combo in &state.combos_unlocked {
            lines.push(format!("  * {}", combo));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

/// Detailed progress report with achievements, combos and recent activity.
pub fn render_progress(state: &TalentState) -> String {
    let mut lines = Vec::new();

    lines.push("PROGRESS REPORT".bold().to_string());
    lines.push("=".repeat(SEPARATOR_WIDTH));
    lines.push(format!("Level:            {}", state.level));
    lines.push(format!("Total XP:         {}", state.total_xp));
    lines.push(format!("Points available: {}", state.points_available));
    lines.push(format!("Specialization:   {}", spec_label(state)));
    lines.push(String::new());

    lines.push("TALENT PROGRESS".bold().to_string());
    for branch in Branch::ALL {
        let total = state.branch_total(branch);
        let marker = if state.specialization == Some(branch) {
            "*"
        } else {
            " "
        };
        let name = format!("{:<12}", branch.to_string());
        lines.push(format!(
            "  {} {} {} {:>2}/15",
            marker,
            colorize_branch(branch, &name),
            progress_bar(total, 15, 15),
            total
        ));
    }
    lines.push(format!(
        "  Grand total: {}/60 talent points",
        state.grand_total()
    ));

    if !state.achievements.is_empty() {
        lines.push(String::new());
        lines.push(format!("ACHIEVEMENTS ({})", state.achievements.len()).bold().to_string());
        for achievement in &state.achievements {
            lines.push(format!("  * {}", achievement));
        }
    }

    if !state.combos_unlocked.is_empty() {
        lines.push(String::new());
        lines.push(format!("COMBOS ({})", state.combos_unlocked.len()).bold().to_string());
        for combo in &state.combos_unlocked {
            lines.push(format!("  * {}", combo));
        }
    }

    let recent: Vec<_> = state.history.iter().rev().take(5).collect();
    if !recent.is_empty() {
        lines.push(String::new());
        lines.push("RECENT ACTIVITY".bold().to_string());
        for event in recent {
            lines.push(format!(
                "  {} - {}",
                event.timestamp.format("%Y-%m-%d %H:%M"),
                action_label(event.action)
            ));
        }
    }

    lines.join("\n")
}

/// Analytics summary view.
pub fn render_analytics(summary: &AnalyticsSummary, days: i64) -> String {
    let mut lines = Vec::new();

    lines.push("TALENT ANALYTICS".bold().to_string());
    lines.push("=".repeat(SEPARATOR_WIDTH));
    lines.push(format!("Total XP earned:  {}", summary.total_xp_earned));
    lines.push(format!("Skills used:      {}", summary.total_skills_used));
    lines.push(format!("Tasks completed:  {}", summary.total_tasks_completed));
    lines.push(format!("Achievements:     {}", summary.achievements));
    lines.push(String::new());
    lines.push(format!(
        "Last {} days: {} XP, {} skill uses, {} tasks",
        days, summary.recent.xp, summary.recent.skills, summary.recent.tasks
    ));

    if !summary.by_branch.is_empty() {
        lines.push(String::new());
        lines.push("BY BRANCH".bold().to_string());
        for (branch, count) in &summary.by_branch {
            let name = format!("{:<12}", branch.to_string());
            lines.push(format!("  {} {}", colorize_branch(*branch, &name), count));
        }
    }

    if !summary.top_skills.is_empty() {
        lines.push(String::new());
        lines.push("TOP SKILLS".bold().to_string());
        for (skill, count) in &summary.top_skills {
            lines.push(format!("  {:<22} {}", skill, count));
        }
    }

    if !summary.recommendations.is_empty() {
        lines.push(String::new());
        lines.push("RECOMMENDATIONS".bold().to_string());
        for rec in &summary.recommendations {
            lines.push(format!("  * {}", rec.message));
        }
    }

    lines.join("\n")
}
