//! Command handlers: load state, run an engine operation, save, print.

use crate::render;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::fs;
use std::path::PathBuf;
use talent_core::analytics::{self, AnalyticsStore};
use talent_core::award;
use talent_core::engine;
use talent_core::presets::{self, PRESETS};
use talent_core::share;
use talent_core::store::TalentStore;
use tracing::debug;

/// Create the state file if it does not exist yet.
pub fn init(store: &TalentStore) -> Result<()> {
    let existed = store.load()?.is_some();
    let state = store.init()?;
    if existed {
        println!("Talent data already initialized at {}", store.path().display());
    } else {
        println!("Talent tree initialized at {}", store.path().display());
        println!("{}", render::summary_line(&state));
        println!("Choose a specialization: talentctl spec <branch>");
    }
    Ok(())
}

/// Render the full tree.
pub fn show(store: &TalentStore) -> Result<()> {
    let state = store.load_required()?;
    println!("{}", render::render_tree(&state));
    Ok(())
}

/// Set or change the specialization branch.
pub fn spec(store: &TalentStore, branch: &str) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = engine::set_specialization(&mut state, branch)?;
    store.save(&mut state)?;

    println!(
        "Specialization set to {} (+20% XP for {} activities)",
        outcome.specialization.to_string().to_uppercase().bold(),
        outcome.specialization
    );
    if let Some(from) = outcome.from {
        println!("Previous specialization: {}", from);
    }
    if outcome.achievement_xp > 0 {
        println!(
            "Achievement unlocked: first_specialization (+{} XP)",
            outcome.achievement_xp
        );
    }
    println!("Available talent points: {}", state.points_available);
    Ok(())
}

/// Spend one point on a talent.
pub fn upgrade(store: &TalentStore, talent: &str) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = engine::upgrade_talent(&mut state, talent)?;
    store.save(&mut state)?;

    println!(
        "{} upgraded to level {}/5",
        outcome.display_name.bold(),
        outcome.new_level
    );
    println!("Points remaining: {}", outcome.points_remaining);
    for combo in &outcome.combos {
        println!(
            "{} {} - {} (+{} XP)",
            "COMBO UNLOCKED:".bold(),
            combo.name,
            combo.description,
            combo.xp
        );
    }
    Ok(())
}

/// Detailed progress report.
pub fn progress(store: &TalentStore) -> Result<()> {
    let state = store.load_required()?;
    println!("{}", render::render_progress(&state));
    Ok(())
}

/// Reset all progression, refunding spent points.
pub fn reset(store: &TalentStore) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = engine::reset_progression(&mut state);
    store.save(&mut state)?;

    println!("Talents reset.");
    println!("Refunded: {} points", outcome.refunded);
    println!("New total: {} points", outcome.points_available);
    println!("Choose your new path: talentctl spec <branch>");
    Ok(())
}

/// List available presets.
pub fn preset_list() -> Result<()> {
    println!("{}", "TALENT PRESETS".bold());
    println!("{}", "=".repeat(64));
    for preset in PRESETS {
        println!("{}", preset.name.bold());
        println!("  {}", preset.description);
        println!(
            "  Points: {}/60 | Spec: {}",
            preset.points_spent(),
            preset
                .specialization
                .map(|b| b.to_string())
                .unwrap_or_else(|| "None".to_string())
        );
        println!("  Apply: talentctl preset apply {}", preset.key);
        println!();
    }
    Ok(())
}

/// Replace the current build with a preset.
pub fn preset_apply(store: &TalentStore, name: &str) -> Result<()> {
    let current = store.load()?;
    let mut state = presets::apply_preset(name, current.as_ref())?;
    store.save(&mut state)?;

    println!("Preset applied.");
    println!("{}", render::summary_line(&state));
    for combo in &state.combos_unlocked {
        println!("Combo unlocked: {}", combo);
    }
    Ok(())
}

/// Award XP for a skill use.
pub fn award_skill(store: &TalentStore, analytics_store: &AnalyticsStore, skill: &str) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = award::award_skill(&mut state, skill);

    if outcome.awarded == 0 {
        println!(
            "No XP awarded: {}",
            outcome.reason.unwrap_or("skill not recognized")
        );
        return Ok(());
    }

    store.save(&mut state)?;
    track_skill(analytics_store, skill, &outcome)?;

    match outcome.branch {
        Some(branch) => println!("+{} XP from {} ({})", outcome.awarded, skill, branch),
        None => println!("+{} XP from {}", outcome.awarded, skill),
    }
    report_gains(&outcome);
    Ok(())
}

/// Award XP for a completed task.
pub fn award_task(
    store: &TalentStore,
    analytics_store: &AnalyticsStore,
    complex: bool,
) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = award::award_task(&mut state, complex);
    store.save(&mut state)?;

    let mut analytics = analytics_store.load()?;
    analytics.track_task(outcome.awarded);
    analytics_store.save(&analytics)?;

    println!(
        "Task complete! +{} XP (total: {})",
        outcome.awarded, outcome.total_xp
    );
    report_gains(&outcome);
    Ok(())
}

/// Claim the daily check-in bonus, with unspent-point reminders.
pub fn award_daily(store: &TalentStore) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = award::daily_bonus(&mut state);

    if outcome.awarded > 0 {
        store.save(&mut state)?;
        println!("Daily bonus: +{} XP", outcome.awarded);
    } else {
        println!(
            "No bonus: {}",
            outcome.reason.unwrap_or("already claimed")
        );
    }

    if state.points_available > 0 && state.specialization.is_none() {
        println!(
            "You have {} unspent talent points. Choose a specialization: talentctl spec <branch>",
            state.points_available
        );
    } else if state.points_available > 0 {
        println!(
            "You have {} talent points to spend: talentctl upgrade <talent>",
            state.points_available
        );
    }
    Ok(())
}

/// Grant a named achievement.
pub fn award_achievement(
    store: &TalentStore,
    analytics_store: &AnalyticsStore,
    name: &str,
) -> Result<()> {
    let mut state = store.load_required()?;
    let outcome = award::award_achievement(&mut state, name);

    if outcome.awarded == 0 {
        println!(
            "No XP awarded: {}",
            outcome.reason.unwrap_or("already unlocked")
        );
        return Ok(());
    }

    store.save(&mut state)?;
    let mut analytics = analytics_store.load()?;
    analytics.track_achievement(name);
    analytics_store.save(&analytics)?;

    println!("Achievement: {} (+{} XP)", name.bold(), outcome.awarded);
    report_gains(&outcome);
    Ok(())
}

/// Analytics summary over a recent window.
pub fn analytics(store: &TalentStore, analytics_store: &AnalyticsStore, days: i64) -> Result<()> {
    let analytics = analytics_store.load()?;
    let state = store.load()?;
    let summary = analytics::summarize(&analytics, state.as_ref(), days);
    println!("{}", render::render_analytics(&summary, days));
    Ok(())
}

/// Export the build as JSON, to stdout or a file.
pub fn export(
    store: &TalentStore,
    analytics_store: &AnalyticsStore,
    include_analytics: bool,
    out: Option<PathBuf>,
) -> Result<()> {
    let state = store.load_required()?;
    let analytics = if include_analytics {
        Some(analytics_store.load()?)
    } else {
        None
    };

    let json = share::to_json(&share::export_build(&state, analytics.as_ref()))?;
    match out {
        Some(path) => {
            fs::write(&path, &json)?;
            println!("Build exported to {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

/// Import a build from a JSON file or a share code.
pub fn import(
    store: &TalentStore,
    analytics_store: &AnalyticsStore,
    file: Option<PathBuf>,
    code: Option<String>,
) -> Result<()> {
    let envelope = match (file, code) {
        (Some(path), _) => {
            debug!(path = %path.display(), "importing build from file");
            share::import_build(&fs::read_to_string(path)?)?
        }
        (None, Some(code)) => share::import_from_code(&code)?,
        (None, None) => anyhow::bail!("provide a build file or --code <share-code>"),
    };

    let mut state = envelope.talent;
    store.save(&mut state)?;
    if let Some(analytics) = envelope.analytics {
        analytics_store.save(&analytics)?;
    }

    println!("Imported build from {}", envelope.exported_at.format("%Y-%m-%d %H:%M"));
    println!("{}", render::summary_line(&state));
    Ok(())
}

/// Print a share code for the current build.
pub fn share(store: &TalentStore) -> Result<()> {
    let state = store.load_required()?;
    println!("{}", share::share_code(&state)?);
    println!();
    println!("Import with: talentctl import --code <code>");
    Ok(())
}

fn track_skill(
    analytics_store: &AnalyticsStore,
    skill: &str,
    outcome: &award::AwardOutcome,
) -> Result<()> {
    let mut analytics = analytics_store.load()?;
    analytics.track_skill(skill, outcome.branch, outcome.awarded);
    analytics_store.save(&analytics)?;
    Ok(())
}

fn report_gains(outcome: &award::AwardOutcome) {
    if outcome.leveled_up {
        println!("{} Now level {}", "LEVEL UP!".bold(), outcome.level);
    }
    if outcome.points_granted > 0 {
        println!("New talent point available ({})", outcome.points_granted);
    }
}
