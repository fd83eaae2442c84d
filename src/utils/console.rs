// src/utils/console.rs

//! Run banners and summaries on top of the `log` facade.
//!
//! Keeps operator-facing output of the long-running stages consistent:
//! a header when a stage starts, numbered steps for the full pipeline and
//! an aligned summary block when a stage ends.

const RULE_WIDTH: usize = 60;

/// Log a stage header.
pub fn header(title: &str) {
    let border = "═".repeat(RULE_WIDTH);
    log::info!("{border}");
    log::info!("  {title}");
    log::info!("{border}");
}

/// Log a step in a multi-stage run.
pub fn step(step_num: usize, total: usize, message: &str) {
    log::info!("[STEP {step_num}/{total}] {message}");
}

/// Log an indented detail line.
pub fn sub_item(message: &str) {
    log::info!("    {message}");
}

/// Log a summary section.
pub fn summary(title: &str, items: &[(&str, String)]) {
    log::info!("[SUMMARY] {title}");
    let width = items.iter().map(|(key, _)| key.chars().count()).max().unwrap_or(0);
    for (key, value) in items {
        log::info!("    {}", format_item(key, value, width));
    }
}

fn format_item(key: &str, value: &str, width: usize) -> String {
    let pad = width.saturating_sub(key.chars().count());
    format!("{key}:{} {value}", " ".repeat(pad))
}
