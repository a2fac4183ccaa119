//! Markdown classification document produced by the audit tool.

use crate::ubo_block::{BlockParameter, Domain};

const DOMAIN_LEGEND: &[(&str, &str, &str)] = &[
    ("**Frame**", "Global per-frame drivers", "Every frame"),
    ("**Camera**", "View definition and matrices", "Every frame"),
    ("**Object**", "Per-instance identity/transform", "Per draw (future)"),
    ("**EffectConfig**", "Preset/style parameters", "On preset change"),
    ("**EffectRuntime**", "Per-frame instance state", "Per frame (if CPU-driven)"),
    ("**Debug**", "Debug flags and values", "Dev only"),
    ("**REMOVE**", "Candidate for removal", "N/A"),
];

const NEXT_STEPS: &[(bool, &str)] = &[
    (true, "Review each parameter classification"),
    (true, "Confirm update frequencies"),
    (true, "Identify consolidation opportunities (e.g., X/Y/Z/W → vec4)"),
    (false, "Group by target UBO"),
    (false, "Create new UBO record definitions"),
    (false, "Update shader uniform blocks"),
];

const SLOT_GROUP_SEPARATOR: &str = "|---|---|---|---|---|---|";

/// Renders one row of the parameter table.
pub fn parameter_row(param: &BlockParameter) -> String {
    format!(
        "| {} | `{}` | {} | {} | {} | {} |",
        param.slot,
        param.name,
        param.section,
        param.domain_guess(),
        param.update_frequency_guess(),
        param.comment
    )
}

/// Parameter counts per guessed domain, largest first. Ties keep first-seen order.
pub fn domain_summary(parameters: &[BlockParameter]) -> Vec<(Domain, usize)> {
    let mut counts: Vec<(Domain, usize)> = Vec::new();
    for param in parameters {
        let domain = param.domain_guess();
        match counts.iter_mut().find(|(d, _)| *d == domain) {
            Some((_, count)) => *count += 1,
            None => counts.push((domain, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

pub fn generate_markdown_report(
    parameters: &[BlockParameter],
    source_file: &str,
    block_name: &str,
) -> String {
    let mut lines: Vec<String> = vec![
        "# UBO Parameter Classification - Phase 0 Audit".into(),
        "".into(),
        format!("> **Source:** `{}`", source_file),
        format!("> **Uniform Block:** `{}`", block_name),
        format!("> **Total Parameters:** {}", parameters.len()),
        "> ".into(),
        "> **Instructions:** Review and confirm the `Domain Target` and `Update Freq` columns."
            .into(),
        "> Values marked with `**bold**` or `?` are suggestions that need verification.".into(),
        "".into(),
        "---".into(),
        "".into(),
        "## Domain Legend".into(),
        "".into(),
        "| Domain | Description | Update Policy |".into(),
        "|--------|-------------|---------------|".into(),
    ];

    lines.extend(
        DOMAIN_LEGEND
            .iter()
            .map(|(domain, description, policy)| {
                format!("| {} | {} | {} |", domain, description, policy)
            }),
    );

    lines.extend(
        [
            "",
            "---",
            "",
            "## Parameter Classification",
            "",
            "| Slot | Name | Section | Domain Target | Update Freq | Notes |",
            "|------|------|---------|---------------|-------------|-------|",
        ]
        .iter()
        .map(|s| s.to_string()),
    );

    let mut previous_slot = None;
    for param in parameters {
        if previous_slot.map_or(false, |slot| slot != param.slot) {
            lines.push(SLOT_GROUP_SEPARATOR.into());
        }
        previous_slot = Some(param.slot);
        lines.push(parameter_row(param));
    }

    lines.extend(
        ["", "---", "", "## Summary by Suggested Domain", ""]
            .iter()
            .map(|s| s.to_string()),
    );

    lines.extend(
        domain_summary(parameters)
            .into_iter()
            .map(|(domain, count)| format!("- {}: {} parameters", domain, count)),
    );

    lines.extend(
        ["", "---", "", "## Next Steps", ""]
            .iter()
            .map(|s| s.to_string()),
    );

    lines.extend(NEXT_STEPS.iter().enumerate().map(|(i, (done, step))| {
        format!("{}. {} {}", i + 1, if *done { "✅" } else { "⬜" }, step)
    }));

    lines.join("\n")
}
