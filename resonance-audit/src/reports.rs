use anyhow::Result;
use colored::Colorize;
use std::io::Write;

use resonance_engine::numbers::as_percent;
use resonance_engine::{AuditReport, CatalogDiff, TribalFinding};

fn tribal_ratio_label(tribe: &TribalFinding) -> String {
    tribe.measurement.ratio.map_or_else(
        || "no members".to_string(),
        |ratio| format!("{:.1}%", as_percent(ratio)),
    )
}

pub fn emit_text<W: Write + ?Sized>(out: &mut W, report: &AuditReport) -> Result<()> {
    writeln!(out, "{}", "🃏 Resonance Allocation Audit".bright_cyan().bold())?;
    writeln!(out, "{}", "=============================".cyan())?;
    writeln!(out, "Cards: {}", report.summary.cards)?;
    writeln!(out, "Neutral: {}", report.neutral_count)?;
    writeln!(out, "Dual: {}", report.dual_count)?;
    writeln!(out)?;

    writeln!(out, "{}", "Mono counts".bright_yellow().bold())?;
    for count in &report.resonances {
        let marker = if count.configured { "" } else { " (not in topology)" };
        writeln!(
            out,
            "  {:<10} {:>4}{}",
            count.resonance,
            count.mono_count,
            marker.yellow()
        )?;
    }
    writeln!(out)?;

    writeln!(out, "{}", "Archetype pools".bright_yellow().bold())?;
    for pool in &report.pools {
        writeln!(
            out,
            "  {:<14} {:<16} {:>4} cards, {} dual",
            pool.archetype,
            pool.pair.to_string(),
            pool.size,
            pool.dual_count
        )?;
    }
    writeln!(out)?;

    if !report.rarity.is_empty() {
        writeln!(out, "{}", "Rarity".bright_yellow().bold())?;
        for (group, counts) in &report.rarity {
            let line = counts
                .iter()
                .map(|(rarity, count)| format!("{rarity} {count}"))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(out, "  {group:<14} {line}")?;
        }
        writeln!(out)?;
    }

    if !report.tribes.is_empty() {
        writeln!(out, "{}", "Tribal concentration".bright_yellow().bold())?;
        for tribe in &report.tribes {
            let status = if tribe.below_threshold {
                "❌".red()
            } else {
                "✅".green()
            };
            writeln!(
                out,
                "  {status} {} in {}: {} ({}/{}, threshold {:.0}%)",
                tribe.measurement.subtype,
                tribe.measurement.home_archetype,
                tribal_ratio_label(tribe),
                tribe.measurement.home_count,
                tribe.measurement.total,
                as_percent(tribe.threshold)
            )?;
        }
        writeln!(out)?;
    }

    if !report.tag_violations.is_empty() {
        writeln!(out, "{}", "Tag violations".bright_red().bold())?;
        for violation in &report.tag_violations {
            writeln!(
                out,
                "  • {} [{}]: {}",
                violation.card.bold(),
                violation.archetype,
                violation.reason.red()
            )?;
        }
        writeln!(out)?;
    }

    if !report.rule_violations.is_empty() {
        writeln!(out, "{}", "Rule violations".bright_red().bold())?;
        for violation in &report.rule_violations {
            writeln!(out, "  • {}", violation.message.red())?;
        }
        writeln!(out)?;
    }

    if let Some(diff) = &report.diff {
        emit_text_diff(out, diff)?;
    }

    let total = report.summary.total_violations();
    if total == 0 {
        writeln!(out, "{}", "✅ No violations".green().bold())?;
    } else {
        writeln!(out, "{}", format!("❌ {total} violation(s)").red().bold())?;
    }
    Ok(())
}

fn emit_text_diff<W: Write + ?Sized>(out: &mut W, diff: &CatalogDiff) -> Result<()> {
    writeln!(out, "{}", "Changes since previous round".bright_blue().bold())?;
    if diff.is_empty() {
        writeln!(out, "  (none)")?;
    }
    for name in &diff.added {
        writeln!(out, "  {} {name}", "+".green())?;
    }
    for name in &diff.removed {
        writeln!(out, "  {} {name}", "-".red())?;
    }
    for moved in &diff.reassigned {
        writeln!(out, "  ~ {}: {} -> {}", moved.name, moved.from, moved.to)?;
    }
    for retag in &diff.retagged {
        writeln!(
            out,
            "  ~ {}: tags +[{}] -[{}]",
            retag.name,
            retag.added_tags.join(", "),
            retag.removed_tags.join(", ")
        )?;
    }
    writeln!(out)?;
    Ok(())
}

pub fn emit_markdown<W: Write + ?Sized>(out: &mut W, report: &AuditReport) -> Result<()> {
    writeln!(out, "# Resonance Allocation Audit\n")?;

    writeln!(out, "## Summary\n")?;
    writeln!(out, "- **Cards**: {}", report.summary.cards)?;
    writeln!(out, "- **Neutral**: {}", report.neutral_count)?;
    writeln!(out, "- **Dual**: {}", report.dual_count)?;
    writeln!(out, "- **Tag violations**: {}", report.summary.tag_violations)?;
    writeln!(out, "- **Rule violations**: {}", report.summary.rule_violations)?;
    writeln!(
        out,
        "- **Tribes below threshold**: {}\n",
        report.summary.tribes_below_threshold
    )?;

    writeln!(out, "## Mono Counts\n")?;
    writeln!(out, "| Resonance | Mono cards |")?;
    writeln!(out, "|---|---|")?;
    for count in &report.resonances {
        let label = if count.configured {
            count.resonance.clone()
        } else {
            format!("{} _(not in topology)_", count.resonance)
        };
        writeln!(out, "| {label} | {} |", count.mono_count)?;
    }
    writeln!(out)?;

    writeln!(out, "## Archetype Pools\n")?;
    writeln!(out, "| Archetype | Pair | Pool size | Duals |")?;
    writeln!(out, "|---|---|---|---|")?;
    for pool in &report.pools {
        writeln!(
            out,
            "| {} | {} | {} | {} |",
            pool.archetype, pool.pair, pool.size, pool.dual_count
        )?;
    }
    writeln!(out)?;

    if !report.rarity.is_empty() {
        writeln!(out, "## Rarity\n")?;
        writeln!(out, "| Group | Rarity | Cards |")?;
        writeln!(out, "|---|---|---|")?;
        for (group, counts) in &report.rarity {
            for (rarity, count) in counts {
                writeln!(out, "| {group} | {rarity} | {count} |")?;
            }
        }
        writeln!(out)?;
    }

    if !report.tribes.is_empty() {
        writeln!(out, "## Tribal Concentration\n")?;
        for tribe in &report.tribes {
            let status = if tribe.below_threshold { "❌" } else { "✅" };
            writeln!(
                out,
                "- {status} **{}** in {}: {} ({}/{})",
                tribe.measurement.subtype,
                tribe.measurement.home_archetype,
                tribal_ratio_label(tribe),
                tribe.measurement.home_count,
                tribe.measurement.total
            )?;
        }
        writeln!(out)?;
    }

    if !report.tag_violations.is_empty() {
        writeln!(out, "## Tag Violations\n")?;
        for violation in &report.tag_violations {
            writeln!(
                out,
                "- **{}** tagged `{}`: {}",
                violation.card, violation.archetype, violation.reason
            )?;
        }
        writeln!(out)?;
    }

    if !report.rule_violations.is_empty() {
        writeln!(out, "## Rule Violations\n")?;
        for violation in &report.rule_violations {
            writeln!(out, "- {}", violation.message)?;
        }
        writeln!(out)?;
    }

    if let Some(diff) = &report.diff {
        writeln!(out, "## Changes Since Previous Round\n")?;
        if diff.is_empty() {
            writeln!(out, "_No changes._")?;
        }
        for name in &diff.added {
            writeln!(out, "- Added: {name}")?;
        }
        for name in &diff.removed {
            writeln!(out, "- Removed: {name}")?;
        }
        for moved in &diff.reassigned {
            writeln!(
                out,
                "- Reassigned: {} ({} → {})",
                moved.name, moved.from, moved.to
            )?;
        }
        for retag in &diff.retagged {
            writeln!(
                out,
                "- Retagged: {} (+{:?} -{:?})",
                retag.name, retag.added_tags, retag.removed_tags
            )?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn emit_json<W: Write + ?Sized>(out: &mut W, report: &AuditReport) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}
