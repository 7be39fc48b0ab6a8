use std::fmt::Write;

use crate::models::{Dashboard, FrequencyTable, Level, TrendPoint};

fn ranked(table: &FrequencyTable) -> Vec<(&str, usize)> {
    let mut entries: Vec<(&str, usize)> = table
        .entries
        .iter()
        .map(|(label, count)| (label.as_str(), *count))
        .collect();
    entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    entries
}

fn write_frequency(output: &mut String, title: &str, table: &FrequencyTable) {
    let _ = writeln!(output, "## {title}");

    if table.entries.is_empty() {
        let _ = writeln!(output, "No tags recorded for this date.");
        return;
    }

    for (label, count) in ranked(table) {
        let share = count as f64 * 100.0 / table.total.max(1) as f64;
        let _ = writeln!(output, "- {label}: {count} ({share:.1}%)");
    }
}

pub fn write_trend(output: &mut String, trend: &[TrendPoint]) {
    let _ = writeln!(output, "## Salary Trend");

    if trend.is_empty() {
        let _ = writeln!(output, "No offers recorded.");
        return;
    }

    let _ = writeln!(output, "| Day | Offers | Min | Salary | Max |");
    let _ = writeln!(output, "|---|---|---|---|---|");
    for point in trend {
        let _ = writeln!(
            output,
            "| {} | {} | {:.0} | {:.0} | {:.0} |",
            point.date, point.offer_count, point.min_salary, point.salary, point.max_salary
        );
    }
}

pub fn build_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "# IT Offers Dashboard");
    let _ = writeln!(
        output,
        "Offers posted on {} (latest snapshot {})",
        dashboard.selected_date, dashboard.latest_date
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Offered Salary");

    let sample = &dashboard.salary_sample;
    if sample.values.is_empty() {
        let _ = writeln!(output, "No offers below {:.0} on this date.", sample.cutoff);
    } else {
        let _ = writeln!(
            output,
            "{} offers below {:.0} across {} bins",
            sample.values.len(),
            sample.cutoff,
            sample.histogram.len()
        );
        for bin in sample.histogram.iter().filter(|bin| bin.count > 0) {
            let _ = writeln!(
                output,
                "- {:.0}..{:.0}: {}",
                bin.lower, bin.upper, bin.count
            );
        }
    }

    let _ = writeln!(output);
    write_frequency(&mut output, "Skill Popularity", &dashboard.skills);
    let _ = writeln!(output);
    write_frequency(&mut output, "Category Popularity", &dashboard.categories);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Average Salary by Skill and Level");

    if dashboard.skill_levels.is_empty() {
        let _ = writeln!(output, "No skills recorded for this date.");
    } else {
        let levels = Level::ordered();
        let header: Vec<&str> = levels.iter().map(|level| level.label()).collect();
        let _ = writeln!(output, "| Skill | {} |", header.join(" | "));
        let _ = writeln!(output, "|---|{}", "---|".repeat(levels.len()));

        for row in dashboard.skill_levels.chunks(levels.len()) {
            let values: Vec<String> = row
                .iter()
                .map(|cell| format!("{:.0}", cell.average_salary))
                .collect();
            let _ = writeln!(output, "| {} | {} |", row[0].skill, values.join(" | "));
        }
    }

    let _ = writeln!(output);
    write_trend(&mut output, &dashboard.trend);

    output
}
