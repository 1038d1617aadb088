use std::path::Path;

use csv::WriterBuilder;
use tracing::info;

use crate::error::Result;
use crate::rules::Rule;

/// Aggregate figures over one tree's rules.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleSummary {
    pub rules: usize,
    /// Longest condition chain.
    pub max_depth: usize,
    /// Sum of the unrounded leaf percentages; 100 for a well-formed tree.
    pub percentage_total: f64,
    pub samples: u64,
}

impl RuleSummary {
    pub fn from_rules(rules: &[Rule]) -> Self {
        RuleSummary {
            rules: rules.len(),
            max_depth: rules.iter().map(|r| r.conditions.len()).max().unwrap_or(0),
            percentage_total: rules.iter().map(|r| r.outcome.percentage).sum(),
            samples: rules.iter().map(|r| r.outcome.sample_count()).sum(),
        }
    }
}

/// Prints a formatted table of rules to the console.
pub fn print_rule_table(label: &str, rules: &[Rule]) {
    let summary = RuleSummary::from_rules(rules);
    println!("\n======== RULES ({}) ========", label);
    println!("  # | Class                | Pct (%) | Samples | Depth");
    println!("----|----------------------|---------|---------|------");
    for (idx, rule) in rules.iter().enumerate() {
        println!(
            "{:>3} | {:<20} | {:>7.1} | {:>7} | {:>5}",
            idx + 1,
            rule.outcome.class_name,
            rule.outcome.percentage,
            rule.outcome.sample_count(),
            rule.conditions.len()
        );
    }
    println!(
        "Rules: {} | Max depth: {} | Coverage: {:.1}% | Samples: {}",
        summary.rules, summary.max_depth, summary.percentage_total, summary.samples
    );
    println!("============================");
}

/// Writes the rules to a CSV file, one row per rule.
///
/// Columns: `Rule, Class, Percentage, Samples, Depth`, one count column per
/// class (named after the classes of the first rule), then `Conditions`
/// joined with ` AND `.
pub fn write_rules_csv<P: AsRef<Path>>(rules: &[Rule], path: P) -> Result<()> {
    let path = path.as_ref();
    let mut wtr = WriterBuilder::new().from_path(path)?;

    let class_columns: Vec<String> = rules
        .first()
        .map(|r| r.outcome.counts.iter().map(|c| format!("n_{}", c.class_name)).collect())
        .unwrap_or_default();

    let mut headers = vec![
        "Rule".to_string(),
        "Class".to_string(),
        "Percentage".to_string(),
        "Samples".to_string(),
        "Depth".to_string(),
    ];
    headers.extend(class_columns);
    headers.push("Conditions".to_string());
    wtr.write_record(&headers)?;

    for (idx, rule) in rules.iter().enumerate() {
        let mut record = vec![
            (idx + 1).to_string(),
            rule.outcome.class_name.clone(),
            format!("{:.1}", rule.outcome.percentage),
            rule.outcome.sample_count().to_string(),
            rule.conditions.len().to_string(),
        ];
        record.extend(rule.outcome.counts.iter().map(|c| c.count.to_string()));
        record.push(rule.conditions.join(" AND "));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    info!(path = ?path, rules = rules.len(), "Wrote rules CSV");
    Ok(())
}
