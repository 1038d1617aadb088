use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};

use tree_rules::config::{load_feature_config, FeatureConfig};
use tree_rules::export::{export_graph_to_json, write_dot, write_rules_text};
use tree_rules::external::render_dot;
use tree_rules::graph;
use tree_rules::results::{print_rule_table, write_rules_csv, RuleSummary};
use tree_rules::rules::{self, rule_strings, FeatureSet, Rule};
use tree_rules::tree::{format_tree, load_forest_data, load_tree_data, TreeData};
use tree_rules::RulesError;

#[derive(Parser)]
#[command(name = "tree-rules")]
#[command(about = "Extract decision rules from a fitted decision tree and draw them as a graph", long_about = None)]
struct Cli {
    /// Tree (or forest, with --forest) exported as JSON
    #[arg(short, long)]
    tree: PathBuf,

    /// Feature/class description JSON
    #[arg(short, long)]
    config: PathBuf,

    /// Treat --tree as a forest file ({"trees": [...]})
    #[arg(long)]
    forest: bool,

    /// Number of samples the model was fitted on (overrides the config)
    #[arg(long)]
    total_samples: Option<u64>,

    /// Directory for rules.txt, rules.csv, rules.dot and rules.json
    #[arg(short, long, default_value = "results")]
    out_dir: PathBuf,

    /// Render the graph with Graphviz into this format (png, svg, pdf)
    #[arg(short, long, value_parser = parse_render_format)]
    render: Option<String>,

    /// Print the raw tree outline before extracting
    #[arg(long)]
    print_tree: bool,
}

/// Extensions of the files written next to the rendered image.
const OUTPUT_EXTENSIONS: [&str; 4] = ["txt", "csv", "json", "dot"];

fn parse_render_format(format: &str) -> Result<String, String> {
    let format = format.trim().to_ascii_lowercase();
    if format.is_empty() {
        return Err("render format must not be empty".to_string());
    }
    if OUTPUT_EXTENSIONS.contains(&format.as_str()) {
        return Err(format!(
            "'{}' would overwrite an output file; use an image format such as png, svg or pdf",
            format
        ));
    }
    Ok(format)
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let config = load_feature_config(&cli.config)?;
    let features = FeatureSet::from_config(&config)?;
    fs::create_dir_all(&cli.out_dir)?;

    if cli.forest {
        let forest = load_forest_data(&cli.tree)?;
        let total = cli.total_samples.or(config.total_samples).ok_or_else(|| {
            RulesError::Configuration(
                "forest extraction needs --total-samples or total_samples in the config".into(),
            )
        })?;
        if cli.print_tree {
            for (idx, tree) in forest.trees.iter().enumerate() {
                println!("\n--- Tree {} ---\n{}", idx, format_tree(tree));
            }
        }

        let per_tree = rules::extract_forest(&forest, &features, &config.class_names, total)?;
        info!(trees = per_tree.len(), "Extracted forest rules");
        for (idx, extracted) in per_tree.iter().enumerate() {
            write_outputs(&cli, &format!("tree_{}", idx), extracted)?;
        }
    } else {
        let tree = load_tree_data(&cli.tree)?;
        if cli.print_tree {
            println!("{}", format_tree(&tree));
        }
        let total = resolve_total_samples(&cli, &config, &tree)?;
        let extracted = rules::extract(&tree, &features, &config.class_names, total)?;
        write_outputs(&cli, "rules", &extracted)?;
    }

    Ok(())
}

/// CLI flag, then config, then the root node's sample count.
fn resolve_total_samples(cli: &Cli, config: &FeatureConfig, tree: &TreeData) -> Result<u64, RulesError> {
    if let Some(total) = cli.total_samples.or(config.total_samples) {
        return Ok(total);
    }
    let root = tree
        .root_sample_count()
        .ok_or_else(|| RulesError::Configuration("cannot infer total sample count".into()))?;
    warn!(total = root, "No total sample count given, using the root node's count");
    Ok(root.round() as u64)
}

fn write_outputs(cli: &Cli, stem: &str, extracted: &[Rule]) -> Result<(), RulesError> {
    print_rule_table(stem, extracted);
    for rule in extracted {
        println!("{}", rule);
    }

    let summary = RuleSummary::from_rules(extracted);
    if (summary.percentage_total - 100.0).abs() > 0.5 {
        warn!(
            coverage = summary.percentage_total,
            "Rule percentages do not add up to 100%; check the total sample count"
        );
    }

    let graph = graph::build(&rule_strings(extracted));
    let out = |ext: &str| -> PathBuf { cli.out_dir.join(format!("{}.{}", stem, ext)) };

    write_rules_text(extracted, out("txt"))?;
    write_rules_csv(extracted, out("csv"))?;
    export_graph_to_json(&graph, out("json"))?;
    let dot_path = out("dot");
    write_dot(&graph, &dot_path)?;

    if let Some(format) = &cli.render {
        render_dot(&dot_path, &out(format.as_str()), format)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(["tree-rules", "-t", "tree.json", "-c", "config.json"].iter().chain(args).copied())
    }

    #[test]
    fn test_render_accepts_image_formats() {
        assert_eq!(parse(&["--render", "svg"]).unwrap().render.as_deref(), Some("svg"));
        assert_eq!(parse(&["-r", "PNG"]).unwrap().render.as_deref(), Some("png"));
        assert!(parse(&[]).unwrap().render.is_none());
    }

    #[test]
    fn test_render_rejects_output_extensions() {
        for ext in OUTPUT_EXTENSIONS {
            assert!(parse(&["--render", ext]).is_err(), "{} should be rejected", ext);
        }
        assert!(parse(&["--render", ""]).is_err());
    }
}
