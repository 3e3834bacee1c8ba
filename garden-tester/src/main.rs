mod common;
mod logic;

use anyhow::{Context, Result, bail};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use garden_game::GardenConfig;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};
use std::time::Instant;

use common::{parse_seeds, split_csv};
use logic::{LogicTester, ScenarioResult, find_scenario, list_scenarios};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Console,
    Json,
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "garden-tester", version)]
#[command(about = "Headless QA runs for the Productivity Garden core")]
struct Args {
    /// Scenarios to run (comma-separated, `all` for every scenario)
    #[arg(long, default_value = "smoke")]
    scenarios: String,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Seeds to run (comma-separated, decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// JSON file with garden configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    let config = load_config(args.config.as_deref())?;
    let scenarios = expand_scenarios(&args.scenarios);
    let seeds = parse_seeds(&args.seeds)?;
    if seeds.is_empty() {
        bail!("no seeds given");
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }
    let start_time = Instant::now();
    let tester = LogicTester::new(config, args.verbose);
    let (results, unknown) = run_scenarios(&tester, &scenarios, &seeds, args.iterations);
    for name in &unknown {
        eprintln!("⚠️  Unknown scenario: {}", name.yellow());
    }

    write_reports(&args, &results, start_time)?;

    if !unknown.is_empty() || results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }
    Ok(())
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🌱 Productivity Garden Tester".bright_cyan().bold());
    println!("{}", "=============================".cyan());
}

fn load_config(path: Option<&Path>) -> Result<GardenConfig> {
    let Some(path) = path else {
        return Ok(GardenConfig::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config: GardenConfig = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("invalid garden config in {}", path.display()))?;
    Ok(config)
}

fn expand_scenarios(scenarios_arg: &str) -> Vec<String> {
    let mut scenarios = split_csv(scenarios_arg);
    if scenarios.iter().any(|s| s == "all") {
        scenarios.retain(|s| s != "all");
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|s| s == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

fn run_scenarios(
    tester: &LogicTester,
    scenarios: &[String],
    seeds: &[u64],
    iterations: usize,
) -> (Vec<ScenarioResult>, Vec<String>) {
    let mut results = Vec::new();
    let mut unknown = Vec::new();
    for name in scenarios {
        match find_scenario(name) {
            Some(scenario) => results.extend(tester.run_scenario(scenario, seeds, iterations)),
            None => unknown.push(name.clone()),
        }
    }
    (results, unknown)
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, results)?,
        ReportFormat::Markdown => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Garden Logic Test Results\n\n_No scenarios executed._"
                )?;
            } else {
                logic::reports::generate_markdown_report(&mut output_target, results)?;
            }
        }
        ReportFormat::Console => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            writeln!(&mut output_target)?;
            writeln!(
                &mut output_target,
                "🏁 Total time: {:?}",
                start_time.elapsed()
            )?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "garden-tester-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn all_expands_to_every_scenario_once() {
        let expanded = expand_scenarios("capacity, all");
        assert_eq!(expanded[0], "capacity");
        assert_eq!(expanded.len(), list_scenarios().len());
        assert!(expanded.iter().any(|s| s == "reward-distribution"));
    }

    #[test]
    fn explicit_lists_are_kept_in_order() {
        assert_eq!(expand_scenarios("replay,smoke"), vec!["replay", "smoke"]);
    }

    #[test]
    fn unknown_scenarios_are_collected() {
        let tester = LogicTester::new(GardenConfig::default(), false);
        let (results, unknown) = run_scenarios(
            &tester,
            &["smoke".to_string(), "weather".to_string()],
            &[5],
            1,
        );
        assert_eq!(results.len(), 1);
        assert!(results[0].passed);
        assert_eq!(unknown, vec!["weather"]);
    }

    #[test]
    fn config_file_overrides_defaults() {
        let path = temp_path("config");
        std::fs::write(&path, r#"{ "max_seeds": 8, "default_seed_count": 3 }"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.max_seeds, 8);
        assert_eq!(config.default_seed_count, 3);
        assert_eq!(config.storage_namespace, GardenConfig::default().storage_namespace);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_config_file_is_rejected() {
        let path = temp_path("bad-config");
        std::fs::write(&path, r#"{ "max_seeds": 2, "default_seed_count": 3 }"#).unwrap();
        assert!(load_config(Some(&path)).is_err());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_config_uses_defaults() {
        assert_eq!(load_config(None).unwrap(), GardenConfig::default());
    }
}
