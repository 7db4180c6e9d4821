mod cli;

use bagakit_skill_maker::diagnostic::Severity;
use bagakit_skill_maker::{config, output, scaffold, scanners, validate};
use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use std::io::IsTerminal;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let color = std::io::stdout().is_terminal();
    if !color {
        colored::control::set_override(false);
    }

    match cli.command {
        Commands::Init {
            name,
            path,
            with_agents,
        } => {
            let config = load_config(None);
            match scaffold::init(&name, &path, with_agents, &config) {
                Ok(dir) => {
                    println!("created: {}", dir.display());
                    println!("next:");
                    println!("  1) edit {}", dir.join(&config.files.descriptor).display());
                    println!("  2) run: bagakit-skill-maker validate {}", dir.display());
                }
                Err(e) => {
                    eprintln!("error: {e}");
                    std::process::exit(2);
                }
            }
        }

        Commands::Validate {
            path,
            skill_dir,
            format,
            output: output_path,
            strict,
            config: config_path,
        } => {
            let Some(path) = path.or(skill_dir) else {
                eprintln!("error: a skill directory is required");
                std::process::exit(2);
            };
            if !path.is_dir() {
                eprintln!("error: not a directory: {}", path.display());
                std::process::exit(2);
            }

            let mut config = load_config(config_path.as_deref());
            if strict {
                config.strict.enabled = true;
            }

            let report = validate::run_validation(&path, &config);
            let rendered = output::format_report(&report, format, color && output_path.is_none())
                .unwrap_or_else(|e| {
                    eprintln!("error: failed to render report: {e}");
                    std::process::exit(2);
                });

            if let Some(out_path) = output_path {
                std::fs::write(&out_path, &rendered.stdout).unwrap_or_else(|e| {
                    eprintln!("error: failed to write {}: {e}", out_path.display());
                    std::process::exit(2);
                });
            } else {
                print!("{}", rendered.stdout);
            }
            eprint!("{}", rendered.stderr);

            std::process::exit(if report.passed { 0 } else { 1 });
        }

        Commands::ListRules => {
            let rules = scanners::all_rules();
            println!("{}", "Built-in Rules".bold().underline());
            println!();

            let mut current_scanner = "";
            for rule in &rules {
                if rule.scanner != current_scanner {
                    if !current_scanner.is_empty() {
                        println!();
                    }
                    println!("  {}", rule.scanner.bold());
                    current_scanner = rule.scanner;
                }

                let severity = match rule.severity {
                    Severity::Error => "ERROR".red().bold().to_string(),
                    Severity::Warning => " WARN".yellow().bold().to_string(),
                };

                println!(
                    "    [{severity}] {id:<46} {message}",
                    id = rule.id,
                    message = rule.message,
                );
            }

            println!();
            println!("  Total: {} rules", rules.len());
        }

        Commands::Explain { rule_id } => {
            let rules = scanners::all_rules();
            match rules.iter().find(|r| r.id == rule_id) {
                Some(rule) => {
                    println!("{}", rule.id.bold());
                    println!();
                    println!("  Scanner:      {}", rule.scanner);
                    println!("  Severity:     {}", rule.severity);
                    println!("  Description:  {}", rule.message);
                    println!("  Remediation:  {}", rule.remediation);
                }
                None => {
                    eprintln!("Unknown rule: {rule_id}");
                    eprintln!("Use 'bagakit-skill-maker list-rules' to see all available rules.");
                    std::process::exit(2);
                }
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&std::path::Path>) -> config::Config {
    config::Config::load(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(2);
    })
}
