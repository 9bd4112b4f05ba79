//! Command-line inspector for steering rules and agent hooks.
//!
//! Loads a workspace's `.kiro/steering` and `.kiro/hooks` directories and
//! shows what the engine would activate.
//!
//! # Usage
//!
//! ```bash
//! # Rules and hooks for an edit to a file
//! cargo run -p steer-cli -- resolve src/Program.cs
//! cargo run -p steer-cli -- resolve src/Program.cs --event saved --json
//!
//! # Everything that loaded, plus files that were skipped
//! cargo run -p steer-cli -- check
//!
//! # Rules and hooks that only run on request
//! cargo run -p steer-cli -- manual
//!
//! # Explicit configuration
//! cargo run -p steer-cli -- --config steer.json --case-insensitive check
//! RUST_LOG=steer_rules=debug cargo run -p steer-cli -- check
//! ```

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Value, json};
use steer_core::{ActivationRequest, EventKind};
use steer_engine::{ActivationResult, Engine, EngineConfig, Snapshot};
use steer_hooks::{Action, Hook};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "steer", version, about)]
struct Args {
    /// Workspace whose `.kiro/steering` and `.kiro/hooks` directories are loaded.
    #[arg(short, long, default_value = ".")]
    workspace: PathBuf,

    /// Engine configuration file (JSON). Replaces the workspace defaults.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Match glob patterns without regard to case.
    #[arg(long)]
    case_insensitive: bool,

    /// Per-root load timeout in milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,

    /// Print machine-readable JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Log load progress to stderr. `RUST_LOG` takes precedence.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the rules and hooks that apply to a file event.
    Resolve {
        /// Path of the changed file, relative to the workspace.
        path: String,

        /// What happened to the file (edited, saved, created).
        #[arg(short, long, default_value_t = EventKind::Edited)]
        event: EventKind,
    },
    /// List every loaded rule and hook and any skipped files.
    Check,
    /// List rules and hooks that are only run on request.
    Manual,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let engine = Engine::new(load_config(&args)?);
    engine
        .reload()
        .await
        .context("failed to load steering rules and hooks")?;
    let snapshot = engine
        .snapshot()
        .context("engine published no snapshot")?;

    match &args.command {
        Command::Resolve { path, event } => {
            let request = ActivationRequest::new(path, *event);
            let result = engine.resolve(&request);
            if args.json {
                print_json(&resolve_json(&request, &result))?;
            } else {
                print_resolve(&request, &result);
            }
        }
        Command::Check => {
            if args.json {
                print_json(&check_json(&snapshot))?;
            } else {
                print_check(&snapshot);
            }
        }
        Command::Manual => {
            let rules = engine.manual_rules();
            let hooks = engine.manual_hooks();
            if args.json {
                print_json(&json!({
                    "rules": rules.iter().map(|r| json!({
                        "id": r.id,
                        "description": r.description,
                    })).collect::<Vec<_>>(),
                    "hooks": hooks.iter().map(|h| hook_json(h)).collect::<Vec<_>>(),
                }))?;
            } else {
                println!("Manual rules:");
                for rule in &rules {
                    println!("  {}  {}", rule.id, rule.description);
                }
                println!("Manual hooks:");
                for hook in &hooks {
                    println!("  {}  {}", hook.id, describe_action(&hook.action));
                }
            }
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => EngineConfig::for_workspace(&args.workspace),
    };

    if args.case_insensitive {
        config = config.with_case_sensitive(false);
    }
    if let Some(ms) = args.timeout_ms {
        config = config.with_walk_timeout(Duration::from_millis(ms));
    }

    tracing::debug!(
        steering_roots = ?config.steering_roots,
        hook_roots = ?config.hook_roots,
        case_sensitive = config.case_sensitive,
        walk_timeout = ?config.walk_timeout,
        "resolved engine config"
    );
    Ok(config)
}

fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_resolve(request: &ActivationRequest, result: &ActivationResult) {
    println!("{} ({})", request.changed_path(), request.event_kind());
    if result.is_empty() {
        println!("  nothing applies");
        return;
    }
    for rule in &result.matched_rules {
        println!("  rule  {} [{}]", rule.id, rule.inclusion.as_str());
    }
    for hook in &result.matched_hooks {
        println!("  hook  {}  {}", hook.id, describe_action(&hook.action));
    }
}

fn resolve_json(request: &ActivationRequest, result: &ActivationResult) -> Value {
    json!({
        "path": request.changed_path(),
        "event": request.event_kind(),
        "rules": result.rule_ids(),
        "hooks": result.hook_ids(),
    })
}

fn print_check(snapshot: &Arc<Snapshot>) {
    println!("Rules ({}):", snapshot.rules().len());
    for rule in snapshot.rules().all() {
        let patterns = rule.patterns.patterns().collect::<Vec<_>>().join(", ");
        if patterns.is_empty() {
            println!("  {} [{}]", rule.id, rule.inclusion.as_str());
        } else {
            println!("  {} [{}] {patterns}", rule.id, rule.inclusion.as_str());
        }
    }

    println!("Hooks ({}):", snapshot.hooks().len());
    for hook in snapshot.hooks().all() {
        let state = if hook.enabled { "" } else { " (disabled)" };
        println!("  {} [{}]{state}", hook.id, hook.trigger.as_str());
    }

    let diagnostics: Vec<_> = snapshot.diagnostics().collect();
    if !diagnostics.is_empty() {
        println!("Skipped ({}):", diagnostics.len());
        for diagnostic in diagnostics {
            println!("  {diagnostic}");
        }
    }
}

fn check_json(snapshot: &Arc<Snapshot>) -> Value {
    json!({
        "generation": snapshot.generation(),
        "rules": snapshot.rules().all().iter().map(|r| json!({
            "id": r.id,
            "path": r.path,
            "description": r.description,
            "inclusion": r.inclusion.as_str(),
            "patterns": r.patterns.patterns().collect::<Vec<_>>(),
        })).collect::<Vec<_>>(),
        "hooks": snapshot.hooks().all().iter().map(|h| hook_json(h)).collect::<Vec<_>>(),
        "diagnostics": snapshot.diagnostics().map(|d| json!({
            "path": d.path,
            "error": d.error.to_string(),
        })).collect::<Vec<_>>(),
    })
}

fn hook_json(hook: &Hook) -> Value {
    json!({
        "id": hook.id,
        "name": hook.name,
        "enabled": hook.enabled,
        "trigger": hook.trigger.as_str(),
        "patterns": hook.trigger.patterns().map(|p| p.patterns().collect::<Vec<_>>()),
        "action": describe_action(&hook.action),
    })
}

fn describe_action(action: &Action) -> String {
    match action {
        Action::AskAgent { prompt } => format!("ask agent: {}", first_line(prompt)),
        Action::RunCommand { command } => format!("run: {}", first_line(command)),
    }
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim()
}
