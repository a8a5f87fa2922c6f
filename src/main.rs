// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use serde_json::Value;

use murmur::config::{
    load_graph, load_profile, resolve_config, validate_graph, TransformerRegistry,
};
use murmur::engine::{ExecutorOptions, GraphExecutor};
use murmur::transformers::{
    BriefPlanner, BriefPlannerV2, HistoryUpdater, NewsFetcher, PiperSynthesizer, ScriptGenerator,
    StoryDeduplicator,
};

const CONFIG_DIR: &str = "config";
const PROMPTS_DIR: &str = "prompts";
const MODELS_DIR: &str = "models/piper";
const ARTIFACT_DIR: &str = "data/generation";

/// Build the transformer registry with all prompt and model paths passed
/// explicitly; nothing inside the engine reads ambient configuration.
fn build_registry(prompts_dir: &Path, models_dir: &Path) -> TransformerRegistry {
    let mut registry = TransformerRegistry::new();
    registry.register(Arc::new(NewsFetcher::new(prompts_dir.join("gather.md"))));
    registry.register(Arc::new(BriefPlanner::new(prompts_dir.join("plan.md"))));
    registry.register(Arc::new(BriefPlannerV2::new(prompts_dir.join("plan_v2.md"))));
    registry.register(Arc::new(ScriptGenerator::new(prompts_dir.join("generate.md"))));
    registry.register(Arc::new(PiperSynthesizer::new(models_dir)));
    registry.register(Arc::new(StoryDeduplicator::new(prompts_dir.join("dedupe.md"))));
    registry.register(Arc::new(HistoryUpdater::new()));
    registry
}

fn usage(program: &str) -> String {
    format!(
        "Murmur: a personal intelligence briefing system\n\
         \n\
         Usage: {program} generate [--profile NAME] [--graph NAME] [--dry-run] [--cached a,b] [--run ID]\n\
         \x20      {program} list transformers|graphs|profiles\n"
    )
}

struct GenerateArgs {
    profile: String,
    graph_override: Option<String>,
    dry_run: bool,
    cached_nodes: Vec<String>,
    run_id: Option<String>,
}

fn parse_generate_args(args: &[String]) -> anyhow::Result<GenerateArgs> {
    let mut parsed = GenerateArgs {
        profile: "default".to_string(),
        graph_override: None,
        dry_run: false,
        cached_nodes: Vec::new(),
        run_id: None,
    };

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--profile" | "-p" => {
                parsed.profile = iter
                    .next()
                    .context("--profile requires a value")?
                    .clone();
            }
            "--graph" | "-g" => {
                parsed.graph_override = Some(iter.next().context("--graph requires a value")?.clone());
            }
            "--dry-run" | "-n" => parsed.dry_run = true,
            "--cached" => {
                let list = iter.next().context("--cached requires a value")?;
                parsed.cached_nodes = list.split(',').map(|s| s.trim().to_string()).collect();
            }
            "--run" => {
                parsed.run_id = Some(iter.next().context("--run requires a value")?.clone());
            }
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(parsed)
}

async fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config_dir = Path::new(CONFIG_DIR);

    let profile_path = config_dir.join("profiles").join(format!("{}.yaml", args.profile));
    let profile = load_profile(&profile_path)
        .map_err(|e| anyhow::anyhow!("failed to load profile '{}': {e}", args.profile))?;
    let config: HashMap<String, Value> = resolve_config(&profile, config_dir)
        .map_err(|e| anyhow::anyhow!("failed to resolve config: {e}"))?;

    let graph_name = args.graph_override.unwrap_or_else(|| profile.graph.clone());
    let graph_path = config_dir.join("graphs").join(format!("{}.yaml", graph_name));
    let graph = load_graph(&graph_path)
        .map_err(|e| anyhow::anyhow!("failed to load graph '{graph_name}': {e}"))?;

    let registry = build_registry(Path::new(PROMPTS_DIR), Path::new(MODELS_DIR));

    match validate_graph(&graph, &registry) {
        Ok(()) => println!("✓ Graph '{}' validated successfully", graph_name),
        Err(e) => {
            eprintln!("✗ Validation failed: {e}");
            std::process::exit(1);
        }
    }

    if args.dry_run {
        let nodes: Vec<&str> = graph.nodes.iter().map(|n| n.name.as_str()).collect();
        println!("\nWould execute graph: {graph_name}");
        println!("Nodes: {nodes:?}");
        return Ok(());
    }

    let executor = GraphExecutor::new(
        graph,
        registry,
        ExecutorOptions {
            artifact_dir: Some(PathBuf::from(ARTIFACT_DIR)),
            cached_nodes: args.cached_nodes,
            run_id: args.run_id,
        },
    )?;

    println!("\nExecuting graph: {graph_name} (run '{}')\n", executor.run_id());
    let result = executor.execute(&config).await?;

    println!("\nArtifacts:");
    for (name, path) in &result.artifacts {
        println!("  {}: {}", name, path.display());
    }
    Ok(())
}

fn list(what: &str) -> anyhow::Result<()> {
    match what {
        "transformers" => {
            let registry = build_registry(Path::new(PROMPTS_DIR), Path::new(MODELS_DIR));
            println!("Available transformers:\n");
            for name in registry.list() {
                let transformer = registry.get(&name)?;
                println!("  {name}");
                println!("    inputs:  {:?}", transformer.inputs());
                println!("    outputs: {:?}\n", transformer.outputs());
            }
        }
        "graphs" | "profiles" => {
            let dir = Path::new(CONFIG_DIR).join(what);
            if !dir.exists() {
                println!("No {what} directory found");
                return Ok(());
            }
            println!("Available {what}:\n");
            let mut names: Vec<String> = std::fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok())
                .map(|entry| entry.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "yaml"))
                .filter_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
                .collect();
            names.sort();
            for name in names {
                println!("  {name}");
            }
        }
        other => bail!("unknown list target: {other}"),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprint!("{}", usage(&args[0]));
        std::process::exit(1);
    }

    match args[1].as_str() {
        "generate" => generate(parse_generate_args(&args[2..])?).await,
        "list" if args.len() >= 3 => list(&args[2]),
        _ => {
            eprint!("{}", usage(&args[0]));
            std::process::exit(1);
        }
    }
}
