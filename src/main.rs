// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use kova_sync::models::sync_result::SyncStatus;
use kova_sync::repository::registry::DocumentSource;
use kova_sync::utils::logging::{
    format_error, format_info, format_status, format_step, format_success, format_warning,
};
use kova_sync::{
    ActionKind, Config, ConfigValidator, FileRecord, GitHubClient, HostingApi, KovaError,
    LocalScanner, ManifestAnalyzer, ManifestLoader, MigrationPlanner, RemoteSyncCoordinator,
    RepoAnalyzer, RepoType, ReportExporter, RepositoryDiscovery, RepositoryRegistry, SyncProgress,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "kova_sync")]
#[command(version = "0.1.0")]
#[command(about = "Multi-repository sync and file organization for Kova AI", long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "config/default.toml")]
    config: PathBuf,

    /// Tracked repository document; defaults to github.registry_path
    #[arg(long, value_name = "FILE")]
    registry: Option<PathBuf>,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the tracked repository list
    Repos {
        #[command(subcommand)]
        action: RepoCommands,
    },

    /// Fetch metadata, recent commits and branches for every enabled repository
    Sync {
        #[arg(long)]
        export: bool,

        /// Summarize each synced repository through the Anthropic API
        #[arg(long)]
        analyze: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Metadata-only status of every enabled repository
    Status,

    /// List owner repositories matching the discovery pattern that are not tracked yet
    Discover {
        #[arg(long)]
        pattern: Option<String>,
    },

    /// Recent public events of the repository owner
    Activity {
        #[arg(short, long, default_value_t = 10)]
        limit: u32,
    },

    /// Analyze a file manifest and produce a migration plan
    Analyze {
        #[arg(short, long, value_name = "FILE")]
        manifest: PathBuf,

        #[arg(long)]
        standardize_names: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },

    /// Scan a local directory into a manifest and plan its migration
    Scan {
        directory: PathBuf,

        #[arg(long)]
        standardize_names: bool,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(short, long)]
        pretty: bool,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    List,

    Add {
        /// Repository identifier as owner/name
        full_name: String,

        #[arg(short = 't', long = "type", default_value = "service")]
        repo_type: String,
    },

    /// Check the tracked repository document for structural problems
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    kova_sync::utils::logging::init_logger(cli.color, cli.verbose)?;

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::load(None).unwrap_or_else(|e| {
            warn!("Falling back to built-in defaults: {}", e);
            Config::default_config()
        })
    };

    let registry_path = cli
        .registry
        .clone()
        .unwrap_or_else(|| config.github.registry_path.clone());

    match cli.command {
        Commands::Repos { action } => match action {
            RepoCommands::List => cmd_repos_list(&registry_path).await?,
            RepoCommands::Add {
                full_name,
                repo_type,
            } => cmd_repos_add(&config, &registry_path, &full_name, &repo_type).await?,
            RepoCommands::Validate => cmd_repos_validate(&registry_path)?,
        },
        Commands::Sync {
            export,
            analyze,
            output,
        } => cmd_sync(&config, &registry_path, export, analyze, output, cli.color).await?,
        Commands::Status => cmd_status(&config, &registry_path).await?,
        Commands::Discover { pattern } => cmd_discover(&config, &registry_path, pattern).await?,
        Commands::Activity { limit } => cmd_activity(&config, &registry_path, limit).await?,
        Commands::Analyze {
            manifest,
            standardize_names,
            output,
            pretty,
        } => {
            let records = ManifestLoader::from_json(&manifest)
                .await
                .with_context(|| format!("Failed to load manifest {}", manifest.display()))?;
            cmd_organize(&config, records, standardize_names, output, pretty).await?;
        }
        Commands::Scan {
            directory,
            standardize_names,
            output,
            pretty,
        } => {
            let scanner = LocalScanner::new(config.organizer.skip_patterns.clone());
            let records = scanner
                .scan_directory(&directory)
                .with_context(|| format!("Failed to scan {}", directory.display()))?;
            cmd_organize(&config, records, standardize_names, output, pretty).await?;
        }
    }

    Ok(())
}

fn hosting_api(config: &Config) -> Result<Arc<dyn HostingApi>> {
    if config.github.token.is_none() {
        warn!("GITHUB_TOKEN not set, requests are unauthenticated and rate limited");
    }
    let client = GitHubClient::new(&config.github).context("Failed to create GitHub client")?;
    Ok(Arc::new(client))
}

async fn load_registry(path: &Path) -> RepositoryRegistry {
    let registry = RepositoryRegistry::load(path).await;
    if registry.source() == DocumentSource::Defaults {
        println!(
            "{}",
            format_warning(&format!(
                "{} unavailable, using the built-in repository list",
                path.display()
            ))
        );
    }
    registry
}

async fn cmd_repos_list(registry_path: &Path) -> Result<()> {
    let registry = load_registry(registry_path).await;
    let repositories = registry.repositories().await;

    println!("\nTracked repositories ({})\n", repositories.len());
    for repo in &repositories {
        let marker = if repo.enabled { "●" } else { "○" };
        println!(
            "  {} {:<40} {:<13} priority {}",
            marker, repo.full_name, repo.repo_type, repo.sync_priority
        );
        if let Some(description) = &repo.description {
            println!("      {}", description);
        }
    }
    println!();

    Ok(())
}

async fn cmd_repos_add(
    config: &Config,
    registry_path: &Path,
    full_name: &str,
    repo_type: &str,
) -> Result<()> {
    let api = hosting_api(config)?;
    let registry = load_registry(registry_path).await;

    match registry
        .add(api.as_ref(), full_name, RepoType::parse(repo_type))
        .await
    {
        Ok(repo) => {
            println!(
                "{}",
                format_success(&format!(
                    "Added {} ({}) to {}",
                    repo.full_name,
                    repo.description.as_deref().unwrap_or("no description"),
                    registry_path.display()
                ))
            );
            Ok(())
        }
        Err(KovaError::AlreadyTracked(name)) => {
            println!("{}", format_info(&format!("{} is already tracked", name)));
            Ok(())
        }
        Err(e) => Err(e).context("Failed to add repository"),
    }
}

fn cmd_repos_validate(registry_path: &Path) -> Result<()> {
    info!("Validating {}", registry_path.display());
    let report = ConfigValidator::validate_file(registry_path);

    for error in &report.errors {
        println!("{}", format_error(error));
    }
    for warning in &report.warnings {
        println!("{}", format_warning(warning));
    }

    println!(
        "\nErrors: {}  Warnings: {}\n",
        report.errors.len(),
        report.warnings.len()
    );

    if report.is_valid() {
        println!("{}", format_success("Configuration is valid"));
        Ok(())
    } else {
        Err(anyhow::anyhow!(
            "{} has {} error(s)",
            registry_path.display(),
            report.errors.len()
        ))
    }
}

async fn cmd_sync(
    config: &Config,
    registry_path: &Path,
    export: bool,
    analyze: bool,
    output: Option<PathBuf>,
    colored: bool,
) -> Result<()> {
    let registry = load_registry(registry_path).await;
    let repos = registry.list_enabled().await;

    if repos.is_empty() {
        println!("{}", format_info("No enabled repositories to sync"));
        return Ok(());
    }

    let coordinator = RemoteSyncCoordinator::new(hosting_api(config)?, &config.sync);
    let progress = SyncProgress::with_color(repos.len(), colored);
    let report = coordinator
        .sync_all_with_progress(&repos, Some(&progress))
        .await;
    progress.finish();
    let stats = progress.get_stats();

    println!();
    for (i, (name, result)) in report.iter().enumerate() {
        let detail = match (&result.data, &result.error) {
            (Some(data), _) => format!(
                "{} ({} branches, {} recent commits)",
                name,
                data.branches.len(),
                data.recent_commits
            ),
            (None, Some(error)) => format!("{}: {}", name, error),
            (None, None) => name.clone(),
        };
        println!(
            "{}",
            format_step(i + 1, report.len(), &format_status(result.status, &detail))
        );
    }

    println!(
        "\nSynced {} repositories in {}s: {} ok, {} not found, {} failed ({:.0}% success)\n",
        stats.total(),
        stats.duration_secs,
        stats.succeeded,
        stats.not_found,
        stats.failed,
        stats.success_rate()
    );

    if analyze {
        match RepoAnalyzer::new(&config.ai) {
            Ok(analyzer) => {
                for (name, result) in &report {
                    let Some(snapshot) = result.data.as_ref() else {
                        continue;
                    };
                    match analyzer.analyze(name, snapshot).await {
                        Ok(analysis) => println!("\n== {} ==\n{}\n", name, analysis.text),
                        Err(e) => println!("{}", format_error(&format!("{}: {}", name, e))),
                    }
                }
            }
            Err(e) => println!("{}", format_warning(&e.to_string())),
        }
    }

    if export {
        let dir = output.unwrap_or_else(|| config.organizer.output_dir.clone());
        let exporter = ReportExporter::new(dir, true).context("Failed to create exporter")?;
        let path = exporter
            .export_sync_report(&report)
            .await
            .context("Failed to export sync report")?;
        println!("{}", format_success(&format!("Report written to {}", path.display())));
    }

    Ok(())
}

async fn cmd_status(config: &Config, registry_path: &Path) -> Result<()> {
    let registry = load_registry(registry_path).await;
    let repos = registry.list_enabled().await;
    let coordinator = RemoteSyncCoordinator::new(hosting_api(config)?, &config.sync);

    println!("\nCross-repository status\n");
    for (name, status) in coordinator.status(&repos).await {
        let line = if status.exists {
            format_status(
                SyncStatus::Success,
                &format!(
                    "{:<40} {:<10} {} open issues, updated {}",
                    name,
                    status.default_branch.as_deref().unwrap_or("-"),
                    status.open_issues,
                    status.updated_at.as_deref().unwrap_or("unknown")
                ),
            )
        } else if let Some(error) = &status.error {
            format_status(SyncStatus::Error, &format!("{:<40} {}", name, error))
        } else {
            format_status(SyncStatus::NotFound, &format!("{:<40} not found", name))
        };
        println!("  {}", line);
    }
    println!();

    Ok(())
}

async fn cmd_discover(
    config: &Config,
    registry_path: &Path,
    pattern: Option<String>,
) -> Result<()> {
    let registry = load_registry(registry_path).await;
    let document = registry.document().await;
    let known: Vec<String> = document
        .repositories
        .iter()
        .map(|r| r.full_name.clone())
        .collect();
    let pattern = pattern.unwrap_or_else(|| document.discovery_pattern());

    let discovery = RepositoryDiscovery::new(hosting_api(config)?, config.sync.discovery_page_size);
    let found = discovery
        .discover(&document.github_owner, &pattern, &known)
        .await
        .context("Repository discovery failed")?;

    if found.is_empty() {
        println!("{}", format_info("No untracked repositories found"));
    } else {
        println!("\nUntracked repositories matching '{}':\n", pattern);
        for name in &found {
            println!("  + {}", name);
        }
        println!("\nAdd one with: kova_sync repos add <owner/name>\n");
    }

    Ok(())
}

async fn cmd_activity(config: &Config, registry_path: &Path, limit: u32) -> Result<()> {
    let registry = load_registry(registry_path).await;
    let owner = registry.document().await.github_owner;

    let discovery = RepositoryDiscovery::new(hosting_api(config)?, config.sync.discovery_page_size);
    let events = discovery
        .recent_activity(&owner, limit)
        .await
        .context("Failed to fetch recent activity")?;

    println!("\nRecent activity for {}\n", owner);
    for event in &events {
        println!(
            "  {:<22} {:<20} {}",
            event.created_at.as_deref().unwrap_or("-"),
            event.event_type,
            event.repository
        );
    }
    println!();

    Ok(())
}

async fn cmd_organize(
    config: &Config,
    records: Vec<FileRecord>,
    standardize_names: bool,
    output: Option<PathBuf>,
    pretty: bool,
) -> Result<()> {
    let analyzer = ManifestAnalyzer::new(&config.organizer);
    let analysis = analyzer.analyze(records);

    let planner = MigrationPlanner::new(standardize_names || config.organizer.standardize_names);
    let plan = planner.plan(&analysis);

    println!("\nFile analysis\n");
    println!("  Files:       {}", analysis.files.len());
    for (category, count) in analysis.categories() {
        println!("    {:<15} {}", category, count);
    }
    println!("  High relevance (>= 7): {}", analysis.high_relevance(7).count());
    println!("  Duplicate groups:      {}", analysis.duplicates.len());
    println!("  Obsolete files:        {}", analysis.obsolete.len());

    println!("\nMigration plan {}\n", plan.plan_id);
    println!("  Folders to create: {}", plan.folder_creation.len());
    for kind in [
        ActionKind::Move,
        ActionKind::Archive,
        ActionKind::Rename,
        ActionKind::Merge,
        ActionKind::Delete,
    ] {
        let count = plan.totals().get(&kind).copied().unwrap_or(0);
        if count > 0 {
            println!("  {:<8} {}", kind.as_str(), count);
        }
    }

    let dir = output.unwrap_or_else(|| config.organizer.output_dir.clone());
    let exporter = ReportExporter::new(dir, pretty).context("Failed to create exporter")?;
    let analysis_path = exporter
        .export_analysis(&analysis)
        .await
        .context("Failed to export analysis")?;
    let plan_path = exporter
        .export_plan(&plan)
        .await
        .context("Failed to export migration plan")?;

    println!();
    println!("{}", format_success(&format!("Analysis written to {}", analysis_path.display())));
    println!("{}", format_success(&format!("Plan written to {}", plan_path.display())));

    Ok(())
}
