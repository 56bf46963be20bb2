mod monitor;

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use irr_boundary::{discovery_from_installation, NodeSetDocument};
use irr_client::BoundaryClient;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "irr-cli")]
#[command(about = "Irriflow operator CLI - control, monitor and export", long_about = None)]
struct Cli {
    /// Server base URL.
    #[arg(long, global = true, default_value = "http://127.0.0.1:4840")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an installation file
    Validate {
        /// Path to the installation YAML file
        config: PathBuf,
    },
    /// Show the master switch and any active valves
    Status,
    /// List stations and valves
    List,
    /// Turn the master switch on
    On,
    /// Turn the master switch off
    Off,
    /// Start a manual run
    Start {
        /// Valve id, e.g. Station1_Valve1
        valve: String,
        /// Run duration in seconds
        duration_s: u32,
    },
    /// Stop a valve
    Stop {
        /// Valve id, e.g. Station1_Valve1
        valve: String,
    },
    /// Schedule a run at a future time
    Schedule {
        /// Valve id, e.g. Station1_Valve1
        valve: String,
        /// Start time, RFC 3339 (e.g. 2024-05-01T06:30:00Z)
        at: String,
        /// Run duration in seconds
        duration_s: u32,
    },
    /// Continuously render the status board
    Monitor {
        /// Refresh interval in seconds
        #[arg(long, default_value_t = 2)]
        interval: u64,
        /// Render a single snapshot and exit
        #[arg(long)]
        once: bool,
    },
    /// Export the nodeset document
    ExportNodeset {
        /// Build from an installation file instead of a running server
        #[arg(long)]
        config: Option<PathBuf>,
        /// Output file (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        #[arg(long, value_enum, default_value_t = ExportFormat::Yaml)]
        format: ExportFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ExportFormat {
    Yaml,
    Json,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { config } => cmd_validate(&config),
        Commands::Status => cmd_status(&cli.url).await,
        Commands::List => cmd_list(&cli.url).await,
        Commands::On => cmd_set_system(&cli.url, true).await,
        Commands::Off => cmd_set_system(&cli.url, false).await,
        Commands::Start { valve, duration_s } => cmd_start(&cli.url, &valve, duration_s).await,
        Commands::Stop { valve } => cmd_stop(&cli.url, &valve).await,
        Commands::Schedule {
            valve,
            at,
            duration_s,
        } => cmd_schedule(&cli.url, &valve, &at, duration_s).await,
        Commands::Monitor { interval, once } => cmd_monitor(&cli.url, interval, once).await,
        Commands::ExportNodeset {
            config,
            output,
            format,
        } => cmd_export_nodeset(&cli.url, config.as_deref(), output.as_deref(), format).await,
    }
}

fn cmd_validate(config: &Path) -> anyhow::Result<()> {
    let installation = irr_project::load_installation(config)?;
    let valves: usize = installation.stations.iter().map(|s| s.valve_count).sum();
    println!(
        "✓ Installation is valid ({} stations, {} valves)",
        installation.stations.len(),
        valves
    );
    Ok(())
}

async fn cmd_status(url: &str) -> anyhow::Result<()> {
    let client = BoundaryClient::connect(url).await?;
    let snapshot = client.snapshot().await?;

    println!(
        "System: {}",
        if snapshot.system_on { "ON" } else { "OFF" }
    );

    let mut any_active = false;
    for station in &snapshot.stations {
        for valve in &station.valves {
            if valve.is_irrigating {
                any_active = true;
                println!(
                    "  {}_{}: {} ({} left)",
                    station.id,
                    valve.id,
                    valve.description,
                    monitor::format_mmss(valve.remaining_time_s)
                );
            }
        }
    }
    if !any_active {
        println!("No valves irrigating");
    }
    Ok(())
}

async fn cmd_list(url: &str) -> anyhow::Result<()> {
    let client = BoundaryClient::connect(url).await?;
    let discovery = client.discovery();

    println!("Stations and valves ({}):", discovery.namespace_uri);
    for station in &discovery.stations {
        println!(
            "  {} - {} ({}, {} valves)",
            station.id,
            station.description,
            station.station_type,
            station.valve_count
        );
        for valve in &station.valves {
            println!("    {}_{}: {}", station.id, valve.id, valve.description);
        }
    }
    Ok(())
}

async fn cmd_set_system(url: &str, on: bool) -> anyhow::Result<()> {
    let client = BoundaryClient::connect(url).await?;
    client.set_system_state(on).await?;
    println!("System: {}", if on { "ON" } else { "OFF" });
    Ok(())
}

async fn cmd_start(url: &str, valve: &str, duration_s: u32) -> anyhow::Result<()> {
    if duration_s == 0 {
        bail!("duration must be positive");
    }
    let client = BoundaryClient::connect(url).await?;
    client.start_irrigation(valve, duration_s).await?;
    println!(
        "✓ Start requested: {} for {}",
        valve,
        monitor::format_mmss(duration_s)
    );
    println!("  (ignored if the valve is already irrigating)");
    Ok(())
}

async fn cmd_stop(url: &str, valve: &str) -> anyhow::Result<()> {
    let client = BoundaryClient::connect(url).await?;
    client.stop_irrigation(valve).await?;
    println!("✓ Stop requested: {valve}");
    Ok(())
}

async fn cmd_schedule(url: &str, valve: &str, at: &str, duration_s: u32) -> anyhow::Result<()> {
    if duration_s == 0 {
        bail!("duration must be positive");
    }
    let at: DateTime<Utc> = DateTime::parse_from_rfc3339(at)
        .with_context(|| format!("invalid RFC 3339 time: {at}"))?
        .with_timezone(&Utc);

    let client = BoundaryClient::connect(url).await?;
    client.schedule_irrigation(valve, at, duration_s).await?;
    println!(
        "✓ Scheduled: {} at {} for {}",
        valve,
        at.format("%Y-%m-%d %H:%M:%S UTC"),
        monitor::format_mmss(duration_s)
    );
    Ok(())
}

async fn cmd_monitor(url: &str, interval: u64, once: bool) -> anyhow::Result<()> {
    let client = BoundaryClient::connect(url).await?;

    if once {
        let snapshot = client.snapshot().await?;
        println!("{}", monitor::render(&snapshot));
        return Ok(());
    }

    loop {
        let snapshot = client.snapshot().await?;
        monitor::clear_screen();
        println!("{}", monitor::render(&snapshot));
        println!(
            "Updated {} - refresh every {}s, Ctrl+C to exit",
            Utc::now().format("%H:%M:%S UTC"),
            interval
        );
        tokio::time::sleep(Duration::from_secs(interval.max(1))).await;
    }
}

async fn cmd_export_nodeset(
    url: &str,
    config: Option<&Path>,
    output: Option<&Path>,
    format: ExportFormat,
) -> anyhow::Result<()> {
    let doc: NodeSetDocument = match config {
        Some(path) => {
            let installation = irr_project::load_installation(path)?;
            NodeSetDocument::from_discovery(&discovery_from_installation(&installation))
        }
        None => BoundaryClient::connect(url).await?.nodeset().await?,
    };

    let text = match format {
        ExportFormat::Yaml => serde_yaml::to_string(&doc)?,
        ExportFormat::Json => serde_json::to_string_pretty(&doc)?,
    };

    match output {
        Some(path) => {
            std::fs::write(path, &text)?;
            println!(
                "✓ Exported {} object types, {} instances to {}",
                doc.object_types.len(),
                doc.instances.len(),
                path.display()
            );
        }
        None => print!("{text}"),
    }
    Ok(())
}
