use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    chart::entry_slices, load_settings, AuthFlow, ChartPresentationState, ClientEvent,
    HistoryStore, HttpPersistenceBridge, NotificationLevel, SessionStore, SubmissionCoordinator,
};
use shared::domain::DistributionEntry;
use storage::{DurableCache, InMemoryCache, Storage};
use tokio::sync::broadcast;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Submit A/B/C percentage splits and browse their history")]
struct Cli {
    /// Settings file; defaults to ./client.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    api_base_url: Option<String>,
    #[arg(long)]
    cache_database_url: Option<String>,
    /// Keep the cache in memory for this run only.
    #[arg(long)]
    ephemeral: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        code: String,
    },
    Login {
        #[arg(long)]
        code: String,
    },
    Logout,
    /// Validate and render a split without saving it.
    Preview { a: String, b: String, c: String },
    /// Validate, render and save a split.
    Submit { a: String, b: String, c: String },
    History {
        #[arg(long)]
        charts: bool,
    },
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.config.as_deref())?;
    if let Some(url) = cli.api_base_url {
        client_core::config::validate_base_url(&url)?;
        settings.api_base_url = url;
    }
    if let Some(url) = cli.cache_database_url {
        settings.cache_database_url = url;
    }
    tracing::debug!(
        api_base_url = %settings.api_base_url,
        cache = %settings.cache_database_url,
        ephemeral = cli.ephemeral,
        "splitctl: settings resolved"
    );

    let cache: Arc<dyn DurableCache> = if cli.ephemeral {
        Arc::new(InMemoryCache::new())
    } else {
        let storage = Storage::new(&settings.cache_database_url)
            .await
            .context("failed to open local cache")?;
        storage
            .health_check()
            .await
            .context("local cache is not usable")?;
        Arc::new(storage)
    };
    let bridge = Arc::new(HttpPersistenceBridge::new(settings.api_base_url.clone()));
    let history = Arc::new(HistoryStore::new(cache.clone()));
    let coordinator = SubmissionCoordinator::new(bridge.clone(), history, settings.event_buffer);
    let mut events = coordinator.subscribe_events();
    let flow = AuthFlow::new(bridge, SessionStore::new(cache), coordinator);

    match cli.command {
        Command::Signup { name, code } => {
            let _ = flow.signup(&name, &code).await;
        }
        Command::Login { code } => {
            if flow.login(&code).await.is_ok() {
                print_history(&flow.coordinator().history().entries().await, false);
            }
        }
        Command::Logout => flow.logout().await?,
        Command::Preview { a, b, c } => {
            flow.restore().await?;
            if flow.coordinator().preview(&a, &b, &c).await.is_ok() {
                print_chart(&flow.coordinator().chart().await);
            }
        }
        Command::Submit { a, b, c } => {
            if !flow.restore().await? {
                eprintln!("not signed in; the split will be shown but not saved");
            }
            let coordinator = flow.coordinator();
            if let Ok(pending) = coordinator.submit(&a, &b, &c).await {
                print_chart(&coordinator.chart().await);
                let _ = pending.outcome().await;
            }
        }
        Command::History { charts } => {
            flow.restore().await?;
            print_history(&flow.coordinator().history().entries().await, charts);
        }
        Command::Status => {
            let restored = flow.restore().await?;
            let session = flow.coordinator().session().await;
            match (restored, session.user) {
                (true, Some(user)) => println!("signed in as {} (code {})", user.name, user.code),
                _ => println!("not signed in"),
            }
            println!("{} saved entries", flow.coordinator().history().len().await);
        }
    }

    print_notifications(&mut events);
    Ok(())
}

fn print_notifications(events: &mut broadcast::Receiver<ClientEvent>) {
    while let Ok(event) = events.try_recv() {
        if let ClientEvent::Notify(notification) = event {
            match notification.level {
                NotificationLevel::Success => println!("✔ {}", notification.message),
                NotificationLevel::Error => eprintln!("✖ {}", notification.message),
            }
        }
    }
}

fn print_chart(chart: &ChartPresentationState) {
    println!("Current distribution ({:?}):", chart.source());
    for slice in chart.slices() {
        println!("  {:<10} {} {}", slice.label, slice.color, bar(slice.value));
    }
}

fn print_history(entries: &[DistributionEntry], charts: bool) {
    if entries.is_empty() {
        println!("No data entries yet");
        return;
    }
    for (index, entry) in entries.iter().enumerate() {
        println!(
            "Entry #{:<3} {}  A: {}%  B: {}%  C: {}%",
            index + 1,
            entry.recorded_at.format("%Y-%m-%d"),
            entry.value_a,
            entry.value_b,
            entry.value_c
        );
        if charts {
            for slice in entry_slices(entry) {
                println!("    {:<10} {}", slice.label, bar(slice.value));
            }
        }
    }
}

fn bar(value: f64) -> String {
    "█".repeat((value / 2.0).round() as usize)
}
