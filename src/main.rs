use anyhow::{Context, Result};
use clap::Parser;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;

use ray::app::{App, AppEvent};
use ray::catalog::Catalog;
use ray::clock::SystemClock;
use ray::config::Config;
use ray::state::ReadingState;
use ray::storage::{Database, DatabaseError};
use ray::ui;

/// Get the config directory path (~/.config/ray/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("ray"))
}

#[derive(Parser, Debug)]
#[command(name = "ray", version, about = "A few short, thoughtful readings every day")]
struct Args {
    /// Print today's readings and exit
    #[arg(long)]
    today: bool,

    /// Print the share message for a reading and exit
    #[arg(long, value_name = "ID")]
    share: Option<String>,

    /// Use a catalog file instead of the bundled readings
    #[arg(long, value_name = "FILE")]
    catalog: Option<PathBuf>,

    /// Config file (default: ~/.config/ray/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Delete all stored progress and preferences, then start fresh
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns stdout, so logs go to stderr and only when asked for
    if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(io::stderr)
            .init();
    }

    let args = Args::parse();

    let config_dir = get_config_dir()?;
    ensure_config_dir(&config_dir)?;

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let catalog = Arc::new(load_catalog(args.catalog.as_deref(), &config)?);

    // Sharing only needs the catalog
    if let Some(id) = &args.share {
        let reading = catalog
            .find(id)
            .with_context(|| format!("No reading with id {:?}", id))?;
        println!("{}", reading.share_message());
        return Ok(());
    }

    let db_path = config_dir.join("ray.db");
    if args.reset {
        reset_database(&db_path)?;
        println!("All reading progress and preferences cleared.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of ray appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let state = ReadingState::load(db.clone(), catalog, &config, Arc::new(SystemClock))
        .await
        .context("Failed to load reading state")?;

    if args.today {
        if !state.is_onboarded() {
            eprintln!("Run ray once to choose your categories first.");
            std::process::exit(1);
        }
        write_today(&state, &mut io::stdout().lock())?;
        return Ok(());
    }

    let mut app = App::new(db, state, &config);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}

/// Create the config directory with user-only access.
fn ensure_config_dir(config_dir: &Path) -> Result<()> {
    if !config_dir.exists() {
        std::fs::create_dir_all(config_dir).context("Failed to create config directory")?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        match std::fs::metadata(config_dir) {
            Ok(metadata) => {
                let mut perms = metadata.permissions();
                perms.set_mode(0o700);
                if let Err(e) = std::fs::set_permissions(config_dir, perms) {
                    tracing::warn!(
                        path = %config_dir.display(),
                        error = %e,
                        "Failed to set config directory permissions to 0700"
                    );
                }
            }
            Err(e) => {
                tracing::warn!(
                    path = %config_dir.display(),
                    error = %e,
                    "Failed to read config directory metadata"
                );
            }
        }
    }
    Ok(())
}

/// Catalog precedence: --catalog, then config `catalog_path`, then bundled.
fn load_catalog(flag: Option<&Path>, config: &Config) -> Result<Catalog> {
    match flag.or(config.catalog_path.as_deref()) {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("Failed to load catalog {}", path.display())),
        None => Catalog::bundled().context("Bundled catalog is invalid"),
    }
}

/// Remove the database along with SQLite's WAL side files.
fn reset_database(db_path: &Path) -> Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let mut name = db_path.as_os_str().to_owned();
        name.push(suffix);
        let path = PathBuf::from(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to delete {}", path.display()))?;
        }
    }
    tracing::info!(path = %db_path.display(), "Database reset");
    Ok(())
}

/// Print today's readings, one per line, with a progress footer.
fn write_today(state: &ReadingState, out: &mut impl Write) -> io::Result<()> {
    writeln!(
        out,
        "{} · Day {}",
        state.today().format("%A, %B %-d"),
        state.current_day()
    )?;

    let today = state.todays_readings();
    if today.is_empty() {
        writeln!(out, "  Nothing left to read in your categories.")?;
    }
    for scheduled in &today {
        let mark = if scheduled.completed { "✓" } else { " " };
        writeln!(
            out,
            "  {} [{}] {} by {} ({} min)",
            mark,
            scheduled.reading.id,
            scheduled.reading.title,
            scheduled.reading.author,
            scheduled.reading.estimated_minutes()
        )?;
    }

    let progress = state.progress();
    writeln!(
        out,
        "{} of {} readings completed",
        progress.completed, progress.total
    )
}
