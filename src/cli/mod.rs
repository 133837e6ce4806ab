//! # CLI Module
//!
//! Command-line interface for the picture library.
//!
//! ## Usage
//! ```bash
//! # Create a folder, then an album that imports a memory card
//! picturebot create Trips
//! picturebot create "Alps 2024" --kind album --parent 1 --source /media/card/DCIM/100MSDCF
//!
//! # Show the library tree
//! picturebot tree
//!
//! # Group near-identical shots inside an album
//! picturebot group 2 --threshold 6
//!
//! # Cull
//! picturebot flag 17 picked
//! ```

use clap::{Parser, Subcommand, ValueEnum};
use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use picturebot::core::hasher::HashAlgorithmKind;
use picturebot::core::hierarchy::{CurationStatus, Picture, TreeNode};
use picturebot::core::import::{CancellationToken, ImportReport};
use picturebot::core::library::{
    default_database_path, CreateNodeRequest, LibraryConfig, LibraryService,
};
use picturebot::core::store::{SettingsStore, SqliteStore};
use picturebot::error::{LibraryError, Result};
use picturebot::events::{Event, EventChannel, ImportEvent};
use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Picturebot - Catalog, import and cull photo shoots
#[derive(Parser, Debug)]
#[command(name = "picturebot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Library root directory (albums are created inside it)
    #[arg(long, global = true, env = "PICTUREBOT_LIBRARY")]
    library: Option<PathBuf>,

    /// Library database path (defaults to <library>/picturebot.db)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a folder or an album
    Create {
        /// Node name
        name: String,

        /// Node kind: folder or album
        #[arg(short, long, default_value = "folder")]
        kind: String,

        /// Parent node id
        #[arg(short, long)]
        parent: Option<i64>,

        /// Capture directory to import into the new album
        #[arg(short, long)]
        source: Option<PathBuf>,

        /// Fingerprint algorithm used for the import
        #[arg(short, long, default_value = "difference")]
        algorithm: Algorithm,
    },

    /// Print the folder/album tree
    Tree {
        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Group similar pictures inside a node
    Group {
        /// Node id
        node: i64,

        /// Similarity threshold (lower = stricter, 0-64)
        #[arg(short, long)]
        threshold: Option<u32>,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// List the pictures of a node
    Pictures {
        /// Node id
        node: i64,

        /// Output format
        #[arg(short, long, default_value = "pretty")]
        output: OutputFormat,
    },

    /// Set a picture's curation status
    Flag {
        /// Picture id
        picture: i64,

        /// New status
        status: Status,
    },

    /// Show or change settings
    Settings {
        /// Theme mode (e.g. system, light, dark)
        #[arg(long)]
        theme: Option<String>,

        /// Library path remembered for later runs
        #[arg(long)]
        library_path: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Average Hash - Fastest
    Average,
    /// Difference Hash - Good balance (default)
    Difference,
    /// Perceptual Hash - Most robust to edits
    Perceptual,
}

impl From<Algorithm> for HashAlgorithmKind {
    fn from(algo: Algorithm) -> Self {
        match algo {
            Algorithm::Average => HashAlgorithmKind::Average,
            Algorithm::Difference => HashAlgorithmKind::Difference,
            Algorithm::Perceptual => HashAlgorithmKind::Perceptual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Status {
    Unflagged,
    Picked,
    Rejected,
}

impl From<Status> for CurationStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::Unflagged => CurationStatus::Unflagged,
            Status::Picked => CurationStatus::Picked,
            Status::Rejected => CurationStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output with colors
    Pretty,
    /// JSON output for scripting
    Json,
}

/// Where the library lives and where its database is
struct Location {
    root: PathBuf,
    db: PathBuf,
}

/// Run the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    picturebot::init_tracing(cli.verbose);

    let location = resolve_location(cli.library.clone(), cli.db.clone())?;
    tracing::debug!(
        root = %location.root.display(),
        db = %location.db.display(),
        "Resolved library"
    );

    let store = Arc::new(SqliteStore::open(&location.db)?);
    let term = Term::stdout();

    match cli.command {
        Commands::Create {
            name,
            kind,
            parent,
            source,
            algorithm,
        } => {
            let config = LibraryConfig::new(&location.root).hash_algorithm(algorithm.into());
            let service = LibraryService::new(store, config);
            let mut request = CreateNodeRequest::new(name, kind);
            request.parent_id = parent;
            request.source_path = source;
            run_create(&term, &service, request, cli.verbose)
        }
        Commands::Tree { output } => {
            let service = LibraryService::new(store, LibraryConfig::new(&location.root));
            let forest = service.get_full_hierarchy()?;
            match output {
                OutputFormat::Pretty => print_tree(&term, &forest),
                OutputFormat::Json => print_json(&forest)?,
            }
            Ok(())
        }
        Commands::Group {
            node,
            threshold,
            output,
        } => {
            let service = LibraryService::new(store, LibraryConfig::new(&location.root));
            let threshold = threshold.unwrap_or(service.config().similarity_threshold);
            let groups = service.group_similar_pictures(node, threshold)?;
            match output {
                OutputFormat::Pretty => print_groups(&term, &groups, threshold),
                OutputFormat::Json => print_json(&groups)?,
            }
            Ok(())
        }
        Commands::Pictures { node, output } => {
            let service = LibraryService::new(store, LibraryConfig::new(&location.root));
            let pictures = service.pictures_for_node(node)?;
            match output {
                OutputFormat::Pretty => print_pictures(&term, &pictures),
                OutputFormat::Json => print_json(&pictures)?,
            }
            Ok(())
        }
        Commands::Flag { picture, status } => {
            let service = LibraryService::new(store, LibraryConfig::new(&location.root));
            let updated = service.set_curation_status(picture, status.into())?;
            term.write_line(&format!(
                "{} {} is now {}",
                style("✓").green().bold(),
                updated.file_name,
                style(updated.curation_status.as_str()).cyan()
            ))
            .ok();
            Ok(())
        }
        Commands::Settings {
            theme,
            library_path,
        } => {
            let service = LibraryService::new(store, LibraryConfig::new(&location.root));
            let mut settings = service.settings()?;
            let changed = theme.is_some() || library_path.is_some();

            if let Some(theme) = theme {
                settings.theme_mode = theme;
            }
            if let Some(path) = library_path {
                settings.library_path = path.to_string_lossy().into_owned();
            }
            if changed {
                service.update_settings(&settings)?;
            }

            term.write_line(&format!("  theme_mode:   {}", style(&settings.theme_mode).cyan()))
                .ok();
            term.write_line(&format!(
                "  library_path: {}",
                style(if settings.library_path.is_empty() {
                    "(not set)"
                } else {
                    settings.library_path.as_str()
                })
                .cyan()
            ))
            .ok();
            Ok(())
        }
    }
}

/// Resolve the library root: flag or env var, then the remembered
/// settings path, then `<Pictures>/Picturebot`.
fn resolve_location(library: Option<PathBuf>, db: Option<PathBuf>) -> Result<Location> {
    let root = match library {
        Some(root) => root,
        None => {
            let fallback = dirs::picture_dir()
                .or_else(dirs::home_dir)
                .map(|dir| dir.join("Picturebot"))
                .ok_or_else(|| {
                    LibraryError::Config(
                        "could not determine a pictures directory; pass --library".to_string(),
                    )
                })?;

            let settings_db = db.clone().unwrap_or_else(|| default_database_path(&fallback));
            let remembered = if settings_db.exists() {
                SqliteStore::open(&settings_db)?.settings()?.library_path
            } else {
                String::new()
            };

            if remembered.is_empty() {
                fallback
            } else {
                PathBuf::from(remembered)
            }
        }
    };

    let db = db.unwrap_or_else(|| default_database_path(&root));
    Ok(Location { root, db })
}

fn run_create(
    term: &Term,
    service: &LibraryService,
    request: CreateNodeRequest,
    verbose: bool,
) -> Result<()> {
    let importing = request.source_path.is_some();
    let (sender, receiver) = EventChannel::new();

    let spinner = if importing {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("{spinner:.green} {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    } else {
        None
    };

    let spinner_clone = spinner.clone();
    let event_thread = thread::spawn(move || {
        for event in receiver.iter() {
            let Some(ref pb) = spinner_clone else {
                continue;
            };
            match event {
                Event::Import(ImportEvent::GroupsFound { files, .. }) => {
                    pb.set_length(files as u64);
                }
                Event::Import(ImportEvent::Progress(p)) => {
                    pb.set_position(p.completed as u64);
                    pb.set_message(
                        p.current_path
                            .file_name()
                            .unwrap_or_default()
                            .to_string_lossy()
                            .into_owned(),
                    );
                }
                Event::Import(ImportEvent::Warning { path, message }) if verbose => {
                    pb.println(format!(
                        "  {} {}: {}",
                        style("!").yellow(),
                        path.display(),
                        message
                    ));
                }
                Event::Import(ImportEvent::Completed(_))
                | Event::Import(ImportEvent::Cancelled { .. }) => {
                    pb.finish_and_clear();
                }
                _ => {}
            }
        }
    });

    let result = service.create_node_with_events(request, &sender, &CancellationToken::new());

    drop(sender);
    event_thread.join().ok();
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let outcome = result?;
    let node = &outcome.node;

    term.write_line(&format!(
        "{} Created {} {} (id {})",
        style("✓").green().bold(),
        node.kind,
        style(&node.name).bold(),
        node.id
    ))
    .ok();
    if let Some(uuid) = &node.uuid {
        term.write_line(&format!("  uuid: {}", style(uuid).dim())).ok();
    }

    if let Some(report) = &outcome.import {
        print_import_report(term, report);
    }

    Ok(())
}

fn print_import_report(term: &Term, report: &ImportReport) {
    if report.source_missing {
        term.write_line(&format!(
            "  {} Source directory not found; nothing imported",
            style("!").yellow()
        ))
        .ok();
        return;
    }

    term.write_line(&format!(
        "  {} pictures imported in {:.1}s",
        style(report.imported).cyan(),
        report.duration_ms as f64 / 1000.0
    ))
    .ok();

    if report.skipped > 0 {
        term.write_line(&format!(
            "  {} files skipped (unknown type)",
            style(report.skipped).dim()
        ))
        .ok();
    }

    for warning in &report.warnings {
        term.write_line(&format!(
            "  {} {}: {}",
            style("!").yellow(),
            warning.file.display(),
            warning.message
        ))
        .ok();
    }
}

fn print_tree(term: &Term, forest: &[TreeNode]) {
    if forest.is_empty() {
        term.write_line(&format!("{}", style("The library is empty.").dim()))
            .ok();
        return;
    }

    fn print_node(term: &Term, tree: &TreeNode, depth: usize) {
        let node = &tree.node;
        let pictures: usize = node.sub_folders.iter().map(|sf| sf.pictures.len()).sum();
        let label = if node.is_album() {
            format!(
                "{} {}",
                style(&node.name).cyan().bold(),
                style(format!("[album #{}, {} pictures]", node.id, pictures)).dim()
            )
        } else {
            format!(
                "{} {}",
                style(&node.name).bold(),
                style(format!("[#{}]", node.id)).dim()
            )
        };

        term.write_line(&format!("{}{}", "  ".repeat(depth), label)).ok();
        for child in &tree.children {
            print_node(term, child, depth + 1);
        }
    }

    for root in forest {
        print_node(term, root, 0);
    }
}

fn print_groups(term: &Term, groups: &[Vec<Picture>], threshold: u32) {
    term.write_line(&format!(
        "{} groups (threshold {})",
        style(groups.len()).cyan(),
        threshold
    ))
    .ok();
    term.write_line("").ok();

    for (i, group) in groups.iter().enumerate() {
        term.write_line(&format!(
            "  {} ({} pictures)",
            style(format!("Group {}:", i + 1)).bold(),
            group.len()
        ))
        .ok();
        let lead = group[0].fingerprint;
        for picture in group {
            term.write_line(&format!(
                "    {} {:<14} {} {}",
                style("○").dim(),
                picture.file_name,
                style(fingerprint_label(picture)).dim(),
                style(format!("{:.0}%", lead.similarity(&picture.fingerprint))).green()
            ))
            .ok();
        }
    }
}

fn print_pictures(term: &Term, pictures: &[Picture]) {
    if pictures.is_empty() {
        term.write_line(&format!("{}", style("No pictures.").dim())).ok();
        return;
    }

    for picture in pictures {
        term.write_line(&format!(
            "  {:>6} {:<14} {:<8} sharpness {:>4}  {:<16}  {}",
            picture.id,
            picture.file_name,
            picture.kind.as_str(),
            picture.sharpness,
            fingerprint_label(picture),
            style(picture.curation_status.as_str()).cyan()
        ))
        .ok();
    }
}

/// Hex fingerprint, or a dash for RAWs and pictures that failed to decode
fn fingerprint_label(picture: &Picture) -> String {
    if picture.fingerprint.is_computed() {
        picture.fingerprint.to_hex()
    } else {
        "-".to_string()
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| LibraryError::Config(format!("failed to serialize output: {}", e)))?;
    println!("{}", json);
    Ok(())
}
