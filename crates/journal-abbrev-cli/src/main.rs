use std::fs::File;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use journal_abbrev_catalog::{JournalIndex, build_index, parse_journal_list};
use journal_abbrev_core::{JournalRepository, LazyRepository, load_custom_lists};
use journal_abbrev_ltwa::parse_ltwa;

/// Journal abbreviation toolkit - build and query the offline journal index
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build the offline journal index from source lists
    Build {
        /// Path to store the SQLite index
        path: PathBuf,

        /// Semicolon-delimited journal lists (name;abbreviation[;shortest])
        #[arg(long = "journals", required = true)]
        journal_lists: Vec<PathBuf>,

        /// Tab-delimited LTWA word abbreviation list
        #[arg(long)]
        ltwa: Option<PathBuf>,
    },

    /// Resolve a journal name or abbreviation to its catalog entry
    Resolve {
        /// Name, abbreviation, dotless, or shortest-unique form
        name: String,

        /// Path to the journal index
        #[arg(long)]
        index: Option<PathBuf>,

        /// Additional custom abbreviation lists, highest priority first
        #[arg(long = "custom")]
        custom_lists: Vec<PathBuf>,
    },

    /// Abbreviate a journal title (catalog entry, or derived word by word)
    Abbreviate {
        title: String,

        /// Path to the journal index
        #[arg(long)]
        index: Option<PathBuf>,

        /// Additional custom abbreviation lists, highest priority first
        #[arg(long = "custom")]
        custom_lists: Vec<PathBuf>,
    },

    /// Print the next representation in the display cycle
    Next {
        name: String,

        /// Path to the journal index
        #[arg(long)]
        index: Option<PathBuf>,
    },

    /// Show index metadata
    Info {
        /// Path to the journal index
        #[arg(long)]
        index: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Build {
            path,
            journal_lists,
            ltwa,
        } => build(&path, &journal_lists, ltwa.as_deref()),
        Command::Resolve {
            name,
            index,
            custom_lists,
        } => {
            let repo = open_repository(index, &custom_lists)?;
            resolve(repo.get()?, &name)
        }
        Command::Abbreviate {
            title,
            index,
            custom_lists,
        } => {
            let repo = open_repository(index, &custom_lists)?;
            abbreviate(repo.get()?, &title)
        }
        Command::Next { name, index } => {
            let repo = open_repository(index, &[])?;
            next(repo.get()?, &name)
        }
        Command::Info { index } => info(&resolve_index_path(index)?),
    }
}

/// Resolve the index location: CLI flag > env var.
fn resolve_index_path(flag: Option<PathBuf>) -> anyhow::Result<PathBuf> {
    let path = flag.or_else(|| {
        std::env::var("JOURNAL_INDEX_PATH")
            .ok()
            .map(PathBuf::from)
    });
    let Some(path) = path else {
        anyhow::bail!("No journal index configured. Pass --index or set JOURNAL_INDEX_PATH.");
    };
    if !path.exists() {
        anyhow::bail!(
            "Journal index not found at {}. Build it with: journal-abbrev build {} --journals <list>",
            path.display(),
            path.display()
        );
    }
    Ok(path)
}

fn open_repository(
    index: Option<PathBuf>,
    custom_lists: &[PathBuf],
) -> anyhow::Result<LazyRepository> {
    let path = resolve_index_path(index)?;
    let repo = LazyRepository::new(path);
    if !custom_lists.is_empty() {
        load_custom_lists(repo.get()?, custom_lists);
    }
    Ok(repo)
}

fn build(
    path: &std::path::Path,
    journal_lists: &[PathBuf],
    ltwa: Option<&std::path::Path>,
) -> anyhow::Result<()> {
    let mut journals = Vec::new();
    for list in journal_lists {
        if !list.exists() {
            anyhow::bail!("Journal list not found: {}", list.display());
        }
        let entries = parse_journal_list(File::open(list)?)?;
        println!("{}: {} entries", list.display(), entries.len());
        journals.extend(entries);
    }

    let rules = match ltwa {
        Some(ltwa_path) => {
            if !ltwa_path.exists() {
                anyhow::bail!("LTWA list not found: {}", ltwa_path.display());
            }
            let rules = parse_ltwa(File::open(ltwa_path)?)?;
            println!("{}: {} word rules", ltwa_path.display(), rules.len());
            rules
        }
        None => Vec::new(),
    };

    let stats = build_index(path, &journals, &rules)?;

    let canonical = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    println!(
        "Indexed {} journals ({} duplicates discarded) and {} word rules",
        stats.journals, stats.duplicate_journals, stats.ltwa_rules
    );
    println!("Journal index saved to: {}", canonical.display());
    Ok(())
}

fn resolve(repo: &JournalRepository, name: &str) -> anyhow::Result<()> {
    let Some(entry) = repo.get(name) else {
        anyhow::bail!("Unknown journal: {}", name);
    };
    println!("Name:            {}", entry.name());
    println!("Abbreviation:    {}", entry.abbreviation());
    println!("Dotless:         {}", entry.dotless_abbreviation());
    println!("Shortest unique: {}", entry.shortest_unique_abbreviation());
    Ok(())
}

fn abbreviate(repo: &JournalRepository, title: &str) -> anyhow::Result<()> {
    let Some(abbreviated) = repo.abbreviate(title) else {
        anyhow::bail!("Nothing to abbreviate: {}", title);
    };
    println!("{}", abbreviated);
    Ok(())
}

fn next(repo: &JournalRepository, name: &str) -> anyhow::Result<()> {
    let Some(next) = repo.get_next_abbreviation(name) else {
        anyhow::bail!("Unknown journal: {}", name);
    };
    println!("{}", next);
    Ok(())
}

fn info(path: &std::path::Path) -> anyhow::Result<()> {
    let index = JournalIndex::open(path)?;
    println!("Index: {}", index.path().display());
    for key in ["schema_version", "last_updated", "journal_count", "ltwa_count"] {
        let value = index.metadata(key)?.unwrap_or_else(|| "(unset)".to_string());
        println!("{}: {}", key, value);
    }
    Ok(())
}
