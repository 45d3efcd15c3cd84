use clap::Subcommand;
use std::path::PathBuf;

pub mod load;
pub mod scan;

#[derive(Subcommand)]
pub enum Commands {
    /// Scan a directory for packages and list them
    Scan {
        /// Directory containing the packages
        #[arg(short, long)]
        source: PathBuf,
    },

    /// Load every package: resolve overrides, style inheritance and
    /// extract resources
    Load {
        /// Directory containing the packages
        #[arg(short, long)]
        source: PathBuf,

        /// Staging cache directory (rebuilt every run)
        #[arg(long, default_value = "cache")]
        cache: PathBuf,

        /// Directory resource images are moved to
        #[arg(long, default_value = "images/cache")]
        images: PathBuf,

        /// Log item style fallbacks
        #[arg(long)]
        log_fallbacks: bool,

        /// Log items with no definition for a style
        #[arg(long)]
        log_missing_styles: bool,

        /// Log item folders without an entity count
        #[arg(long)]
        log_missing_ent_count: bool,
    },
}

impl Commands {
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Scan { source } => scan::execute(source),
            Commands::Load {
                source,
                cache,
                images,
                log_fallbacks,
                log_missing_styles,
                log_missing_ent_count,
            } => load::execute(
                source,
                cache,
                images,
                *log_fallbacks,
                *log_missing_styles,
                *log_missing_ent_count,
            ),
        }
    }
}
