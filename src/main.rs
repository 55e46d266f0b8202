use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use zipingest::{ingest_path, CsvOptions, IngestOptions, WorkDir};

#[derive(Debug, Parser)]
#[command(
    name = "zipingest",
    version,
    about = "Load the single CSV inside a zip archive and show its first rows"
)]
struct Cli {
    /// Path to the archive
    archive: PathBuf,

    /// Rows to print from the head of the table
    #[arg(short = 'n', long, env = "ZIPINGEST_ROWS", default_value_t = 5)]
    rows: usize,

    /// Also write the whole table to this Parquet file
    #[arg(long, env = "ZIPINGEST_PARQUET")]
    parquet: Option<PathBuf>,

    /// Unpack into this directory and leave the files there,
    /// instead of a throwaway temporary directory
    #[arg(long, env = "ZIPINGEST_KEEP_EXTRACTED")]
    keep_extracted: Option<PathBuf>,

    /// Field delimiter of the CSV
    #[arg(long, default_value_t = ',')]
    delimiter: char,

    /// Records to scan when inferring column types (default: all)
    #[arg(long)]
    infer_rows: Option<usize>,
}

impl Cli {
    fn options(&self) -> Result<IngestOptions> {
        let delimiter = u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .with_context(|| format!("delimiter {:?} is not a single ASCII byte", self.delimiter))?;

        let work_dir = match &self.keep_extracted {
            Some(dir) => WorkDir::Persistent(dir.clone()),
            None => WorkDir::default(),
        };

        Ok(IngestOptions::default().with_work_dir(work_dir).with_csv(
            CsvOptions::default()
                .with_delimiter(delimiter)
                .with_infer_rows(self.infer_rows),
        ))
    }
}

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) ingest ───────────────────────────────────────────────────
    let cli = Cli::parse();
    let options = cli.options()?;
    let table = ingest_path(&cli.archive, options)
        .with_context(|| format!("ingesting {}", cli.archive.display()))?;

    // ─── 3) show the head ────────────────────────────────────────────
    println!(
        "{} rows x {} columns",
        table.num_rows(),
        table.num_columns()
    );
    println!("{}", table.pretty(cli.rows).context("rendering table")?);

    // ─── 4) optional export ──────────────────────────────────────────
    if let Some(out) = &cli.parquet {
        let bytes = table
            .write_parquet(out)
            .with_context(|| format!("exporting to {}", out.display()))?;
        info!(path = %out.display(), bytes, "exported parquet");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_a_temporary_directory() {
        let cli = Cli::parse_from(["zipingest", "data/archive.zip"]);
        let options = cli.options().unwrap();
        assert_eq!(cli.rows, 5);
        assert_eq!(options.work_dir, WorkDir::default());
        assert_eq!(options.csv, CsvOptions::default());
    }

    #[test]
    fn keep_extracted_selects_a_persistent_directory() {
        let cli = Cli::parse_from([
            "zipingest",
            "a.zip",
            "--keep-extracted",
            "extracted_data",
            "--delimiter",
            ";",
        ]);
        let options = cli.options().unwrap();
        assert_eq!(
            options.work_dir,
            WorkDir::Persistent(PathBuf::from("extracted_data"))
        );
        assert_eq!(options.csv.delimiter, b';');
    }

    #[test]
    fn non_ascii_delimiter_is_rejected() {
        let cli = Cli::parse_from(["zipingest", "a.zip", "--delimiter", "é"]);
        assert!(cli.options().is_err());
    }
}
