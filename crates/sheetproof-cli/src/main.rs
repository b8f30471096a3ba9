//! sheetproof CLI - spelling and grammar checks for CSV files

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use sheetproof::prelude::*;
use sheetproof::{CsvWriteOptions, FailureKind, PUBLIC_API_URL};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "sheetproof")]
#[command(author, version, about = "Spelling and grammar proofreading for spreadsheets")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check CSV files and print what was found
    Check(CheckArgs),

    /// List the supported languages
    Languages,
}

#[derive(Args)]
struct CheckArgs {
    /// CSV files to check, each one treated as a document
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Language to check against
    #[arg(short, long, default_value = "en-US")]
    language: String,

    /// LanguageTool server URL
    #[arg(long, default_value = PUBLIC_API_URL)]
    server: String,

    /// LanguageTool Premium API key
    #[arg(long, requires = "username")]
    api_key: Option<String>,

    /// LanguageTool Premium account name
    #[arg(long, requires = "api_key")]
    username: Option<String>,

    /// Check spelling only
    #[arg(long)]
    no_grammar: bool,

    /// Word to accept as correctly spelled (repeatable)
    #[arg(long = "ignore", value_name = "WORD")]
    ignore: Vec<String>,

    /// Extra word list, one word per line
    #[arg(long, value_name = "FILE")]
    words: Option<PathBuf>,

    /// Grammar requests allowed in flight at once
    #[arg(long, default_value_t = 2)]
    max_in_flight: usize,

    /// Minimum spacing between grammar request starts, in milliseconds
    #[arg(long, default_value_t = 3000)]
    min_interval_ms: u64,

    /// Attempts per grammar request, including the first
    #[arg(long, default_value_t = 4)]
    max_attempts: u32,

    /// Write every finding to this CSV file
    #[arg(long, value_name = "FILE.csv")]
    report: Option<PathBuf>,

    /// Also write each document's findings next to it as <name>_checked.csv
    #[arg(long)]
    report_each: bool,

    /// Print summaries as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check(args) => check(args).await,
        Commands::Languages => {
            for language in Language::ALL {
                println!("{}\t{}", language.code(), language.display_name());
            }
            Ok(())
        }
    }
}

async fn check(args: CheckArgs) -> Result<()> {
    let spell = spell_checker(&args)?;

    // Documents that cannot be read are reported in place, in file order
    let mut slots: Vec<std::result::Result<usize, RunSummary>> = Vec::new();
    let mut submissions = Vec::new();
    for path in &args.files {
        match CsvReader::read_file(path, &CsvReadOptions::default()) {
            Ok(workbook) => {
                slots.push(Ok(submissions.len()));
                submissions.push(Submission::new(workbook, args.language.clone()));
            }
            Err(e) => slots.push(Err(RunSummary::failed(
                &file_label(path),
                &args.language,
                FailureKind::Data,
                format!("Failed to read '{}': {e}", path.display()),
            ))),
        }
    }

    let ctx = RunContext::new();
    let cancel = ctx.cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("Interrupted, cancelling remaining checks");
            cancel.cancel();
        }
    });

    let results = if args.no_grammar {
        Pipeline::<LanguageToolClient>::new(spell)
            .run(submissions, &ctx)
            .await
    } else {
        let client = LanguageToolClient::new(LanguageToolConfig {
            base_url: args.server.clone(),
            api_key: args.api_key.clone(),
            username: args.username.clone(),
            ..Default::default()
        })
        .context("Invalid grammar server settings")?;
        let grammar = GrammarChecker::new(client)
            .with_throttle(Throttle::new(ThrottleConfig {
                max_in_flight: args.max_in_flight,
                min_interval: Duration::from_millis(args.min_interval_ms),
            }))
            .with_retry(RetryPolicy {
                max_attempts: args.max_attempts,
                ..Default::default()
            });
        Pipeline::new(spell).with_grammar(grammar).run(submissions, &ctx).await
    };

    let mut results: Vec<Option<RunSummary>> = results.into_iter().map(|r| Some(r.summary)).collect();
    let summaries: Vec<RunSummary> = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Ok(index) => results[index].take(),
            Err(summary) => Some(summary),
        })
        .collect();

    if args.json {
        let json = serde_json::to_string_pretty(&summaries).context("Failed to serialize summaries")?;
        println!("{json}");
    } else {
        for summary in &summaries {
            println!("{summary}");
        }
    }

    if let Some(report) = &args.report {
        let rows: Vec<_> = summaries.iter().flat_map(RunSummary::finding_rows).collect();
        let written = ReportWriter::write_file(&rows, report, &CsvWriteOptions::default())
            .with_context(|| format!("Failed to write report '{}'", report.display()))?;
        eprintln!("Wrote {written} findings to {}", report.display());
    }

    if args.report_each {
        for (path, written) in write_each_report(&args.files, &summaries)? {
            eprintln!("Wrote {written} findings to {}", path.display());
        }
    }

    let failed = summaries.iter().filter(|s| s.is_failed()).count();
    if failed > 0 {
        bail!("{failed} of {} documents could not be checked", summaries.len());
    }
    Ok(())
}

fn spell_checker(args: &CheckArgs) -> Result<SpellChecker> {
    let mut config = SpellConfig::default();
    config.ignore.extend(args.ignore.iter().cloned());
    let mut spell = SpellChecker::new(config);

    if let Some(words) = &args.words {
        for language in Language::ALL {
            spell
                .add_words_from_file(language, words)
                .with_context(|| format!("Failed to load word list '{}'", words.display()))?;
        }
    }
    Ok(spell)
}

/// Findings file written beside an input document
fn checked_report_path(input: &Path) -> PathBuf {
    let mut name = checked_file_name(&input.to_string_lossy());
    if input.extension().map_or(true, |ext| ext != "csv") {
        name.push_str(".csv");
    }
    PathBuf::from(name)
}

/// Write one findings CSV per completed document; summaries are in file order
fn write_each_report(files: &[PathBuf], summaries: &[RunSummary]) -> Result<Vec<(PathBuf, usize)>> {
    let mut written = Vec::new();
    for (input, summary) in files.iter().zip(summaries) {
        if summary.status != RunStatus::Completed {
            continue;
        }
        let path = checked_report_path(input);
        let count = ReportWriter::write_file(&summary.finding_rows(), &path, &CsvWriteOptions::default())
            .with_context(|| format!("Failed to write report '{}'", path.display()))?;
        written.push((path, count));
    }
    Ok(written)
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_checked_report_path() {
        assert_eq!(
            checked_report_path(Path::new("data/q1.csv")),
            PathBuf::from("data/q1_checked.csv")
        );
        assert_eq!(
            checked_report_path(Path::new("notes.txt")),
            PathBuf::from("notes_checked.txt.csv")
        );
        assert_eq!(checked_report_path(Path::new("notes")), PathBuf::from("notes_checked.csv"));
    }

    #[tokio::test]
    async fn test_write_each_report() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("supplies.csv");
        std::fs::write(&input, "Item,Note\nPaper,Recieve the invoice\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let workbook = CsvReader::read_file(&input, &CsvReadOptions::default()).unwrap();
        let results = Pipeline::<LanguageToolClient>::new(SpellChecker::default())
            .run(vec![Submission::new(workbook, "en-US")], &RunContext::new())
            .await;
        let summaries = vec![
            results.into_iter().next().unwrap().summary,
            RunSummary::failed("missing.csv", "en-US", FailureKind::Data, "unreadable"),
        ];

        let written = write_each_report(&[input, missing.clone()], &summaries).unwrap();
        let report = dir.path().join("supplies_checked.csv");
        assert_eq!(written, vec![(report.clone(), 1)]);
        assert!(!dir.path().join("missing_checked.csv").exists());

        let text = std::fs::read_to_string(report).unwrap();
        assert!(text.lines().nth(1).unwrap().contains(",B2,spelling,"));
    }
}
