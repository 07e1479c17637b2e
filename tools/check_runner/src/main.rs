use clap::Parser;
use guestpost_core::audit::log::AuditLog;
use guestpost_core::checks::orchestrator::ValidationOrchestrator;
use guestpost_core::config::ValidationConfig;
use guestpost_core::detector::placeholder::PlaceholderDetector;
use guestpost_core::error::CoreResult;
use guestpost_core::highlight::html::render_html;
use guestpost_core::highlight::renderer::render_segments;
use guestpost_core::model::check_result::CheckType;
use guestpost_core::model::submission::Submission;
use guestpost_core::storage::file_store::FileResultStore;
use guestpost_core::storage::store::ResultStore;
use guestpost_core::summary::render::{render_results_csv, render_summary_markdown};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "check_runner",
    about = "Run plagiarism and AI-content checks against a draft",
    version
)]
struct Cli {
    /// Draft text to validate
    file: PathBuf,

    /// Submission id (defaults to the file stem)
    #[arg(long)]
    submission_id: Option<String>,

    #[arg(long, default_value = "cli")]
    owner: String,

    /// JSON config; defaults apply when the file is absent
    #[arg(long, default_value = "guestpost.json")]
    config: PathBuf,

    /// Overrides `store_dir` from the config
    #[arg(long)]
    store: Option<PathBuf>,

    /// Overrides `audit_log_path` from the config
    #[arg(long)]
    audit: Option<PathBuf>,

    /// Write the highlighted draft as HTML
    #[arg(long)]
    html: Option<PathBuf>,

    /// Write the stored result rows for this submission as CSV
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Print the markdown results panel
    #[arg(long)]
    markdown: bool,

    /// Print both outcomes and the summary as JSON instead of result lines
    #[arg(long)]
    json: bool,

    #[arg(long)]
    log_json: bool,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("guestpost_core=info,check_runner=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().with_current_span(false).init();
    } else {
        builder.init();
    }
}

fn submission_id_for(path: &Path, explicit: Option<String>) -> String {
    explicit.unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "submission".to_string())
    })
}

fn run(cli: Cli) -> CoreResult<bool> {
    let mut cfg = ValidationConfig::load(&cli.config)?;
    if let Some(store) = cli.store {
        cfg.store_dir = store;
    }
    if cli.audit.is_some() {
        cfg.audit_log_path = cli.audit;
    }

    let text = std::fs::read_to_string(&cli.file)?;
    let submission = Submission::new(
        submission_id_for(&cli.file, cli.submission_id),
        cli.owner,
        text,
    );

    let store = FileResultStore::open(&cfg.store_dir)?;
    let plagiarism = PlaceholderDetector::new(CheckType::Plagiarism, cfg.plagiarism_detector)?;
    let ai_content = PlaceholderDetector::new(CheckType::AiContent, cfg.ai_content_detector)?;
    let mut orchestrator =
        ValidationOrchestrator::new(store, Box::new(plagiarism), Box::new(ai_content))
            .with_thresholds(cfg.thresholds)?;
    if let Some(path) = &cfg.audit_log_path {
        orchestrator = orchestrator.with_audit_log(AuditLog::open_or_create(path)?);
    }

    info!(submission_id = %submission.id, store = %cfg.store_dir.display(), "validating draft");
    let v = orchestrator.validate_submission(&submission)?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&v)?);
    } else {
        for outcome in [&v.plagiarism, &v.ai_content] {
            let score = outcome
                .score
                .map(|s| format!("{:.2}", s))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "CHECK {} {} score={} highlights={}{}",
                outcome.check_type,
                outcome.status,
                score,
                outcome.highlights.len(),
                outcome
                    .error
                    .as_deref()
                    .map(|e| format!(" error={}", e))
                    .unwrap_or_default()
            );
        }
        match &v.summary.block_reason {
            Some(reason) => println!("OVERALL {} blocked={:?}", v.summary.overall, reason),
            None => println!("OVERALL {}", v.summary.overall),
        }
    }

    if cli.markdown {
        println!("{}", render_summary_markdown(&v.summary));
    }
    if let Some(out) = &cli.html {
        let record = orchestrator.record_for(&submission.id)?;
        let rendered = render_segments(&submission.text, &record.highlights());
        std::fs::write(out, render_html(&rendered, None))?;
        info!(path = %out.display(), segments = rendered.segments.len(), "wrote highlighted draft");
    }

    if let Some(out) = &cli.csv {
        let rows = orchestrator.store().list_for_submission(&submission.id)?;
        std::fs::write(out, render_results_csv(&rows)?)?;
        info!(path = %out.display(), rows = rows.len(), "wrote result export");
    }

    Ok(v.summary.passed())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match run(cli) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("check_runner: {}", e);
            std::process::exit(2);
        }
    }
}
