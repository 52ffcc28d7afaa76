use clap::Parser;
use colored::*;
use env_logger::{Builder, Env, Target};
use grepper::cli::Cli;
use grepper::progress::{mode_labels, status_line};
use grepper::record::{format_size, format_timestamp};
use grepper::{GrepperError, MatchRecord, Result, SearchSession};
use indicatif::{ProgressBar, ProgressStyle};
use is_terminal::IsTerminal;
use log::{debug, info, warn};
use std::io;
use std::thread;
use std::time::{Duration, Instant};

const MAX_RESULTS_PER_TICK: usize = 800;
const MAX_LOGS_PER_TICK: usize = 300;
/// Reschedule delay while the channels still hold items.
const BACKLOG_DELAY: Duration = Duration::from_millis(1);
/// Reschedule delay when the last drain came up empty.
const IDLE_DELAY: Duration = Duration::from_millis(120);

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose)?;

    let start_time = Instant::now();
    let request = cli.to_request();
    let mode = request.mode;
    info!("Application started with command: {mode:?}");
    debug!("Search request: {request:?}");

    let pb = if io::stderr().is_terminal() {
        ProgressBar::new_spinner().with_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap()
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"),
        )
    } else {
        ProgressBar::hidden()
    };

    let session = SearchSession::start(request);

    let control = session.control();
    if let Err(e) = ctrlc::set_handler(move || control.cancel()) {
        warn!("Could not install Ctrl-C handler: {e}");
    }

    loop {
        let mut drained = false;
        for record in session.drain_results(MAX_RESULTS_PER_TICK) {
            drained = true;
            emit_record(&pb, render_record(&record));
        }
        for line in session.drain_logs(MAX_LOGS_PER_TICK) {
            drained = true;
            emit_log(&pb, &line);
        }
        pb.set_message(status_line(mode, &session.progress()));
        if session.is_finished() && !drained {
            break;
        }
        thread::sleep(if session.has_backlog() {
            BACKLOG_DELAY
        } else {
            IDLE_DELAY
        });
    }

    let snapshot = session.progress();
    session.join()?;
    pb.finish_and_clear();

    let (scanned_label, match_label, _) = mode_labels(mode);
    eprintln!(
        "{} | {}: {} | {}: {} | Elapsed: {:.1}s",
        "Done".green().bold(),
        scanned_label,
        snapshot.scanned,
        match_label,
        snapshot.matched,
        snapshot.elapsed.as_secs_f64()
    );

    info!(
        "Application finished. Total elapsed time: {:.2?}",
        start_time.elapsed()
    );
    Ok(())
}

fn setup_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let mut builder = Builder::from_env(Env::default().default_filter_or(default_level));

    builder.format(|buf, record| {
        use std::io::Write;
        writeln!(
            buf,
            "{} [{}] [{}] {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.module_path().unwrap_or("unknown"),
            record.args()
        )
    });
    builder.target(Target::Stderr);

    builder
        .try_init()
        .map_err(|e| GrepperError::Other(e.to_string()))?;
    Ok(())
}

/// Results go to stdout so they can be piped; the spinner is suspended
/// around each write to keep lines intact.
fn emit_record(pb: &ProgressBar, text: String) {
    if pb.is_hidden() {
        println!("{text}");
    } else {
        pb.suspend(|| println!("{text}"));
    }
}

/// Run log lines go to stderr above the spinner.
fn emit_log(pb: &ProgressBar, line: &str) {
    if pb.is_hidden() {
        eprintln!("{}", line.dimmed());
    } else {
        pb.println(line.dimmed().to_string());
    }
}

fn render_record(record: &MatchRecord) -> String {
    match record {
        MatchRecord::Content {
            path,
            line_number,
            line,
        } => format!(
            "{}:{}: {}",
            path.display().to_string().green(),
            line_number.to_string().yellow(),
            line
        ),
        MatchRecord::FileName {
            path,
            size,
            modified,
            content_matched,
        } => format!(
            "{}  {}  {}  {}",
            path.display().to_string().green(),
            format_size(*size).cyan(),
            format_timestamp(*modified).dimmed(),
            content_marker(*content_matched)
        ),
        MatchRecord::FolderName {
            path,
            modified,
            content_matched,
            files_considered,
        } => format!(
            "{}  {}  {}  {} files",
            path.display().to_string().green(),
            format_timestamp(*modified).dimmed(),
            content_marker(*content_matched),
            files_considered
        ),
    }
}

fn content_marker(matched: bool) -> &'static str {
    if matched {
        "Y"
    } else {
        "-"
    }
}
