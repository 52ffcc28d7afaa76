//! Content search through an external `rg` process.
//!
//! The child runs with `--json`; match and summary messages come back on
//! stdout, one JSON object per line. Anything rg writes to stderr is
//! forwarded to the log stream once the run ends.

use super::{SearchContext, PAUSE_POLL};
use crate::error::{GrepperError, Result};
use crate::processor::LossyLines;
use crate::record::MatchRecord;
use serde::Deserialize;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: Payload,
}

#[derive(Debug, Default, Deserialize)]
struct Payload {
    path: Option<TextField>,
    line_number: Option<u64>,
    lines: Option<TextField>,
    stats: Option<Stats>,
}

#[derive(Debug, Deserialize)]
struct TextField {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Stats {
    files_searched: Option<u64>,
}

/// Spawns rg and pumps its output into the session channels. Only a
/// failed spawn is an error; the caller falls back to the native
/// scanner on it.
pub(super) fn run(ctx: &SearchContext, rg: &Path) -> Result<()> {
    ctx.log("Using ripgrep (rg) backend.");
    let mut command = build_command(ctx, rg);
    log::debug!("spawning {command:?}");
    let mut child = command
        .spawn()
        .map_err(|e| GrepperError::BackendUnavailable(e.to_string()))?;

    let stdout = child.stdout.take();
    // stderr is drained on the side so a chatty rg cannot stall on a
    // full pipe while we read stdout
    let stderr_pump = child.stderr.take().map(|stream| {
        thread::spawn(move || {
            let mut buf = String::new();
            let _ = BufReader::new(stream).read_to_string(&mut buf);
            buf
        })
    });

    let mut files_searched = None;
    if let Some(stdout) = stdout {
        for line in LossyLines::new(BufReader::new(stdout)) {
            if !ctx.checkpoint(PAUSE_POLL) {
                break;
            }
            let line = match line {
                Ok(line) => line,
                Err(_) => break,
            };
            let message: Envelope = match serde_json::from_str(&line) {
                Ok(message) => message,
                Err(_) => continue,
            };
            match message.kind.as_str() {
                "match" => {
                    let Payload {
                        path,
                        line_number,
                        lines,
                        ..
                    } = message.data;
                    let path = path.and_then(|field| field.text);
                    if let (Some(path), Some(line_number)) = (path, line_number) {
                        let text = lines.and_then(|field| field.text).unwrap_or_default();
                        ctx.state.add_matched(1);
                        ctx.emit(MatchRecord::Content {
                            path: PathBuf::from(path),
                            line_number,
                            line: text.trim_end_matches(['\n', '\r']).to_string(),
                        });
                    }
                }
                "summary" => {
                    files_searched = message.data.stats.and_then(|stats| stats.files_searched);
                }
                _ => {}
            }
        }
    }

    if ctx.state.is_cancelled() {
        let _ = child.kill();
    }
    let _ = child.wait();

    if let Some(pump) = stderr_pump {
        if let Ok(captured) = pump.join() {
            // rg reports unreadable entries here even when it exits 0
            for line in captured.lines().filter(|line| !line.trim().is_empty()) {
                ctx.log(line.to_string());
            }
        }
    }

    if let Some(total) = files_searched {
        ctx.state.set_scanned(total);
    }
    Ok(())
}

fn build_command(ctx: &SearchContext, rg: &Path) -> Command {
    let req = &ctx.request;
    let mut command = Command::new(rg);
    command.arg("--json");
    if !req.pattern.is_regex {
        command.arg("-F");
    }
    if !req.pattern.case_sensitive {
        command.arg("-i");
    }
    if req.pattern.whole_word {
        command.arg("-w");
    }
    if req.first_match_per_file {
        command.args(["-m", "1"]);
    }
    if let Some(limit) = req.depth_limit {
        command.arg("--max-depth").arg(limit.to_string());
    }
    if let Some(cap) = req.max_file_size {
        command.arg("--max-filesize").arg(cap.to_string());
    }
    if !req.skip_hidden {
        command.arg("--hidden");
    }
    if !req.respect_ignore_rules {
        command.arg("--no-ignore");
    }
    if let Some(suffix) = &req.file_type {
        command.arg("--glob").arg(format!("*{suffix}"));
    }
    for glob in &req.include_globs {
        command.arg("--glob").arg(glob);
    }
    for glob in &req.exclude_globs {
        if glob.is_empty() {
            continue;
        }
        command.arg("--glob").arg(format!("!{glob}"));
        // a bare name also excludes any directory subtree of that name
        if !glob.contains(['*', '?', '[', '/', '\\']) {
            command.arg("--glob").arg(format!("!**/{glob}/**"));
        }
    }
    command.arg("--").arg(&req.pattern.text).arg(&req.root);
    command
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    command
}
