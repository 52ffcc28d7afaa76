//! Native content search: walks the tree and scans file lines.

use super::{NameFilters, SearchContext, LINE_PAUSE_POLL, PAUSE_POLL};
use crate::matcher::Matcher;
use crate::processor::{self, LossyLines};
use crate::record::MatchRecord;
use crate::walker::Walker;
use std::fs;
use std::path::Path;

pub(super) fn run(ctx: &SearchContext) {
    let req = &ctx.request;
    let matcher = match Matcher::compile(&req.pattern) {
        Ok(matcher) => matcher,
        Err(e) => {
            ctx.log(format!("Invalid regex: {e}"));
            return;
        }
    };
    let filters = match NameFilters::compile(req) {
        Ok(filters) => filters,
        Err(e) => {
            ctx.log(e.to_string());
            return;
        }
    };
    let rules = super::ignore_rules(req);
    let mut walker = Walker::new(&req.root, req.depth_limit, req.skip_hidden, &rules);

    while let Some(batch) = walker.next_batch() {
        if ctx.state.is_cancelled() {
            break;
        }
        let mut batch = match batch {
            Ok(batch) => batch,
            Err(e) => {
                ctx.log(e.to_string());
                continue;
            }
        };
        batch.subdirs.retain(|name| !filters.excludes_dir(name));
        ctx.log(format!("Scanning: {}", batch.dir.display()));

        for name in &batch.files {
            if !ctx.checkpoint(PAUSE_POLL) {
                break;
            }
            if let Some(suffix) = &req.file_type {
                if !name.ends_with(suffix.as_str()) {
                    continue;
                }
            }
            if !filters.accepts_file(name) {
                continue;
            }
            let path = batch.dir.join(name);
            let size = match fs::metadata(&path) {
                Ok(meta) => meta.len(),
                Err(_) => continue,
            };
            if req.max_file_size.is_some_and(|cap| size > cap) {
                continue;
            }
            ctx.state.add_scanned(1);
            if processor::is_binary(&path) {
                continue;
            }
            scan_file(ctx, &matcher, &path, req.first_match_per_file);
        }
        walker.descend(&batch);
    }
}

fn scan_file(ctx: &SearchContext, matcher: &Matcher, path: &Path, first_match: bool) {
    let lines = match LossyLines::open(path) {
        Ok(lines) => lines,
        Err(e) => {
            ctx.log(format!("Error reading {}: {e}", path.display()));
            return;
        }
    };
    for (index, line) in lines.enumerate() {
        if !ctx.checkpoint(LINE_PAUSE_POLL) {
            return;
        }
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                ctx.log(format!("Error reading {}: {e}", path.display()));
                return;
            }
        };
        if matcher.is_match(&line) {
            ctx.state.add_matched(1);
            ctx.emit(MatchRecord::Content {
                path: path.to_path_buf(),
                line_number: (index + 1) as u64,
                line,
            });
            if first_match {
                return;
            }
        }
    }
}
