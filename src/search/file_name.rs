//! File name search with an optional content filter.

use super::{file_contains, NameFilters, SearchContext, PAUSE_POLL};
use crate::matcher::Matcher;
use crate::processor;
use crate::record::MatchRecord;
use crate::walker::Walker;
use std::fs;
use std::time::SystemTime;

pub(super) fn run(ctx: &SearchContext) {
    let req = &ctx.request;
    let matcher = match Matcher::compile(&req.pattern) {
        Ok(matcher) => matcher,
        Err(e) => {
            ctx.log(format!("Invalid filename regex: {e}"));
            return;
        }
    };
    let content_filter = match &req.content_filter {
        Some(spec) => match Matcher::compile(spec) {
            Ok(matcher) => Some(matcher),
            Err(e) => {
                ctx.log(format!("Invalid content regex: {e}"));
                return;
            }
        },
        None => None,
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
            if !filters.accepts_file(name) {
                continue;
            }
            let path = batch.dir.join(name);
            let meta = match fs::metadata(&path) {
                Ok(meta) => meta,
                Err(_) => continue,
            };
            let size = meta.len();
            if req.max_file_size.is_some_and(|cap| size > cap) {
                continue;
            }
            ctx.state.add_scanned(1);
            if !matcher.is_match(name) {
                continue;
            }
            if let Some(filter) = &content_filter {
                if processor::is_binary(&path) {
                    continue;
                }
                match file_contains(ctx, filter, &path) {
                    Some(true) => {}
                    Some(false) => continue,
                    None => break,
                }
            }
            ctx.state.add_matched(1);
            let modified = meta.modified().unwrap_or_else(|_| SystemTime::now());
            ctx.emit(MatchRecord::FileName {
                path,
                size,
                modified,
                content_matched: content_filter.is_some(),
            });
        }
        walker.descend(&batch);
    }
}
