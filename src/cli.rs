use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::matcher::PatternSpec;
use crate::request::{SearchMode, SearchRequest};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Base directory to search
    #[clap(default_value = ".")]
    pub path: PathBuf,

    /// Semicolon-separated globs to include (e.g. *.rs;*.toml)
    #[clap(long, value_parser)]
    pub include: Option<String>,

    /// Semicolon-separated globs to exclude (e.g. .git;target;*.png)
    #[clap(long, value_parser)]
    pub exclude: Option<String>,

    /// Skip files larger than this size in MB; 0 means unlimited
    #[clap(long, value_parser)]
    pub max_size: Option<f64>,

    /// Maximum folder depth below the base directory
    #[clap(long, value_parser)]
    pub max_depth: Option<usize>,

    /// Scan hidden files and folders
    #[clap(long, value_parser, default_value_t = false)]
    pub hidden: bool,

    /// Ignore .gitignore rules in the base directory
    #[clap(long, value_parser, default_value_t = false)]
    pub no_ignore: bool,

    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search file contents for a pattern
    Text {
        pattern: String,

        /// Treat the pattern as a regular expression
        #[clap(long, value_parser, default_value_t = false)]
        regex: bool,

        /// Match case exactly
        #[clap(long, value_parser, default_value_t = false)]
        case_sensitive: bool,

        /// Match whole words only
        #[clap(long, value_parser, default_value_t = false)]
        word: bool,

        /// Report only the first matching line of each file
        #[clap(long, value_parser, default_value_t = false)]
        first_match: bool,

        /// Only scan files with this suffix (e.g. .rs)
        #[clap(long, value_parser)]
        filetype: Option<String>,

        /// Use the native scanner even when rg is installed
        #[clap(long, value_parser, default_value_t = false)]
        no_ripgrep: bool,
    },
    /// Search for files by name
    Files {
        pattern: String,

        /// Treat the pattern as a regular expression
        #[clap(long, value_parser, default_value_t = false)]
        regex: bool,

        /// Match case exactly
        #[clap(long, value_parser, default_value_t = false)]
        case_sensitive: bool,

        /// Match whole words only
        #[clap(long, value_parser, default_value_t = false)]
        word: bool,

        /// Keep only files whose content matches this pattern
        #[clap(long, value_parser)]
        content: Option<String>,

        /// Treat the content pattern as a regular expression
        #[clap(long, value_parser, default_value_t = false)]
        content_regex: bool,

        /// Match the content pattern's case exactly
        #[clap(long, value_parser, default_value_t = false)]
        content_case_sensitive: bool,

        /// Match the content pattern against whole words only
        #[clap(long, value_parser, default_value_t = false)]
        content_word: bool,
    },
    /// Search for folders by name
    Folders {
        pattern: String,

        /// Treat the pattern as a regular expression
        #[clap(long, value_parser, default_value_t = false)]
        regex: bool,

        /// Match case exactly
        #[clap(long, value_parser, default_value_t = false)]
        case_sensitive: bool,

        /// Match whole words only
        #[clap(long, value_parser, default_value_t = false)]
        word: bool,

        /// Keep only folders containing a file whose content matches
        #[clap(long, value_parser)]
        content: Option<String>,

        /// Treat the content pattern as a regular expression
        #[clap(long, value_parser, default_value_t = false)]
        content_regex: bool,

        /// Match the content pattern's case exactly
        #[clap(long, value_parser, default_value_t = false)]
        content_case_sensitive: bool,

        /// Match the content pattern against whole words only
        #[clap(long, value_parser, default_value_t = false)]
        content_word: bool,
    },
}

impl Cli {
    pub fn mode(&self) -> SearchMode {
        match self.command {
            Commands::Text { .. } => SearchMode::Content,
            Commands::Files { .. } => SearchMode::FileName,
            Commands::Folders { .. } => SearchMode::FolderName,
        }
    }

    /// Builds the engine request this invocation describes.
    pub fn to_request(&self) -> SearchRequest {
        let mut request = SearchRequest {
            root: self.path.clone(),
            mode: self.mode(),
            include_globs: split_globs(self.include.as_deref()),
            exclude_globs: split_globs(self.exclude.as_deref()),
            max_file_size: self.max_size.and_then(megabytes_to_bytes),
            depth_limit: self.max_depth,
            skip_hidden: !self.hidden,
            respect_ignore_rules: !self.no_ignore,
            ..SearchRequest::default()
        };
        match &self.command {
            Commands::Text {
                pattern,
                regex,
                case_sensitive,
                word,
                first_match,
                filetype,
                no_ripgrep,
            } => {
                request.pattern = PatternSpec {
                    text: pattern.clone(),
                    is_regex: *regex,
                    case_sensitive: *case_sensitive,
                    whole_word: *word,
                };
                request.first_match_per_file = *first_match;
                request.file_type = filetype.clone();
                request.use_ripgrep = !*no_ripgrep;
            }
            Commands::Files {
                pattern,
                regex,
                case_sensitive,
                word,
                content,
                content_regex,
                content_case_sensitive,
                content_word,
            }
            | Commands::Folders {
                pattern,
                regex,
                case_sensitive,
                word,
                content,
                content_regex,
                content_case_sensitive,
                content_word,
            } => {
                request.pattern = PatternSpec {
                    text: pattern.clone(),
                    is_regex: *regex,
                    case_sensitive: *case_sensitive,
                    whole_word: *word,
                };
                request.content_filter = content.as_ref().map(|text| PatternSpec {
                    text: text.clone(),
                    is_regex: *content_regex,
                    case_sensitive: *content_case_sensitive,
                    whole_word: *content_word,
                });
            }
        }
        request
    }
}

/// Splits a semicolon-separated glob list, dropping empty segments.
pub fn split_globs(text: Option<&str>) -> Vec<String> {
    text.map(|text| {
        text.split(';')
            .map(str::trim)
            .filter(|glob| !glob.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// A non-positive size means no cap.
fn megabytes_to_bytes(megabytes: f64) -> Option<u64> {
    if megabytes > 0.0 {
        Some((megabytes * 1024.0 * 1024.0) as u64)
    } else {
        None
    }
}
