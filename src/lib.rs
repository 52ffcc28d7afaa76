pub mod cli;
pub mod error;
pub mod ignore;
pub mod matcher;
pub mod processor;
pub mod progress;
pub mod record;
pub mod request;
pub mod search;
pub mod session;
pub mod state;
pub mod walker;

pub use crate::error::{GrepperError, Result};
pub use crate::matcher::{Matcher, PatternSpec};
pub use crate::progress::{status_line, ProgressSnapshot};
pub use crate::record::{format_size, format_timestamp, MatchRecord};
pub use crate::request::{SearchMode, SearchRequest};
pub use crate::session::{SearchSession, SessionControl};
pub use crate::state::ExecutionState;
