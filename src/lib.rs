pub mod cli;
pub mod run;
pub mod search;

pub use run::{run_once, RunSummary};
pub use search::{search_comments, search_posts, COMMENT_SCAN_LIMIT, POST_SEARCH_LIMIT};
