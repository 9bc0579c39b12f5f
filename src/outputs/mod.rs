//! Consumers of fetched article records.
//!
//! - [`listing`]: renders the article list for the terminal
//! - [`json`]: writes the records of a fetch to a JSON file
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── games_newest.json
//!     └── zelda-breath_relevance.json
//! ```

pub mod json;
pub mod listing;
