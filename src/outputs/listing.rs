//! Plain-text rendering of the article list.

use crate::models::{ArticleList, ArticleRecord};
use crate::utils::{display_date, join_authors};
use std::fmt::Write;

/// Message shown in place of an empty list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    /// The fetch ran but produced nothing, or failed.
    NoNewsFound,
    /// No fetch was attempted because the network was unavailable.
    NoConnection,
}

impl EmptyState {
    pub fn message(self) -> &'static str {
        match self {
            EmptyState::NoNewsFound => "No news found.",
            EmptyState::NoConnection => "No internet connection.",
        }
    }
}

/// Render `list`, numbering entries from 1, or the empty-state message.
pub fn render(list: &ArticleList, empty: EmptyState) -> String {
    if list.is_empty() {
        return format!("{}\n", empty.message());
    }

    let mut out = String::new();
    for (i, article) in list.iter().enumerate() {
        render_item(&mut out, i + 1, article);
    }
    out
}

fn render_item(out: &mut String, number: usize, article: &ArticleRecord) {
    writeln!(out, "{number:>3}. {}", article.title()).unwrap();

    let authors = join_authors(article.authors());
    let date = display_date(article.publication_date());
    if authors.is_empty() {
        writeln!(out, "     {} | {}", article.section(), date).unwrap();
    } else {
        writeln!(out, "     {} | {} | {}", authors, article.section(), date).unwrap();
    }
}
