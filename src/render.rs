//! Issue document rendering.
//!
//! Turns one thread's comment window into a single Markdown document. The
//! renderer is a pure function of its inputs: identical comment lists
//! produce byte-identical documents apart from the generation-timestamp
//! line. Bodies are carried verbatim, with no escaping or truncation, since
//! the documents feed a retrieval index and fidelity matters more than
//! prettiness.

use chrono::{DateTime, Utc};

use crate::models::Comment;

/// Stable document filename for an issue; a function of the issue number only
/// so each run's document replaces the previous one.
pub fn document_filename(issue: u64) -> String {
    format!("issue_{}_latest_comments.md", issue)
}

/// Render the document for one issue thread.
///
/// Returns `None` for an empty comment list: an empty document is not a
/// valid document, and the caller must skip the write so any previously
/// rendered content survives.
pub fn render_document(
    issue: u64,
    repo: &str,
    comments: &[Comment],
    generated_at: DateTime<Utc>,
) -> Option<String> {
    if comments.is_empty() {
        return None;
    }

    let mut doc = String::new();

    doc.push_str(&format!("# Issue #{} - Latest Comments\n\n", issue));
    doc.push_str(&format!("**Repository**: {}  \n", repo));
    doc.push_str(&format!(
        "**Generated**: {}  \n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push_str(&format!("**Comment count**: {}\n\n", comments.len()));
    doc.push_str("---\n\n## Comments\n\n");

    for (i, comment) in comments.iter().enumerate() {
        doc.push_str(&format!("### Comment #{}\n\n", i + 1));
        doc.push_str(&format!("**Issue**: #{}  \n", issue));
        doc.push_str(&format!("**Author**: @{}  \n", comment.author));
        doc.push_str(&format!("**Date**: {}  \n", comment.created_at));
        doc.push_str(&format!("**URL**: {}\n\n", comment.url));
        doc.push_str(&comment.body);
        doc.push_str("\n\n---\n\n");
    }

    Some(doc)
}
