//! Table locator: find the one grid in a parsed document that matches a
//! structural predicate.
//!
//! The predicate is a value, not a hard-coded class list, so new source
//! formats can supply their own locator without touching the downstream
//! stages. Candidates are scanned in document order and the FIRST match
//! wins; zero matches is fatal for the run, because there is nothing
//! sensible to extract.

use std::fmt;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

use crate::error::{EtlError, Result};

/// The raw text grid of one located table.
///
/// Rows hold the whitespace-collapsed text of each `<td>` cell, in document
/// order. Header rows made of `<th>` cells carry no `<td>` children and are
/// excluded here; the projector guards against header text that leaks into
/// the data rows anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTable {
    pub rows: Vec<Vec<String>>,
}

/// Structural predicate over a table-like node's tag name, attribute set,
/// and document-order position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TableLocator {
    /// The node's `class` attribute contains every listed token.
    WithClasses(Vec<String>),
    /// The n-th `<table>` in document order, 0-based.
    Nth(usize),
    /// The first `<tbody>` grid in the document.
    FirstBody,
}

impl TableLocator {
    /// Convenience constructor for the common "all of these class tokens"
    /// signature.
    pub fn with_classes<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        TableLocator::WithClasses(tokens.into_iter().map(Into::into).collect())
    }

    /// Pure membership test over one candidate node.
    pub fn matches(&self, index: usize, tag: &str, classes: &[String]) -> bool {
        match self {
            TableLocator::WithClasses(tokens) => {
                tag == "table" && tokens.iter().all(|t| classes.iter().any(|c| c == t))
            }
            TableLocator::Nth(n) => tag == "table" && *n == index,
            TableLocator::FirstBody => tag == "tbody" && index == 0,
        }
    }

    /// Tag name of the candidate nodes this locator scans.
    fn candidate_tag(&self) -> &'static str {
        match self {
            TableLocator::FirstBody => "tbody",
            _ => "table",
        }
    }
}

impl fmt::Display for TableLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableLocator::WithClasses(tokens) => write!(f, "table with classes {tokens:?}"),
            TableLocator::Nth(n) => write!(f, "table #{n}"),
            TableLocator::FirstBody => write!(f, "first tbody"),
        }
    }
}

/// Scan the document and return the first grid matching `locator`.
///
/// Pure read over the parsed tree; no side effects.
///
/// # Errors
/// [`EtlError::NotFound`] when no candidate satisfies the predicate.
pub fn locate(document: &Html, locator: &TableLocator) -> Result<RawTable> {
    let candidates = selector(locator.candidate_tag());
    for (index, element) in document.select(&candidates).enumerate() {
        let tag = element.value().name();
        let classes: Vec<String> = element.value().classes().map(str::to_string).collect();
        if locator.matches(index, tag, &classes) {
            return Ok(extract_grid(element));
        }
    }
    Err(EtlError::NotFound(locator.to_string()))
}

/// Read the `<td>` text grid beneath one table-like element.
fn extract_grid(element: ElementRef<'_>) -> RawTable {
    let tr = selector("tr");
    let td = selector("td");
    let mut rows = Vec::new();
    for row in element.select(&tr) {
        let cells: Vec<String> = row.select(&td).map(|c| cell_text(c)).collect();
        if !cells.is_empty() {
            rows.push(cells);
        }
    }
    RawTable { rows }
}

/// Collapse an element's descendant text into one whitespace-normalized
/// string.
fn cell_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(s: &'static str) -> Selector {
    Selector::parse(s).expect("valid selector literal")
}
