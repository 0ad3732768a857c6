//! One-line `sources.list` parsing
//!
//! Accepts the classic APT format:
//!
//! ```text
//! deb [arch=amd64 signed-by=/usr/share/keyrings/x.gpg] http://deb.debian.org/debian bookworm main contrib
//! deb-src http://deb.debian.org/debian bookworm main
//! deb file:/srv/repo ./
//! ```

use crate::error::{ChankoError, ChankoResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Archive type of a source line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceType {
    /// Binary packages
    Deb,
    /// Source packages
    DebSrc,
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Deb => write!(f, "deb"),
            Self::DebSrc => write!(f, "deb-src"),
        }
    }
}

/// A single repository entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub kind: SourceType,
    /// Bracketed `key=value` options
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
    pub uri: String,
    pub suite: String,
    pub components: Vec<String>,
}

impl SourceEntry {
    /// Flat repositories name an exact path (`./`, `dists/x/`) and have no components
    pub fn is_flat(&self) -> bool {
        self.suite.ends_with('/')
    }
}

/// Parse the full content of a sources list
///
/// Blank lines and `#` comments are skipped. Line numbers in errors are
/// 1-based.
pub fn parse_sources_list(content: &str) -> ChankoResult<Vec<SourceEntry>> {
    let mut entries = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        if let Some(entry) = parse_line(raw, idx + 1)? {
            entries.push(entry);
        }
    }

    Ok(entries)
}

fn parse_line(raw: &str, line: usize) -> ChankoResult<Option<SourceEntry>> {
    let text = raw.split('#').next().unwrap_or_default().trim();
    if text.is_empty() {
        return Ok(None);
    }

    let invalid = |reason: &str| ChankoError::SourcesListInvalid {
        line,
        reason: reason.to_string(),
    };

    let mut tokens = text.split_whitespace();

    let kind = match tokens.next() {
        Some("deb") => SourceType::Deb,
        Some("deb-src") => SourceType::DebSrc,
        Some(other) => {
            return Err(invalid(&format!("unknown archive type '{}'", other)));
        }
        None => return Ok(None),
    };

    let mut options = BTreeMap::new();
    let mut next = tokens.next();

    if let Some(first) = next.filter(|t| t.starts_with('[')) {
        let mut body = first.trim_start_matches('[').to_string();
        while !body.ends_with(']') {
            let more = tokens
                .next()
                .ok_or_else(|| invalid("unterminated option list"))?;
            body.push(' ');
            body.push_str(more);
        }
        body.pop();

        for pair in body.split_whitespace() {
            let (key, value) = pair
                .split_once('=')
                .ok_or_else(|| invalid(&format!("option '{}' is not key=value", pair)))?;
            options.insert(key.to_string(), value.to_string());
        }
        next = tokens.next();
    }

    let uri = next.ok_or_else(|| invalid("missing repository URI"))?;
    if !uri.contains(':') {
        return Err(invalid(&format!("'{}' is not a URI", uri)));
    }

    let suite = tokens.next().ok_or_else(|| invalid("missing suite"))?;
    let components: Vec<String> = tokens.map(str::to_string).collect();

    let entry = SourceEntry {
        kind,
        options,
        uri: uri.to_string(),
        suite: suite.to_string(),
        components,
    };

    match (entry.is_flat(), entry.components.is_empty()) {
        (true, false) => Err(invalid("flat repository cannot list components")),
        (false, true) => Err(invalid("missing components")),
        _ => Ok(Some(entry)),
    }
}
