use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::animations::{self, PatternEntry};
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubPattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub problems: Vec<Problem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pattern {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub sub_patterns: Vec<SubPattern>,
}

impl Pattern {
    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        self.sub_patterns.iter().flat_map(|s| s.problems.iter())
    }

    /// The animation this pattern's id is registered under, if any.
    pub fn animation(&self) -> Option<&'static PatternEntry> {
        animations::entry(&self.id)
    }
}

/// Patterns, their subpatterns and the problems filed under each.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub patterns: Vec<Pattern>,
}

/// Numeric ids sort by value, anything else after them in file order.
fn problem_order(p: &Problem) -> (bool, u64) {
    match p.id.trim().parse::<u64>() {
        Ok(n) => (false, n),
        Err(_) => (true, 0),
    }
}

impl Catalog {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let mut patterns: Vec<Pattern> = serde_json::from_str(json)?;
        for sub in patterns.iter_mut().flat_map(|p| p.sub_patterns.iter_mut()) {
            sub.problems.sort_by_key(problem_order);
        }
        Ok(Catalog { patterns })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let catalog = Self::from_json(&json).map_err(|source| Error::Catalog {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(
            path = %path.display(),
            patterns = catalog.patterns.len(),
            problems = catalog.total_problems(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn problems(&self) -> impl Iterator<Item = &Problem> {
        self.patterns.iter().flat_map(Pattern::problems)
    }

    pub fn total_problems(&self) -> usize {
        self.problems().count()
    }

    pub fn problem(&self, id: &str) -> Option<&Problem> {
        self.problems().find(|p| p.id == id)
    }
}
