//! Built-in line filter assembled from command-line flags.

use linesift_extractor::{LineTransformer, TransformResult};

/// Case conversion applied to kept lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseConversion {
    /// Convert to uppercase
    Upper,
    /// Convert to lowercase
    Lower,
}

/// Substring-based filter with optional trimming and case conversion.
///
/// Steps run in a fixed order: trim, skip empty, include, exclude, case.
#[derive(Debug, Clone, Default)]
pub struct LineFilter {
    include: Vec<String>,
    exclude: Vec<String>,
    ignore_case: bool,
    skip_empty: bool,
    trim: bool,
    case: Option<CaseConversion>,
}

impl LineFilter {
    /// Create a filter that keeps every line unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only lines containing at least one of `patterns`.
    pub fn include(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.include.extend(patterns);
        self
    }

    /// Drop lines containing any of `patterns`.
    pub fn exclude(mut self, patterns: impl IntoIterator<Item = String>) -> Self {
        self.exclude.extend(patterns);
        self
    }

    /// Match patterns case-insensitively.
    pub fn ignore_case(mut self, ignore_case: bool) -> Self {
        self.ignore_case = ignore_case;
        self
    }

    /// Drop lines that are empty (after trimming, if enabled).
    pub fn skip_empty(mut self, skip_empty: bool) -> Self {
        self.skip_empty = skip_empty;
        self
    }

    /// Trim surrounding whitespace before matching and writing.
    pub fn trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    /// Convert the case of kept lines.
    pub fn case(mut self, case: Option<CaseConversion>) -> Self {
        self.case = case;
        self
    }

    /// Lowercase the patterns once so matching doesn't redo it per line.
    pub fn build(mut self) -> Self {
        if self.ignore_case {
            for pattern in self.include.iter_mut().chain(self.exclude.iter_mut()) {
                *pattern = pattern.to_lowercase();
            }
        }
        self
    }

    fn keeps(&self, line: &str) -> bool {
        if self.skip_empty && line.is_empty() {
            return false;
        }

        let folded;
        let haystack = if self.ignore_case {
            folded = line.to_lowercase();
            folded.as_str()
        } else {
            line
        };

        if !self.include.is_empty() && !self.include.iter().any(|p| haystack.contains(p.as_str())) {
            return false;
        }
        !self.exclude.iter().any(|p| haystack.contains(p.as_str()))
    }
}

impl LineTransformer for LineFilter {
    fn transform(&self, line: &str) -> TransformResult {
        let line = if self.trim { line.trim() } else { line };

        if !self.keeps(line) {
            return TransformResult::reject();
        }

        match self.case {
            Some(CaseConversion::Upper) => TransformResult::accept(line.to_uppercase()),
            Some(CaseConversion::Lower) => TransformResult::accept(line.to_lowercase()),
            None => TransformResult::accept(line),
        }
    }
}
