//! Transform families: a canonical document plus its environment overlays.
//!
//! For pattern `app.*.config` the family is `app.config` followed by every
//! `app.<token>.config` in the same directory. Each document is merged on its
//! own, gets its types back from a baseline captured before the loop, and is
//! emitted under naming derived from its token.

use globset::{Glob, GlobMatcher};
use regex_lite::Regex;
use std::path::PathBuf;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::config::OutputSettings;
use crate::error::MigrateError;
use crate::extract::{Dialect, ExtractError, Extractor};
use crate::merge::SettingsMap;

/// One member document of a family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyDocument {
    pub path: PathBuf,
    /// Empty for the canonical document.
    pub token: String,
}

impl FamilyDocument {
    pub fn is_canonical(&self) -> bool {
        self.token.is_empty()
    }
}

/// A directory plus a single-wildcard file name pattern.
#[derive(Debug, Clone)]
pub struct TransformFamily {
    dir: PathBuf,
    pattern: String,
    matcher: GlobMatcher,
    token_re: Regex,
}

impl TransformFamily {
    pub fn new(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Result<Self, MigrateError> {
        let pattern = pattern.into();
        let matcher = Glob::new(&pattern)
            .map_err(|source| MigrateError::Pattern {
                pattern: pattern.clone(),
                source,
            })?
            .compile_matcher();
        let token_re = Regex::new(&token_pattern(&pattern)).map_err(ExtractError::from)?;

        Ok(Self {
            dir: dir.into(),
            pattern,
            matcher,
            token_re,
        })
    }

    /// File name of the canonical document (`app.*.config` -> `app.config`).
    pub fn canonical_file_name(&self) -> String {
        self.pattern.replace("*.", "")
    }

    /// Transform token captured from `file_name`; empty when it does not fit
    /// the pattern.
    pub fn token(&self, file_name: &str) -> String {
        self.token_re
            .captures(file_name)
            .and_then(|caps| caps.get(1))
            .map_or_else(String::new, |m| m.as_str().to_string())
    }

    /// Canonical document first, then matching siblings sorted by file name.
    ///
    /// A missing canonical document is fatal for the family.
    pub fn documents(&self) -> Result<Vec<FamilyDocument>, MigrateError> {
        let canonical_name = self.canonical_file_name();
        let canonical = self.dir.join(&canonical_name);
        if !canonical.is_file() {
            return Err(MigrateError::MissingDocument(canonical));
        }

        let mut documents = vec![FamilyDocument {
            path: canonical,
            token: String::new(),
        }];

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| MigrateError::Walk {
                path: self.dir.clone(),
                source,
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            let file_name = entry.file_name().to_string_lossy();
            if file_name == canonical_name || !self.matcher.is_match(&*file_name) {
                continue;
            }
            // An empty token would collide with the canonical outputs
            let token = self.token(&file_name);
            if token.is_empty() {
                debug!(file = %file_name, "skipping family member without a token");
                continue;
            }
            documents.push(FamilyDocument {
                token,
                path: entry.path().to_path_buf(),
            });
        }

        debug!(
            dir = %self.dir.display(),
            pattern = %self.pattern,
            count = documents.len(),
            "enumerated transform family"
        );
        Ok(documents)
    }
}

/// Regex capturing the `*` of a file name pattern; the rest is literal.
fn token_pattern(pattern: &str) -> String {
    let parts: Vec<String> = pattern.split('*').map(regex_lite::escape).collect();
    format!("^{}$", parts.join(r"(\S*)"))
}

/// State captured before a family run.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub settings: SettingsMap,
    pub output: OutputSettings,
}

/// Everything needed to emit one family document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformContext {
    pub token: String,
    pub document: PathBuf,
    pub output: OutputSettings,
    pub settings: SettingsMap,
}

impl Baseline {
    pub fn new(settings: SettingsMap, output: OutputSettings) -> Self {
        Self { settings, output }
    }

    /// Build the context for one document from its text.
    ///
    /// The document is merged into a fresh map in reset mode, then its types
    /// are restored from the baseline.
    pub fn context(
        &self,
        document: &FamilyDocument,
        text: &str,
        extractor: &dyn Extractor,
        section: Option<&str>,
        group_into_folders: bool,
    ) -> Result<TransformContext, ExtractError> {
        let mut settings = SettingsMap::new();
        let matches = extractor.extract(text, Dialect::Configuration, section)?;
        settings.ingest(matches, Dialect::Configuration.type_origin(), true);
        settings.restore_types(&self.settings);

        info!(
            document = %document.path.display(),
            token = %document.token,
            settings = settings.len(),
            "prepared transform"
        );

        Ok(TransformContext {
            token: document.token.clone(),
            document: document.path.clone(),
            output: self.output.for_transform(&document.token, group_into_folders),
            settings,
        })
    }
}
