//! One merge session: load documents, merge, emit.
//!
//! A session owns its settings map and output naming. Typical use:
//!
//! ```no_run
//! use settings_migrate::{ConfigSession, OutputSettings, PathResolver};
//! use settings_formatter::TypeTable;
//!
//! # fn main() -> Result<(), settings_migrate::MigrateError> {
//! let mut session = ConfigSession::new(
//!     PathResolver::new("legacy"),
//!     OutputSettings::in_dir("out/Shop"),
//!     TypeTable::builtin(),
//! )?;
//! session
//!     .load_settings("Shop/Properties/Settings.settings", true)?
//!     .load_config("Shop/app.config", Some("Shop.Properties.Settings"), true)?
//!     .load_config("WebSite/Web.config", Some("Shop.Properties.Settings"), false)?;
//! session.create_files()?;
//! # Ok(())
//! # }
//! ```

use settings_formatter::TypeTable;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::OutputSettings;
use crate::emit::{self, Emission};
use crate::error::MigrateError;
use crate::extract::{Dialect, Extractor, RegexExtractor};
use crate::merge::SettingsMap;
use crate::paths::PathResolver;
use crate::transform::{Baseline, TransformFamily};

/// A merge session over one settings map.
pub struct ConfigSession {
    resolver: PathResolver,
    output: OutputSettings,
    table: TypeTable,
    extractor: Box<dyn Extractor>,
    settings: SettingsMap,
    console: Box<dyn Write>,
    emissions: Vec<Emission>,
}

impl ConfigSession {
    /// Session using the regex extractor and standard output as console.
    pub fn new(
        resolver: PathResolver,
        output: OutputSettings,
        table: TypeTable,
    ) -> Result<Self, MigrateError> {
        Ok(Self {
            resolver,
            output,
            table,
            extractor: Box::new(RegexExtractor::new()?),
            settings: SettingsMap::new(),
            console: Box::new(io::stdout()),
            emissions: Vec::new(),
        })
    }

    pub fn with_extractor(mut self, extractor: impl Extractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    /// Sink for the unhandled-settings report.
    pub fn with_console(mut self, console: impl Write + 'static) -> Self {
        self.console = Box::new(console);
        self
    }

    pub fn settings(&self) -> &SettingsMap {
        &self.settings
    }

    pub fn output(&self) -> &OutputSettings {
        &self.output
    }

    /// Emissions produced so far, in order.
    pub fn emissions(&self) -> &[Emission] {
        &self.emissions
    }

    pub fn into_emissions(self) -> Vec<Emission> {
        self.emissions
    }

    /// Merge a settings-definition document.
    pub fn load_settings(
        &mut self,
        relative_path: &str,
        reset_values: bool,
    ) -> Result<&mut Self, MigrateError> {
        let path = self.resolver.resolve(relative_path);
        self.load_document(&path, Dialect::SettingsDefinition, None, reset_values)?;
        Ok(self)
    }

    /// Merge a configuration document, optionally scoped to a section.
    pub fn load_config(
        &mut self,
        relative_path: &str,
        section: Option<&str>,
        reset_values: bool,
    ) -> Result<&mut Self, MigrateError> {
        let path = self.resolver.resolve(relative_path);
        self.load_document(&path, Dialect::Configuration, section, reset_values)?;
        Ok(self)
    }

    fn load_document(
        &mut self,
        path: &Path,
        dialect: Dialect,
        section: Option<&str>,
        reset_values: bool,
    ) -> Result<(), MigrateError> {
        let text = read_document(path)?;
        let matches = self.extractor.extract(&text, dialect, section)?;
        if matches.is_empty() {
            warn!(path = %path.display(), ?dialect, section = section.unwrap_or(""), "no settings found");
        }
        info!(
            path = %path.display(),
            ?dialect,
            reset_values,
            matched = matches.len(),
            "loaded document"
        );
        self.settings
            .ingest(matches, dialect.type_origin(), reset_values);
        Ok(())
    }

    /// Render the current map and write the enabled artifacts.
    pub fn create_files(&mut self) -> Result<Emission, MigrateError> {
        let emission = emit_target(
            &self.settings,
            &self.output,
            &self.table,
            self.console.as_mut(),
            None,
        )?;
        self.emissions.push(emission.clone());
        Ok(emission)
    }

    /// Emit one output set per document of the family `directory/pattern`.
    ///
    /// Types come from the map as it stands before the call. The session's
    /// own map and output naming are left unchanged.
    pub fn load_config_transformations(
        &mut self,
        relative_directory: &str,
        pattern: &str,
        section: Option<&str>,
        group_into_folders: bool,
    ) -> Result<Vec<Emission>, MigrateError> {
        let family = TransformFamily::new(self.resolver.resolve(relative_directory), pattern)?;
        let baseline = Baseline::new(self.settings.clone(), self.output.clone());
        let mut emissions = Vec::new();

        for document in family.documents()? {
            let text = read_document(&document.path)?;
            let context = baseline.context(
                &document,
                &text,
                self.extractor.as_ref(),
                section,
                group_into_folders,
            )?;
            let emission = emit_target(
                &context.settings,
                &context.output,
                &self.table,
                self.console.as_mut(),
                Some(context.token),
            )?;
            emissions.push(emission);
        }

        self.emissions.extend(emissions.iter().cloned());
        Ok(emissions)
    }

    /// Diagnostics text for the current map; empty when nothing is unhandled.
    pub fn unhandled_report(&self) -> Result<String, MigrateError> {
        Ok(emit::render(&self.settings, &self.output, &self.table)?.diagnostics)
    }
}

/// Read a document, honouring a UTF-8 or UTF-16 byte-order mark.
///
/// Documents without a BOM are read as UTF-8; malformed sequences are
/// replaced rather than rejected.
fn read_document(path: &Path) -> Result<String, MigrateError> {
    if !path.is_file() {
        return Err(MigrateError::MissingDocument(path.to_path_buf()));
    }
    let bytes = fs::read(path).map_err(|source| MigrateError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let (text, encoding, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        warn!(
            path = %path.display(),
            encoding = encoding.name(),
            "replaced malformed byte sequences"
        );
    }
    Ok(text.into_owned())
}

fn emit_target(
    settings: &SettingsMap,
    output: &OutputSettings,
    table: &TypeTable,
    console: &mut dyn Write,
    transform: Option<String>,
) -> Result<Emission, MigrateError> {
    let rendered = emit::render(settings, output, table)?;
    let written = emit::write_artifacts(&rendered, output)?;

    if output.inform_about_unhandled && !rendered.diagnostics.is_empty() {
        console
            .write_all(rendered.diagnostics.as_bytes())
            .and_then(|()| console.flush())
            .map_err(|source| MigrateError::Write {
                path: PathBuf::from("<console>"),
                source,
            })?;
    }

    info!(
        output_dir = %output.output_dir.display(),
        representable = rendered.representable.len(),
        unhandled = rendered.unhandled.len(),
        "emitted outputs"
    );

    Ok(Emission {
        transform,
        output_dir: output.output_dir.clone(),
        written,
        representable: rendered.representable.len(),
        unhandled: rendered.unhandled.into_iter().collect(),
    })
}
