//! Test fixtures: a small legacy source tree and its migration plan.
//!
//! `legacy/CommonLib` holds a settings-definition and its `app.config`;
//! `legacy/WebSite` is an override host with a `Web.*.config` family.

#![allow(dead_code)]

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Root of the fixture source tree
pub fn legacy_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/legacy")
}

/// Path to the fixture migration plan
pub fn plan_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/migrate.toml")
}

/// Console sink that can be inspected after the session has taken it.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Parse a written JSON artifact.
pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e));
    serde_json::from_str(&text)
        .unwrap_or_else(|e| panic!("Invalid JSON in {}: {}\n{}", path.display(), e, text))
}

/// Settings-definition document with the given `(name, type, value)` rows.
pub fn settings_document(rows: &[(&str, &str, &str)]) -> String {
    let mut doc = String::from("<SettingsFile>\n  <Settings>\n");
    for (name, ty, value) in rows {
        doc.push_str(&format!(
            "    <Setting Name=\"{name}\" Type=\"{ty}\" Scope=\"Application\">\n      <Value Profile=\"(Default)\">{value}</Value>\n    </Setting>\n"
        ));
    }
    doc.push_str("  </Settings>\n</SettingsFile>\n");
    doc
}

/// Configuration document with the given `(name, value)` rows inside `section`.
pub fn config_document(section: &str, rows: &[(&str, &str)]) -> String {
    let mut doc = format!("<configuration>\n  <applicationSettings>\n    <{section}>\n");
    for (name, value) in rows {
        doc.push_str(&format!(
            "      <setting name=\"{name}\" serializeAs=\"String\">\n        <value>{value}</value>\n      </setting>\n"
        ));
    }
    doc.push_str(&format!("    </{section}>\n  </applicationSettings>\n</configuration>\n"));
    doc
}
