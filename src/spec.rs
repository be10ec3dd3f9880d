//! Spec repository loading.
//!
//! The Mustache spec corpus is one YAML file per feature group under a spec
//! root (typically a `spec/specs/` checkout of the upstream repository). The
//! corpus is an optional external resource: an absent file means the group
//! is skipped, never failed.
//!
//! Records are loaded at most once per (root, group) for the lifetime of the
//! process and served from a cache thereafter. The run is short-lived, so
//! the cache has no teardown.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::errors::HarnessError;
use crate::value::Value;

/// The upstream `~lambdas.yml` tags each fixture mapping with a custom
/// `!code` scalar tag. Stripping the tag (with its trailing newline, exactly
/// as it appears in the file) lets the generic YAML parser accept the
/// fixture as plain string data. No other content is touched.
const CODE_TAG_MARKER: &str = " !code\n";

/// A named feature area of the Mustache spec, one file per group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpecGroup {
    Comments,
    Delimiters,
    Interpolation,
    Inverted,
    Lambdas,
    Partials,
    Sections,
}

impl SpecGroup {
    /// All spec groups, in reporting order.
    pub const ALL: [SpecGroup; 7] = [
        SpecGroup::Comments,
        SpecGroup::Delimiters,
        SpecGroup::Interpolation,
        SpecGroup::Inverted,
        SpecGroup::Lambdas,
        SpecGroup::Partials,
        SpecGroup::Sections,
    ];

    /// The group's display name.
    pub fn name(self) -> &'static str {
        match self {
            SpecGroup::Comments => "comments",
            SpecGroup::Delimiters => "delimiters",
            SpecGroup::Interpolation => "interpolation",
            SpecGroup::Inverted => "inverted",
            SpecGroup::Lambdas => "lambdas",
            SpecGroup::Partials => "partials",
            SpecGroup::Sections => "sections",
        }
    }

    /// The file stem under the spec root. Optional groups carry a tilde
    /// prefix upstream.
    pub fn file_stem(self) -> &'static str {
        match self {
            SpecGroup::Lambdas => "~lambdas",
            other => other.name(),
        }
    }

    /// True for the group whose fixtures embed per-implementation code
    /// fragments. Its file needs the `!code` tag stripped before parsing,
    /// and its cases need lambda binding before execution.
    pub fn uses_lambdas(self) -> bool {
        matches!(self, SpecGroup::Lambdas)
    }

    /// The group's spec file path under `root`.
    pub fn path_in(self, root: &Path) -> PathBuf {
        root.join(format!("{}.yml", self.file_stem()))
    }
}

impl fmt::Display for SpecGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One test definition from a spec group file.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecRecord {
    pub name: String,
    pub desc: String,
    pub template: String,
    pub partials: HashMap<String, String>,
    pub data: Value,
    pub expected: String,
}

/// Wire shape of a group file: records live under a top-level `tests` key.
#[derive(Deserialize)]
struct SpecFile {
    tests: Vec<RawRecord>,
}

/// Wire shape of a single record. Missing required fields fail
/// deserialization, which aborts the whole group (malformed-record
/// condition).
#[derive(Deserialize)]
struct RawRecord {
    name: String,
    desc: String,
    template: String,
    #[serde(default)]
    partials: HashMap<String, String>,
    data: serde_yaml::Value,
    expected: String,
}

type CacheKey = (PathBuf, SpecGroup);

static RECORD_CACHE: Lazy<Mutex<HashMap<CacheKey, Arc<Vec<SpecRecord>>>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Loads a group's records from the spec root, in file order.
///
/// Returns `Ok(None)` when the group's file does not exist: the corpus may
/// simply not be checked out, and the caller reports the group skipped.
///
/// # Errors
///
/// Fails when the file cannot be read, is not valid YAML, a record is
/// missing a required field, or a record's data tree is not representable.
/// All of these abort the group's remaining records but not other groups.
pub fn load_records(
    root: &Path,
    group: SpecGroup,
) -> Result<Option<Arc<Vec<SpecRecord>>>, HarnessError> {
    let path = group.path_in(root);
    if !path.exists() {
        return Ok(None);
    }

    // Canonicalize so two spellings of the same root share a cache entry.
    let key = (path.canonicalize().unwrap_or_else(|_| path.clone()), group);
    {
        let cache = RECORD_CACHE.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(records) = cache.get(&key) {
            return Ok(Some(Arc::clone(records)));
        }
    }

    let records = Arc::new(parse_group_file(&path, group)?);
    RECORD_CACHE
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .insert(key, Arc::clone(&records));
    Ok(Some(records))
}

fn parse_group_file(path: &Path, group: SpecGroup) -> Result<Vec<SpecRecord>, HarnessError> {
    let mut raw = fs::read_to_string(path).map_err(|source| HarnessError::SpecUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    if group.uses_lambdas() {
        raw = raw.replace(CODE_TAG_MARKER, "\n");
    }

    let file: SpecFile =
        serde_yaml::from_str(&raw).map_err(|e| HarnessError::MalformedRecord {
            group: group.name(),
            detail: e.to_string(),
        })?;

    let mut records = Vec::with_capacity(file.tests.len());
    for record in file.tests {
        let data = Value::from_yaml(&record.data).map_err(|e| HarnessError::MalformedRecord {
            group: group.name(),
            detail: format!("record '{}': {e}", record.name),
        })?;
        records.push(SpecRecord {
            name: record.name,
            desc: record.desc,
            template: record.template,
            partials: record.partials,
            data,
            expected: record.expected,
        });
    }
    Ok(records)
}
