//! @acp:module "Configuration"
//! @acp:summary "Immutable configuration snapshots, builder and live store"
//! @acp:domain cli
//! @acp:layer config
//!
//! # Configuration
//!
//! - [`ConfigSnapshot`] is read-only; every consumer receives an
//!   `Arc<ConfigSnapshot>` at call time
//! - [`ConfigBuilder`] is the only way to produce a changed snapshot and
//!   validates it on [`ConfigBuilder::build`]
//! - [`ConfigStore`] holds the current snapshot behind an [`ArcSwap`], so a
//!   reader sees either the old or the new snapshot, never a mix
//!
//! Lookup order for [`ConfigSnapshot::load_for`]: explicit path, project
//! `.autodoc.json`, workspace `<config_dir>/autodoc/config.json`, defaults.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::element::{MemberKind, Visibility};
use crate::error::{AutodocError, Result};
use crate::javadoc::CommentMode;
use crate::replacements::{GetSetReplacements, ReplacementRegistry};

/// Project-level configuration file name
pub const PROJECT_CONFIG_FILE: &str = ".autodoc.json";

fn default_true() -> bool {
    true
}

fn default_include() -> Vec<String> {
    vec!["**/*.java".to_string()]
}

fn default_exclude() -> Vec<String> {
    vec![
        // Build outputs
        "**/target/**".to_string(),
        "**/build/**".to_string(),
        "**/out/**".to_string(),
        // Generated sources
        "**/generated/**".to_string(),
        "**/generated-sources/**".to_string(),
        // VCS
        "**/.git/**".to_string(),
        // IDE
        "**/.idea/**".to_string(),
        "**/.gradle/**".to_string(),
    ]
}

fn default_tag_order() -> Vec<String> {
    ["author", "version", "see", "since", "serial", "deprecated"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// @acp:summary "Which visibilities are processed"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisibilityFilter {
    pub public: bool,
    pub protected: bool,
    pub package: bool,
    pub private: bool,
}

impl Default for VisibilityFilter {
    fn default() -> Self {
        Self {
            public: true,
            protected: true,
            package: true,
            private: true,
        }
    }
}

impl VisibilityFilter {
    pub fn includes(&self, visibility: Visibility) -> bool {
        match visibility {
            Visibility::Public => self.public,
            Visibility::Protected => self.protected,
            Visibility::Package => self.package,
            Visibility::Private => self.private,
        }
    }
}

/// @acp:summary "Element kind a template rule applies to"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateKind {
    Type,
    Field,
    Method,
    Parameter,
    Exception,
}

impl TemplateKind {
    pub fn for_member(kind: MemberKind) -> TemplateKind {
        match kind {
            MemberKind::Type | MemberKind::Record => TemplateKind::Type,
            MemberKind::Field => TemplateKind::Field,
            MemberKind::Method => TemplateKind::Method,
            MemberKind::Parameter => TemplateKind::Parameter,
        }
    }
}

/// @acp:summary "Name pattern and handlebars text for one element kind"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRule {
    pub kind: TemplateKind,
    /// Regex matched against the element name; captures become `g1..gN`
    pub pattern: String,
    pub template: String,
}

impl TemplateRule {
    pub fn new(kind: TemplateKind, pattern: &str, template: &str) -> Self {
        Self {
            kind,
            pattern: pattern.to_string(),
            template: template.to_string(),
        }
    }
}

/// @acp:summary "Read-only configuration snapshot"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigSnapshot {
    include: Vec<String>,
    exclude: Vec<String>,
    mode: CommentMode,
    create_dummy_comment: bool,
    getter_setter_from_field: bool,
    getter_setter_first_sentence_only: bool,
    add_missing_period: bool,
    single_line_field_comment: bool,
    markdown_style: bool,
    visibility: VisibilityFilter,
    getters_setters_only: bool,
    tag_order: Vec<String>,
    replacements: ReplacementRegistry,
    get_set_replacements: GetSetReplacements,
    templates: Vec<TemplateRule>,
    #[serde(skip_serializing_if = "Option::is_none")]
    header_template: Option<String>,
    add_header: bool,
    replace_header: bool,
}

impl Default for ConfigSnapshot {
    fn default() -> Self {
        Self {
            include: default_include(),
            exclude: default_exclude(),
            mode: CommentMode::default(),
            create_dummy_comment: default_true(),
            getter_setter_from_field: default_true(),
            getter_setter_first_sentence_only: default_true(),
            add_missing_period: default_true(),
            single_line_field_comment: default_true(),
            markdown_style: false,
            visibility: VisibilityFilter::default(),
            getters_setters_only: false,
            tag_order: default_tag_order(),
            replacements: ReplacementRegistry::defaults(),
            get_set_replacements: GetSetReplacements::defaults(),
            templates: Vec::new(),
            header_template: None,
            add_header: false,
            replace_header: false,
        }
    }
}

impl ConfigSnapshot {
    pub fn include(&self) -> &[String] {
        &self.include
    }

    pub fn exclude(&self) -> &[String] {
        &self.exclude
    }

    pub fn mode(&self) -> CommentMode {
        self.mode
    }

    pub fn create_dummy_comment(&self) -> bool {
        self.create_dummy_comment
    }

    pub fn getter_setter_from_field(&self) -> bool {
        self.getter_setter_from_field
    }

    pub fn getter_setter_first_sentence_only(&self) -> bool {
        self.getter_setter_first_sentence_only
    }

    pub fn add_missing_period(&self) -> bool {
        self.add_missing_period
    }

    pub fn single_line_field_comment(&self) -> bool {
        self.single_line_field_comment
    }

    pub fn markdown_style(&self) -> bool {
        self.markdown_style
    }

    pub fn visibility(&self) -> VisibilityFilter {
        self.visibility
    }

    pub fn getters_setters_only(&self) -> bool {
        self.getters_setters_only
    }

    pub fn tag_order(&self) -> &[String] {
        &self.tag_order
    }

    pub fn replacements(&self) -> &ReplacementRegistry {
        &self.replacements
    }

    pub fn get_set_replacements(&self) -> &GetSetReplacements {
        &self.get_set_replacements
    }

    pub fn templates(&self) -> &[TemplateRule] {
        &self.templates
    }

    pub fn header_template(&self) -> Option<&str> {
        self.header_template.as_deref()
    }

    pub fn add_header(&self) -> bool {
        self.add_header
    }

    pub fn replace_header(&self) -> bool {
        self.replace_header
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Start a builder from this snapshot's values
    pub fn to_builder(&self) -> ConfigBuilder {
        ConfigBuilder {
            inner: self.clone(),
        }
    }

    /// @acp:summary "Load and validate a snapshot from a JSON file"
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let parsed: ConfigSnapshot = serde_json::from_str(&content)?;
        parsed.to_builder().build()
    }

    /// @acp:summary "Save snapshot to a JSON file"
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// @acp:summary "Resolve configuration for a project root"
    ///
    /// Returns the snapshot and the file it came from, if any.
    pub fn load_for(project_root: &Path, explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
        if let Some(path) = explicit {
            return Ok((Self::load(path)?, Some(path.to_path_buf())));
        }

        let candidates = [
            Some(project_root.join(PROJECT_CONFIG_FILE)),
            workspace_config_path(),
        ];
        for path in candidates.into_iter().flatten() {
            if path.is_file() {
                tracing::debug!(path = %path.display(), "loading configuration");
                return Ok((Self::load(&path)?, Some(path)));
            }
        }

        Ok((Self::default(), None))
    }

    /// Flat key/value view with one entry per top-level key
    pub fn to_properties(&self) -> BTreeMap<String, String> {
        let mut properties = BTreeMap::new();
        if let Ok(serde_json::Value::Object(map)) = serde_json::to_value(self) {
            for (key, value) in map {
                let text = match value {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                };
                properties.insert(key, text);
            }
        }
        properties
    }

    fn validate(&self) -> Result<()> {
        let duplicates = self.replacements.duplicates();
        if !duplicates.is_empty() {
            return Err(AutodocError::InvalidConfig(format!(
                "duplicate replacement shortcuts: {}",
                duplicates.join(", ")
            )));
        }

        for rule in &self.templates {
            Regex::new(&rule.pattern).map_err(|e| {
                AutodocError::InvalidConfig(format!("invalid template pattern '{}': {}", rule.pattern, e))
            })?;
        }
        Ok(())
    }
}

/// Workspace-wide configuration file under the user config directory
pub fn workspace_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autodoc").join("config.json"))
}

/// @acp:summary "Mutable builder producing validated snapshots"
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    inner: ConfigSnapshot,
}

impl ConfigBuilder {
    pub fn include(mut self, patterns: Vec<String>) -> Self {
        self.inner.include = patterns;
        self
    }

    pub fn exclude(mut self, patterns: Vec<String>) -> Self {
        self.inner.exclude = patterns;
        self
    }

    pub fn mode(mut self, mode: CommentMode) -> Self {
        self.inner.mode = mode;
        self
    }

    pub fn create_dummy_comment(mut self, enabled: bool) -> Self {
        self.inner.create_dummy_comment = enabled;
        self
    }

    pub fn getter_setter_from_field(mut self, enabled: bool) -> Self {
        self.inner.getter_setter_from_field = enabled;
        self
    }

    pub fn getter_setter_first_sentence_only(mut self, enabled: bool) -> Self {
        self.inner.getter_setter_first_sentence_only = enabled;
        self
    }

    pub fn add_missing_period(mut self, enabled: bool) -> Self {
        self.inner.add_missing_period = enabled;
        self
    }

    pub fn single_line_field_comment(mut self, enabled: bool) -> Self {
        self.inner.single_line_field_comment = enabled;
        self
    }

    pub fn markdown_style(mut self, enabled: bool) -> Self {
        self.inner.markdown_style = enabled;
        self
    }

    pub fn visibility(mut self, filter: VisibilityFilter) -> Self {
        self.inner.visibility = filter;
        self
    }

    pub fn getters_setters_only(mut self, enabled: bool) -> Self {
        self.inner.getters_setters_only = enabled;
        self
    }

    pub fn tag_order(mut self, order: Vec<String>) -> Self {
        self.inner.tag_order = order;
        self
    }

    pub fn replacements(mut self, registry: ReplacementRegistry) -> Self {
        self.inner.replacements = registry;
        self
    }

    pub fn get_set_replacements(mut self, replacements: GetSetReplacements) -> Self {
        self.inner.get_set_replacements = replacements;
        self
    }

    pub fn templates(mut self, templates: Vec<TemplateRule>) -> Self {
        self.inner.templates = templates;
        self
    }

    pub fn header_template(mut self, template: Option<String>) -> Self {
        self.inner.header_template = template;
        self
    }

    pub fn add_header(mut self, enabled: bool) -> Self {
        self.inner.add_header = enabled;
        self
    }

    pub fn replace_header(mut self, enabled: bool) -> Self {
        self.inner.replace_header = enabled;
        self
    }

    /// @acp:summary "Validate and freeze into a snapshot"
    pub fn build(self) -> Result<ConfigSnapshot> {
        self.inner.validate()?;
        Ok(self.inner)
    }
}

/// @acp:summary "Versioned copy-on-write holder of the current snapshot"
pub struct ConfigStore {
    current: ArcSwap<ConfigSnapshot>,
    version: AtomicU64,
}

impl ConfigStore {
    pub fn new(snapshot: ConfigSnapshot) -> Self {
        Self {
            current: ArcSwap::from_pointee(snapshot),
            version: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> Arc<ConfigSnapshot> {
        self.current.load_full()
    }

    /// Incremented on every change
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Swap in a new snapshot, returning the keys whose values differ
    pub fn replace(&self, snapshot: ConfigSnapshot) -> Vec<String> {
        let next = Arc::new(snapshot);
        let after = next.to_properties();
        // The diff is taken against the snapshot the swap actually replaced
        let previous = self.current.rcu(|current| {
            if changed_keys(&current.to_properties(), &after).is_empty() {
                Arc::clone(current)
            } else {
                Arc::clone(&next)
            }
        });
        self.record(changed_keys(&previous.to_properties(), &after))
    }

    /// Apply builder edits to the current snapshot
    ///
    /// `edit` is re-run when another writer swaps first.
    pub fn update<F>(&self, mut edit: F) -> Result<Vec<String>>
    where
        F: FnMut(ConfigBuilder) -> ConfigBuilder,
    {
        loop {
            let base = self.current.load_full();
            let next = Arc::new(edit(base.to_builder()).build()?);
            let changed = changed_keys(&base.to_properties(), &next.to_properties());
            if changed.is_empty() {
                return Ok(changed);
            }
            let previous = self.current.compare_and_swap(&base, next);
            if Arc::ptr_eq(&previous, &base) {
                return Ok(self.record(changed));
            }
        }
    }

    fn record(&self, changed: Vec<String>) -> Vec<String> {
        if !changed.is_empty() {
            self.version.fetch_add(1, Ordering::AcqRel);
            tracing::debug!(keys = ?changed, "configuration updated");
        }
        changed
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(ConfigSnapshot::default())
    }
}

fn changed_keys(before: &BTreeMap<String, String>, after: &BTreeMap<String, String>) -> Vec<String> {
    let mut keys: Vec<String> = after
        .iter()
        .filter(|(k, v)| before.get(*k) != Some(*v))
        .map(|(k, _)| k.clone())
        .collect();
    keys.extend(before.keys().filter(|k| !after.contains_key(*k)).cloned());
    keys
}
