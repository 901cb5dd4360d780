//! @acp:module "Search Pattern"
//! @acp:summary "Which defect classes to look for and which members qualify"
//! @acp:domain cli
//! @acp:layer config

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::VisibilityFilter;
use crate::element::{Member, MemberKind};
use crate::error::Result;

/// @acp:summary "How a custom tag check reports"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TagModifier {
    /// Report absent and empty tags
    #[default]
    All,
    OnlyMissing,
    OnlyEmpty,
}

/// @acp:summary "One custom tag to check on included members"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTagCheck {
    /// Tag keyword, with or without the leading `@`
    pub tag: String,
    #[serde(default)]
    pub modifier: TagModifier,
    /// Member kinds the check applies to; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub kinds: Vec<MemberKind>,
}

impl CustomTagCheck {
    pub fn new(tag: &str, modifier: TagModifier) -> Self {
        Self {
            tag: tag.to_string(),
            modifier,
            kinds: Vec::new(),
        }
    }

    pub fn keyword(&self) -> &str {
        self.tag.trim_start_matches('@')
    }

    pub fn applies_to(&self, kind: MemberKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

/// @acp:summary "Immutable configuration of one search run"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchPattern {
    pub missing_javadoc: bool,
    pub missing_param: bool,
    pub invalid_param: bool,
    pub missing_return: bool,
    pub invalid_return: bool,
    pub missing_throws: bool,
    pub invalid_throws: bool,
    pub missing_period: bool,
    pub generated_javadoc: bool,
    pub missing_header: bool,
    pub outdated_header: bool,
    pub custom_tags: Vec<CustomTagCheck>,
    pub visibility: VisibilityFilter,
    pub include_types: bool,
    pub include_fields: bool,
    pub include_methods: bool,
}

impl Default for SearchPattern {
    fn default() -> Self {
        Self {
            missing_javadoc: true,
            missing_param: true,
            invalid_param: true,
            missing_return: true,
            invalid_return: true,
            missing_throws: true,
            invalid_throws: true,
            missing_period: true,
            generated_javadoc: true,
            missing_header: false,
            outdated_header: false,
            custom_tags: Vec::new(),
            visibility: VisibilityFilter::default(),
            include_types: true,
            include_fields: true,
            include_methods: true,
        }
    }
}

impl SearchPattern {
    /// Pattern with every defect class switched off
    pub fn none() -> Self {
        Self {
            missing_javadoc: false,
            missing_param: false,
            invalid_param: false,
            missing_return: false,
            invalid_return: false,
            missing_throws: false,
            invalid_throws: false,
            missing_period: false,
            generated_javadoc: false,
            ..Default::default()
        }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn checks_header(&self) -> bool {
        self.missing_header || self.outdated_header
    }

    /// Visibility and member-kind inclusion
    pub fn includes(&self, member: &Member) -> bool {
        let kind_ok = match member.kind() {
            MemberKind::Type | MemberKind::Record => self.include_types,
            MemberKind::Field => self.include_fields,
            MemberKind::Method => self.include_methods,
            MemberKind::Parameter => false,
        };
        kind_ok && self.visibility.includes(member.visibility())
    }
}
