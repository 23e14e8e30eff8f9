//! Extension configuration: which framework behaviors an extension opts into.

use std::fmt;

/// Optional groups of helper methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodGroup {
    /// `css_variable`, `css_duration`.
    Css,
    /// `select_by_class`, `select_all_by_class`, `select_to_properties`.
    /// Implied by `auto_select`.
    Selection,
}

impl fmt::Display for MethodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css => f.write_str("css"),
            Self::Selection => f.write_str("selection"),
        }
    }
}

/// Configuration for building an [`Extension`](super::Extension).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionConfig {
    /// Pre-bind every declared handler to its instance at construction.
    pub auto_bind: bool,
    /// Attach declared listeners at creation and detach them at removal.
    pub auto_listen: bool,
    /// Resolve the `selectors` option into selected elements.
    pub auto_select: bool,
    /// Expose every top-level option through `Instance::prop`.
    pub compact_options: bool,
    /// Extra helper groups.
    pub method_groups: Vec<MethodGroup>,
}

impl ExtensionConfig {
    /// A config with every behavior off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `auto_bind` (builder).
    pub fn auto_bind(mut self, on: bool) -> Self {
        self.auto_bind = on;
        self
    }

    /// Set `auto_listen` (builder).
    pub fn auto_listen(mut self, on: bool) -> Self {
        self.auto_listen = on;
        self
    }

    /// Set `auto_select` (builder).
    pub fn auto_select(mut self, on: bool) -> Self {
        self.auto_select = on;
        self
    }

    /// Set `compact_options` (builder).
    pub fn compact_options(mut self, on: bool) -> Self {
        self.compact_options = on;
        self
    }

    /// Enable a helper group (builder).
    pub fn with_group(mut self, group: MethodGroup) -> Self {
        if !self.method_groups.contains(&group) {
            self.method_groups.push(group);
        }
        self
    }

    /// Whether a helper group is available.
    pub fn has_group(&self, group: MethodGroup) -> bool {
        match group {
            MethodGroup::Selection if self.auto_select => true,
            _ => self.method_groups.contains(&group),
        }
    }
}
