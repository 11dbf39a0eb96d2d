//! Builders for update info and installed extension sets

use hoist_core::types::UpdateInfo;
use hoist_extensions::ExtensionSummary;

use super::constants::*;

/// Builder for an installed extension set and the matching release
#[derive(Debug, Clone, Default)]
pub struct ScenarioBuilder {
    installed: Vec<ExtensionSummary>,
    update: Option<UpdateInfo>,
}

impl ScenarioBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` active extensions named "0", "1", ... that the target rejects
    pub fn incompatible(mut self, count: usize) -> Self {
        let start = self.installed.len();
        for i in start..start + count {
            self.installed
                .push(ExtensionSummary::new(i.to_string(), OLD_EXTENSION_VERSION, true));
            self.update = Some(
                self.update_info()
                    .with_requirement(i.to_string(), TARGET_REQUIREMENT),
            );
        }
        self
    }

    /// Extension the target release supports
    pub fn compatible(mut self, name: &str) -> Self {
        self.installed
            .push(ExtensionSummary::new(name, NEW_EXTENSION_VERSION, true));
        self.update = Some(self.update_info().with_requirement(name, TARGET_REQUIREMENT));
        self
    }

    /// Extension without compatibility data
    pub fn unknown(mut self, name: &str) -> Self {
        self.installed
            .push(ExtensionSummary::new(name, OLD_EXTENSION_VERSION, true));
        self
    }

    /// Extension already deactivated that the target rejects
    pub fn inactive_incompatible(mut self, name: &str) -> Self {
        self.installed
            .push(ExtensionSummary::new(name, OLD_EXTENSION_VERSION, false));
        self.update = Some(self.update_info().with_requirement(name, TARGET_REQUIREMENT));
        self
    }

    pub fn installed(&self) -> Vec<ExtensionSummary> {
        self.installed.clone()
    }

    pub fn update_info(&self) -> UpdateInfo {
        self.update
            .clone()
            .unwrap_or_else(|| UpdateInfo::new(TARGET_VERSION))
    }
}

/// Identifiers in the order the step processes them
pub fn sorted_identifiers(installed: &[ExtensionSummary]) -> Vec<String> {
    let mut names: Vec<String> = installed.iter().map(|e| e.name.clone()).collect();
    names.sort();
    names
}
