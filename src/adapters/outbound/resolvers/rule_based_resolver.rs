use crate::ports::outbound::ReleaseIdResolver;
use crate::release_analysis::domain::{ComponentKey, ComponentRecord, ReleaseRevision};
use crate::shared::error::AnalysisError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// Maximum number of release rules to prevent DoS attacks
const MAX_RELEASE_RULES: usize = 256;

/// One entry of the `release_rules` config list
///
/// `group` matches a component group exactly, or by prefix when it ends with
/// `*`. `origin` and `tag` are templates over `{group}`, `{name}` and
/// `{version}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseRule {
    pub group: String,
    #[serde(default)]
    pub origin: Option<String>,
    pub tag: String,
}

impl ReleaseRule {
    fn matches(&self, group: &str) -> bool {
        match self.group.strip_suffix('*') {
            Some(prefix) => group.starts_with(prefix),
            None => self.group == group,
        }
    }

    fn render(template: &str, key: &ComponentKey) -> String {
        template
            .replace("{group}", key.group())
            .replace("{name}", key.name())
            .replace("{version}", key.version())
    }

    fn validate(&self, index: usize) -> Result<()> {
        if self.group.trim().is_empty() {
            return Err(AnalysisError::Validation {
                message: format!("release_rules[{}]: group cannot be empty", index),
            }
            .into());
        }
        let body = self.group.strip_suffix('*').unwrap_or(&self.group);
        if body.contains('*') {
            return Err(AnalysisError::Validation {
                message: format!(
                    "release_rules[{}]: '*' is only allowed at the end of group '{}'",
                    index, self.group
                ),
            }
            .into());
        }
        if self.tag.trim().is_empty() {
            return Err(AnalysisError::Validation {
                message: format!(
                    "release_rules[{}]: tag cannot be empty for group '{}'",
                    index, self.group
                ),
            }
            .into());
        }
        Ok(())
    }
}

/// RuleBasedResolver adapter deriving revisions from configured naming rules
///
/// Rules are checked in order and the first rule whose group matches wins.
/// Without an `origin` template the component group is used.
#[derive(Debug, Clone)]
pub struct RuleBasedResolver {
    rules: Vec<ReleaseRule>,
}

impl RuleBasedResolver {
    /// # Errors
    /// Returns a validation error for empty groups or tags, misplaced
    /// wildcards, or too many rules.
    pub fn new(rules: Vec<ReleaseRule>) -> Result<Self> {
        if rules.len() > MAX_RELEASE_RULES {
            anyhow::bail!(
                "Too many release rules: {} (maximum: {})",
                rules.len(),
                MAX_RELEASE_RULES
            );
        }
        for (index, rule) in rules.iter().enumerate() {
            rule.validate(index)?;
        }
        Ok(Self { rules })
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn rule_for(&self, key: &ComponentKey) -> Option<&ReleaseRule> {
        self.rules.iter().find(|rule| rule.matches(key.group()))
    }
}

#[async_trait]
impl ReleaseIdResolver for RuleBasedResolver {
    async fn resolve(&self, component: &ComponentRecord) -> Result<ReleaseRevision> {
        let key = &component.key;
        let rule = match self.rule_for(key) {
            Some(rule) => rule,
            None => anyhow::bail!("no release rule matches group '{}'", key.group()),
        };

        let origin = rule
            .origin
            .as_deref()
            .map(|template| ReleaseRule::render(template, key))
            .unwrap_or_else(|| key.group().to_string());
        let tag = ReleaseRule::render(&rule.tag, key);

        ReleaseRevision::new(origin, tag)
    }
}
