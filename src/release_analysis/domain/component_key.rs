use super::ScmReference;
use crate::shared::Result;
use serde::Serialize;

/// Maximum length of any single coordinate field (security limit)
const MAX_COORDINATE_LENGTH: usize = 255;

/// ComponentKey value object identifying one versioned component
///
/// Equality and hashing cover every coordinate, so two keys that differ only
/// in classifier or type are distinct components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ComponentKey {
    group: String,
    name: String,
    classifier: String,
    #[serde(rename = "type")]
    component_type: String,
    version: String,
}

impl ComponentKey {
    /// Creates a key with empty classifier and type
    ///
    /// # Errors
    /// Returns an error if group, name or version is empty, too long, or
    /// contains whitespace or the `:` separator.
    pub fn new(group: String, name: String, version: String) -> Result<Self> {
        validate_coordinate("group", &group, true)?;
        validate_coordinate("name", &name, true)?;
        validate_coordinate("version", &version, true)?;

        Ok(Self {
            group,
            name,
            classifier: String::new(),
            component_type: String::new(),
            version,
        })
    }

    pub fn with_type(mut self, component_type: String) -> Result<Self> {
        validate_coordinate("type", &component_type, false)?;
        self.component_type = component_type;
        Ok(self)
    }

    pub fn with_classifier(mut self, classifier: String) -> Result<Self> {
        validate_coordinate("classifier", &classifier, false)?;
        self.classifier = classifier;
        Ok(self)
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn classifier(&self) -> &str {
        &self.classifier
    }

    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// `group:name`, the coordinate used by exclusion patterns and release rules
    pub fn coordinate(&self) -> String {
        format!("{}:{}", self.group, self.name)
    }

    /// Coordinate-derived package locator
    ///
    /// Format: `group:name[:type[:classifier]]:version`. A classifier without a
    /// type keeps an empty type slot so the locator stays unambiguous.
    pub fn locator(&self) -> String {
        let mut locator = format!("{}:{}", self.group, self.name);
        if !self.component_type.is_empty() || !self.classifier.is_empty() {
            locator.push(':');
            locator.push_str(&self.component_type);
        }
        if !self.classifier.is_empty() {
            locator.push(':');
            locator.push_str(&self.classifier);
        }
        locator.push(':');
        locator.push_str(&self.version);
        locator
    }
}

impl std::fmt::Display for ComponentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.locator())
    }
}

fn validate_coordinate(field: &str, value: &str, required: bool) -> Result<()> {
    if value.is_empty() {
        if required {
            anyhow::bail!("Component {} cannot be empty", field);
        }
        return Ok(());
    }

    if value.len() > MAX_COORDINATE_LENGTH {
        anyhow::bail!(
            "Component {} is too long ({} bytes). Maximum allowed: {} bytes",
            field,
            value.len(),
            MAX_COORDINATE_LENGTH
        );
    }

    if value.chars().any(|c| c == ':' || c.is_whitespace() || c.is_control()) {
        anyhow::bail!(
            "Component {} '{}' contains invalid characters. Separators (':') and whitespace are not allowed.",
            field,
            value
        );
    }

    Ok(())
}

/// Repository metadata recorded next to a component
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ComponentMetadata {
    repository: Option<String>,
    managed: bool,
}

impl ComponentMetadata {
    pub fn new(repository: Option<String>, managed: bool) -> Self {
        Self {
            repository,
            managed,
        }
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    /// Whether the component is built by the analysed project set
    pub fn is_managed(&self) -> bool {
        self.managed
    }
}

/// Everything the walker reported about one distinct component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentRecord {
    pub key: ComponentKey,
    pub metadata: ComponentMetadata,
    pub scm: ScmReference,
}
