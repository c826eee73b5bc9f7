use crate::ports::outbound::{ForestVisitor, ForestWalker, WalkedNode};
use crate::release_analysis::domain::{ComponentKey, ComponentMetadata, ScmReference};
use crate::shared::error::AnalysisError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Maximum depth of a dependency tree in a forest document
///
/// Every tree level costs two nesting levels (node and `dependencies`), and
/// the JSON and YAML parsers refuse documents nested 128 levels deep, so the
/// limit stays below half of that.
const MAX_DEPTH: usize = 60;

/// Serialization formats a forest document can use, chosen by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Toml,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());
        match extension.as_deref() {
            Some("json") => Ok(DocumentFormat::Json),
            Some("yml") | Some("yaml") => Ok(DocumentFormat::Yaml),
            Some("toml") => Ok(DocumentFormat::Toml),
            _ => Err(AnalysisError::ForestParseError {
                path: path.to_path_buf(),
                details: "unsupported extension; expected .json, .yaml, .yml or .toml".to_string(),
            }
            .into()),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ForestDocument {
    #[serde(default)]
    roots: Vec<DocumentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentNode {
    group: String,
    name: String,
    version: String,
    #[serde(default, rename = "type")]
    component_type: Option<String>,
    #[serde(default)]
    classifier: Option<String>,
    #[serde(default)]
    repository: Option<String>,
    #[serde(default = "default_managed")]
    managed: bool,
    #[serde(default)]
    scm: Option<DocumentScm>,
    #[serde(default)]
    dependencies: Vec<DocumentNode>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct DocumentScm {
    origin: Option<String>,
    tag: Option<String>,
}

fn default_managed() -> bool {
    true
}

impl DocumentNode {
    fn to_walked(&self) -> Result<WalkedNode> {
        let mut key = ComponentKey::new(self.group.clone(), self.name.clone(), self.version.clone())?;
        if let Some(component_type) = &self.component_type {
            key = key.with_type(component_type.clone())?;
        }
        if let Some(classifier) = &self.classifier {
            key = key.with_classifier(classifier.clone())?;
        }

        Ok(WalkedNode {
            key,
            metadata: ComponentMetadata::new(self.repository.clone(), self.managed),
            scm: self
                .scm
                .as_ref()
                .map(|scm| ScmReference {
                    origin: scm.origin.clone(),
                    tag: scm.tag.clone(),
                })
                .unwrap_or_default(),
        })
    }
}

/// DocumentForestWalker adapter replaying a forest stored in a file
///
/// Implements the ForestWalker port over a nested JSON, YAML or TOML
/// document with a top-level `roots` list; every node lists its direct
/// `dependencies`.
#[derive(Debug)]
pub struct DocumentForestWalker {
    source: PathBuf,
    document: ForestDocument,
}

impl DocumentForestWalker {
    /// Loads and parses the document at `path`
    ///
    /// # Errors
    /// Returns `ForestNotFound` if the file is missing, a security error for
    /// symlinks or oversized files, and `ForestParseError` for invalid content.
    pub fn from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AnalysisError::ForestNotFound {
                path: path.to_path_buf(),
                suggestion: "Export the dependency forest first, or pass its location with --forest"
                    .to_string(),
            }
            .into());
        }

        let format = DocumentFormat::from_path(path)?;
        let content = read_regular_file(path, "forest document")?;
        Self::parse(&content, format, path)
    }

    /// Parses document `content`; `source` is only used in error messages
    pub fn parse(content: &str, format: DocumentFormat, source: &Path) -> Result<Self> {
        let parsed: std::result::Result<ForestDocument, String> = match format {
            DocumentFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Yaml => serde_yaml_ng::from_str(content).map_err(|e| e.to_string()),
            DocumentFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };

        let document = parsed.map_err(|details| AnalysisError::ForestParseError {
            path: source.to_path_buf(),
            details,
        })?;

        Ok(Self {
            source: source.to_path_buf(),
            document,
        })
    }

    pub fn root_count(&self) -> usize {
        self.document.roots.len()
    }

    fn emit(&self, node: &DocumentNode, depth: usize, visitor: &mut dyn ForestVisitor) -> Result<()> {
        if depth >= MAX_DEPTH {
            return Err(AnalysisError::ForestParseError {
                path: self.source.clone(),
                details: format!(
                    "dependency tree below {}:{} is nested deeper than {} levels",
                    node.group, node.name, MAX_DEPTH
                ),
            }
            .into());
        }

        let walked = node.to_walked().map_err(|e| AnalysisError::ForestParseError {
            path: self.source.clone(),
            details: e.to_string(),
        })?;

        visitor.enter(&walked)?;
        for dependency in &node.dependencies {
            self.emit(dependency, depth + 1, visitor)?;
        }
        visitor.leave(&walked)
    }
}

impl ForestWalker for DocumentForestWalker {
    fn walk(&self, visitor: &mut dyn ForestVisitor) -> Result<()> {
        for root in &self.document.roots {
            self.emit(root, 0, visitor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Records the event stream as `+locator` / `-locator`
    #[derive(Default)]
    struct RecordingVisitor {
        events: Vec<String>,
        nodes: Vec<WalkedNode>,
    }

    impl ForestVisitor for RecordingVisitor {
        fn enter(&mut self, node: &WalkedNode) -> Result<()> {
            self.events.push(format!("+{}", node.key));
            self.nodes.push(node.clone());
            Ok(())
        }

        fn leave(&mut self, node: &WalkedNode) -> Result<()> {
            self.events.push(format!("-{}", node.key));
            Ok(())
        }
    }

    const JSON_FOREST: &str = r#"{
        "roots": [
            {
                "group": "org.acme",
                "name": "app",
                "version": "1.0",
                "scm": { "origin": "git@host:acme/app", "tag": "v1.0" },
                "dependencies": [
                    { "group": "org.acme", "name": "core", "version": "2.0", "type": "jar", "classifier": "tests" },
                    { "group": "com.other", "name": "lib", "version": "3.1", "managed": false, "repository": "central" }
                ]
            }
        ]
    }"#;

    fn walk(walker: &DocumentForestWalker) -> RecordingVisitor {
        let mut visitor = RecordingVisitor::default();
        walker.walk(&mut visitor).unwrap();
        visitor
    }

    #[test]
    fn test_json_document_event_order() {
        let walker =
            DocumentForestWalker::parse(JSON_FOREST, DocumentFormat::Json, Path::new("f.json"))
                .unwrap();
        let visitor = walk(&walker);

        assert_eq!(
            visitor.events,
            vec![
                "+org.acme:app:1.0",
                "+org.acme:core:jar:tests:2.0",
                "-org.acme:core:jar:tests:2.0",
                "+com.other:lib:3.1",
                "-com.other:lib:3.1",
                "-org.acme:app:1.0",
            ]
        );
        assert_eq!(walker.root_count(), 1);
    }

    #[test]
    fn test_node_metadata_and_scm() {
        let walker =
            DocumentForestWalker::parse(JSON_FOREST, DocumentFormat::Json, Path::new("f.json"))
                .unwrap();
        let visitor = walk(&walker);

        let app = &visitor.nodes[0];
        assert_eq!(app.scm.tag.as_deref(), Some("v1.0"));
        assert!(app.metadata.is_managed());

        let lib = &visitor.nodes[2];
        assert!(!lib.metadata.is_managed());
        assert_eq!(lib.metadata.repository(), Some("central"));
        assert_eq!(lib.scm, ScmReference::default());
    }

    #[test]
    fn test_yaml_document() {
        let yaml = r#"
roots:
  - group: org.acme
    name: app
    version: "1.0"
    dependencies:
      - group: org.acme
        name: core
        version: "2.0"
"#;
        let walker =
            DocumentForestWalker::parse(yaml, DocumentFormat::Yaml, Path::new("f.yml")).unwrap();
        assert_eq!(walk(&walker).events.len(), 4);
    }

    #[test]
    fn test_toml_document() {
        let toml = r#"
[[roots]]
group = "org.acme"
name = "app"
version = "1.0"

[[roots.dependencies]]
group = "org.acme"
name = "core"
version = "2.0"
"#;
        let walker =
            DocumentForestWalker::parse(toml, DocumentFormat::Toml, Path::new("f.toml")).unwrap();
        assert_eq!(walk(&walker).events[1], "+org.acme:core:2.0");
    }

    #[test]
    fn test_invalid_component_is_a_parse_error() {
        let json = r#"{ "roots": [ { "group": "org.acme", "name": "bad name", "version": "1" } ] }"#;
        let walker =
            DocumentForestWalker::parse(json, DocumentFormat::Json, Path::new("f.json")).unwrap();
        let mut visitor = RecordingVisitor::default();
        let result = walker.walk(&mut visitor);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Failed to parse forest document"));
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let json = r#"{ "roots": [ { "group": "g", "name": "n", "version": "1", "licence": "MIT" } ] }"#;
        let result = DocumentForestWalker::parse(json, DocumentFormat::Json, Path::new("f.json"));
        assert!(result.is_err());
    }

    #[test]
    fn test_from_path_reads_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("forest.json");
        fs::write(&path, JSON_FOREST).unwrap();

        let walker = DocumentForestWalker::from_path(&path).unwrap();
        assert_eq!(walk(&walker).nodes.len(), 3);
    }

    #[test]
    fn test_from_path_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = DocumentForestWalker::from_path(&temp_dir.path().join("absent.json"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Forest document not found"));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(DocumentFormat::from_path(Path::new("forest.xml")).is_err());
        assert_eq!(
            DocumentFormat::from_path(Path::new("forest.YAML")).unwrap(),
            DocumentFormat::Yaml
        );
    }

    /// JSON chain of `levels` nested nodes, used as flow-style YAML as well
    fn nested_document(levels: usize) -> String {
        let mut nodes = String::new();
        for i in 0..levels {
            nodes.push_str(&format!(
                r#"{{ "group": "g", "name": "n{}", "version": "1", "dependencies": ["#,
                i
            ));
        }
        nodes.push_str(&"] }".repeat(levels));
        format!(r#"{{ "roots": [ {} ] }}"#, nodes)
    }

    #[test]
    fn test_deepest_allowed_tree_is_walked() {
        let document = nested_document(MAX_DEPTH);

        for format in [DocumentFormat::Json, DocumentFormat::Yaml] {
            let walker =
                DocumentForestWalker::parse(&document, format, Path::new("deep")).unwrap();
            let mut visitor = RecordingVisitor::default();
            walker.walk(&mut visitor).unwrap();

            assert_eq!(visitor.events.len(), 2 * MAX_DEPTH);
            assert_eq!(visitor.events[MAX_DEPTH - 1], format!("+g:n{}:1", MAX_DEPTH - 1));
        }
    }

    #[test]
    fn test_depth_limit() {
        let document = nested_document(MAX_DEPTH + 1);

        let walker =
            DocumentForestWalker::parse(&document, DocumentFormat::Json, Path::new("deep.json"))
                .unwrap();
        let mut visitor = RecordingVisitor::default();
        let result = walker.walk(&mut visitor);
        assert!(result.unwrap_err().to_string().contains("nested deeper"));
    }
}
