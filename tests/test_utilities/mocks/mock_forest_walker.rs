use release_forest::prelude::*;

/// One node of an in-memory forest
#[derive(Debug, Clone)]
pub struct MockNode {
    group: String,
    name: String,
    version: String,
    origin: Option<String>,
    tag: Option<String>,
    managed: bool,
    children: Vec<MockNode>,
}

/// A managed `org.acme` component at version 1.0 released under `tag`
pub fn component(name: &str, tag: &str) -> MockNode {
    MockNode {
        group: "org.acme".to_string(),
        name: name.to_string(),
        version: "1.0".to_string(),
        origin: Some("git@host:acme".to_string()),
        tag: Some(tag.to_string()),
        managed: true,
        children: Vec::new(),
    }
}

impl MockNode {
    pub fn group(mut self, group: &str) -> Self {
        self.group = group.to_string();
        self
    }

    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    pub fn depends_on(mut self, children: Vec<MockNode>) -> Self {
        self.children = children;
        self
    }

    pub fn unmanaged(mut self) -> Self {
        self.managed = false;
        self
    }

    /// Drops the declared scm block
    pub fn undeclared(mut self) -> Self {
        self.origin = None;
        self.tag = None;
        self
    }

    fn walked(&self) -> Result<WalkedNode> {
        Ok(WalkedNode {
            key: ComponentKey::new(self.group.clone(), self.name.clone(), self.version.clone())?,
            metadata: ComponentMetadata::new(Some("central".to_string()), self.managed),
            scm: ScmReference {
                origin: self.origin.clone(),
                tag: self.tag.clone(),
            },
        })
    }

    fn emit(&self, visitor: &mut dyn ForestVisitor) -> Result<()> {
        let walked = self.walked()?;
        visitor.enter(&walked)?;
        for child in &self.children {
            child.emit(visitor)?;
        }
        visitor.leave(&walked)
    }
}

/// Mock ForestWalker replaying an in-memory forest
pub struct MockForestWalker {
    roots: Vec<MockNode>,
}

impl MockForestWalker {
    pub fn new(roots: Vec<MockNode>) -> Self {
        Self { roots }
    }
}

impl ForestWalker for MockForestWalker {
    fn walk(&self, visitor: &mut dyn ForestVisitor) -> Result<()> {
        for root in &self.roots {
            root.emit(visitor)?;
        }
        Ok(())
    }
}
