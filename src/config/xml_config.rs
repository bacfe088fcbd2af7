use crate::config::{ConfigField, ResolvedConfig};
use crate::utils::error::{BootstrapError, Result};
use std::path::Path;

/// Local name of the root element of a clixon configuration file.
pub const CONFIG_ROOT: &str = "clixon-config";

/// One element of a parsed configuration document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigNode {
    name: String,
    namespace: Option<String>,
    text: String,
    children: Vec<ConfigNode>,
}

impl ConfigNode {
    fn from_xml(node: roxmltree::Node<'_, '_>) -> Self {
        let mut text = String::new();
        let mut children = Vec::new();

        for child in node.children() {
            if child.is_element() {
                children.push(ConfigNode::from_xml(child));
            } else if child.is_text() {
                // CDATA 也算文字節點
                text.push_str(child.text().unwrap_or_default());
            }
        }

        Self {
            name: node.tag_name().name().to_string(),
            namespace: node.tag_name().namespace().map(str::to_string),
            text,
            children,
        }
    }

    /// Local tag name, without namespace prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Concatenated character data directly inside this element, verbatim.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[ConfigNode] {
        &self.children
    }

    /// First direct child named `name` (case-sensitive).
    pub fn child(&self, name: &str) -> Option<&ConfigNode> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct child first, then the first match in document order anywhere below.
    pub fn find(&self, name: &str) -> Option<&ConfigNode> {
        self.child(name)
            .or_else(|| self.children.iter().find_map(|c| c.find(name)))
    }

    /// Text of the element located by [`ConfigNode::find`].
    pub fn field_text(&self, name: &str) -> Option<&str> {
        self.find(name).map(ConfigNode::text)
    }
}

/// Immutable in-memory tree of a configuration file.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    root: ConfigNode,
}

impl ConfigDocument {
    /// 從 XML 檔案載入
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| BootstrapError::Load {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::parse_str(&content, &path.display().to_string())
    }

    /// `origin` only names the document in error messages.
    pub fn parse_str(content: &str, origin: &str) -> Result<Self> {
        let doc = roxmltree::Document::parse(content).map_err(|e| BootstrapError::Load {
            path: origin.to_string(),
            reason: format!("XML parsing error: {}", e),
        })?;

        Ok(Self {
            root: ConfigNode::from_xml(doc.root_element()),
        })
    }

    pub fn root(&self) -> &ConfigNode {
        &self.root
    }

    /// The `<clixon-config>` element, if the document has one as its root.
    pub fn config_root(&self) -> Option<&ConfigNode> {
        (self.root.name() == CONFIG_ROOT).then_some(&self.root)
    }

    /// Extracts the four required fields. Either all resolve or the first
    /// missing one is reported.
    pub fn resolve(&self) -> Result<ResolvedConfig> {
        let root = self
            .config_root()
            .ok_or_else(|| BootstrapError::missing(CONFIG_ROOT))?;

        let lookup = |field: ConfigField| -> Result<String> {
            root.field_text(field.xml_tag())
                .map(str::to_string)
                .ok_or_else(|| BootstrapError::missing(field.xml_tag()))
        };

        let config = ResolvedConfig {
            sockpath: lookup(ConfigField::SockPath)?,
            modulepath: lookup(ConfigField::ModulePath)?,
            modulefilter: lookup(ConfigField::ModuleFilter)?,
            pidfile: lookup(ConfigField::Pidfile)?,
        };

        tracing::debug!("Resolved configuration fields from document: {:?}", config);
        Ok(config)
    }
}

/// Loads the XML configuration at `path` and extracts the required fields.
pub fn load_and_resolve<P: AsRef<Path>>(path: P) -> Result<ResolvedConfig> {
    let path = path.as_ref();
    tracing::debug!("Loading configuration from {}", path.display());
    ConfigDocument::from_file(path)?.resolve()
}
