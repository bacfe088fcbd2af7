pub mod cli;
pub mod xml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_required_field, Validate};
use cli::CommandLineOverrides;
use serde::{Deserialize, Serialize};

pub const DEFAULT_SOCKPATH: &str = "/usr/local/var/controller.sock";
pub const DEFAULT_PIDFILE: &str = "/tmp/clixon_pyserver.pid";
pub const DEFAULT_MODULEPATH: &str = "./modules/";
pub const DEFAULT_MODULEFILTER: &str = "";

/// The required startup parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigField {
    SockPath,
    ModulePath,
    ModuleFilter,
    Pidfile,
}

impl ConfigField {
    pub const ALL: [ConfigField; 4] = [
        ConfigField::SockPath,
        ConfigField::ModulePath,
        ConfigField::ModuleFilter,
        ConfigField::Pidfile,
    ];

    /// Element name holding this value in the clixon configuration file.
    pub fn xml_tag(self) -> &'static str {
        match self {
            ConfigField::SockPath => "CLICON_SOCK",
            ConfigField::ModulePath => "CONTROLLER_PYAPI_MODULE_PATH",
            ConfigField::ModuleFilter => "CONTROLLER_PYAPI_MODULE_FILTER",
            ConfigField::Pidfile => "CONTROLLER_PYAPI_PIDFILE",
        }
    }
}

/// Built-in values, used only when no configuration file is given.
#[derive(Debug, Clone, Copy, Default)]
pub struct Defaults;

impl ConfigProvider for Defaults {
    fn source_name(&self) -> &'static str {
        "defaults"
    }

    fn field(&self, field: ConfigField) -> Option<&str> {
        Some(match field {
            ConfigField::SockPath => DEFAULT_SOCKPATH,
            ConfigField::ModulePath => DEFAULT_MODULEPATH,
            ConfigField::ModuleFilter => DEFAULT_MODULEFILTER,
            ConfigField::Pidfile => DEFAULT_PIDFILE,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedConfig {
    pub sockpath: String,
    pub modulepath: String,
    pub modulefilter: String,
    pub pidfile: String,
}

impl ResolvedConfig {
    /// Takes each field from the first source that has it.
    pub fn from_sources(sources: &[&dyn ConfigProvider]) -> Result<Self> {
        let pick = |field: ConfigField| -> Result<String> {
            let found = sources
                .iter()
                .find_map(|source| source.field(field).map(|value| (source.source_name(), value)));

            let (source, value) = validate_required_field(field.xml_tag(), found)?;
            tracing::debug!("{} = '{}' (from {})", field.xml_tag(), value, source);
            Ok(value.to_string())
        };

        Ok(Self {
            sockpath: pick(ConfigField::SockPath)?,
            modulepath: pick(ConfigField::ModulePath)?,
            modulefilter: pick(ConfigField::ModuleFilter)?,
            pidfile: pick(ConfigField::Pidfile)?,
        })
    }

    /// Command-line values win over the file; without a file the built-in
    /// defaults fill the gaps.
    pub fn merge(overrides: &CommandLineOverrides, file: Option<&ResolvedConfig>) -> Result<Self> {
        let fallback: &dyn ConfigProvider = match file {
            Some(file) => file,
            None => &Defaults,
        };
        let sources: [&dyn ConfigProvider; 2] = [overrides, fallback];
        Self::from_sources(&sources)
    }

    /// 排除模組清單 (逗號分隔)
    pub fn module_filters(&self) -> Vec<String> {
        self.modulefilter
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect()
    }
}

impl ConfigProvider for ResolvedConfig {
    fn source_name(&self) -> &'static str {
        "configuration file"
    }

    fn field(&self, field: ConfigField) -> Option<&str> {
        Some(match field {
            ConfigField::SockPath => self.sockpath.as_str(),
            ConfigField::ModulePath => self.modulepath.as_str(),
            ConfigField::ModuleFilter => self.modulefilter.as_str(),
            ConfigField::Pidfile => self.pidfile.as_str(),
        })
    }
}

impl Validate for ResolvedConfig {
    fn validate(&self) -> Result<()> {
        validate_path(ConfigField::SockPath.xml_tag(), &self.sockpath)?;
        validate_path(ConfigField::ModulePath.xml_tag(), &self.modulepath)?;
        validate_path(ConfigField::Pidfile.xml_tag(), &self.pidfile)?;
        Ok(())
    }
}

/// Full startup resolution: loads the file named by `-c` if any, merges it
/// with the command-line values and validates the result.
pub fn resolve_startup_config(overrides: &CommandLineOverrides) -> Result<ResolvedConfig> {
    let file = match &overrides.config_file {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            Some(xml_config::load_and_resolve(path)?)
        }
        None => None,
    };

    let config = ResolvedConfig::merge(overrides, file.as_ref())?;
    config.validate()?;
    Ok(config)
}

/// Pidfile targeted by `-z`: override, then the `-c` file's pidfile element
/// if the file can be read, then the default. Other fields are not looked at.
pub fn resolve_terminate_pidfile(overrides: &CommandLineOverrides) -> String {
    if let Some(pidfile) = overrides.field(ConfigField::Pidfile) {
        return pidfile.to_string();
    }

    if let Some(path) = &overrides.config_file {
        match xml_config::ConfigDocument::from_file(path) {
            Ok(doc) => {
                let tag = ConfigField::Pidfile.xml_tag();
                if let Some(pidfile) = doc.config_root().and_then(|root| root.field_text(tag)) {
                    return pidfile.to_string();
                }
                tracing::warn!("{} has no <{}>, using default pidfile", path.display(), tag);
            }
            Err(e) => tracing::warn!("{}, using default pidfile", e),
        }
    }

    DEFAULT_PIDFILE.to_string()
}
