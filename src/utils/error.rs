use thiserror::Error;

#[derive(Error, Debug)]
pub enum BootstrapError {
    #[error("usage requested")]
    UsageRequested,

    #[error("{message}")]
    ArgumentParse { message: String },

    #[error("Failed to load configuration '{path}': {reason}")]
    Load { path: String, reason: String },

    #[error("Missing required configuration field: {field}")]
    MissingField { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValue {
        field: String,
        value: String,
        reason: String,
    },
}

impl BootstrapError {
    pub fn missing(field: &str) -> Self {
        BootstrapError::MissingField {
            field: field.to_string(),
        }
    }

    /// Usage and argument errors both end in the help text.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            BootstrapError::UsageRequested | BootstrapError::ArgumentParse { .. }
        )
    }

    // usage 路徑維持 exit 0，與舊版行為相容
    pub fn exit_code(&self) -> i32 {
        if self.is_usage() {
            0
        } else {
            1
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            BootstrapError::UsageRequested | BootstrapError::ArgumentParse { .. } => {
                "Run with -h to list the supported flags".to_string()
            }
            BootstrapError::Load { .. } => {
                "Check that the configuration file exists and is well-formed XML".to_string()
            }
            BootstrapError::MissingField { field } => format!(
                "Add <{}> to the configuration file or pass the matching command-line flag",
                field
            ),
            BootstrapError::InvalidConfigValue { field, .. } => {
                format!("Provide a non-empty path for {}", field)
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, BootstrapError>;
