pub mod daemon;

pub use crate::config::ConfigField;

/// A source of values for the required startup fields.
///
/// Command-line overrides, the XML configuration file and the built-in
/// defaults all implement this; the merge asks each source in precedence
/// order and takes the first value it gets.
pub trait ConfigProvider {
    fn source_name(&self) -> &'static str;
    fn field(&self, field: ConfigField) -> Option<&str>;
}
