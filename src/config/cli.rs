use crate::config::ConfigField;
use crate::core::ConfigProvider;
use crate::utils::error::{BootstrapError, Result};
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Values given on the command line. Unset flags stay `None`, which is
/// distinct from an explicitly empty value such as `-f ""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Parser)]
#[command(name = "clixon-bootstrap")]
#[command(disable_help_flag = true, disable_version_flag = true)]
#[command(args_override_self = true)]
pub struct CommandLineOverrides {
    #[arg(short = 'd')]
    pub debug: bool,

    #[arg(short = 's', value_name = "PATH", allow_hyphen_values = true)]
    pub sockpath: Option<String>,

    #[arg(short = 'f', value_name = "MODULES", allow_hyphen_values = true)]
    pub modulefilter: Option<String>,

    #[arg(short = 'p', value_name = "PIDFILE", allow_hyphen_values = true)]
    pub pidfile: Option<String>,

    #[arg(short = 'm', value_name = "PATH", allow_hyphen_values = true)]
    pub modulepath: Option<String>,

    #[arg(short = 'c', value_name = "FILE", allow_hyphen_values = true)]
    pub config_file: Option<PathBuf>,

    #[arg(short = 'F')]
    pub foreground: bool,

    #[arg(short = 'z')]
    pub terminate: bool,

    #[arg(short = 'h')]
    pub help: bool,
}

impl ConfigProvider for CommandLineOverrides {
    fn source_name(&self) -> &'static str {
        "command line"
    }

    fn field(&self, field: ConfigField) -> Option<&str> {
        match field {
            ConfigField::SockPath => self.sockpath.as_deref(),
            ConfigField::ModulePath => self.modulepath.as_deref(),
            ConfigField::ModuleFilter => self.modulefilter.as_deref(),
            ConfigField::Pidfile => self.pidfile.as_deref(),
        }
    }
}

/// Parses a full argument vector, program name first (as `std::env::args_os`).
///
/// `-h` yields [`BootstrapError::UsageRequested`]; unknown flags, missing
/// values and stray positional arguments yield
/// [`BootstrapError::ArgumentParse`] carrying clap's one-line message.
pub fn resolve<I, T>(argv: I) -> Result<CommandLineOverrides>
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let overrides =
        CommandLineOverrides::try_parse_from(argv).map_err(|e| BootstrapError::ArgumentParse {
            message: first_error_line(&e.to_string()),
        })?;

    if overrides.help {
        return Err(BootstrapError::UsageRequested);
    }

    Ok(overrides)
}

fn first_error_line(rendered: &str) -> String {
    let line = rendered.lines().next().unwrap_or_default();
    line.strip_prefix("error: ").unwrap_or(line).trim().to_string()
}

pub fn usage_text(program: &str) -> String {
    let lines = [
        format!("{} -f<module1,module2> -s<path> -d -p<pidfile>", program),
        "  -c       Clixon configuration file".to_string(),
        "  -m       Modules path".to_string(),
        "  -f       Comma separate list of modules to exclude".to_string(),
        "  -d       Enable verbose debug logging".to_string(),
        "  -s       Clixon socket path".to_string(),
        "  -p       Pidfile for Python server".to_string(),
        "  -F       Run in foreground".to_string(),
        "  -z       Kill the running daemon named by the pidfile".to_string(),
        "  -h       This!".to_string(),
    ];
    lines.join("\n")
}

/// Prints the usage text to stdout, preceded by the parse error if there is
/// one, and exits. Usage always exits with status 0.
pub fn usage_exit(program: &str, err: &BootstrapError) -> ! {
    if let BootstrapError::ArgumentParse { message } = err {
        println!("{}: {}", program, message);
        println!();
    }
    println!("{}", usage_text(program));

    std::process::exit(err.exit_code())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CommandLineOverrides> {
        resolve(std::iter::once("clixon-bootstrap").chain(args.iter().copied()))
    }

    #[test]
    fn test_no_flags_leaves_everything_unset() {
        let overrides = parse(&[]).unwrap();
        assert_eq!(overrides, CommandLineOverrides::default());
        assert!(overrides.field(ConfigField::SockPath).is_none());
    }

    #[test]
    fn test_all_flags() {
        let overrides = parse(&[
            "-d", "-s", "/tmp/sock", "-f", "a,b", "-p", "/tmp/x.pid", "-m", "./mods", "-F",
            "-c", "/etc/controller.xml",
        ])
        .unwrap();

        assert!(overrides.debug);
        assert!(overrides.foreground);
        assert!(!overrides.terminate);
        assert_eq!(overrides.sockpath.as_deref(), Some("/tmp/sock"));
        assert_eq!(overrides.modulefilter.as_deref(), Some("a,b"));
        assert_eq!(overrides.pidfile.as_deref(), Some("/tmp/x.pid"));
        assert_eq!(overrides.modulepath.as_deref(), Some("./mods"));
        assert_eq!(
            overrides.config_file,
            Some(PathBuf::from("/etc/controller.xml"))
        );
    }

    #[test]
    fn test_attached_values_and_grouped_booleans() {
        let overrides = parse(&["-s/tmp/sock", "-dF", "-pfoo.pid"]).unwrap();

        assert_eq!(overrides.sockpath.as_deref(), Some("/tmp/sock"));
        assert_eq!(overrides.pidfile.as_deref(), Some("foo.pid"));
        assert!(overrides.debug);
        assert!(overrides.foreground);
    }

    #[test]
    fn test_empty_value_is_distinct_from_unset() {
        let overrides = parse(&["-f", ""]).unwrap();
        assert_eq!(overrides.field(ConfigField::ModuleFilter), Some(""));
        assert_eq!(overrides.field(ConfigField::ModulePath), None);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let overrides = parse(&["-s", "first", "-s", "second", "-d", "-d"]).unwrap();
        assert_eq!(overrides.sockpath.as_deref(), Some("second"));
    }

    #[test]
    fn test_equals_after_short_flag_is_dropped() {
        let overrides = parse(&["-s=/x"]).unwrap();
        assert_eq!(overrides.sockpath.as_deref(), Some("/x"));
    }

    #[test]
    fn test_terminate_flag() {
        let overrides = parse(&["-p", "/tmp/x.pid", "-z"]).unwrap();
        assert!(overrides.terminate);
    }

    #[test]
    fn test_help_requests_usage() {
        assert!(matches!(parse(&["-h"]), Err(BootstrapError::UsageRequested)));
        assert!(matches!(
            parse(&["-s", "x", "-h"]),
            Err(BootstrapError::UsageRequested)
        ));
    }

    #[test]
    fn test_bad_arguments_are_parse_errors() {
        for args in [&["-x"][..], &["-s"][..], &["stray"][..], &["--long"][..]] {
            let err = parse(args).unwrap_err();
            assert!(
                matches!(err, BootstrapError::ArgumentParse { .. }),
                "{:?} gave {:?}",
                args,
                err
            );
            assert_eq!(err.exit_code(), 0);
            assert!(!err.to_string().is_empty());
            assert!(!err.to_string().contains('\n'));
        }
    }

    #[test]
    fn test_usage_text_lists_flags() {
        let text = usage_text("server");
        assert!(text.starts_with("server -f<module1,module2>"));
        for flag in ["-c", "-m", "-f", "-d", "-s", "-p", "-F", "-z", "-h"] {
            assert!(text.contains(&format!("  {} ", flag)), "missing {}", flag);
        }
    }
}
