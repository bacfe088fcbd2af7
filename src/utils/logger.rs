use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn default_directives(debug: bool) -> &'static str {
    if debug {
        "clixon_bootstrap=debug,info"
    } else {
        "clixon_bootstrap=info"
    }
}

/// 初始化 CLI 日誌；`RUST_LOG` 優先於 `-d`
///
/// Logs go to stderr, stdout carries the resolved configuration.
pub fn init_cli_logger(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .init();
}
