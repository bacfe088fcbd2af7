use anyhow::Context;
use clixon_bootstrap::config::{cli::usage_exit, resolve_terminate_pidfile};
use clixon_bootstrap::utils::logger;
use clixon_bootstrap::{resolve_args, resolve_startup_config, terminate_daemon};

fn main() -> anyhow::Result<()> {
    let program = std::env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_else(|| "clixon-bootstrap".to_string());

    let overrides = match resolve_args(std::env::args_os()) {
        Ok(overrides) => overrides,
        Err(e) => usage_exit(&program, &e),
    };

    // 初始化日誌
    logger::init_cli_logger(overrides.debug);
    tracing::debug!("Command-line overrides: {:?}", overrides);

    if overrides.terminate {
        // -z 只負責停止舊的 daemon，不啟動新的
        let outcome = terminate_daemon(resolve_terminate_pidfile(&overrides));
        tracing::debug!("Terminate outcome: {:?}", outcome);
        return Ok(());
    }

    let config = match resolve_startup_config(&overrides) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("❌ Configuration resolution failed: {}", e);
            tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e);
            std::process::exit(e.exit_code());
        }
    };

    tracing::info!(
        "✅ Startup configuration resolved (foreground: {}, excluded modules: {:?})",
        overrides.foreground,
        config.module_filters()
    );

    let rendered =
        serde_json::to_string(&config).context("failed to serialize resolved configuration")?;
    tracing::debug!("Resolved configuration: {}", rendered);
    println!("{}", rendered);

    Ok(())
}
