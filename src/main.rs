// src/main.rs
use clap::Parser;
use fide_bands::cli::{Args, Command};
use fide_bands::commands::{
    handle_analyze_command, handle_build_index_command, handle_config_update_command,
    handle_list_config_command, handle_recompute_command, handle_resolve_command,
};
use fide_bands::config::Config;
use fide_bands::error::AppError;
use fide_bands::logging::setup_logging;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Keep the guard alive until exit so file logs are flushed
    let (log_file_path, _guard) = setup_logging(&args).await?;
    tracing::debug!("Logs are being written to: {log_file_path}");

    match &args.command {
        Command::Config(config_args) => {
            if config_args.has_updates() {
                handle_config_update_command(config_args).await?;
            }
            if config_args.list || !config_args.has_updates() {
                handle_list_config_command().await?;
            }
            Ok(())
        }
        Command::Resolve(resolve_args) => handle_resolve_command(resolve_args).await,
        Command::Recompute(recompute_args) => handle_recompute_command(recompute_args).await,
        Command::BuildIndex(build_args) => {
            // Load config first to fail early if there's an issue
            let config = Config::load().await?;
            handle_build_index_command(build_args, &config).await
        }
        Command::Analyze(analyze_args) => {
            let config = Config::load().await?;
            handle_analyze_command(analyze_args, &config).await
        }
    }
}
