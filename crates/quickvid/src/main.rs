use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use quickvid::cli::{Cli, Commands};
use quickvid::core::feedback::FeedbackThrottle;
use quickvid::core::{init_logger, log_startup_configuration, web_server, Config};
use quickvid::download::{DownloadPipeline, DownloadRequest, LocalSink, PipelineOutcome, PipelineSettings, ProcessTools, Quality};
use quickvid::storage::{create_pool, SqliteFeedbackStore};
use quickvid::telegram::{create_bot, run_dispatcher, setup_bot_commands, EventRouter, TelegramSink};

/// Main entry point
///
/// Parses CLI arguments and dispatches to the bot or the one-shot download.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    // Log panics from handler tasks instead of losing them on stderr
    std::panic::set_hook(Box::new(|panic_info| {
        log::error!("Panic caught: {:?}", panic_info);
        if let Some(location) = panic_info.location() {
            log::error!("Panic at {}:{}:{}", location.file(), location.line(), location.column());
        }
        if let Some(msg) = panic_info.payload().downcast_ref::<&str>() {
            log::error!("Panic message: {}", msg);
        }
    }));

    let config = Config::from_env()?;
    init_logger(&config.log_file_path, config.log_level)?;

    match cli.command {
        Some(Commands::Run) => run_bot(config).await,
        Some(Commands::Download { url, quality, output }) => run_cli_download(config, url, quality, output).await,
        None => {
            log::info!("No command specified, running bot in default mode");
            run_bot(config).await
        }
    }
}

async fn run_bot(config: Config) -> Result<()> {
    log_startup_configuration(&config);

    let pool = create_pool(&config.database_path)
        .map_err(|e| anyhow::anyhow!("Failed to create database pool: {}", e))?;
    let feedback = FeedbackThrottle::new(Arc::new(SqliteFeedbackStore::new(pool)));

    let bot = create_bot(&config)?;
    if let Err(e) = setup_bot_commands(&bot).await {
        log::warn!("Failed to set bot commands: {}", e);
    }

    let tools = ProcessTools::from_config(&config);
    tools.log_availability().await;

    let sink = Arc::new(TelegramSink::new(bot.clone()));
    let pipeline = DownloadPipeline::new(Arc::new(tools), sink.clone(), PipelineSettings::from_config(&config));
    let router = Arc::new(EventRouter::new(sink, pipeline, feedback));

    let bind_addr = config.bind_addr();
    let version = config.version.clone();
    tokio::spawn(async move {
        if let Err(e) = web_server::start_web_server(&bind_addr, &version).await {
            log::error!("Health server stopped: {}", e);
        }
    });

    log::info!("✅ Bot is running...");
    run_dispatcher(bot, router).await;
    log::info!("Dispatcher shutdown gracefully");

    Ok(())
}

async fn run_cli_download(config: Config, url: String, quality: Quality, output: PathBuf) -> Result<()> {
    println!("🎬 QuickVid CLI Download");
    println!("========================");
    println!("URL: {}", url);
    println!("Quality: {}", quality);

    // Private artifact directory, so cleanup can never touch files in `output`
    let work_dir = config.download_folder.join(format!("cli-{}", std::process::id()));
    let tools = ProcessTools::from_config(&config);
    let sink = Arc::new(LocalSink::new(output));
    let pipeline = DownloadPipeline::new(Arc::new(tools), sink, PipelineSettings::new(&work_dir));

    let request = DownloadRequest {
        chat_id: 0,
        url,
        quality,
    };
    let outcome = pipeline.run(request).await;
    if let Err(e) = fs_err::tokio::remove_dir(&work_dir).await {
        log::warn!("Failed to remove {}: {}", work_dir.display(), e);
    }

    match outcome {
        PipelineOutcome::Delivered { .. } => Ok(()),
        PipelineOutcome::Failed { state, error } => Err(anyhow::anyhow!("Download failed in {}: {}", state, error)),
    }
}
