use crate::config::{Cli, Command, PipelineConfig};
use crate::error::WatchError;
use crate::pipeline::{TransformPipeline, TransformResult};
use crate::watcher::DirectoryWatcher;
use crossbeam_channel::{bounded, Receiver};
use std::path::PathBuf;
use std::process::ExitCode;

pub fn run(cli: Cli) -> ExitCode {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .try_init();

    let config = cli.pipeline_config();
    match cli.command.unwrap_or(Command::Watch) {
        Command::Watch => match watch_until_interrupted(config) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                log::error!("{err}");
                ExitCode::FAILURE
            }
        },
        Command::Process { files } => {
            if process_files(config, &files) {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

/// Blocks until Ctrl-C (or SIGTERM), then stops the watcher and returns.
pub fn watch_until_interrupted(config: PipelineConfig) -> Result<(), WatchError> {
    let (interrupt_tx, interrupt_rx) = bounded::<()>(1);
    ctrlc::set_handler(move || {
        let _ = interrupt_tx.try_send(());
    })?;
    watch(config, &interrupt_rx)
}

/// Runs the watcher until `shutdown` yields a value or disconnects.
pub fn watch(config: PipelineConfig, shutdown: &Receiver<()>) -> Result<(), WatchError> {
    if config.roots.overlaps() {
        log::warn!(
            "Output root {} is inside input root {}; written files will trigger further events",
            config.roots.output_root().display(),
            config.roots.input_root().display()
        );
    }

    let input = config.roots.input_root().to_path_buf();
    let output = config.roots.output_root().to_path_buf();
    let mut watcher = DirectoryWatcher::new(TransformPipeline::new(config))?;
    watcher.start()?;
    log::info!("SERVICE IS RUNNING ...");
    log::info!("Watching {} -> {}", input.display(), output.display());

    let _ = shutdown.recv();
    log::info!("Stopping watcher");
    watcher.stop()
}

/// One pipeline run per file; true when every file was written.
pub fn process_files(config: PipelineConfig, files: &[PathBuf]) -> bool {
    let pipeline = TransformPipeline::new(config);
    files
        .iter()
        .map(|file| pipeline.run_contained(file))
        .fold(true, |all_ok, result| {
            all_ok && result.as_ref().is_some_and(TransformResult::is_written)
        })
}
