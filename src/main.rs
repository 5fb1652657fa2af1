use anyhow::Context;
use qwopevolve::config::ConfigManager;
use qwopevolve::engines::control::{ActionExecutor, CommandDriver, TesseractExtractor};
use qwopevolve::engines::generation::{
    BestLog, EvolutionEngine, GenerationRunner, LogProgressCallback,
};
use qwopevolve::Orchestrator;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

fn main() -> anyhow::Result<()> {
    // Usage: qwopevolve [CONFIG.toml]
    let config_path = std::env::args().nth(1).map(PathBuf::from);

    let manager = ConfigManager::new();
    manager
        .load(config_path.as_deref())
        .context("Failed to load configuration")?;
    let config = manager.get();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.log_level.as_str()),
    )
    .init();

    let interrupt = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&interrupt);
    ctrlc::set_handler(move || {
        log::info!("Interrupt received, finishing up...");
        handler_flag.store(true, Ordering::SeqCst);
    })
    .context("Failed to install interrupt handler")?;

    let driver = CommandDriver::new(config.driver.clone());
    let executor = ActionExecutor::new(driver, config.environment.clone(), config.capture.clone())
        .context("Failed to prepare capture directories")?;
    let extractor = Arc::new(TesseractExtractor::new(config.driver.ocr.clone()));
    let runner = GenerationRunner::new(
        executor,
        extractor,
        config.observer.clone(),
        &config.evolution,
        Arc::clone(&interrupt),
    );

    let engine = EvolutionEngine::new(config.evolution.clone());
    let mut orchestrator = Orchestrator::new(
        engine,
        runner,
        BestLog::new(&config.best_log_path),
        LogProgressCallback,
        interrupt,
    );

    let summary = orchestrator
        .run(config.evolution.max_generations)
        .context("Evolution run failed")?;

    log::info!("Completed {} generation(s)", summary.generations);
    if let Some(best) = summary.best {
        log::info!(
            "Best final score: {:.4} (distance {})",
            best.composite_fitness,
            best.raw_score
        );
    }
    Ok(())
}
