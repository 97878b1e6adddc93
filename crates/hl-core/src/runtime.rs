//! Process-level runtime utilities: dual logging and graceful shutdown.
//!
//! Only compiled for binaries (`server` feature); the reducers and ledger
//! never call into this module.

/// Initialize dual logging (terminal + file) with a timestamped log file.
/// Creates a `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn init_logging() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config,
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register a hard Ctrl+C handler for immediate termination.
#[cfg(feature = "server")]
pub fn install_hard_interrupt() {
    tokio::spawn(async move {
        tokio::signal::ctrl_c().await.unwrap();
        println!();
        log::warn!("hard interrupt received, exiting immediately");
        std::process::exit(0);
    });
}

#[cfg(feature = "server")]
static INTERRUPTED: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(false);

/// Check whether graceful shutdown was requested (via stdin "Q").
#[cfg(feature = "server")]
pub fn interrupted() -> bool {
    INTERRUPTED.load(std::sync::atomic::Ordering::Relaxed)
}
#[cfg(not(feature = "server"))]
pub fn interrupted() -> bool {
    false
}

/// Register a soft interrupt: type "Q" + Enter on stdin to request that the
/// server finish the in-flight hand and shut down at the next table boundary.
#[cfg(feature = "server")]
pub fn install_soft_interrupt() {
    std::thread::spawn(|| loop {
        let mut buffer = String::new();
        if std::io::stdin().read_line(&mut buffer).is_ok() {
            if buffer.trim().eq_ignore_ascii_case("q") {
                log::warn!("graceful shutdown requested, finishing in-flight hands...");
                INTERRUPTED.store(true, std::sync::atomic::Ordering::Relaxed);
                break;
            }
        }
    });
}
