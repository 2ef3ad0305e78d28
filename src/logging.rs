use log::LevelFilter;
use std::io::Write;

/// Logs to stderr; `RUST_LOG` overrides the level picked from `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level).parse_default_env().format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] - {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if builder.try_init().is_ok() {
        log::debug!("Logging initialized with level: {level}");
    }
}
