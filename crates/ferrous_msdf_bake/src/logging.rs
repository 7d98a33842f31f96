//! Console logging for the bake tool.

use log::LevelFilter;

/// Route `log` records to stderr as `[LEVEL target] message`.  Dependency
/// noise (the `image` encoders) is capped at `warn`.
pub fn init(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                message
            ))
        })
        .level(LevelFilter::Warn)
        .level_for("ferrous_msdf", level)
        .level_for("ferrous_msdf_bake", level)
        .chain(std::io::stderr())
        .apply()
}
