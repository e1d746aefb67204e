use data::log::Error;

const NOISY_TARGETS: [&str; 4] = ["wgpu_core", "wgpu_hal", "naga", "cosmic_text"];

/// Logs to stdout and to the log file under the data directory.
pub fn setup(level: log::LevelFilter) -> Result<(), Error> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{} [{}] {}: {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ));
        })
        .level(level);

    for target in NOISY_TARGETS {
        dispatch = dispatch.level_for(target, log::LevelFilter::Warn);
    }

    dispatch
        .chain(std::io::stdout())
        .chain(data::log::file()?)
        .apply()?;

    Ok(())
}

/// Parses a level like `"debug"`, falling back to `Info` when unset.
pub fn level_from_env(var: Option<&str>) -> Result<log::LevelFilter, Error> {
    match var {
        Some(value) => Ok(value.parse()?),
        None => Ok(log::LevelFilter::Info),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_parsing() {
        assert_eq!(level_from_env(None).unwrap(), log::LevelFilter::Info);
        assert_eq!(
            level_from_env(Some("debug")).unwrap(),
            log::LevelFilter::Debug
        );
        assert!(level_from_env(Some("loud")).is_err());
    }
}
