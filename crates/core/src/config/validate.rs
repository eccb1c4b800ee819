use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - At least one conversion worker
/// - Server port is not 0
/// - Tool paths are not empty
/// - Timeout, when set, is not 0
/// - Thumbnail seek offset is a finite, non-negative number
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.conversion.workers == 0 {
        return Err(ConfigError::ValidationError(
            "conversion.workers must be at least 1".to_string(),
        ));
    }

    // Server validation
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    // Tools validation
    for (key, path) in [
        ("tools.ffmpeg_path", &config.tools.ffmpeg_path),
        ("tools.magick_path", &config.tools.magick_path),
    ] {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(format!(
                "{} cannot be empty",
                key
            )));
        }
    }

    if config.tools.timeout_secs == Some(0) {
        return Err(ConfigError::ValidationError(
            "tools.timeout_secs cannot be 0 (omit it to disable the timeout)".to_string(),
        ));
    }

    let seek = config.tools.thumbnail_seek_secs;
    if !seek.is_finite() || seek < 0.0 {
        return Err(ConfigError::ValidationError(format!(
            "tools.thumbnail_seek_secs must be a non-negative number of seconds, got {}",
            seek
        )));
    }

    Ok(())
}
