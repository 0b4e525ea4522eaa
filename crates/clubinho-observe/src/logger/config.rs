use std::io::IsTerminal;

use serde::Deserialize;

use crate::logger::format::LoggerFormat;

/// Logger settings, embeddable in a host app's own config file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub format: LoggerFormat,
    /// An `EnvFilter` directive, e.g. `info` or `info,clubinho.core=debug`.
    pub level: String,
    pub with_targets: bool,
    pub use_color: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        let use_color = cfg!(test) || std::io::stdout().is_terminal();
        Self {
            format: LoggerFormat::Text,
            level: "info".to_string(),
            with_targets: true,
            use_color,
        }
    }
}
