use crate::config::{LogFormat, LogSpanEvents, Mode, ScopeConfig};
use anyhow::Context;
use encoding_rs_io::DecodeReaderBytes;
use etcetera::BaseStrategy;
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

const DEFAULT_CONFIG_FILE: &str = "hoplen.toml";
const DEFAULT_HIDDEN_CONFIG_FILE: &str = ".hoplen.toml";

/// Read the config from the default location of user config for the platform.
///
/// Returns the parsed `Some(ConfigFile)` if the config file exists, `None` otherwise.
///
/// Hoplen will attempt to locate a `hoplen.toml` or `.hoplen.toml`
/// config file in one of the following locations:
///     - the current directory
///     - the user home directory
///     - the XDG config directory (Unix only): `$XDG_CONFIG_HOME` or `~/.config`
///     - the XDG app config directory (Unix only): `$XDG_CONFIG_HOME/hoplen` or `~/.config/hoplen`
///     - the Windows data directory (Windows only): `%APPDATA%`
///
/// Only the first config file found is used.
pub fn read_default_config_file() -> anyhow::Result<Option<ConfigFile>> {
    use etcetera::base_strategy as base;
    if let Some(file) = read_files("")? {
        Ok(Some(file))
    } else {
        let basedirs = base::choose_base_strategy()?;
        if let Some(file) = read_files(basedirs.home_dir())? {
            Ok(Some(file))
        } else if let Some(file) = read_files(basedirs.config_dir())? {
            Ok(Some(file))
        } else if let Some(file) = read_files(basedirs.config_dir().join("hoplen"))? {
            Ok(Some(file))
        } else {
            Ok(None)
        }
    }
}

/// Read the config from the given path.
pub fn read_config_file<P: AsRef<Path>>(path: P) -> anyhow::Result<ConfigFile> {
    let file = File::open(path.as_ref())
        .with_context(|| format!("config file not found: {}", path.as_ref().display()))?;
    let mut decoder = DecodeReaderBytes::new(BufReader::new(file));
    let mut dest = String::new();
    decoder.read_to_string(&mut dest)?;
    toml::from_str(&dest)
        .with_context(|| format!("invalid config file: {}", path.as_ref().display()))
}

fn read_files<P: AsRef<Path>>(dir: P) -> anyhow::Result<Option<ConfigFile>> {
    if let Some(file) = read_file(dir.as_ref(), DEFAULT_CONFIG_FILE)? {
        Ok(Some(file))
    } else if let Some(file) = read_file(dir.as_ref(), DEFAULT_HIDDEN_CONFIG_FILE)? {
        Ok(Some(file))
    } else {
        Ok(None)
    }
}

fn read_file<P: AsRef<Path>>(dir: P, file: &str) -> anyhow::Result<Option<ConfigFile>> {
    let path = dir.as_ref().join(file);
    if path.exists() {
        tracing::debug!(path = %path.display(), "reading config file");
        Ok(Some(read_config_file(path)?))
    } else {
        Ok(None)
    }
}

#[derive(Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigFile {
    pub hoplen: Option<ConfigHoplen>,
    pub encoding: Option<ConfigEncoding>,
    pub report: Option<ConfigReport>,
}

#[derive(Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigHoplen {
    pub mode: Option<Mode>,
    pub log_format: Option<LogFormat>,
    pub log_filter: Option<String>,
    pub log_span_events: Option<LogSpanEvents>,
}

#[derive(Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigEncoding {
    pub base_size: Option<u32>,
    pub conn_id_multiplier: Option<u32>,
    pub hop_multiplier: Option<Vec<u32>>,
    pub overhead_min: Option<u32>,
    pub overhead_max: Option<u32>,
    pub header_size: Option<u32>,
    pub first_ttl: Option<u8>,
    pub max_ttl: Option<u8>,
    pub connection_buckets: Option<u16>,
    pub scope: Option<ScopeConfig>,
}

#[derive(Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigReport {
    pub max_examples: Option<usize>,
    pub concurrent_connections: Option<usize>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_config_sample() {
        let config: ConfigFile =
            toml::from_str(include_str!("../../hoplen-config-sample.toml")).unwrap();
        let expected = ConfigFile {
            hoplen: Some(ConfigHoplen {
                mode: Some(Mode::Pretty),
                log_format: Some(LogFormat::Pretty),
                log_filter: Some(String::from("hoplen=debug")),
                log_span_events: Some(LogSpanEvents::Off),
            }),
            encoding: Some(ConfigEncoding {
                base_size: Some(100),
                conn_id_multiplier: Some(97),
                hop_multiplier: Some(vec![50]),
                overhead_min: Some(80),
                overhead_max: Some(110),
                header_size: Some(8),
                first_ttl: Some(1),
                max_ttl: Some(30),
                connection_buckets: Some(10),
                scope: Some(ScopeConfig::WithinConnection),
            }),
            report: Some(ConfigReport {
                max_examples: Some(3),
                concurrent_connections: None,
            }),
        };
        assert_eq!(expected, config);
    }

    #[test]
    fn test_parse_empty() {
        let config: ConfigFile = toml::from_str("").unwrap();
        assert_eq!(ConfigFile::default(), config);
    }

    #[test]
    fn test_parse_unknown_field() {
        let err = toml::from_str::<ConfigFile>("[encoding]\nhop-size = 3\n")
            .unwrap_err();
        assert!(err.to_string().contains("unknown field `hop-size`"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_config_file("does-not-exist.toml").unwrap_err();
        assert_eq!(
            "config file not found: does-not-exist.toml",
            err.to_string()
        );
    }
}
