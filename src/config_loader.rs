//! Configuration-file loader (component 4.L, entrypoint collaborator).
//!
//! Line-oriented `NAME=VALUE` text, grounded loosely in the older
//! `readconfig.c`'s line-parsing approach but expressed idiomatically
//! rather than via a hashtable of `char*`. Lives outside the core per
//! §1 — the core only ever consumes a built [`Config`].

use crate::config::{Config, Key};
use crate::errors::ConfigError;
use std::io;
use std::path::Path;

/// Parses `NAME=VALUE` text into a [`Config`]. Blank lines and lines
/// starting with `#` are skipped. Unknown names are ignored with a logged
/// warning. `PORT`, `NTHREADS`, and `QUEUE_SIZE` that fail to parse as
/// `i32` fall back to their defaults with a logged warning — except
/// `PORT`, which has no sane default and fails the whole load.
pub fn load_from_str(contents: &str) -> Result<Config, ConfigError> {
    let mut config = Config::new();
    let mut port_raw = None;

    for (lineno, raw_line) in contents.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let Some((name, value)) = line.split_once('=') else {
            tracing::warn!(line = lineno + 1, "malformed config line, skipping");
            continue;
        };
        let (name, value) = (name.trim(), value.trim());

        let Some(key) = Key::from_name(name) else {
            tracing::warn!(name, "unknown configuration key, ignoring");
            continue;
        };

        match key {
            Key::Port => port_raw = Some(value),
            Key::Nthreads | Key::QueueSize => {
                if config.add_int_from_str(key.name(), value).is_err() {
                    tracing::warn!(name, value, "invalid integer, falling back to default");
                }
            }
            Key::Address | Key::Webroot | Key::MimeFile => {
                let _ = config.add_str(key.name(), value);
            }
        }
    }

    match port_raw {
        Some(raw) => config.add_int_from_str(Key::Port.name(), raw).map_err(|e| {
            tracing::error!(value = raw, "PORT is not a valid integer");
            e
        })?,
        None => {
            tracing::error!("PORT is required and was not present in the config file");
            return Err(ConfigError::NotFound);
        }
    }

    Ok(config)
}

/// Reads `path` and parses it. The only I/O boundary in this module — the
/// parsing itself ([`load_from_str`]) stays synchronous and file-free so
/// it's cheap to test with literal strings.
pub async fn load_from_path(path: &Path) -> io::Result<Config> {
    let contents = tokio::fs::read_to_string(path).await?;
    load_from_str(&contents).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_recognized_keys() {
        let config = load_from_str(
            "ADDRESS=127.0.0.1\nPORT=8080\nWEBROOT=/www\nNTHREADS=4\nQUEUE_SIZE=50\nMIME_FILE=mime.types\n",
        )
        .unwrap();
        assert_eq!(config.get_str_key(Key::Address), Ok("127.0.0.1"));
        assert_eq!(config.get_int_key(Key::Port), Ok(8080));
        assert_eq!(config.get_str_key(Key::Webroot), Ok("/www"));
        assert_eq!(config.get_int_key(Key::Nthreads), Ok(4));
        assert_eq!(config.get_int_key(Key::QueueSize), Ok(50));
        assert_eq!(config.get_str_key(Key::MimeFile), Ok("mime.types"));
    }

    #[test]
    fn blank_and_comment_lines_are_skipped() {
        let config = load_from_str("# a comment\n\nPORT=80\n").unwrap();
        assert_eq!(config.get_int_key(Key::Port), Ok(80));
    }

    #[test]
    fn unknown_keys_are_ignored_not_fatal() {
        let config = load_from_str("PORT=80\nBOGUS_KEY=value\n").unwrap();
        assert_eq!(config.get_int_key(Key::Port), Ok(80));
        assert_eq!(config.get_str("BOGUS_KEY"), Err(ConfigError::NotFound));
    }

    #[test]
    fn invalid_nthreads_falls_back_silently() {
        let config = load_from_str("PORT=80\nNTHREADS=not_a_number\n").unwrap();
        assert_eq!(config.get_int_key(Key::Nthreads), Err(ConfigError::NotFound));
    }

    #[test]
    fn missing_port_is_an_error() {
        assert_eq!(load_from_str("ADDRESS=127.0.0.1\n").unwrap_err(), ConfigError::NotFound);
    }

    #[test]
    fn unparseable_port_is_an_error() {
        assert_eq!(load_from_str("PORT=notaport\n").unwrap_err(), ConfigError::BadArguments);
    }

    #[tokio::test]
    async fn load_from_path_reads_and_parses_a_file() {
        let mut path = std::env::temp_dir();
        path.push(format!("originserver-config-test-{}.cfg", std::process::id()));
        tokio::fs::write(&path, "PORT=9090\n").await.unwrap();

        let config = load_from_path(&path).await.unwrap();
        assert_eq!(config.get_int_key(Key::Port), Ok(9090));

        let _ = tokio::fs::remove_file(&path).await;
    }
}
