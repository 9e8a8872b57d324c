use std::io::ErrorKind;
use std::path::PathBuf;
use std::{env, fs, io};

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ContentSettings {
    /// Hosts treated as our own site. Links to them (or their subdomains) are internal.
    pub own_domains: Vec<String>,
    /// Appends -2, -3... to repeated heading ids. Off keeps duplicate ids as authored.
    pub dedupe_heading_ids: bool,
}

impl Default for ContentSettings {
    fn default() -> Self {
        ContentSettings {
            own_domains: vec!["localhost".to_string()],
            dedupe_heading_ids: false,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    pub level: LogLevel,
    pub log_to_console: bool,
    pub location: Option<PathBuf>,
}

#[derive(Deserialize, Debug, Copy, Clone, PartialEq)]
pub enum LogLevel {
    Critical = 0,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub content: ContentSettings,
    pub log: Option<Log>,
}

fn parse_path(path: PathBuf) -> PathBuf {
    if !path.starts_with("${exe_dir}") {
        return path;
    }

    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|p| p.to_string_lossy().to_string()));
    match exe_dir {
        Some(exe_dir) => PathBuf::from(path.to_string_lossy().replace("${exe_dir}", &exe_dir)),
        None => path,
    }
}

pub fn parse_config(cfg_content: &str) -> io::Result<Config> {
    let mut cfg: Config = match toml::from_str::<Config>(cfg_content) {
        Ok(cfg) => cfg,
        Err(e) => return Err(io::Error::new(
            ErrorKind::InvalidData, format!("Error parsing configuration file: {}", e))),
    };

    if let Some(ref mut log) = cfg.log {
        log.location = log.location.take().map(parse_path);
    }

    Ok(cfg)
}

pub fn read_config(cfg_path: &PathBuf) -> io::Result<Config> {
    let cfg_content = match fs::read_to_string(cfg_path) {
        Ok(content) => content,
        Err(e) => return Err(io::Error::new(e.kind(), format!("Error opening configuration file {}: {}", cfg_path.display(), e))),
    };

    parse_config(&cfg_content)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let cfg = parse_config(r##"
[content]
own_domains = ["example.com", "localhost"]
dedupe_heading_ids = true

[log]
level = "Debug"
log_to_console = false
location = "logs/folio.log"
"##).unwrap();

        assert_eq!(cfg.content.own_domains, ["example.com", "localhost"]);
        assert!(cfg.content.dedupe_heading_ids);
        let log = cfg.log.unwrap();
        assert_eq!(log.level, LogLevel::Debug);
        assert!(!log.log_to_console);
        assert_eq!(log.location, Some(PathBuf::from("logs/folio.log")));
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.content.own_domains, ["localhost"]);
        assert!(!cfg.content.dedupe_heading_ids);
    }

    #[test]
    fn test_partial_content_section() {
        let cfg = parse_config("[content]\ndedupe_heading_ids = true\n").unwrap();
        assert_eq!(cfg.content.own_domains, ["localhost"]);
        assert!(cfg.content.dedupe_heading_ids);
    }

    #[test]
    fn test_invalid_config() {
        let err = parse_config("[content]\nown_domains = 12\n").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidData);
        assert!(err.to_string().starts_with("Error parsing configuration file"));
    }

    #[test]
    fn test_missing_config_file() {
        let err = read_config(&PathBuf::from("does/not/exist/folio.toml")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
