use std::fs;
use std::path::{Path, PathBuf};

use ledger_app::LedgerSettings;
use serde::{Deserialize, Serialize};

const CONFIG_DIR_NAME: &str = "usage-ledger";
const CONFIG_FILE_NAME: &str = "config.toml";
const DEFAULT_PORT: u16 = 3845;
const DEFAULT_CLEANUP_INTERVAL_MINUTES: u64 = 60;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CliConfig {
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
    pub default_period_days: i64,
    pub retention_days: i64,
    /// Minutes between scheduled cleanups; 0 turns the scheduler off.
    pub cleanup_interval_minutes: u64,
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        let settings = LedgerSettings::default();
        Self {
            port: DEFAULT_PORT,
            data_dir: None,
            default_period_days: settings.default_period_days,
            retention_days: settings.retention_days,
            cleanup_interval_minutes: DEFAULT_CLEANUP_INTERVAL_MINUTES,
            log_level: "info".to_string(),
        }
    }
}

impl CliConfig {
    pub fn ledger_settings(&self) -> LedgerSettings {
        LedgerSettings {
            default_period_days: self.default_period_days,
            retention_days: self.retention_days,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConfigPaths {
    pub dir: PathBuf,
    pub file: PathBuf,
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: CliConfig,
    pub paths: ConfigPaths,
    pub created: bool,
}

impl ConfigLoad {
    /// Configured data dir, or the directory holding the config file.
    pub fn data_dir(&self) -> PathBuf {
        self.config
            .data_dir
            .clone()
            .unwrap_or_else(|| self.paths.dir.clone())
    }
}

pub fn load_or_create(explicit: Option<&Path>) -> Result<ConfigLoad, String> {
    let file = match explicit {
        Some(path) => path.to_path_buf(),
        None => config_dir()?.join(CONFIG_FILE_NAME),
    };
    load_or_create_at(file)
}

fn load_or_create_at(file: PathBuf) -> Result<ConfigLoad, String> {
    let dir = file
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    fs::create_dir_all(&dir)
        .map_err(|err| format!("create config dir {}: {}", dir.display(), err))?;
    let paths = ConfigPaths { dir, file };

    if paths.file.exists() {
        let contents = fs::read_to_string(&paths.file)
            .map_err(|err| format!("read config {}: {}", paths.file.display(), err))?;
        let config: CliConfig = toml::from_str(&contents)
            .map_err(|err| format!("parse config {}: {}", paths.file.display(), err))?;
        return Ok(ConfigLoad {
            config,
            paths,
            created: false,
        });
    }

    let config = CliConfig::default();
    let contents =
        toml::to_string_pretty(&config).map_err(|err| format!("serialize config: {}", err))?;
    fs::write(&paths.file, contents)
        .map_err(|err| format!("write config {}: {}", paths.file.display(), err))?;

    Ok(ConfigLoad {
        config,
        paths,
        created: true,
    })
}

fn config_dir() -> Result<PathBuf, String> {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME").filter(|dir| !dir.is_empty()) {
        return Ok(PathBuf::from(dir).join(CONFIG_DIR_NAME));
    }
    let home = std::env::var("HOME").map_err(|err| format!("resolve HOME: {}", err))?;
    Ok(PathBuf::from(home).join(".config").join(CONFIG_DIR_NAME))
}
