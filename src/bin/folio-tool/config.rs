use std::env;
use std::path::{Path, PathBuf};

use folio::config::{read_config, Config};

pub(crate) const CFG_FILE_NAME: &str = "folio.toml";

fn get_config_path() -> Option<PathBuf> {
    let exe_dir = env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf));

    [exe_dir, env::current_dir().ok(), dirs::config_dir()]
        .into_iter()
        .flatten()
        .map(|dir| dir.join(CFG_FILE_NAME))
        .find(|path| path.exists())
}

/// An explicit path must exist. Without one, a missing file means defaults.
pub(crate) fn open_config(cfg_path: Option<PathBuf>) -> anyhow::Result<Config> {
    match cfg_path.or_else(get_config_path) {
        Some(path) => Ok(read_config(&path)?),
        None => Ok(Config::default()),
    }
}
