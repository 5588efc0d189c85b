use std::{env, io, path::PathBuf};

use anyhow::{Context, Result};

const APPLICATION_DIR: &str = "calsight";

#[cfg(not(windows))]
fn home_subdir(subdir: &str) -> Result<PathBuf> {
    let home = env::var("HOME").context("Couldn't find HOME")?;
    Ok(PathBuf::from(home).join(subdir))
}

/// Directory for application data: calendar exports and logs. Created if missing.
pub fn create_application_default_path() -> Result<PathBuf> {
    let path = {
        #[cfg(windows)]
        {
            let mut path = PathBuf::from(
                env::var("APPDATA").context("APPDATA should be present on Windows")?,
            );
            path.push(APPLICATION_DIR);
            path
        }
        #[cfg(not(windows))]
        {
            let mut path = match env::var("XDG_STATE_HOME") {
                Ok(v) => PathBuf::from(v),
                Err(_) => home_subdir(".local/state")?,
            };
            path.push(APPLICATION_DIR);
            path
        }
    };

    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

/// Directory the rule file is looked up in. Not created, the rule file is optional.
pub fn application_config_path() -> Result<PathBuf> {
    #[cfg(windows)]
    {
        let mut path =
            PathBuf::from(env::var("APPDATA").context("APPDATA should be present on Windows")?);
        path.push(APPLICATION_DIR);
        Ok(path)
    }
    #[cfg(not(windows))]
    {
        let mut path = match env::var("XDG_CONFIG_HOME") {
            Ok(v) => PathBuf::from(v),
            Err(_) => home_subdir(".config")?,
        };
        path.push(APPLICATION_DIR);
        Ok(path)
    }
}
