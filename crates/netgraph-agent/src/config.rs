use anyhow::Context;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentConfig {
    /// Base URL of the router-control API.
    pub base_url: String,
    /// Bearer token attached to every request, if the backend wants one.
    pub token: Option<String>,
    pub interval_secs: u64,
    pub hide_down: bool,
    pub hide_docker: bool,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:6300/api".to_string(),
            token: None,
            interval_secs: 5,
            hide_down: true,
            hide_docker: false,
        }
    }
}

fn config_file_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "netgraph")?;
    Some(proj.config_dir().join("agent.toml"))
}

pub fn load_or_default() -> AgentConfig {
    let Some(path) = config_file_path() else {
        return AgentConfig::default();
    };
    load_or_default_from_path(&path)
}

fn load_or_default_from_path(path: &Path) -> AgentConfig {
    let Ok(contents) = fs::read_to_string(path) else {
        return AgentConfig::default();
    };
    toml::from_str(&contents).unwrap_or_else(|_| AgentConfig::default())
}

/// Command-line flags override whatever the config file said.
pub fn parse_args() -> anyhow::Result<AgentConfig> {
    parse_args_from(std::env::args_os().skip(1), load_or_default())
}

fn parse_args_from<I>(args: I, mut cfg: AgentConfig) -> anyhow::Result<AgentConfig>
where
    I: IntoIterator<Item = OsString>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--url" {
            let Some(value) = args.next() else {
                anyhow::bail!("--url expects a value");
            };
            cfg.base_url = value.to_string_lossy().into_owned();
        } else if arg == "--token" {
            let Some(value) = args.next() else {
                anyhow::bail!("--token expects a value");
            };
            cfg.token = Some(value.to_string_lossy().into_owned());
        } else if arg == "--interval" {
            let Some(value) = args.next() else {
                anyhow::bail!("--interval expects seconds");
            };
            cfg.interval_secs = value
                .to_string_lossy()
                .parse()
                .context("--interval expects a whole number of seconds")?;
        } else if arg == "--show-down" {
            cfg.hide_down = false;
        } else if arg == "--hide-docker" {
            cfg.hide_docker = true;
        } else {
            anyhow::bail!("unknown argument: {:?}", arg);
        }
    }
    Ok(cfg)
}
