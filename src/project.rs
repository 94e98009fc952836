use std::{
    collections::BTreeMap,
    env, fs, io,
    path::{Path, PathBuf},
};

use owo_colors::OwoColorize;

use crate::{
    error::{Error, Result},
    network::{Accounts, NetworkProfile},
};

pub const PRIVATE_KEY_VAR: &str = "PRIVATE_KEY";
pub const INFURA_ID_VAR: &str = "INFURA_ID";
pub const ETHERSCAN_API_KEY_VAR: &str = "ETHERSCAN_API_KEY";

pub const DEFAULT_NETWORK: &str = "bsctestnet";
pub const SOLC_VERSION: &str = "0.8.9";
pub const OPTIMIZER_RUNS: u32 = 200;

const LOCAL_URL: &str = "http://127.0.0.1:8545";
const GOERLI_URL: &str = "https://goerli.infura.io/v3/";
const BSC_TESTNET_URL: &str = "https://data-seed-prebsc-1-s1.binance.org:8545";

/// Raw inputs read from the process environment.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub private_key: Option<String>,
    pub infura_id: Option<String>,
    pub etherscan_api_key: Option<String>,
}

impl Environment {
    /// Reads the environment, after loading `<root>/.env` if there is one.
    ///
    /// Variables already set in the process take precedence over the file.
    pub fn from_process(root: &Path) -> Self {
        let path = root.join(".env");
        if dotenvy::from_path(&path).is_ok() {
            tracing::debug!(path = %path.display(), "loaded .env");
        }

        Self {
            private_key: env::var(PRIVATE_KEY_VAR).ok(),
            infura_id: env::var(INFURA_ID_VAR).ok(),
            etherscan_api_key: env::var(ETHERSCAN_API_KEY_VAR).ok(),
        }
    }
}

/// Project configuration, built once at startup and handed to every command.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    pub default_network: String,
    pub networks: BTreeMap<String, NetworkProfile>,
    pub solidity: SolidityConfig,
    pub etherscan: EtherscanConfig,
    pub paths: Paths,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidityConfig {
    pub version: String,
    pub optimizer: Optimizer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Optimizer {
    pub enabled: bool,
    pub runs: u32,
}

/// Contract verification service settings. Not used when deploying.
#[derive(Debug, Clone, Default)]
pub struct EtherscanConfig {
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paths {
    pub root: PathBuf,
    pub sources: PathBuf,
    pub tests: PathBuf,
    pub cache: PathBuf,
    pub artifacts: PathBuf,
}

impl ProjectConfig {
    /// Builds the configuration from the process environment.
    pub fn from_env(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self::new(&Environment::from_process(&root), root)
    }

    /// Builds the configuration from explicit inputs.
    ///
    /// Never fails: credentials are stored as given and only parsed when a
    /// transaction is signed.
    pub fn new(env: &Environment, root: impl Into<PathBuf>) -> Self {
        let key = format!("0x{}", env.private_key.as_deref().unwrap_or_default());
        let infura_id = env.infura_id.as_deref().unwrap_or_default();

        let networks = [
            NetworkProfile::new("hardhat", LOCAL_URL, Accounts::Remote),
            NetworkProfile::new(
                "goerli",
                format!("{GOERLI_URL}{infura_id}"),
                Accounts::PrivateKeys(vec![key.clone()]),
            ),
            NetworkProfile::new(
                "bsctestnet",
                BSC_TESTNET_URL,
                Accounts::PrivateKeys(vec![key]),
            ),
        ]
        .into_iter()
        .map(|profile| (profile.name.clone(), profile))
        .collect();

        Self {
            default_network: DEFAULT_NETWORK.to_owned(),
            networks,
            solidity: SolidityConfig {
                version: SOLC_VERSION.to_owned(),
                optimizer: Optimizer {
                    enabled: true,
                    runs: OPTIMIZER_RUNS,
                },
            },
            etherscan: EtherscanConfig {
                api_key: env.etherscan_api_key.clone(),
            },
            paths: Paths::new(root),
        }
    }

    /// Selects a network profile by name, or the default one.
    pub fn network(&self, name: Option<&str>) -> Result<&NetworkProfile> {
        let name = name.unwrap_or(self.default_network.as_str());
        self.networks.get(name).ok_or_else(|| Error::UnknownNetwork {
            name: name.to_owned(),
            known: self.networks.keys().cloned().collect::<Vec<_>>().join(", "),
        })
    }

    /// Prints the resolved configuration with credentials redacted.
    pub fn print(&self) {
        println!("default network: {}", self.default_network.bright_magenta());
        println!("networks:");
        for profile in self.networks.values() {
            println!(
                "  {}: {} ({})",
                profile.name.bold(),
                profile.redacted_url(),
                profile.accounts.describe()
            );
        }
        println!(
            "solidity: {} (optimizer {}, runs {})",
            self.solidity.version,
            if self.solidity.optimizer.enabled { "on" } else { "off" },
            self.solidity.optimizer.runs
        );
        let api_key = match self.etherscan.api_key {
            Some(_) => "set".bright_green().to_string(),
            None => "unset".yellow().to_string(),
        };
        println!("etherscan api key: {api_key}");
        println!("paths:");
        println!("  sources: {}", self.paths.sources.display());
        println!("  tests: {}", self.paths.tests.display());
        println!("  cache: {}", self.paths.cache.display());
        println!("  artifacts: {}", self.paths.artifacts.display());
    }
}

impl Paths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            sources: root.join("contracts"),
            tests: root.join("test"),
            cache: root.join("cache"),
            artifacts: root.join("artifacts"),
            root,
        }
    }

    /// Removes the cache and artifacts directories.
    pub fn clean(&self) -> Result<()> {
        for dir in [&self.cache, &self.artifacts] {
            remove_dir(dir)?;
        }
        Ok(())
    }
}

fn remove_dir(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => {
            tracing::info!(dir = %dir.display(), "removed");
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
