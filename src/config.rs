use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::WrapErr;

use crate::project::ProjectConfig;

/// Name of the contract deployed when none is given.
pub const CONTRACT_NAME: &str = "CasinoBankRoll";

/// Main entrypoint to `bankroll`.
pub fn run() -> eyre::Result<()> {
    let config = Config::parse();
    let project = ProjectConfig::from_env(config.root.clone());
    config.command.run(&project)
}

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Config {
    /// Project root; `.env`, sources, cache and artifacts live below it.
    #[arg(long, global = true, default_value = ".")]
    pub root: PathBuf,
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(name = "deploy")]
    Deploy(Deploy),
    #[command(name = "compile")]
    Compile(Compile),
    #[command(name = "clean")]
    Clean(Clean),
    #[command(name = "config")]
    Show(Show),
}

impl Commands {
    pub fn run(&self, project: &ProjectConfig) -> eyre::Result<()> {
        match self {
            Commands::Deploy(command) => command.run(project),
            Commands::Compile(command) => command.run(project),
            Commands::Clean(command) => command.run(project),
            Commands::Show(command) => command.run(project),
        }
    }
}

/// Deploy a compiled contract.
#[derive(Parser, Debug)]
pub struct Deploy {
    /// Network to deploy to. Defaults to the project's default network.
    #[arg(long, env = "BANKROLL_NETWORK")]
    pub network: Option<String>,
    /// Name of the contract whose artifact gets deployed.
    #[arg(long, default_value = CONTRACT_NAME)]
    pub contract: String,
}

impl Deploy {
    pub fn run(&self, project: &ProjectConfig) -> eyre::Result<()> {
        crate::deploy(project, self)?;
        Ok(())
    }
}

/// Compile the project's Solidity sources into artifacts.
#[derive(Parser, Debug)]
pub struct Compile {}

impl Compile {
    pub fn run(&self, project: &ProjectConfig) -> eyre::Result<()> {
        crate::compile(project).wrap_err("failed to compile contracts")?;
        Ok(())
    }
}

/// Remove the cache and artifacts directories.
#[derive(Parser, Debug)]
pub struct Clean {}

impl Clean {
    pub fn run(&self, project: &ProjectConfig) -> eyre::Result<()> {
        project.paths.clean().wrap_err("failed to clean build outputs")
    }
}

/// Print the resolved project configuration.
#[derive(Parser, Debug)]
pub struct Show {}

impl Show {
    pub fn run(&self, project: &ProjectConfig) -> eyre::Result<()> {
        project.print();
        Ok(())
    }
}
