pub mod artifact;
pub mod config;
pub mod error;
pub mod network;
pub mod project;
pub mod solidity;

mod deployer;
mod formatting;
mod wallet;

pub use artifact::{Artifact, ContractFactory};
pub use config::run;
pub use deployer::{deploy, Deployment};
pub use error::Error;
pub use project::ProjectConfig;
pub use solidity::compile;
