use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const ARTIFACT_FORMAT: &str = "hh-sol-artifact-1";

/// Compiled output for a single contract, as stored under the artifacts
/// directory at `<source name>/<contract name>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Artifact {
    #[serde(rename = "_format", default = "default_format")]
    pub format: String,
    pub contract_name: String,
    pub source_name: String,
    pub abi: serde_json::Value,
    pub bytecode: String,
    #[serde(default)]
    pub deployed_bytecode: String,
}

fn default_format() -> String {
    ARTIFACT_FORMAT.to_owned()
}

/// Deploys new instances of a compiled contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractFactory {
    pub name: String,
    pub bytecode: Vec<u8>,
}

impl Artifact {
    /// Where this artifact lives relative to the artifacts directory.
    pub fn relative_path(&self) -> PathBuf {
        Path::new(&self.source_name).join(format!("{}.json", self.contract_name))
    }

    pub fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        serde_json::from_str(&contents).map_err(|e| Error::InvalidArtifact {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    pub fn write(&self, artifacts_dir: &Path) -> Result<PathBuf> {
        let path = artifacts_dir.join(self.relative_path());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|e| Error::InvalidArtifact {
            path: path.clone(),
            reason: e.to_string(),
        })?;
        fs::write(&path, json)?;
        Ok(path)
    }
}

impl ContractFactory {
    /// Looks up the artifact of contract `name` and turns it into a factory.
    pub fn from_artifacts(name: &str, artifacts_dir: &Path) -> Result<Self> {
        let (path, artifact) = find(name, artifacts_dir)?;
        Self::from_artifact(&path, &artifact)
    }

    pub fn from_artifact(path: &Path, artifact: &Artifact) -> Result<Self> {
        let hex = artifact.bytecode.trim_start_matches("0x");
        if hex.is_empty() {
            return Err(Error::MissingBytecode(artifact.contract_name.clone()));
        }
        if hex.contains("__$") {
            return Err(Error::InvalidArtifact {
                path: path.to_owned(),
                reason: "bytecode has unlinked library references".to_owned(),
            });
        }
        let bytecode = hex::decode(hex).map_err(|e| Error::InvalidArtifact {
            path: path.to_owned(),
            reason: format!("bytecode is not valid hex: {e}"),
        })?;

        Ok(Self {
            name: artifact.contract_name.clone(),
            bytecode,
        })
    }

    /// Init code of the deployment transaction.
    pub fn deploy_code(&self) -> &[u8] {
        &self.bytecode
    }
}

/// Finds the single artifact named `name` under `dir`.
pub fn find(name: &str, dir: &Path) -> Result<(PathBuf, Artifact)> {
    let file_name = format!("{name}.json");
    let mut candidates = Vec::new();
    if dir.is_dir() {
        collect(dir, &file_name, &mut candidates)?;
    }
    candidates.sort();

    let mut found = Vec::new();
    for path in candidates {
        let artifact = Artifact::read(&path)?;
        if artifact.contract_name == name {
            found.push((path, artifact));
        }
    }

    match found.len() {
        0 => Err(Error::ArtifactNotFound {
            name: name.to_owned(),
            dir: dir.to_owned(),
        }),
        1 => Ok(found.remove(0)),
        _ => Err(Error::AmbiguousArtifact {
            name: name.to_owned(),
            paths: found.into_iter().map(|(path, _)| path).collect(),
        }),
    }
}

fn collect(dir: &Path, file_name: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            // Compiler inputs and outputs, never contract artifacts.
            if path.file_name().is_some_and(|n| n == "build-info") {
                continue;
            }
            collect(&path, file_name, out)?;
        } else if path.file_name().is_some_and(|n| n == file_name) {
            out.push(path);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use serde_json::json;

    use crate::error::Error;

    use super::{find, Artifact, ContractFactory};

    fn artifact(name: &str, source: &str, bytecode: &str) -> Artifact {
        Artifact {
            format: super::ARTIFACT_FORMAT.to_owned(),
            contract_name: name.to_owned(),
            source_name: source.to_owned(),
            abi: json!([]),
            bytecode: bytecode.to_owned(),
            deployed_bytecode: "0x".to_owned(),
        }
    }

    #[test]
    fn reads_hardhat_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("CasinoBankRoll.json");
        let contents = r#"{
  "_format": "hh-sol-artifact-1",
  "contractName": "CasinoBankRoll",
  "sourceName": "contracts/CasinoBankRoll.sol",
  "abi": [{"inputs": [], "stateMutability": "nonpayable", "type": "constructor"}],
  "bytecode": "0x6080604052",
  "deployedBytecode": "0x6080",
  "linkReferences": {},
  "deployedLinkReferences": {}
}"#;
        fs::write(&path, contents).unwrap();

        let artifact = Artifact::read(&path).unwrap();
        assert_eq!("CasinoBankRoll", artifact.contract_name);
        assert_eq!("contracts/CasinoBankRoll.sol", artifact.source_name);

        let factory = ContractFactory::from_artifact(&path, &artifact).unwrap();
        assert_eq!(vec![0x60, 0x80, 0x60, 0x40, 0x52], factory.deploy_code());
    }

    #[test]
    fn finds_artifact_by_name() {
        let dir = tempfile::tempdir().unwrap();
        artifact("CasinoBankRoll", "contracts/Casino.sol", "0x00")
            .write(dir.path())
            .unwrap();
        artifact("Token", "contracts/Token.sol", "0x01")
            .write(dir.path())
            .unwrap();

        let factory = ContractFactory::from_artifacts("Token", dir.path()).unwrap();
        assert_eq!("Token", factory.name);
        assert_eq!(vec![0x01], factory.bytecode);
    }

    #[test]
    fn missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let err = ContractFactory::from_artifacts("CasinoBankRoll", dir.path()).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { ref name, .. } if name == "CasinoBankRoll"));

        let err = find("CasinoBankRoll", &dir.path().join("missing")).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { .. }));
    }

    #[test]
    fn ambiguous_artifact() {
        let dir = tempfile::tempdir().unwrap();
        artifact("Vault", "contracts/a/Vault.sol", "0x00")
            .write(dir.path())
            .unwrap();
        artifact("Vault", "contracts/b/Vault.sol", "0x00")
            .write(dir.path())
            .unwrap();

        let err = find("Vault", dir.path()).unwrap_err();
        assert!(matches!(err, Error::AmbiguousArtifact { ref paths, .. } if paths.len() == 2));
    }

    #[test]
    fn skips_build_info() {
        let dir = tempfile::tempdir().unwrap();
        let build_info = dir.path().join("build-info");
        fs::create_dir_all(&build_info).unwrap();
        fs::write(build_info.join("CasinoBankRoll.json"), "not an artifact").unwrap();

        let err = find("CasinoBankRoll", dir.path()).unwrap_err();
        assert!(matches!(err, Error::ArtifactNotFound { .. }));
    }

    #[test]
    fn rejects_empty_bytecode() {
        let artifact = artifact("ICasino", "contracts/ICasino.sol", "0x");
        let err = ContractFactory::from_artifact(Path::new("ICasino.json"), &artifact).unwrap_err();
        assert!(matches!(err, Error::MissingBytecode(ref name) if name == "ICasino"));
    }

    #[test]
    fn rejects_unlinked_bytecode() {
        let artifact = artifact(
            "Casino",
            "contracts/Casino.sol",
            "0x73__$d6b8c5a2d8ff4a3f0f2bb2f87c0bc5e4c2$__63",
        );
        let err = ContractFactory::from_artifact(Path::new("Casino.json"), &artifact).unwrap_err();
        assert!(matches!(err, Error::InvalidArtifact { .. }));
    }

    #[test]
    fn writes_under_source_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = artifact("CasinoBankRoll", "contracts/Casino.sol", "0x00")
            .write(dir.path())
            .unwrap();
        assert_eq!(
            dir.path().join("contracts/Casino.sol/CasinoBankRoll.json"),
            path
        );
    }
}
