use std::{
    collections::BTreeMap,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use serde::Deserialize;

use crate::{
    artifact::{Artifact, ARTIFACT_FORMAT},
    error::{Error, Result},
    formatting::{format_code_size, MAX_CODE_SIZE},
    project::{Paths, ProjectConfig, SolidityConfig},
};

const SOLC: &str = "solc";
const NODE_MODULES: &str = "node_modules";
const CACHE_FILE: &str = "solc-output.json";

/// Output of `solc --combined-json abi,bin,bin-runtime`.
#[derive(Debug, Deserialize)]
struct CombinedOutput {
    contracts: BTreeMap<String, CombinedContract>,
}

#[derive(Debug, Deserialize)]
struct CombinedContract {
    abi: serde_json::Value,
    bin: String,
    #[serde(rename = "bin-runtime", default)]
    bin_runtime: String,
}

/// Compiles every Solidity source of the project into artifacts.
pub fn compile(config: &ProjectConfig) -> Result<Vec<PathBuf>> {
    let paths = &config.paths;
    let sources = sources(&paths.sources, &paths.root)?;
    if sources.is_empty() {
        println!("nothing to compile");
        return Ok(Vec::new());
    }

    let found = version()?;
    if found != config.solidity.version {
        return Err(Error::CompilerVersionMismatch {
            expected: config.solidity.version.clone(),
            found,
        });
    }

    tracing::debug!(count = sources.len(), "compiling sources");
    let output = run_solc(&paths.root, solc_args(&config.solidity, paths, &sources))?;
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !output.status.success() {
        return Err(Error::CompilationFailed(stderr.into_owned()));
    }
    if !stderr.trim().is_empty() {
        tracing::warn!("solc reported:\n{}", stderr.trim());
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    fs::create_dir_all(&paths.cache)?;
    fs::write(paths.cache.join(CACHE_FILE), stdout.as_bytes())?;

    let mut written = Vec::new();
    for artifact in artifacts(&stdout)? {
        let path = artifact.write(&paths.artifacts)?;
        let size = artifact.deployed_bytecode.trim_start_matches("0x").len() / 2;
        println!(
            "compiled {} ({})",
            artifact.contract_name,
            format_code_size(size, MAX_CODE_SIZE)
        );
        written.push(path);
    }

    Ok(written)
}

/// Arguments passed to `solc` for the given sources.
///
/// Optimizer settings are forwarded as configured. Package imports resolve
/// from `node_modules` when the project has one.
pub fn solc_args(settings: &SolidityConfig, paths: &Paths, sources: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "--combined-json".into(),
        "abi,bin,bin-runtime".into(),
        "--base-path".into(),
        ".".into(),
    ];
    if paths.root.join(NODE_MODULES).is_dir() {
        args.push("--include-path".into());
        args.push(NODE_MODULES.into());
    }
    if settings.optimizer.enabled {
        args.push("--optimize".into());
        args.push("--optimize-runs".into());
        args.push(settings.optimizer.runs.to_string().into());
    }
    args.extend(sources.iter().map(|s| s.as_os_str().to_owned()));
    args
}

/// Version of the `solc` found in `PATH`, without the commit suffix.
pub fn version() -> Result<String> {
    let output = run_solc(Path::new("."), vec!["--version".into()])?;
    let stdout = String::from_utf8_lossy(&output.stdout);
    parse_version(&stdout)
        .map(str::to_owned)
        .ok_or_else(|| Error::CompilationFailed(format!("unrecognized solc version: {stdout}")))
}

fn parse_version(output: &str) -> Option<&str> {
    let line = output.lines().find(|l| l.starts_with("Version:"))?;
    let version = line.trim_start_matches("Version:").trim();
    version.split('+').next().filter(|v| !v.is_empty())
}

fn run_solc(dir: &Path, args: Vec<OsString>) -> Result<Output> {
    Command::new(SOLC)
        .current_dir(dir)
        .args(args)
        .output()
        .map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => Error::CompilerNotFound,
            _ => e.into(),
        })
}

/// All `.sol` files under `dir`, relative to `root`, sorted.
fn sources(dir: &Path, root: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    if dir.is_dir() {
        collect(dir, &mut found)?;
    }
    found.sort();

    Ok(found
        .into_iter()
        .map(|p| match p.strip_prefix(root) {
            Ok(relative) => relative.to_owned(),
            Err(_) => p.clone(),
        })
        .collect())
}

fn collect(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect(&path, out)?;
        } else if path.extension().is_some_and(|e| e == "sol") {
            out.push(path);
        }
    }
    Ok(())
}

fn artifacts(output: &str) -> Result<Vec<Artifact>> {
    let output: CombinedOutput = serde_json::from_str(output)
        .map_err(|e| Error::CompilationFailed(format!("unexpected solc output: {e}")))?;

    output
        .contracts
        .into_iter()
        .map(|(id, contract)| {
            let (source, name) = id
                .rsplit_once(':')
                .ok_or_else(|| Error::CompilationFailed(format!("bad contract id '{id}'")))?;
            // Older compilers emit the ABI as a JSON string.
            let abi = match contract.abi {
                serde_json::Value::String(s) => serde_json::from_str(&s).map_err(|e| {
                    Error::CompilationFailed(format!("bad abi for '{id}': {e}"))
                })?,
                abi => abi,
            };

            Ok(Artifact {
                format: ARTIFACT_FORMAT.to_owned(),
                contract_name: name.to_owned(),
                source_name: source.to_owned(),
                abi,
                bytecode: format!("0x{}", contract.bin),
                deployed_bytecode: format!("0x{}", contract.bin_runtime),
            })
        })
        .collect()
}
