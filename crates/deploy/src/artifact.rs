//! Compiled contract artifacts.
//!
//! Artifacts are the JSON files emitted by the contract build (truffle layout):
//! `contractName`, `abi` and the creation `bytecode` as a hex string.

use std::path::{Path, PathBuf};

use alloy_core::primitives::Bytes;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// A compiled contract ready to be deployed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    /// Name under which the framework registers the deployment.
    pub contract_name: String,
    /// The contract ABI, kept as raw JSON.
    #[serde(default = "empty_abi")]
    pub abi: serde_json::Value,
    /// Creation bytecode.
    pub bytecode: Bytes,
}

fn empty_abi() -> serde_json::Value {
    serde_json::Value::Array(vec![])
}

impl ContractArtifact {
    /// Build an artifact in memory.
    pub fn new(contract_name: impl Into<String>, bytecode: impl Into<Bytes>) -> Self {
        Self {
            contract_name: contract_name.into(),
            abi: empty_abi(),
            bytecode: bytecode.into(),
        }
    }

    /// Load an artifact from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read artifact from {}", path.display()))?;
        let artifact: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse artifact {}", path.display()))?;

        if artifact.bytecode.is_empty() {
            anyhow::bail!(
                "Artifact {} has no bytecode (is {} abstract or an interface?)",
                path.display(),
                artifact.contract_name
            );
        }

        tracing::debug!(
            path = %path.display(),
            contract = %artifact.contract_name,
            bytecode_len = artifact.bytecode.len(),
            "Artifact loaded"
        );

        Ok(artifact)
    }

    /// Creation data for a deployment.
    ///
    /// This is the bytecode followed by the ABI-encoded constructor arguments.
    pub fn creation_data(&self, constructor_args: &[u8]) -> Bytes {
        let mut data = Vec::with_capacity(self.bytecode.len() + constructor_args.len());
        data.extend_from_slice(&self.bytecode);
        data.extend_from_slice(constructor_args);
        data.into()
    }
}

/// Where a deployment step gets its artifact from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArtifactSource {
    /// A JSON artifact on disk, read when the step runs.
    Path(PathBuf),
    /// An artifact embedded in the configuration.
    Inline(ContractArtifact),
}

impl ArtifactSource {
    pub fn load(&self) -> Result<ContractArtifact> {
        match self {
            Self::Path(path) => ContractArtifact::load_from_file(path),
            Self::Inline(artifact) => Ok(artifact.clone()),
        }
    }
}

impl From<ContractArtifact> for ArtifactSource {
    fn from(artifact: ContractArtifact) -> Self {
        Self::Inline(artifact)
    }
}

impl From<PathBuf> for ArtifactSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ArtifactSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<&str> for ArtifactSource {
    fn from(path: &str) -> Self {
        Self::Path(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use tempdir::TempDir;

    use super::*;

    #[test]
    fn test_load_truffle_artifact() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join("WijiToken.json");
        std::fs::write(
            &path,
            r#"{
                "contractName": "WijiToken",
                "abi": [{"type": "constructor", "inputs": []}],
                "bytecode": "0x6080604052",
                "deployedBytecode": "0x6080",
                "networks": {}
            }"#,
        )
        .unwrap();

        let artifact = ContractArtifact::load_from_file(&path).unwrap();
        assert_eq!(artifact.contract_name, "WijiToken");
        assert_eq!(artifact.bytecode.as_ref(), &[0x60, 0x80, 0x60, 0x40, 0x52]);
        assert!(artifact.abi.is_array());
    }

    #[test]
    fn test_load_rejects_empty_bytecode() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join("IWiji.json");
        std::fs::write(&path, r#"{"contractName": "IWiji", "abi": [], "bytecode": "0x"}"#)
            .unwrap();

        let err = ContractArtifact::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("no bytecode"));
    }

    #[test]
    fn test_load_rejects_invalid_hex() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        let path = temp_dir.path().join("Broken.json");
        std::fs::write(&path, r#"{"contractName": "Broken", "bytecode": "0xzz"}"#).unwrap();

        assert!(ContractArtifact::load_from_file(&path).is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new("wiji-test").expect("Failed to create temp dir");
        assert!(ContractArtifact::load_from_file(&temp_dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_artifact_source_untagged() {
        #[derive(Deserialize)]
        struct Wrapper {
            artifact: ArtifactSource,
        }

        let from_path: Wrapper =
            toml::from_str(r#"artifact = "build/contracts/WijiToken.json""#).unwrap();
        assert_eq!(
            from_path.artifact,
            ArtifactSource::Path(PathBuf::from("build/contracts/WijiToken.json"))
        );

        let inline: Wrapper = toml::from_str(
            r#"
            [artifact]
            contractName = "WijiToken"
            bytecode = "0x6080"
            "#,
        )
        .unwrap();
        assert_eq!(
            inline.artifact.load().unwrap(),
            ContractArtifact::new("WijiToken", vec![0x60, 0x80])
        );
    }

    #[test]
    fn test_artifact_source_from_paths() {
        let expected = ArtifactSource::Path(PathBuf::from("build/contracts/Wiji.json"));
        assert_eq!(ArtifactSource::from("build/contracts/Wiji.json"), expected);
        assert_eq!(ArtifactSource::from(Path::new("build/contracts/Wiji.json")), expected);
    }

    #[test]
    fn test_creation_data_appends_args() {
        let artifact = ContractArtifact::new("WijiIco", vec![0xaa, 0xbb]);
        let data = artifact.creation_data(&[0x01, 0x02]);
        assert_eq!(data.as_ref(), &[0xaa, 0xbb, 0x01, 0x02]);
    }
}
