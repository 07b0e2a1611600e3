//! Contract address lookup in a truffle build artifact.

use std::{collections::HashMap, path::Path};

use alloy_primitives::Address;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{contract} is not deployed on network {network}")]
    NotDeployed { contract: String, network: u64 },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Artifact {
    #[serde(default)]
    contract_name: Option<String>,
    #[serde(default)]
    networks: HashMap<String, Deployment>,
}

#[derive(Debug, Deserialize)]
struct Deployment {
    address: Address,
}

/// Address the artifact at `path` records for `network`.
pub async fn contract_address<P: AsRef<Path>>(
    path: P,
    network: u64,
) -> Result<Address, ArtifactError> {
    let s = tokio::fs::read_to_string(path).await?;
    lookup(&s, network)
}

fn lookup(json: &str, network: u64) -> Result<Address, ArtifactError> {
    let a: Artifact = serde_json::from_str(json)?;
    a.networks
        .get(&network.to_string())
        .map(|d| d.address)
        .ok_or_else(|| ArtifactError::NotDeployed {
            contract: a.contract_name.unwrap_or_else(|| "contract".into()),
            network,
        })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::address;

    use super::{ArtifactError, contract_address, lookup};

    const ARTIFACT: &str = r#"{
        "contractName": "HotelBooking",
        "abi": [],
        "networks": {
            "5777": {
                "events": {},
                "links": {},
                "address": "0xCfEB869F69431e42cdB54A4F4f105C19C080A601",
                "transactionHash": "0x4f1f8e7f3b4f31c3e5c2f1a7a1de9f3c1e0d7e3b2a1f0e9d8c7b6a5948372615"
            }
        }
    }"#;

    #[test]
    fn deployed() {
        assert_eq!(
            lookup(ARTIFACT, 5777).unwrap(),
            address!("0xCfEB869F69431e42cdB54A4F4f105C19C080A601")
        );
    }

    #[test]
    fn other_network() {
        match lookup(ARTIFACT, 1) {
            Err(ArtifactError::NotDeployed { contract, network }) => {
                assert_eq!(contract, "HotelBooking");
                assert_eq!(network, 1)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn read_from_file() {
        let path = std::env::temp_dir().join(format!("hotel-artifact-{}.json", std::process::id()));
        tokio::fs::write(&path, ARTIFACT).await.unwrap();
        let addr = contract_address(&path, 5777).await;
        tokio::fs::remove_file(&path).await.unwrap();
        assert_eq!(
            addr.unwrap(),
            address!("0xCfEB869F69431e42cdB54A4F4f105C19C080A601")
        );
        assert!(matches!(
            contract_address("does/not/exist.json", 5777).await,
            Err(ArtifactError::Io(_))
        ));
    }
}
