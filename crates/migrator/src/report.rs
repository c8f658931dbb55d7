use {
    crate::deployer::DeployedInstance,
    alloy::primitives::{U256, utils::format_ether},
    anyhow::{Context, Result},
    serde::Serialize,
    std::{
        fmt::{self, Display, Formatter},
        path::Path,
    },
};

/// All deployments of a run, in the order they were confirmed.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub deployments: Vec<DeployedInstance>,
}

impl Summary {
    pub fn push(&mut self, deployment: DeployedInstance) {
        self.deployments.push(deployment);
    }

    pub fn total_deployments(&self) -> usize {
        self.deployments.len()
    }

    /// Sum of the cost of all deployments in wei.
    pub fn final_cost(&self) -> U256 {
        self.deployments
            .iter()
            .map(DeployedInstance::cost)
            .fold(U256::ZERO, |total, cost| total + cost)
    }

    /// Writes the summary as pretty printed JSON.
    pub async fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json)
            .await
            .with_context(|| format!("failed to write report to {}", path.display()))
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for deployment in &self.deployments {
            writeln!(f, "Deployed '{}'", deployment.artifact)?;
            writeln!(f, "> transaction hash: {}", deployment.transaction_hash)?;
            writeln!(f, "> contract address: {}", deployment.address)?;
            if let Some(block) = deployment.block_number {
                writeln!(f, "> block number:     {block}")?;
            }
            writeln!(f, "> account:          {}", deployment.from)?;
            writeln!(f, "> gas used:         {}", deployment.gas_used)?;
            writeln!(
                f,
                "> gas price:        {} wei",
                deployment.effective_gas_price
            )?;
            writeln!(f, "> total cost:       {} ETH", format_ether(deployment.cost()))?;
        }
        writeln!(f, "> Total deployments: {}", self.total_deployments())?;
        write!(f, "> Final cost:        {} ETH", format_ether(self.final_cost()))
    }
}

#[cfg(test)]
mod tests {
    use {
        super::*,
        alloy::primitives::{Address, B256},
    };

    fn deployment(artifact: &str, gas_used: u64) -> DeployedInstance {
        DeployedInstance {
            artifact: artifact.to_string(),
            address: Address::repeat_byte(1),
            transaction_hash: B256::repeat_byte(2),
            block_number: Some(5),
            from: Address::repeat_byte(3),
            gas_used,
            effective_gas_price: 2_000_000_000,
        }
    }

    #[test]
    fn totals_cost_of_all_deployments() {
        let mut summary = Summary::default();
        summary.push(deployment("Migrations", 273_220));
        summary.push(deployment("KDZTokens", 5_637_779));

        assert_eq!(summary.total_deployments(), 2);
        assert_eq!(summary.final_cost(), U256::from(11_821_998_000_000_000_u64));

        let rendered = summary.to_string();
        assert!(rendered.contains("Deployed 'KDZTokens'"));
        assert!(rendered.contains("> Total deployments: 2"));
        assert!(rendered.contains("> Final cost:        0.011821998"));
    }

    #[tokio::test]
    async fn saves_json_report() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let summary = Summary {
            deployments: vec![deployment("KDZTokens", 21_000)],
        };

        summary.save(&path).await.unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["deployments"][0]["artifact"], "KDZTokens");
        assert_eq!(json["deployments"][0]["gasUsed"], 21_000);
    }
}
