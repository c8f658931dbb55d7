use {
    crate::artifact::Artifact,
    alloy::{
        dyn_abi::DynSolValue,
        primitives::{Address, TxHash, U256},
    },
    anyhow::Result,
    serde::Serialize,
};

/// Capability of the deployment framework to create a contract on chain.
///
/// Implementations resolve only once the creation transaction is confirmed,
/// so that the returned address can be used by subsequent deployments.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Deployer: Send + Sync + 'static {
    async fn deploy(&self, artifact: &Artifact, args: &[DynSolValue]) -> Result<DeployedInstance>;
}

/// A confirmed contract deployment.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployedInstance {
    pub artifact: String,
    pub address: Address,
    pub transaction_hash: TxHash,
    pub block_number: Option<u64>,
    /// Account that paid for the deployment.
    pub from: Address,
    pub gas_used: u64,
    /// Price per unit of gas in wei.
    pub effective_gas_price: u128,
}

impl DeployedInstance {
    /// Total amount of wei spent on the deployment.
    pub fn cost(&self) -> U256 {
        U256::from(self.gas_used) * U256::from(self.effective_gas_price)
    }
}
