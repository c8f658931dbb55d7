//! [`Deployer`] backed by an Ethereum node.

use {
    crate::{
        artifact::Artifact,
        deployer::{DeployedInstance, Deployer},
    },
    alloy::{
        dyn_abi::DynSolValue,
        network::{EthereumWallet, ReceiptResponse, TransactionBuilder},
        primitives::{Address, U256},
        providers::{DynProvider, Provider, ProviderBuilder},
        rpc::types::{TransactionReceipt, TransactionRequest},
        signers::local::{MnemonicBuilder, PrivateKeySigner, coins_bip39::English},
    },
    anyhow::{Context, Result, ensure},
    std::time::Duration,
    url::Url,
};

/// Where the key of the deploying account comes from.
#[derive(Clone)]
pub enum Account {
    PrivateKey(String),
    Mnemonic { phrase: String, index: u32 },
}

impl Account {
    pub fn signer(&self) -> Result<PrivateKeySigner> {
        match self {
            Self::PrivateKey(key) => key.parse().context("invalid private key"),
            Self::Mnemonic { phrase, index } => MnemonicBuilder::<English>::default()
                .phrase(phrase.as_str())
                .index(*index)
                .context("invalid derivation index")?
                .build()
                .context("invalid mnemonic"),
        }
    }
}

/// Facts about the connected network and the deploying account, logged
/// before the first deployment.
#[derive(Debug)]
pub struct Network {
    pub chain_id: u64,
    pub block_gas_limit: Option<u64>,
    pub account: Address,
    pub balance: U256,
}

pub struct NodeDeployer {
    provider: DynProvider,
    account: Address,
    confirmations: u64,
    timeout: Option<Duration>,
}

impl NodeDeployer {
    /// Connects to the node at `url` with a wallet holding `account`'s key.
    /// Gas, nonce and chain id of every transaction are filled in by the
    /// provider.
    pub fn new(
        url: Url,
        account: &Account,
        confirmations: u64,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let signer = account.signer()?;
        let address = signer.address();
        let provider = ProviderBuilder::new()
            .wallet(EthereumWallet::new(signer))
            .connect_http(url)
            .erased();
        Ok(Self::with_provider(provider, address, confirmations, timeout))
    }

    /// Deploys from `account` through an already configured provider, which
    /// has to be able to sign for it.
    pub fn with_provider(
        provider: DynProvider,
        account: Address,
        confirmations: u64,
        timeout: Option<Duration>,
    ) -> Self {
        Self {
            provider,
            account,
            confirmations,
            timeout,
        }
    }

    pub async fn network(&self) -> Result<Network> {
        let chain_id = self
            .provider
            .get_chain_id()
            .await
            .context("failed to fetch chain id")?;
        let block_gas_limit = self
            .provider
            .get_block_by_number(Default::default())
            .await
            .context("failed to fetch latest block")?
            .map(|block| block.header.gas_limit);
        let balance = self
            .provider
            .get_balance(self.account)
            .await
            .context("failed to fetch account balance")?;
        Ok(Network {
            chain_id,
            block_gas_limit,
            account: self.account,
            balance,
        })
    }
}

#[async_trait::async_trait]
impl Deployer for NodeDeployer {
    async fn deploy(&self, artifact: &Artifact, args: &[DynSolValue]) -> Result<DeployedInstance> {
        let code = artifact.creation_code(args)?;
        let tx = TransactionRequest::default()
            .with_from(self.account)
            .with_deploy_code(code);

        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .context("failed to submit deployment transaction")?;
        tracing::debug!(
            artifact = %artifact.name,
            tx = %pending.tx_hash(),
            confirmations = self.confirmations,
            "waiting for deployment transaction"
        );

        let receipt = pending
            .with_required_confirmations(self.confirmations)
            .with_timeout(self.timeout)
            .get_receipt()
            .await
            .context("deployment transaction was not confirmed")?;
        confirmed(artifact, &receipt)
    }
}

/// Turns the receipt of a deployment transaction into the deployed instance.
fn confirmed(artifact: &Artifact, receipt: &TransactionReceipt) -> Result<DeployedInstance> {
    ensure!(
        receipt.status(),
        "deployment transaction {:?} reverted",
        receipt.transaction_hash
    );
    let address = receipt
        .contract_address
        .context("receipt of deployment transaction has no contract address")?;

    Ok(DeployedInstance {
        artifact: artifact.name.clone(),
        address,
        transaction_hash: receipt.transaction_hash,
        block_number: receipt.block_number,
        from: receipt.from,
        gas_used: receipt.gas_used,
        effective_gas_price: receipt.effective_gas_price,
    })
}
