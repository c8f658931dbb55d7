//! Deploys against a development node listening on `localhost:8545`, for
//! example `anvil`. Run with `cargo test -p migrator -- --ignored`.

use {
    alloy::primitives::Address,
    migrator::{
        artifact::ArtifactDir,
        infra::node::{Account, NodeDeployer},
        plan::{ConstructorArg, DeploymentPlan, DeploymentStep},
        report::Summary,
        sequencer::Sequencer,
    },
    std::sync::Arc,
    testlib::{accounts, artifacts},
};

const NODE_URL: &str = "http://localhost:8545";

#[tokio::test]
#[ignore]
async fn local_node_chains_token_into_marketplace() {
    observe::tracing::initialize_reentrant(
        &observe::Config::default().with_env_filter("warn,migrator=debug"),
    );
    let dir = tempfile::tempdir().unwrap();
    artifacts::write_truffle(dir.path(), "KDZTokens", &artifacts::token());
    artifacts::write_foundry(dir.path(), "NFT2ETHMarketPlace", &artifacts::marketplace());

    let deployer = NodeDeployer::new(
        NODE_URL.parse().unwrap(),
        &Account::PrivateKey(accounts::DEV_PRIVATE_KEY.to_string()),
        1,
        None,
    )
    .unwrap();
    let network = deployer.network().await.unwrap();
    assert_eq!(network.account, accounts::DEV_ADDRESS.parse::<Address>().unwrap());

    let sequencer = Sequencer::new(Arc::new(ArtifactDir::new(dir.path().to_path_buf())));
    let plan = DeploymentPlan::new(vec![
        DeploymentStep::new("KDZTokens"),
        DeploymentStep::new("NFT2ETHMarketPlace").with_arg(ConstructorArg::deployed("KDZTokens")),
    ]);

    let mut summary = Summary::default();
    sequencer.run(&plan, &deployer, &mut summary).await.unwrap();

    let deployed = &summary.deployments;
    assert_eq!(summary.total_deployments(), 2);
    assert_eq!(deployed[0].artifact, "KDZTokens");
    assert_eq!(deployed[1].artifact, "NFT2ETHMarketPlace");
    assert_ne!(deployed[0].address, deployed[1].address);
    assert!(deployed.iter().all(|d| d.from == network.account));
}
