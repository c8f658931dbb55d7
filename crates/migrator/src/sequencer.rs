//! Executes a deployment plan one step at a time.
//!
//! A run has two phases. Preparation validates the plan, resolves every
//! enabled artifact and type checks the constructor arguments, so that
//! configuration mistakes surface before anything is sent to the network.
//! Execution then deploys the prepared steps strictly in order, each one only
//! after the previous deployment is confirmed, because later steps may take
//! the address of an earlier deployment as a constructor argument.

use {
    crate::{
        artifact::{Artifact, ArtifactRegistry},
        deployer::Deployer,
        error::DeploymentError,
        plan::{ConstructorArg, DeploymentPlan, DeploymentStep, Reference},
        report::Summary,
    },
    alloy::{
        dyn_abi::{DynSolType, DynSolValue},
        primitives::Address,
    },
    anyhow::{Context, Result, ensure},
    std::{collections::HashMap, sync::Arc},
};

pub struct Sequencer {
    registry: Arc<dyn ArtifactRegistry>,
}

/// A plan whose enabled steps are resolved and type checked, ready to be
/// deployed.
#[derive(Debug)]
pub struct PreparedPlan {
    steps: Vec<PreparedStep>,
}

#[derive(Debug)]
struct PreparedStep {
    index: usize,
    artifact: Artifact,
    args: Vec<PreparedArg>,
}

#[derive(Debug)]
enum PreparedArg {
    Value(DynSolValue),
    /// Address of the contract deployed by the step at plan position `step`.
    Deployed { step: usize, artifact: String },
}

impl Sequencer {
    pub fn new(registry: Arc<dyn ArtifactRegistry>) -> Self {
        Self { registry }
    }

    /// Runs the preparation phase only. Nothing is sent to the network.
    pub async fn check(&self, plan: &DeploymentPlan) -> Result<PreparedPlan, DeploymentError> {
        plan.validate()?;

        let mut steps = Vec::new();
        for (index, step) in plan.enabled_steps() {
            let artifact = self.registry.resolve(&step.artifact).await.map_err(|source| {
                DeploymentError::Resolution {
                    step: index,
                    artifact: step.artifact.clone(),
                    source,
                }
            })?;
            let args = prepare_args(plan, index, step, &artifact).map_err(|source| {
                DeploymentError::InvalidArgument {
                    step: index,
                    artifact: step.artifact.clone(),
                    source,
                }
            })?;
            steps.push(PreparedStep {
                index,
                artifact,
                args,
            });
        }
        Ok(PreparedPlan { steps })
    }

    /// Checks `plan` and deploys every enabled step in order through
    /// `deployer`, recording each confirmed deployment in `summary`.
    pub async fn run(
        &self,
        plan: &DeploymentPlan,
        deployer: &dyn Deployer,
        summary: &mut Summary,
    ) -> Result<(), DeploymentError> {
        self.check(plan).await?.execute(deployer, summary).await
    }
}

impl PreparedPlan {
    /// Number of deployments the plan performs.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Deploys the prepared steps in order.
    ///
    /// Stops at the first failing step. Deployments confirmed before the
    /// failure are not rolled back and remain in `summary`.
    pub async fn execute(
        &self,
        deployer: &dyn Deployer,
        summary: &mut Summary,
    ) -> Result<(), DeploymentError> {
        if self.is_empty() {
            tracing::info!("deployment plan has no enabled steps, nothing to do");
            return Ok(());
        }

        let mut addresses = HashMap::<usize, Address>::new();
        for step in &self.steps {
            let args = step
                .args
                .iter()
                .map(|arg| match arg {
                    PreparedArg::Value(value) => Ok(value.clone()),
                    PreparedArg::Deployed {
                        step: dependency,
                        artifact,
                    } => addresses
                        .get(dependency)
                        .map(|address| DynSolValue::Address(*address))
                        .ok_or_else(|| DeploymentError::MissingDependency {
                            step: step.index,
                            artifact: step.artifact.name.clone(),
                            dependency: artifact.clone(),
                        }),
                })
                .collect::<Result<Vec<_>, _>>()?;

            tracing::info!(step = step.index, artifact = %step.artifact.name, "deploying");
            let instance = deployer
                .deploy(&step.artifact, &args)
                .await
                .map_err(|source| DeploymentError::Transaction {
                    step: step.index,
                    artifact: step.artifact.name.clone(),
                    source,
                })?;
            tracing::info!(
                step = step.index,
                artifact = %instance.artifact,
                address = %instance.address,
                tx = %instance.transaction_hash,
                "deployed"
            );

            addresses.insert(step.index, instance.address);
            summary.push(instance);
        }
        Ok(())
    }
}

fn prepare_args(
    plan: &DeploymentPlan,
    index: usize,
    step: &DeploymentStep,
    artifact: &Artifact,
) -> Result<Vec<PreparedArg>> {
    let expected = artifact.constructor_inputs().len();
    ensure!(
        step.args.len() == expected,
        "expected {expected} constructor arguments but {} were given",
        step.args.len()
    );

    step.args
        .iter()
        .enumerate()
        .map(|(position, arg)| match arg {
            ConstructorArg::Literal(literal) => artifact
                .coerce_arg(position, &literal.to_string())
                .map(PreparedArg::Value),
            ConstructorArg::Deployed(Reference { deployed }) => {
                let ty = artifact.input_type(position)?;
                ensure!(
                    ty == DynSolType::Address,
                    "argument #{position} is of type {} and cannot take the address of {deployed}",
                    ty.sol_type_name()
                );
                plan.dependency(index, deployed)
                    .map(|dependency| PreparedArg::Deployed {
                        step: dependency,
                        artifact: deployed.clone(),
                    })
                    .with_context(|| format!("no earlier enabled step deploys {deployed}"))
            }
        })
        .collect()
}
