use thiserror::Error;

/// Reasons a deployment plan fails. `step` is the position of the failing
/// step in the plan, counting disabled steps.
#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("step #{step}: artifact {artifact:?} could not be resolved")]
    Resolution {
        step: usize,
        artifact: String,
        #[source]
        source: anyhow::Error,
    },
    #[error(
        "step #{step}: {artifact} needs the address of {dependency:?} but no earlier enabled step \
         deploys it"
    )]
    MissingDependency {
        step: usize,
        artifact: String,
        dependency: String,
    },
    #[error("step #{step}: invalid constructor arguments for {artifact}")]
    InvalidArgument {
        step: usize,
        artifact: String,
        #[source]
        source: anyhow::Error,
    },
    #[error("step #{step}: deployment of {artifact} failed")]
    Transaction {
        step: usize,
        artifact: String,
        #[source]
        source: anyhow::Error,
    },
}

impl DeploymentError {
    pub fn step(&self) -> usize {
        match self {
            Self::Resolution { step, .. }
            | Self::MissingDependency { step, .. }
            | Self::InvalidArgument { step, .. }
            | Self::Transaction { step, .. } => *step,
        }
    }
}
