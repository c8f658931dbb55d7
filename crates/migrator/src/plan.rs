//! The deployment plan: an ordered list of contract artifacts to deploy and
//! the constructor arguments each of them is created with.

use {
    crate::error::DeploymentError,
    serde::Deserialize,
    std::fmt::{self, Display, Formatter},
};

#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeploymentPlan {
    #[serde(default)]
    pub steps: Vec<DeploymentStep>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct DeploymentStep {
    /// Name of the compiled artifact, e.g. `KDZTokens`.
    pub artifact: String,
    #[serde(default)]
    pub args: Vec<ConstructorArg>,
    /// Disabled steps stay in the plan but are never executed.
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

/// A single constructor argument as written in the plan file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ConstructorArg {
    Deployed(Reference),
    /// A value that gets coerced to the Solidity type of the matching
    /// constructor input.
    Literal(Literal),
}

/// The address of the contract deployed by the most recent earlier enabled
/// step for the named artifact, written `{ deployed = "Name" }`.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Reference {
    pub deployed: String,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum Literal {
    Bool(bool),
    Integer(i64),
    Text(String),
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Text(value) => f.write_str(value),
        }
    }
}

impl DeploymentStep {
    pub fn new(artifact: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            args: Vec::new(),
            enabled: true,
        }
    }

    pub fn with_arg(mut self, arg: ConstructorArg) -> Self {
        self.args.push(arg);
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

impl ConstructorArg {
    pub fn deployed(artifact: impl Into<String>) -> Self {
        Self::Deployed(Reference {
            deployed: artifact.into(),
        })
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Literal(Literal::Text(value.into()))
    }
}

impl DeploymentPlan {
    pub fn new(steps: Vec<DeploymentStep>) -> Self {
        Self { steps }
    }

    /// Enabled steps together with their position in the plan.
    pub fn enabled_steps(&self) -> impl Iterator<Item = (usize, &DeploymentStep)> {
        self.steps.iter().enumerate().filter(|(_, step)| step.enabled)
    }

    /// Finds the step whose deployment provides the address for `artifact`
    /// as seen from the step at position `index`: the closest enabled step
    /// before it that deploys that artifact.
    pub fn dependency(&self, index: usize, artifact: &str) -> Option<usize> {
        self.steps[..index]
            .iter()
            .rposition(|step| step.enabled && step.artifact == artifact)
    }

    /// Checks that every `deployed` reference of an enabled step can be
    /// satisfied by an earlier enabled step.
    pub fn validate(&self) -> Result<(), DeploymentError> {
        for (index, step) in self.enabled_steps() {
            for arg in &step.args {
                if let ConstructorArg::Deployed(Reference { deployed }) = arg {
                    if self.dependency(index, deployed).is_none() {
                        return Err(DeploymentError::MissingDependency {
                            step: index,
                            artifact: step.artifact.clone(),
                            dependency: deployed.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

impl Display for DeploymentPlan {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (index, step) in self.steps.iter().enumerate() {
            let status = if step.enabled { "enabled" } else { "disabled" };
            writeln!(f, "#{index} {} ({status})", step.artifact)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn references_resolve_to_closest_earlier_enabled_step() {
        let plan = DeploymentPlan::new(vec![
            DeploymentStep::new("Token"),
            DeploymentStep::new("Token"),
            DeploymentStep::new("Token").disabled(),
            DeploymentStep::new("Marketplace").with_arg(ConstructorArg::deployed("Token")),
        ]);

        assert_eq!(plan.dependency(3, "Token"), Some(1));
        assert_eq!(plan.dependency(0, "Token"), None);
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn reference_to_disabled_step_is_missing() {
        let plan = DeploymentPlan::new(vec![
            DeploymentStep::new("Token").disabled(),
            DeploymentStep::new("Marketplace").with_arg(ConstructorArg::deployed("Token")),
        ]);

        let err = plan.validate().unwrap_err();
        assert!(matches!(
            err,
            DeploymentError::MissingDependency { step: 1, ref dependency, .. } if dependency == "Token"
        ));
    }

    #[test]
    fn reference_to_later_step_is_missing() {
        let plan = DeploymentPlan::new(vec![
            DeploymentStep::new("Marketplace").with_arg(ConstructorArg::deployed("Token")),
            DeploymentStep::new("Token"),
        ]);

        assert!(matches!(
            plan.validate(),
            Err(DeploymentError::MissingDependency { step: 0, .. })
        ));
    }

    #[test]
    fn disabled_steps_are_not_validated() {
        let plan = DeploymentPlan::new(vec![
            DeploymentStep::new("Token"),
            DeploymentStep::new("Marketplace")
                .with_arg(ConstructorArg::deployed("Unknown"))
                .disabled(),
        ]);

        assert!(plan.validate().is_ok());
        assert_eq!(plan.enabled_steps().count(), 1);
    }
}
