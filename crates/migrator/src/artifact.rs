//! Compiled contract artifacts and the registry resolving them by name.

use {
    alloy::{
        dyn_abi::{DynSolType, DynSolValue, JsonAbiExt, Specifier},
        json_abi::{JsonAbi, Param},
        primitives::Bytes,
    },
    anyhow::{Context, Result, bail, ensure},
    serde::Deserialize,
    std::{
        io::ErrorKind,
        path::{Path, PathBuf},
    },
    tokio::fs,
};

/// Resolves artifact names to their compiled interface and creation code.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ArtifactRegistry: Send + Sync + 'static {
    async fn resolve(&self, name: &str) -> Result<Artifact>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct Artifact {
    pub name: String,
    pub abi: JsonAbi,
    pub bytecode: Bytes,
}

/// The subset of a Truffle or Foundry artifact file needed for deployment.
#[derive(Deserialize)]
struct ArtifactFile {
    abi: JsonAbi,
    bytecode: Bytecode,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Bytecode {
    /// Truffle: `"bytecode": "0x6080..."`
    Hex(String),
    /// Foundry: `"bytecode": { "object": "0x6080...", ... }`
    Object { object: String },
}

impl Artifact {
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let file: ArtifactFile = serde_json::from_str(json).context("malformed artifact JSON")?;
        let hex = match &file.bytecode {
            Bytecode::Hex(hex) | Bytecode::Object { object: hex } => hex,
        };
        // Solc marks unresolved library addresses with `__$<hash>$__`.
        ensure!(
            !hex.contains("__"),
            "bytecode of {name} contains unlinked library references"
        );
        let bytecode: Bytes = hex.parse().context("bytecode is not valid hex")?;
        ensure!(
            !bytecode.is_empty(),
            "{name} has no bytecode, it is probably abstract or an interface"
        );
        Ok(Self {
            name: name.to_string(),
            abi: file.abi,
            bytecode,
        })
    }

    /// Inputs of the constructor, empty if the contract does not declare one.
    pub fn constructor_inputs(&self) -> &[Param] {
        self.abi
            .constructor()
            .map(|constructor| constructor.inputs.as_slice())
            .unwrap_or_default()
    }

    /// Parses `value` as the Solidity type of the constructor input at
    /// `position`.
    pub fn coerce_arg(&self, position: usize, value: &str) -> Result<DynSolValue> {
        let ty = self.input_type(position)?;
        ty.coerce_str(value)
            .with_context(|| {
                format!(
                    "argument #{position}: {value:?} is not a valid {}",
                    ty.sol_type_name()
                )
            })
    }

    pub fn input_type(&self, position: usize) -> Result<DynSolType> {
        let param = self
            .constructor_inputs()
            .get(position)
            .with_context(|| format!("{} has no constructor input #{position}", self.name))?;
        param
            .resolve()
            .with_context(|| format!("unsupported constructor input type {}", param.ty))
    }

    /// Bytecode followed by the ABI encoded constructor arguments.
    pub fn creation_code(&self, args: &[DynSolValue]) -> Result<Bytes> {
        let mut code = self.bytecode.to_vec();
        match self.abi.constructor() {
            Some(constructor) => code.extend(constructor.abi_encode_input(args)?),
            None if args.is_empty() => {}
            None => bail!(
                "{} has no constructor but {} arguments were given",
                self.name,
                args.len()
            ),
        }
        Ok(code.into())
    }
}

/// Artifacts stored on disk, either as Truffle build output
/// (`<root>/<Name>.json`) or Foundry output (`<root>/<Name>.sol/<Name>.json`).
#[derive(Clone, Debug)]
pub struct ArtifactDir {
    root: PathBuf,
}

impl ArtifactDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn candidates(&self, name: &str) -> [PathBuf; 2] {
        [
            self.root.join(format!("{name}.json")),
            self.root.join(format!("{name}.sol")).join(format!("{name}.json")),
        ]
    }
}

#[async_trait::async_trait]
impl ArtifactRegistry for ArtifactDir {
    async fn resolve(&self, name: &str) -> Result<Artifact> {
        ensure!(
            !name.is_empty() && !name.contains(['/', '\\', '.']),
            "{name:?} is not a valid artifact name"
        );
        for path in self.candidates(name) {
            match fs::read_to_string(&path).await {
                Ok(json) => {
                    tracing::debug!(artifact = name, path = %path.display(), "loaded artifact");
                    return Artifact::from_json(name, &json)
                        .with_context(|| format!("invalid artifact file {}", path.display()));
                }
                Err(err) if err.kind() == ErrorKind::NotFound => continue,
                Err(err) => {
                    return Err(err).with_context(|| format!("failed to read {}", path.display()));
                }
            }
        }
        bail!("no artifact named {name} in {}", self.root.display())
    }
}
