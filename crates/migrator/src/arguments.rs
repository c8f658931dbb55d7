use {
    crate::infra::node::Account,
    anyhow::{Result, bail},
    std::{
        fmt::{self, Display, Formatter},
        path::PathBuf,
        time::Duration,
    },
    tracing::level_filters::LevelFilter,
    url::Url,
};

#[derive(clap::Parser)]
#[command(name = "migrator", about = "Deploys contract artifacts according to a migration plan")]
pub struct Arguments {
    #[clap(long, env, default_value = "warn,migrator=debug")]
    pub log_filter: String,

    #[clap(long, env, default_value = "error")]
    pub log_stderr_threshold: LevelFilter,

    #[clap(long, env)]
    pub use_json_logs: bool,

    /// Migration plan files, executed in the given order.
    #[clap(long, env, required = true, use_value_delimiter = true)]
    pub plan: Vec<PathBuf>,

    /// Directory containing the compiled contract artifacts.
    #[clap(long, env, default_value = "build/contracts")]
    pub artifacts_dir: PathBuf,

    /// The Ethereum node URL to connect to.
    #[clap(long, env, default_value = "http://localhost:8545")]
    pub node_url: Url,

    /// Private key of the deploying account.
    #[clap(long, env, conflicts_with = "mnemonic")]
    pub private_key: Option<String>,

    /// Mnemonic the deploying account is derived from.
    #[clap(long, env)]
    pub mnemonic: Option<String>,

    /// Derivation index of the deploying account within the mnemonic.
    #[clap(long, env, default_value = "0")]
    pub account_index: u32,

    /// Number of blocks that have to be mined on top of a deployment
    /// before the next step starts.
    #[clap(long, env, default_value = "1")]
    pub confirmations: u64,

    /// How long to wait for a deployment to be confirmed before failing the
    /// run.
    #[clap(long, env, value_parser = humantime::parse_duration)]
    pub confirmation_timeout: Option<Duration>,

    /// Validate the plans and resolve their artifacts without deploying.
    #[clap(long, env)]
    pub dry_run: bool,

    /// Where to write a JSON summary of the deployments.
    #[clap(long, env)]
    pub report_path: Option<PathBuf>,
}

impl Arguments {
    pub fn account(&self) -> Result<Account> {
        match (&self.private_key, &self.mnemonic) {
            (Some(key), _) => Ok(Account::PrivateKey(key.clone())),
            (None, Some(phrase)) => Ok(Account::Mnemonic {
                phrase: phrase.clone(),
                index: self.account_index,
            }),
            (None, None) => bail!("either --private-key or --mnemonic must be provided"),
        }
    }
}

impl Display for Arguments {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let Self {
            log_filter,
            log_stderr_threshold,
            use_json_logs,
            plan,
            artifacts_dir,
            node_url,
            private_key,
            mnemonic,
            account_index,
            confirmations,
            confirmation_timeout,
            dry_run,
            report_path,
        } = self;

        writeln!(f, "log_filter: {log_filter}")?;
        writeln!(f, "log_stderr_threshold: {log_stderr_threshold}")?;
        writeln!(f, "use_json_logs: {use_json_logs}")?;
        writeln!(f, "plan: {plan:?}")?;
        writeln!(f, "artifacts_dir: {}", artifacts_dir.display())?;
        writeln!(f, "node_url: {node_url}")?;
        writeln!(f, "private_key: {}", secret(private_key))?;
        writeln!(f, "mnemonic: {}", secret(mnemonic))?;
        writeln!(f, "account_index: {account_index}")?;
        writeln!(f, "confirmations: {confirmations}")?;
        writeln!(f, "confirmation_timeout: {confirmation_timeout:?}")?;
        writeln!(f, "dry_run: {dry_run}")?;
        writeln!(f, "report_path: {report_path:?}")?;
        Ok(())
    }
}

fn secret(value: &Option<String>) -> &'static str {
    match value {
        Some(_) => "SECRET",
        None => "None",
    }
}
