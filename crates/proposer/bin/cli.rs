use clap::{
    builder::{styling::AnsiColor, Styles},
    ArgAction, Parser, Subcommand,
};
use proposer::{
    cmd::{
        address::AddressCommand, batch::BatchCommand, deploy::DeployCommand,
        upgrade::UpgradeCommand, validate::ValidateCommand, verify::VerifyCommand,
    },
    common::consts::EXIT_POLICY_VIOLATION,
};
use proposer_version::SHORT_VERSION;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// The verbosity level.
pub type Verbosity = u8;

#[derive(Debug, Parser)]
#[command(
    name = "proposer",
    about = "Builds Safe multisig proposals for contract deployments and checks them against a deployment policy.",
    version = SHORT_VERSION.as_str(),
    term_width = 80,
    styles = get_color_style()
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable debug logging")]
    pub debug: bool,

    /// Verbosity level of the log messages.
    ///
    /// Pass multiple times to increase the verbosity (e.g. -v, -vv, -vvv).
    /// Ignored when RUST_LOG is set.
    #[arg(help_heading = "Display options", global = true, short, long, verbatim_doc_comment, action = ArgAction::Count)]
    verbosity: Verbosity,
}

impl Cli {
    /// Runs the selected command and returns the process exit code.
    pub fn run(self) -> eyre::Result<i32> {
        self.init_tracing();

        let passed = match self.command {
            Commands::Deploy(deploy) => deploy.execute().map(|_| true)?,
            Commands::Upgrade(upgrade) => upgrade.execute().map(|_| true)?,
            Commands::Batch(batch) => batch.execute().map(|_| true)?,
            Commands::Address(address) => address.execute().map(|_| true)?,
            Commands::Validate(validate) => validate.execute()?,
            Commands::Verify(verify) => verify.execute()?,
        };

        Ok(if passed { 0 } else { EXIT_POLICY_VIOLATION })
    }

    fn init_tracing(&self) {
        let level = match (self.debug, self.verbosity) {
            (true, _) => "debug",
            (false, 0) => "warn",
            (false, 1) => "info",
            (false, 2) => "debug",
            (false, _) => "trace",
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("proposer={level},{level}")));

        // stdout carries command output, logs go to stderr
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init();
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    #[command(name = "deploy", about = "Build a deployment proposal from a config file")]
    Deploy(DeployCommand),

    #[command(name = "upgrade", about = "Build a proxy upgrade proposal from a config file")]
    Upgrade(UpgradeCommand),

    #[command(name = "batch", about = "Combine proposals into one batch")]
    Batch(BatchCommand),

    #[command(name = "address", about = "Predict a CREATE2 deployment address")]
    Address(AddressCommand),

    #[command(name = "validate", about = "Check a proposal against the deployment policy")]
    Validate(ValidateCommand),

    #[command(name = "verify", about = "Check a proposal against its validation hash")]
    Verify(VerifyCommand),
}

fn get_color_style() -> Styles {
    Styles::styled()
        .usage(AnsiColor::Green.on_default().bold().underline())
        .header(AnsiColor::Yellow.on_default().bold().underline())
        .literal(AnsiColor::Green.on_default())
        .placeholder(AnsiColor::Green.on_default())
}
