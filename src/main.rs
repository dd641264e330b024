use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use npm_unpublish::config::{ConfigOverrides, EnvOverrides, UnpublishConfig};
use npm_unpublish::logging;
use npm_unpublish::unpublish::command;
use npm_unpublish::unpublish::manifest::FsManifestReader;
use npm_unpublish::unpublish::otp::PromptOtp;
use npm_unpublish::unpublish::registries::NpmRegistry;

#[derive(Parser)]
#[command(name = "npm-unpublish")]
#[command(version, about = "Remove a package, or one version of it, from an npm registry")]
struct Cli {
    /// [<@scope>/]<pkg>[@<version>]; defaults to the package in the current directory
    packages: Vec<String>,

    /// Allow removing every version of a package
    #[arg(short, long)]
    force: bool,

    /// Do not print the status line
    #[arg(long)]
    silent: bool,

    /// npm log level (silent, error, warn, notice, http, info, verbose, silly)
    #[arg(long)]
    loglevel: Option<String>,

    /// Registry base URL
    #[arg(long)]
    registry: Option<String>,

    /// One-time password for the first write
    #[arg(long)]
    otp: Option<String>,

    /// Config file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config = UnpublishConfig::load(
        cli.config.as_deref(),
        EnvOverrides::from_env(),
        ConfigOverrides {
            registry: cli.registry,
            otp: cli.otp,
            force: cli.force,
            silent: cli.silent,
            loglevel: cli.loglevel,
        },
    )?;

    let _guard = logging::init(&config.loglevel, config.log_file.as_deref());
    let project_dir = std::env::current_dir()?;

    let result = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(command::run(
            &cli.packages,
            config,
            &project_dir,
            &FsManifestReader,
            |config| NpmRegistry::new(&config.registry).with_token(config.token.clone()),
            &PromptOtp,
            &mut std::io::stdout(),
        ));

    match result {
        Ok(_) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_usage() => {
            eprintln!("{e}");
            Ok(ExitCode::FAILURE)
        }
        Err(e) => Err(e.into()),
    }
}
