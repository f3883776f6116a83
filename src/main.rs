//! ormharness CLI - run the Hibernate suite against a Spanner driver/dialect pair

use anyhow::Context;
use clap::Parser;
use ormharness::run::execution;
use ormharness::{Error, RunParams, StaticAsset, VariantSelection};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "ormharness")]
#[command(about = "Run the Hibernate ORM integration tests against a Spanner driver and dialect")]
#[command(version)]
struct Cli {
    /// Driver variant: knut or simba
    #[arg(long, default_value = "knut")]
    driver: String,

    /// Dialect variant: knut or ours
    #[arg(long, default_value = "ours")]
    dialect: String,

    /// Connection string written into the database bundle
    #[arg(
        long,
        default_value = "jdbc:cloudspanner:/projects/my-project/instances/my-instance/databases/my-database"
    )]
    jdbc_url: String,

    /// Gradle test filter passed to --tests
    #[arg(long = "tests", default_value = "SQLTest")]
    test_filter: String,

    /// Directory holding the hibernate-orm checkout
    #[arg(long, default_value = ".")]
    workspace: PathBuf,

    /// Maven project of the subject under test
    #[arg(long, default_value = "..")]
    project_dir: PathBuf,

    /// Program used to open the HTML report (defaults to $BROWSER or google-chrome)
    #[arg(long)]
    browser: Option<String>,

    /// Extra file to copy into the workspace, as SRC=DEST (repeatable)
    #[arg(long = "asset", value_parser = parse_asset)]
    assets: Vec<StaticAsset>,

    /// Do not run `mvn install` on the subject project
    #[arg(long)]
    skip_install: bool,

    /// Do not open the test report when the suite finishes
    #[arg(long)]
    no_report: bool,

    /// Print the resolved configuration and rendered files, then exit
    #[arg(long)]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_asset(s: &str) -> Result<StaticAsset, String> {
    StaticAsset::parse(s).ok_or_else(|| format!("expected SRC=DEST, got '{}'", s))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    match try_main(cli) {
        Ok(code) => exit_code(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            let code = e.downcast_ref::<Error>().map(Error::exit_code).unwrap_or(1);
            exit_code(code)
        }
    }
}

fn try_main(cli: Cli) -> anyhow::Result<i32> {
    let selection = VariantSelection::parse(&cli.driver, &cli.dialect, cli.jdbc_url, cli.test_filter)
        .context("invalid variant selection")?;

    if cli.dry_run {
        print!("{}", execution::plan(&selection.resolve()));
        return Ok(0);
    }

    let mut params = RunParams::new()
        .workspace_root(cli.workspace)
        .project_dir(cli.project_dir)
        .open_report(!cli.no_report);
    if cli.skip_install {
        params = params.skip_install(true);
    }
    if let Some(browser) = cli.browser {
        params = params.browser(browser);
    }
    for asset in cli.assets {
        params = params.static_asset(asset);
    }

    let code = ormharness::run(&selection, &params).context("test run aborted")?;
    Ok(code)
}

fn exit_code(code: i32) -> ExitCode {
    u8::try_from(code).map(ExitCode::from).unwrap_or(ExitCode::FAILURE)
}
