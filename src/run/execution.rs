//! Run orchestration

use crate::error::{Error, Result};
use crate::run::params::RunParams;
use crate::run::process::{Invocation, ProcessRunner};
use crate::run::workspace::Workspace;
use crate::template;
use crate::variant::{ArtifactSource, ResolvedConfig, VariantSelection};
use std::fmt::{self, Write};
use tracing::{debug, info, warn};

/// Run the suite for one selection - main implementation
///
/// Every step must succeed before the next one starts. Returns the exit code
/// of the last external command issued.
pub fn run_impl<R: ProcessRunner>(
    selection: &VariantSelection,
    params: &RunParams,
    runner: &mut R,
) -> Result<i32> {
    let config = selection.resolve();
    info!(
        driver = %selection.driver,
        dialect = %selection.dialect,
        jar = %config.jar_file_name,
        "resolved variants"
    );

    if params.skip_install {
        info!("skipping subject install");
    } else {
        let pom = params.project_dir.join("pom.xml");
        info!(pom = %pom.display(), "installing subject project");
        run_checked(
            runner,
            &Invocation::new(&params.maven)
                .args(["install", "-DskipTests", "-f"])
                .arg(&pom),
        )?;
    }

    let checkout = params.checkout_dir();
    let mut workspace =
        Workspace::new(&params.workspace_root, runner).with_tools(&params.git, &params.gsutil);
    workspace.ensure_repository(&params.repository_url, &checkout)?;
    match selection.driver.artifact_source() {
        ArtifactSource::ProjectDir => workspace.ensure_local_artifact(
            &config.jar_file_name,
            &params.project_dir,
            &params.libs_dir(),
        )?,
        ArtifactSource::Bucket => workspace.ensure_dependency_artifact(
            &config.jar_file_name,
            &params.artifact_url(&config.jar_file_name),
            &params.libs_dir(),
        )?,
    };

    for asset in &params.static_assets {
        workspace.copy_static_asset(&asset.source, &asset.dest)?;
    }
    for artifact in template::render_artifacts(&config) {
        log_entries(&artifact.content);
        let path = workspace.write_artifact(&artifact)?;
        info!(path = %path.display(), "patched build configuration");
    }
    drop(workspace);

    let module_dir = params.test_module_dir();
    info!(filter = %config.test_filter, "running test suite");
    let mut code = run_checked(
        runner,
        &Invocation::new(params.gradle_wrapper())
            .args(["clean", "test", "-p"])
            .arg(&module_dir)
            .args(["--tests", config.test_filter.as_str()]),
    )?;

    if params.open_report {
        let report = params.report_path();
        info!(report = %report.display(), "opening test report");
        code = run_checked(runner, &Invocation::new(&params.browser).arg(&report))?;
    }

    Ok(code)
}

/// Describe what a run would write without touching anything
pub fn plan(config: &ResolvedConfig) -> String {
    let mut out = String::new();
    // writing into a String cannot fail
    let _ = write_plan(&mut out, config);
    out
}

fn write_plan(out: &mut String, config: &ResolvedConfig) -> fmt::Result {
    writeln!(out, "jar: {}", config.jar_file_name)?;
    writeln!(out, "driver: {}", config.driver_class_name)?;
    writeln!(out, "dialect: {}", config.dialect_class_name)?;
    writeln!(out, "url: {}", config.jdbc_url)?;
    writeln!(out, "tests: {}", config.test_filter)?;
    for artifact in template::render_artifacts(config) {
        write!(out, "\n-- {} --{}", artifact.target_path.display(), artifact.content)?;
    }
    Ok(())
}

fn run_checked<R: ProcessRunner>(runner: &mut R, invocation: &Invocation) -> Result<i32> {
    let code = runner.run(invocation)?;
    if code != 0 {
        warn!(command = %invocation, code, "command failed");
        return Err(Error::process_error(invocation.to_string(), code));
    }
    Ok(code)
}

fn log_entries(content: &str) {
    match template::bundle_entries(content) {
        Ok(entries) => {
            for (key, value) in entries {
                debug!(key = %key, value = %value, "bundle entry");
            }
        }
        Err(e) => debug!(error = %e, "cannot inspect rendered file"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::variant::{DialectVariant, DriverVariant};

    #[test]
    fn test_plan_lists_config_then_files() {
        let selection = VariantSelection::new(
            DriverVariant::Simba,
            DialectVariant::Knut,
            "jdbc:example",
            "BasicTest",
        );
        let config = selection.resolve();
        let out = plan(&config);

        assert!(out.starts_with(
            "jar: CloudSpannerJDBC42.jar\n\
             driver: com.simba.cloudspanner.core.jdbc42.CloudSpanner42Driver\n\
             dialect: knut.dialect.CloudSpannerDialect\n\
             url: jdbc:example\n\
             tests: BasicTest\n"
        ));
        for artifact in template::render_artifacts(&config) {
            let header = format!("\n-- {} --", artifact.target_path.display());
            assert!(out.contains(&format!("{}{}", header, artifact.content)));
        }
    }
}
