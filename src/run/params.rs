//! Configuration parameters for a harness run

use std::path::{Path, PathBuf};

/// Upstream repository holding the Hibernate integration tests
pub const HIBERNATE_TESTS_REPO: &str = "https://github.com/hibernate/hibernate-orm.git";

/// Bucket the driver jars are fetched from
pub const ARTIFACT_BUCKET: &str = "gs://spanner-jdbc-bucket";

/// Name of the checkout directory inside the workspace root
pub const CHECKOUT_DIR: &str = "hibernate-orm";

/// A non-templated file copied into the workspace on every run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticAsset {
    /// Source file, resolved against the current directory
    pub source: PathBuf,
    /// Destination, relative to the workspace root
    pub dest: PathBuf,
}

impl StaticAsset {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
        }
    }

    /// Parse a `SRC=DEST` pair
    pub fn parse(spec: &str) -> Option<Self> {
        let (source, dest) = spec.split_once('=')?;
        if source.is_empty() || dest.is_empty() {
            return None;
        }
        Some(Self::new(source, dest))
    }
}

/// Configuration parameters for running the suite
#[derive(Debug, Clone)]
pub struct RunParams {
    /// Directory the checkout lives in
    pub workspace_root: PathBuf,
    /// Maven project of the subject under test
    pub project_dir: PathBuf,
    pub repository_url: String,
    pub artifact_bucket: String,
    pub git: String,
    pub gsutil: String,
    pub maven: String,
    /// Program used to open the HTML test report
    pub browser: String,
    pub static_assets: Vec<StaticAsset>,
    /// Skip `mvn install` of the subject project
    pub skip_install: bool,
    /// Open the test report once the suite finishes
    pub open_report: bool,
}

impl RunParams {
    /// Create a new RunParams with default settings
    pub fn new() -> Self {
        let repository_url =
            std::env::var("ORMHARNESS_REPO_URL").unwrap_or_else(|_| HIBERNATE_TESTS_REPO.to_string());
        let artifact_bucket =
            std::env::var("ORMHARNESS_BUCKET").unwrap_or_else(|_| ARTIFACT_BUCKET.to_string());
        let browser = std::env::var("BROWSER")
            .ok()
            .and_then(|value| browser_command(&value))
            .unwrap_or_else(|| "google-chrome".to_string());

        // Check ORMHARNESS_SKIP_INSTALL environment variable
        let skip_install = std::env::var("ORMHARNESS_SKIP_INSTALL")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(false);

        RunParams {
            workspace_root: PathBuf::from("."),
            project_dir: PathBuf::from(".."),
            repository_url,
            artifact_bucket,
            git: "git".to_string(),
            gsutil: "gsutil".to_string(),
            maven: "mvn".to_string(),
            browser,
            static_assets: Vec::new(),
            skip_install,
            open_report: true,
        }
    }

    /// Set the directory the checkout lives in
    pub fn workspace_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workspace_root = root.into();
        self
    }

    /// Set the subject project directory
    pub fn project_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.project_dir = dir.into();
        self
    }

    pub fn repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = url.into();
        self
    }

    pub fn artifact_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.artifact_bucket = bucket.into();
        self
    }

    pub fn browser(mut self, browser: impl Into<String>) -> Self {
        self.browser = browser.into();
        self
    }

    /// Add a file to copy into the workspace before the suite runs
    pub fn static_asset(mut self, asset: StaticAsset) -> Self {
        self.static_assets.push(asset);
        self
    }

    pub fn skip_install(mut self, skip: bool) -> Self {
        self.skip_install = skip;
        self
    }

    pub fn open_report(mut self, open: bool) -> Self {
        self.open_report = open;
        self
    }

    /// Local path of the checkout
    pub fn checkout_dir(&self) -> PathBuf {
        self.workspace_root.join(CHECKOUT_DIR)
    }

    /// Directory the driver jar is placed in
    pub fn libs_dir(&self) -> PathBuf {
        self.checkout_dir().join("libs")
    }

    /// Gradle module the suite is run from
    pub fn test_module_dir(&self) -> PathBuf {
        self.checkout_dir().join("documentation")
    }

    pub fn gradle_wrapper(&self) -> PathBuf {
        self.checkout_dir().join("gradlew")
    }

    /// HTML report written by the Gradle test task
    pub fn report_path(&self) -> PathBuf {
        self.test_module_dir()
            .join(Path::new("target/reports/tests/test/index.html"))
    }

    /// Remote location of a driver jar
    pub fn artifact_url(&self, name: &str) -> String {
        format!("{}/{}", self.artifact_bucket.trim_end_matches('/'), name)
    }
}

/// Program named by a `BROWSER` value
///
/// The value is a `:`-separated list of commands, each possibly carrying
/// arguments or a `%s` placeholder. Only the program of the first non-empty
/// entry is used; the report path is always appended as the sole argument.
pub fn browser_command(value: &str) -> Option<String> {
    value
        .split(':')
        .find_map(|entry| entry.split_whitespace().next())
        .map(str::to_string)
}

impl Default for RunParams {
    fn default() -> Self {
        Self::new()
    }
}
