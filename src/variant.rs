//! Registry of driver and dialect variants
//!
//! Each variant id maps to a fixed row of concrete values. Adding a variant is
//! an enum arm plus a table row; nothing here consults external state.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A JDBC driver implementation the suite can be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverVariant {
    Knut,
    Simba,
}

/// A Hibernate dialect implementation the suite can be pointed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectVariant {
    Knut,
    Ours,
}

/// Where a driver jar is obtained from when the workspace lacks it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactSource {
    /// Prebuilt next to the subject project, copied in
    ProjectDir,
    /// Downloaded from the artifact bucket
    Bucket,
}

struct DriverRow {
    id: &'static str,
    variant: DriverVariant,
    jar_file_name: &'static str,
    driver_class_name: &'static str,
    source: ArtifactSource,
}

struct DialectRow {
    id: &'static str,
    variant: DialectVariant,
    dialect_class_name: &'static str,
}

const DRIVERS: &[DriverRow] = &[
    DriverRow {
        id: "knut",
        variant: DriverVariant::Knut,
        jar_file_name: "knut-jdbc-shaded.jar",
        driver_class_name: "com.google.cloud.spanner.jdbc.JdbcDriver",
        source: ArtifactSource::ProjectDir,
    },
    DriverRow {
        id: "simba",
        variant: DriverVariant::Simba,
        jar_file_name: "CloudSpannerJDBC42.jar",
        driver_class_name: "com.simba.cloudspanner.core.jdbc42.CloudSpanner42Driver",
        source: ArtifactSource::Bucket,
    },
];

const DIALECTS: &[DialectRow] = &[
    DialectRow {
        id: "knut",
        variant: DialectVariant::Knut,
        dialect_class_name: "knut.dialect.CloudSpannerDialect",
    },
    DialectRow {
        id: "ours",
        variant: DialectVariant::Ours,
        dialect_class_name: "com.google.cloud.spanner.hibernate.SpannerDialect",
    },
];

impl DriverVariant {
    /// All known driver ids, in table order
    pub fn ids() -> Vec<&'static str> {
        DRIVERS.iter().map(|row| row.id).collect()
    }

    // Rows are declared in discriminant order.
    fn row(self) -> &'static DriverRow {
        &DRIVERS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.row().id
    }

    /// File name of the driver jar under the workspace `libs` directory
    pub fn jar_file_name(self) -> &'static str {
        self.row().jar_file_name
    }

    pub fn driver_class_name(self) -> &'static str {
        self.row().driver_class_name
    }

    pub fn artifact_source(self) -> ArtifactSource {
        self.row().source
    }
}

impl DialectVariant {
    /// All known dialect ids, in table order
    pub fn ids() -> Vec<&'static str> {
        DIALECTS.iter().map(|row| row.id).collect()
    }

    fn row(self) -> &'static DialectRow {
        &DIALECTS[self as usize]
    }

    pub fn id(self) -> &'static str {
        self.row().id
    }

    pub fn dialect_class_name(self) -> &'static str {
        self.row().dialect_class_name
    }
}

impl FromStr for DriverVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DRIVERS
            .iter()
            .find(|row| row.id == s)
            .map(|row| row.variant)
            .ok_or_else(|| Error::unknown_variant("driver", s, &Self::ids()))
    }
}

impl FromStr for DialectVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DIALECTS
            .iter()
            .find(|row| row.id == s)
            .map(|row| row.variant)
            .ok_or_else(|| Error::unknown_variant("dialect", s, &Self::ids()))
    }
}

impl fmt::Display for DriverVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl fmt::Display for DialectVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// The user's choice for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantSelection {
    pub driver: DriverVariant,
    pub dialect: DialectVariant,
    /// Connection string handed to the suite verbatim
    pub jdbc_url: String,
    /// Gradle `--tests` pattern handed to the suite verbatim
    pub test_filter: String,
}

impl VariantSelection {
    pub fn new(
        driver: DriverVariant,
        dialect: DialectVariant,
        jdbc_url: impl Into<String>,
        test_filter: impl Into<String>,
    ) -> Self {
        Self {
            driver,
            dialect,
            jdbc_url: jdbc_url.into(),
            test_filter: test_filter.into(),
        }
    }

    /// Build a selection from raw ids, rejecting unknown variants
    pub fn parse(
        driver: &str,
        dialect: &str,
        jdbc_url: impl Into<String>,
        test_filter: impl Into<String>,
    ) -> Result<Self> {
        Ok(Self::new(
            driver.parse()?,
            dialect.parse()?,
            jdbc_url,
            test_filter,
        ))
    }

    /// Resolve this selection through the registry
    pub fn resolve(&self) -> ResolvedConfig {
        resolve(self)
    }
}

/// Concrete values the templates are rendered from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub jar_file_name: String,
    pub driver_class_name: String,
    pub dialect_class_name: String,
    pub jdbc_url: String,
    pub test_filter: String,
}

/// Look up the concrete values for a selection
pub fn resolve(selection: &VariantSelection) -> ResolvedConfig {
    ResolvedConfig {
        jar_file_name: selection.driver.jar_file_name().to_string(),
        driver_class_name: selection.driver.driver_class_name().to_string(),
        dialect_class_name: selection.dialect.dialect_class_name().to_string(),
        jdbc_url: selection.jdbc_url.clone(),
        test_filter: selection.test_filter.clone(),
    }
}
