//! # ormharness
//!
//! Runs the Hibernate ORM integration suite against a chosen pair of Cloud
//! Spanner driver and dialect implementations.
//!
//! A run resolves the selected variants to concrete jar and class names,
//! renders the two Gradle files the suite reads, patches them into a local
//! `hibernate-orm` checkout and invokes the Gradle test task.
//!
//! ```no_run
//! use ormharness::{RunParams, VariantSelection};
//!
//! let selection =
//!     VariantSelection::parse("knut", "ours", "jdbc:cloudspanner:/projects/p", "SQLTest").unwrap();
//! let code = ormharness::run(&selection, &RunParams::new().open_report(false)).unwrap();
//! assert_eq!(code, 0);
//! ```

pub mod error;
pub mod run;
pub mod template;
pub mod variant;

pub use error::{Error, Result};
pub use run::{run, run_with, Invocation, ProcessRunner, RunParams, StaticAsset, SystemRunner, Workspace};
pub use template::{render_database_config, render_documentation_config, RenderedArtifact};
pub use variant::{resolve, ArtifactSource, DialectVariant, DriverVariant, ResolvedConfig, VariantSelection};
