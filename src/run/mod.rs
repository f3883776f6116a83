//! Run orchestration module

pub mod execution;
pub mod params;
pub mod process;
pub mod workspace;

// Re-export public types
pub use params::{RunParams, StaticAsset};
pub use process::{Invocation, ProcessRunner, SystemRunner};
pub use workspace::{RepositorySync, Workspace};

use crate::error::Result;
use crate::variant::VariantSelection;

/// Run the suite for a selection with real child processes
pub fn run(selection: &VariantSelection, params: &RunParams) -> Result<i32> {
    run_with(selection, params, &mut SystemRunner)
}

/// Run the suite for a selection with the given process runner
pub fn run_with<R: ProcessRunner>(
    selection: &VariantSelection,
    params: &RunParams,
    runner: &mut R,
) -> Result<i32> {
    execution::run_impl(selection, params, runner)
}
