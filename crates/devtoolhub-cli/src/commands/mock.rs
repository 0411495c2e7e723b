use devtoolhub_core::tools::mock::{self, MockKind};

use crate::cli::MockKindArg;
use crate::error::CliError;

pub fn run_mock(kind: MockKindArg, count: usize) -> Result<(), CliError> {
    let kind = match kind {
        MockKindArg::User => MockKind::User,
        MockKindArg::Product => MockKind::Product,
        MockKindArg::Post => MockKind::Post,
    };
    println!("{}", serde_json::to_string_pretty(&mock::generate(kind, count)?)?);
    Ok(())
}
