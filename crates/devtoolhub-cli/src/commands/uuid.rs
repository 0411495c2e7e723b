use devtoolhub_core::tools::uuid::{self, UuidOptions};

use crate::error::CliError;

pub fn run_uuid(count: usize, uppercase: bool, no_hyphens: bool) -> Result<(), CliError> {
    let options = UuidOptions {
        uppercase,
        hyphens_removed: no_hyphens,
    };
    for id in uuid::generate_batch(count, options)? {
        println!("{id}");
    }
    Ok(())
}
