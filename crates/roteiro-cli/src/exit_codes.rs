//! Process exit codes for the `roteiro` binary.

use roteiro_core::RoteiroError;

use crate::seed::SeedError;

pub const SUCCESS: i32 = 0;
pub const COMMAND_FAILED: i32 = 1;
pub const CONFIG_ERROR: i32 = 2;

/// Configuration problems anywhere in the chain exit with [`CONFIG_ERROR`].
pub fn for_error(err: &anyhow::Error) -> i32 {
    let is_config = err.chain().any(|cause| {
        matches!(cause.downcast_ref::<RoteiroError>(), Some(RoteiroError::Config { .. }))
            || matches!(cause.downcast_ref::<SeedError>(), Some(SeedError::Config { .. }))
    });
    if is_config {
        CONFIG_ERROR
    } else {
        COMMAND_FAILED
    }
}
