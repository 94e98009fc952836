use alloy::primitives::Address;
use bytesize::ByteSize;
use owo_colors::OwoColorize;

/// EIP-170 limit on deployed code.
pub const MAX_CODE_SIZE: usize = 24_576;
/// EIP-3860 limit on init code.
pub const MAX_INIT_CODE_SIZE: usize = 2 * MAX_CODE_SIZE;

/// The line announcing a deployment. Printed exactly once per deployment.
pub fn deployed_line(contract: &str, address: Address) -> String {
    format!("{contract} deployed to address:: {address}")
}

pub fn format_gas(gas: u128) -> String {
    let text = format!("{gas} gas");
    if gas <= 3_000_000 {
        text.bright_green().to_string()
    } else if gas <= 7_000_000 {
        text.yellow().to_string()
    } else {
        text.bright_purple().to_string()
    }
}

/// Pretty-prints a code size, warning as it approaches `limit` bytes.
pub fn format_code_size(len: usize, limit: usize) -> String {
    let text = ByteSize::b(len as u64).to_string();
    if len > limit {
        format!("{text}, over the {limit} byte limit").red().to_string()
    } else if len * 4 > limit * 3 {
        text.yellow().to_string()
    } else {
        text.bright_green().to_string()
    }
}
