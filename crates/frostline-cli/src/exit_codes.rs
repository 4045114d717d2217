//! Process exit codes.

pub const SUCCESS: i32 = 0;
/// `plan --detailed-exitcode` found changes.
pub const CHANGES_PRESENT: i32 = 1;
/// Bad input, unreadable file, or a provider error.
pub const CONFIG_ERROR: i32 = 2;
