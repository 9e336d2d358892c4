//! Stable exit codes for the `bf` binary.

/// Program ran to completion.
pub const OK: i32 = 0;
/// Failure while the program was running (I/O, exhausted input).
pub const RUNTIME: i32 = 1;
/// Bad command-line usage.
pub const USAGE: i32 = 2;
/// Source does not match the grammar.
pub const SYNTAX: i32 = 3;
/// Internal parser fault.
pub const PARSING: i32 = 4;
/// Loop nesting ceiling exceeded.
pub const RECURSION: i32 = 5;
/// Program source could not be read.
pub const SOURCE_READ: i32 = 6;
/// Configuration file exists but is invalid.
pub const CONFIG: i32 = 7;
/// Terminated by ctrl+c.
pub const INTERRUPTED: i32 = 130;
