//! A tree-walking interpreter for a Brainfuck-family tape language.
//!
//! Source text goes through three stages:
//! - [`filter`] drops everything outside the alphabet `><+-.,[]`.
//! - [`parse`] builds a nested [`Program`] of primitives and loops, rejecting
//!   unbalanced brackets.
//! - [`Evaluator`] walks the tree against a fresh [`EvalContext`].
//!
//! Features and behaviors:
//! - Memory tape of 256 cells initialized to 0; the pointer wraps at both ends.
//! - Cells hold values modulo 128.
//! - `>` and `<` both move the pointer one cell forward.
//! - A loop keeps running while the cell it started on is non-zero.
//! - Loop nesting deeper than 100 (configurable) aborts the run.
//! - Input `,` reads one character; running out of input is an error.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_tree::BrainfuckReader;
//!
//! // Prints the character with code point 2, then stops.
//! let bf = BrainfuckReader::new("++.".to_string());
//! bf.run().expect("program should run");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod error;
pub mod eval;
pub mod exit_codes;
pub mod filter;
pub mod io;
pub mod logging;
pub mod parser;
pub mod reader;
pub mod theme;

pub use error::{BrainfuckError, RuntimeFault, UnmatchedBracketKind};
pub use eval::{EvalContext, Evaluator, Tape, CELL_MODULUS, MAX_RECURSION_DEPTH, TAPE_LEN};
pub use filter::filter;
pub use parser::{parse, AstNode, Instruction, Program, Symbol};
pub use reader::BrainfuckReader;
