//! Tree-walking evaluator over a 256-cell circular tape.
//!
//! Behaviors:
//! - Both `>` and `<` advance the pointer by one, wrapping at 256.
//! - Cells hold values modulo 128; `-` on 0 gives 127.
//! - A loop captures the cell under the pointer when it is reached and keeps
//!   re-running its body while *that* cell is non-zero, wherever the
//!   pointer has moved since.
//! - Reaching a loop nested deeper than the configured ceiling aborts the run
//!   before its body executes.

use std::io;

use crate::error::{BrainfuckError, RuntimeFault};
use crate::io::{Input, Output};
use crate::parser::{AstNode, Instruction, Program};

pub const TAPE_LEN: usize = 256;
pub const CELL_MODULUS: u8 = 128;
pub const MAX_RECURSION_DEPTH: usize = 100;

/// Fixed-length circular memory tape, zero-initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tape {
    cells: [u8; TAPE_LEN],
}

impl Default for Tape {
    fn default() -> Self {
        Self { cells: [0; TAPE_LEN] }
    }
}

impl Tape {
    pub fn get(&self, index: usize) -> u8 {
        self.cells[index % TAPE_LEN]
    }

    pub fn set(&mut self, index: usize, value: u8) {
        self.cells[index % TAPE_LEN] = value % CELL_MODULUS;
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }
}

/// Mutable state of one run: tape, data pointer, and current loop depth.
#[derive(Debug, Clone, Default)]
pub struct EvalContext {
    pub tape: Tape,
    pub pointer: usize,
    pub depth: usize,
}

impl EvalContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> u8 {
        self.tape.get(self.pointer)
    }
}

/// Walks a [`Program`] against an [`EvalContext`], doing I/O through the
/// supplied boundaries.
pub struct Evaluator<'io> {
    input: &'io mut dyn Input,
    output: &'io mut dyn Output,
    max_depth: usize,
}

impl<'io> Evaluator<'io> {
    pub fn new(input: &'io mut dyn Input, output: &'io mut dyn Output) -> Self {
        Self {
            input,
            output,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Run the top-level sequence once, then flush output.
    pub fn eval_program(
        &mut self,
        program: &Program,
        ctx: &mut EvalContext,
    ) -> Result<(), BrainfuckError> {
        let result = self.eval_block(program.nodes(), ctx);
        // Flush whatever was produced, even when the run failed.
        let flushed = self.output.flush();
        result?;
        flushed?;
        Ok(())
    }

    fn eval_block(&mut self, nodes: &[AstNode], ctx: &mut EvalContext) -> Result<(), BrainfuckError> {
        for node in nodes {
            match node {
                AstNode::Primitive(instr) => self.step(*instr, ctx)?,
                AstNode::Loop(body) => self.eval_loop(body, ctx)?,
            }
        }
        Ok(())
    }

    fn eval_loop(&mut self, body: &[AstNode], ctx: &mut EvalContext) -> Result<(), BrainfuckError> {
        let depth = ctx.depth + 1;
        if depth > self.max_depth {
            tracing::debug!(depth, limit = self.max_depth, "loop nesting limit exceeded");
            return Err(BrainfuckError::RecursionLimit {
                depth,
                limit: self.max_depth,
            });
        }

        let entry = ctx.pointer;
        tracing::trace!(depth, entry, value = ctx.tape.get(entry), "enter loop");
        ctx.depth = depth;
        while ctx.tape.get(entry) > 0 {
            self.eval_block(body, ctx)?;
        }
        ctx.depth = depth - 1;
        tracing::trace!(depth, pointer = ctx.pointer, "exit loop");
        Ok(())
    }

    fn step(&mut self, instr: Instruction, ctx: &mut EvalContext) -> Result<(), BrainfuckError> {
        match instr {
            // Both directions advance; there is no way to move backward.
            Instruction::Forward | Instruction::Backward => {
                ctx.pointer = (ctx.pointer + 1) % TAPE_LEN;
            }
            Instruction::Increment => {
                let after = (ctx.current() + 1) % CELL_MODULUS;
                ctx.tape.set(ctx.pointer, after);
            }
            Instruction::Decrement => {
                let after = (ctx.current() + CELL_MODULUS - 1) % CELL_MODULUS;
                ctx.tape.set(ctx.pointer, after);
            }
            Instruction::Output => {
                self.output.write_char(ctx.current())?;
            }
            Instruction::Input => {
                // Let prompts written so far reach the user before blocking.
                self.output.flush()?;
                let c = match self.input.read_char() {
                    Ok(Some(c)) => c,
                    Ok(None) => return Err(RuntimeFault::EndOfInput.into()),
                    Err(e) if e.kind() == io::ErrorKind::Interrupted => {
                        return Err(RuntimeFault::Interrupted.into());
                    }
                    Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                        return Err(RuntimeFault::InvalidInput(e).into());
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "input read failed");
                        return Err(e.into());
                    }
                };
                // Code point, not encoded byte: 'é' (U+00E9) stores 0x69.
                let code = u32::from(c) % u32::from(CELL_MODULUS);
                ctx.tape.set(ctx.pointer, code as u8);
            }
        }
        Ok(())
    }
}
