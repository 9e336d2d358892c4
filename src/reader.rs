use std::fs;
use std::io;
use std::path::Path;

use crate::error::BrainfuckError;
use crate::eval::{EvalContext, Evaluator, MAX_RECURSION_DEPTH};
use crate::filter::filter;
use crate::io::{Input, Output, StreamInput, StreamOutput};
use crate::parser::{parse, Program};

/// Runs one program from source text to completion.
///
/// The reader holds:
/// - the raw program source as a `String` (comments included),
/// - the loop-nesting ceiling applied during evaluation.
///
/// Every run builds a fresh [`EvalContext`]; nothing carries over between runs.
#[derive(Debug, Clone)]
pub struct BrainfuckReader {
    code: String,
    max_depth: usize,
}

impl BrainfuckReader {
    /// Create a reader from raw `code` with the default nesting ceiling of 100.
    pub fn new(code: String) -> Self {
        Self {
            code,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }

    /// Load raw source from `path`.
    pub fn from_path(path: &Path) -> Result<Self, BrainfuckError> {
        let code = fs::read_to_string(path).map_err(|source| BrainfuckError::SourceRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(code))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The instruction stream the parser sees.
    pub fn filtered(&self) -> String {
        filter(&self.code)
    }

    pub fn parse(&self) -> Result<Program, BrainfuckError> {
        parse(&self.filtered())
    }

    /// Parse, then evaluate against the given I/O boundaries.
    ///
    /// Returns the final run state on success.
    pub fn run_with_io(
        &self,
        input: &mut dyn Input,
        output: &mut dyn Output,
    ) -> Result<EvalContext, BrainfuckError> {
        let program = self.parse()?;
        let mut ctx = EvalContext::new();
        tracing::debug!(max_depth = self.max_depth, "evaluating program");
        Evaluator::new(input, output)
            .with_max_depth(self.max_depth)
            .eval_program(&program, &mut ctx)?;
        tracing::debug!(pointer = ctx.pointer, "program finished");
        Ok(ctx)
    }

    /// Run against the process's stdin and stdout.
    pub fn run(&self) -> Result<(), BrainfuckError> {
        let mut input = StreamInput::new(io::stdin().lock());
        let mut output = StreamOutput::new(io::stdout().lock());
        self.run_with_io(&mut input, &mut output).map(|_| ())
    }
}
