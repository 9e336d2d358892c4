//! Recursive-descent parser from a filtered symbol stream to a nested AST.
//!
//! Grammar:
//!
//! ```text
//! start = { stmt } $ ;
//! loop  = '[' { stmt } ']' ;
//! stmt  = '>' | '<' | '+' | '-' | '.' | ',' | loop ;
//! ```

use std::fmt;

use crate::error::{BrainfuckError, UnmatchedBracketKind};

/// Deepest bracket nesting the parser will descend into before giving up.
///
/// The grammar puts no bound on nesting; this guard keeps native recursion
/// inside the thread stack.
pub const MAX_PARSE_NESTING: usize = 1_000;

/// One lexical unit of the instruction alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Forward,
    Backward,
    Increment,
    Decrement,
    Output,
    Input,
    LoopOpen,
    LoopClose,
}

impl Symbol {
    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            '>' => Symbol::Forward,
            '<' => Symbol::Backward,
            '+' => Symbol::Increment,
            '-' => Symbol::Decrement,
            '.' => Symbol::Output,
            ',' => Symbol::Input,
            '[' => Symbol::LoopOpen,
            ']' => Symbol::LoopClose,
            _ => return None,
        })
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Forward => '>',
            Symbol::Backward => '<',
            Symbol::Increment => '+',
            Symbol::Decrement => '-',
            Symbol::Output => '.',
            Symbol::Input => ',',
            Symbol::LoopOpen => '[',
            Symbol::LoopClose => ']',
        }
    }

    /// The primitive this symbol stands for, or `None` for brackets.
    pub fn instruction(self) -> Option<Instruction> {
        Some(match self {
            Symbol::Forward => Instruction::Forward,
            Symbol::Backward => Instruction::Backward,
            Symbol::Increment => Instruction::Increment,
            Symbol::Decrement => Instruction::Decrement,
            Symbol::Output => Instruction::Output,
            Symbol::Input => Instruction::Input,
            Symbol::LoopOpen | Symbol::LoopClose => return None,
        })
    }
}

/// A non-structural symbol: the payload of a primitive node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Forward,
    Backward,
    Increment,
    Decrement,
    Output,
    Input,
}

impl Instruction {
    pub fn as_char(self) -> char {
        match self {
            Instruction::Forward => '>',
            Instruction::Backward => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AstNode {
    Primitive(Instruction),
    Loop(Vec<AstNode>),
}

/// A fully parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program(pub Vec<AstNode>);

impl Program {
    pub fn nodes(&self) -> &[AstNode] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Deepest loop nesting anywhere in the program.
    pub fn max_nesting(&self) -> usize {
        fn depth(nodes: &[AstNode]) -> usize {
            nodes
                .iter()
                .map(|node| match node {
                    AstNode::Primitive(_) => 0,
                    AstNode::Loop(body) => 1 + depth(body),
                })
                .max()
                .unwrap_or(0)
        }
        depth(&self.0)
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AstNode::Primitive(instr) => write!(f, "{}", instr.as_char()),
            AstNode::Loop(body) => {
                write!(f, "[")?;
                for node in body {
                    write!(f, "{node}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for node in &self.0 {
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

/// Parse an already-filtered symbol stream into a [`Program`].
pub fn parse(filtered: &str) -> Result<Program, BrainfuckError> {
    let program = Parser::new(filtered).parse_start()?;
    tracing::debug!(
        nodes = program.nodes().len(),
        nesting = program.max_nesting(),
        "parsed program"
    );
    Ok(program)
}

struct Parser {
    code: Vec<char>,
    pos: usize,
    nesting: usize,
}

impl Parser {
    fn new(filtered: &str) -> Self {
        Self {
            code: filtered.chars().collect(),
            pos: 0,
            nesting: 0,
        }
    }

    fn parse_start(&mut self) -> Result<Program, BrainfuckError> {
        let nodes = self.parse_stmts()?;
        // `stmts` only stops early on a `]` it cannot close.
        if self.pos < self.code.len() {
            return Err(BrainfuckError::Syntax {
                pos: self.pos,
                kind: UnmatchedBracketKind::Close,
            });
        }
        Ok(Program(nodes))
    }

    fn parse_stmts(&mut self) -> Result<Vec<AstNode>, BrainfuckError> {
        let mut nodes = Vec::new();
        while let Some(node) = self.parse_stmt()? {
            nodes.push(node);
        }
        Ok(nodes)
    }

    /// Returns `None` at end of input or in front of a `]`.
    fn parse_stmt(&mut self) -> Result<Option<AstNode>, BrainfuckError> {
        let Some(&c) = self.code.get(self.pos) else {
            return Ok(None);
        };
        let symbol = Symbol::from_char(c).ok_or_else(|| BrainfuckError::ParsingEngine {
            pos: self.pos,
            reason: format!("unexpected character {c:?} in filtered input"),
        })?;

        if let Some(instr) = symbol.instruction() {
            self.pos += 1;
            return Ok(Some(AstNode::Primitive(instr)));
        }
        match symbol {
            Symbol::LoopOpen => self.parse_loop().map(Some),
            _ => Ok(None),
        }
    }

    fn parse_loop(&mut self) -> Result<AstNode, BrainfuckError> {
        let open = self.pos;
        if self.nesting >= MAX_PARSE_NESTING {
            return Err(BrainfuckError::ParsingEngine {
                pos: open,
                reason: format!("bracket nesting exceeds the parser limit of {MAX_PARSE_NESTING}"),
            });
        }
        self.pos += 1;
        self.nesting += 1;
        let body = self.parse_stmts()?;
        self.nesting -= 1;

        if self.code.get(self.pos) == Some(&']') {
            self.pos += 1;
            Ok(AstNode::Loop(body))
        } else {
            Err(BrainfuckError::Syntax {
                pos: open,
                kind: UnmatchedBracketKind::Open,
            })
        }
    }
}
