//! Depth/phase tracker: follows brace nesting from the target struct's
//! opening line to its closing `};`.

use super::classify::{count_braces, indent_of, is_struct_terminator, strip_line_comment};
use crate::error::{Error, Result};
use tracing::debug;

/// A nested type body opened inside the target struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockKind {
    Enum(String),
    Struct(String),
    Anonymous,
}

#[derive(Debug)]
pub struct OpenBlock {
    kind: BlockKind,
    /// Depth of the block's own body; always >= 2.
    body_depth: usize,
}

/// Where the current line sits, seen from the extractors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context<'a> {
    /// Directly inside the target struct (depth 1).
    TopLevel,
    /// Directly inside a nested enum body.
    EnumBody(&'a str),
    /// Directly inside a nested struct body.
    StructBody(&'a str),
    /// Method bodies, initializers, anonymous blocks.
    Opaque,
}

#[derive(Debug)]
pub enum Phase {
    Searching,
    InTargetStruct {
        start_line: usize,
        /// Leading whitespace of the opening line; the closing `};` must match it.
        indent: usize,
        depth: usize,
        blocks: Vec<OpenBlock>,
    },
    Finished {
        start_line: usize,
        end_line: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Continue,
    Finished,
}

#[derive(Debug)]
pub struct Tracker {
    phase: Phase,
}

impl Default for Tracker {
    fn default() -> Self {
        Self {
            phase: Phase::Searching,
        }
    }
}

/// Opening marker of the target struct, compared against trimmed lines.
pub fn opening_marker(target: &str) -> String {
    format!("struct {} {{", target)
}

impl Tracker {
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn is_searching(&self) -> bool {
        matches!(self.phase, Phase::Searching)
    }

    /// Enter the target struct when `raw`, trimmed, is exactly its opening
    /// marker.
    pub fn try_enter(&mut self, raw: &str, marker: &str, line: usize) -> bool {
        if !self.is_searching() || raw.trim() != marker {
            return false;
        }
        self.phase = Phase::InTargetStruct {
            start_line: line,
            indent: indent_of(raw),
            depth: 1,
            blocks: Vec::new(),
        };
        true
    }

    #[cfg(test)]
    fn depth(&self) -> usize {
        match &self.phase {
            Phase::InTargetStruct { depth, .. } => *depth,
            _ => 0,
        }
    }

    /// Parsing context for the current line, before its braces are applied.
    pub fn context(&self) -> Context<'_> {
        let Phase::InTargetStruct { depth, blocks, .. } = &self.phase else {
            return Context::Opaque;
        };
        if *depth == 1 {
            return Context::TopLevel;
        }
        match blocks.last() {
            Some(block) if block.body_depth == *depth => match &block.kind {
                BlockKind::Enum(name) => Context::EnumBody(name),
                BlockKind::Struct(name) => Context::StructBody(name),
                BlockKind::Anonymous => Context::Opaque,
            },
            _ => Context::Opaque,
        }
    }

    /// Apply the braces of one raw source line. `opener` is the nested type
    /// this line opens, if any.
    pub fn advance(
        &mut self,
        line: usize,
        raw: &str,
        opener: Option<BlockKind>,
    ) -> Result<Transition> {
        let Phase::InTargetStruct {
            start_line,
            indent,
            depth,
            blocks,
        } = &mut self.phase
        else {
            return Ok(Transition::Continue);
        };

        let code = strip_line_comment(raw.trim());

        let (opening, closing) = count_braces(code);

        if opening > 0 {
            if let Some(kind) = opener {
                blocks.push(OpenBlock {
                    kind,
                    body_depth: *depth + 1,
                });
            }
            *depth += opening;
            debug!(line, depth = *depth, "opening brace");
        }

        if closing == 0 {
            return Ok(Transition::Continue);
        }

        if closing > *depth {
            return Err(Error::DepthViolation {
                line,
                depth: *depth as i64 - closing as i64,
            });
        }
        *depth -= closing;
        debug!(line, depth = *depth, "closing brace");

        while blocks.last().is_some_and(|b| b.body_depth > *depth) {
            if let Some(OpenBlock {
                kind: BlockKind::Enum(name),
                ..
            }) = blocks.pop()
            {
                debug!(line, enum_name = %name, "end of enum");
            }
        }

        if *depth > 0 {
            return Ok(Transition::Continue);
        }
        // A `};` indented differently from the opener closes a nested body
        // that was already closed.
        if !is_struct_terminator(code) || indent_of(raw) != *indent {
            return Err(Error::DepthViolation { line, depth: 0 });
        }

        let start_line = *start_line;
        self.phase = Phase::Finished {
            start_line,
            end_line: line,
        };
        Ok(Transition::Finished)
    }
}
