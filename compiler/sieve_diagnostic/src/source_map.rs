//! Per-unit line tables for a whole program.

use sieve_ir::{Program, Span, UnitId};

use crate::span_utils::LineOffsetTable;
use crate::SourceLocation;

/// Resolves `(unit, span)` pairs to file positions.
pub struct SourceMap<'p> {
    program: &'p Program,
    tables: Vec<LineOffsetTable>,
}

impl<'p> SourceMap<'p> {
    pub fn build(program: &'p Program) -> Self {
        let tables = program
            .units
            .iter()
            .map(|unit| LineOffsetTable::build(&unit.text))
            .collect();
        SourceMap { program, tables }
    }

    pub fn path(&self, unit: UnitId) -> &'p str {
        &self.program.unit(unit).path
    }

    /// 1-based line of a byte offset within `unit`.
    pub fn line(&self, unit: UnitId, offset: u32) -> u32 {
        self.tables
            .get(unit.index())
            .map_or(1, |table| table.line_from_offset(offset))
    }

    pub fn locate(&self, unit: UnitId, span: Span) -> SourceLocation {
        let (line, column) = match self.tables.get(unit.index()) {
            Some(table) => table.offset_to_line_col(&self.program.unit(unit).text, span.start),
            None => (1, 1),
        };
        SourceLocation {
            path: self.path(unit).to_owned(),
            line,
            column,
        }
    }
}
