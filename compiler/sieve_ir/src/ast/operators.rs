//! Operators and their C precedence levels.
//!
//! Precedence levels are the C ones, numbered so that a smaller number binds
//! tighter. `1` is postfix/primary, `14` is assignment, and [`PREC_TOP`] is
//! a context that accepts anything. [`PREC_STATEMENT`] is looser still: the
//! expression's value is discarded.

use serde::{Deserialize, Serialize};

/// Postfix operators, calls, indexing, member access.
pub const PREC_POSTFIX: u8 = 1;
/// Prefix unary operators and casts.
pub const PREC_PREFIX: u8 = 2;
/// The `?:` operator.
pub const PREC_CONDITIONAL: u8 = 13;
/// Simple and compound assignment.
pub const PREC_ASSIGN: u8 = 14;
/// Argument, condition or returned-value position: no parentheses ever
/// needed, but the value is used.
pub const PREC_TOP: u8 = 15;
/// Expression statement or for-loop init/update: the value is discarded.
pub const PREC_STATEMENT: u8 = 16;

/// Binary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Shl,
    /// Arithmetic (sign-propagating) right shift.
    Shr,
    /// Logical (zero-filling) right shift.
    UShr,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Eq,
    NotEq,
    BitAnd,
    BitXor,
    BitOr,
    And,
    Or,
}

impl BinaryOp {
    /// Source-level spelling.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Rem => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::UShr => ">>>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::BitAnd => "&",
            Self::BitXor => "^",
            Self::BitOr => "|",
            Self::And => "&&",
            Self::Or => "||",
        }
    }

    /// C precedence (lower binds tighter).
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Rem => 3,
            Self::Add | Self::Sub => 4,
            Self::Shl | Self::Shr | Self::UShr => 5,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => 6,
            Self::Eq | Self::NotEq => 7,
            Self::BitAnd => 8,
            Self::BitXor => 9,
            Self::BitOr => 10,
            Self::And => 11,
            Self::Or => 12,
        }
    }

    /// Operators whose result is always `boolean`.
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq | Self::Eq | Self::NotEq
        )
    }

    pub const fn is_shift(self) -> bool {
        matches!(self, Self::Shl | Self::Shr | Self::UShr)
    }
}

/// Unary operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
    BitNot,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Plus => "+",
            Self::Not => "!",
            Self::BitNot => "~",
            Self::PreInc | Self::PostInc => "++",
            Self::PreDec | Self::PostDec => "--",
        }
    }

    pub const fn precedence(self) -> u8 {
        match self {
            Self::PostInc | Self::PostDec => PREC_POSTFIX,
            _ => PREC_PREFIX,
        }
    }

    pub const fn is_postfix(self) -> bool {
        matches!(self, Self::PostInc | Self::PostDec)
    }

    /// `++`/`--` in either position.
    pub const fn is_mutation(self) -> bool {
        matches!(
            self,
            Self::PreInc | Self::PreDec | Self::PostInc | Self::PostDec
        )
    }
}
