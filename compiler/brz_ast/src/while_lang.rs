//! The WHILE statement and expression nodes.
//!
//! Grounded on the `Stmt`/`AExp`/`BExp` class hierarchy the distilled
//! recursive-descent parser builds (`Skip`/`Assign`/`If`/`While`/`Read`/
//! `WriteId`/`WriteString`, `Var`/`Num`/`Aop`, `TrueConst`/`FalseConst`/
//! `Bop`/`Lop`).

use crate::ops::{AOp, CmpOp, LogOp};
use brz_diagnostic::Span;

/// An ordered sequence of statements.
pub type Block = Vec<Stmt>;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Skip(Span),
    Assign {
        name: String,
        value: AExp,
        span: Span,
    },
    If {
        cond: BExp,
        then_block: Block,
        else_block: Block,
        span: Span,
    },
    While {
        cond: BExp,
        body: Block,
        span: Span,
    },
    Read {
        name: String,
        span: Span,
    },
    WriteId {
        name: String,
        span: Span,
    },
    WriteString {
        text: String,
        span: Span,
    },
}

impl Stmt {
    pub fn span(&self) -> Span {
        match self {
            Stmt::Skip(span)
            | Stmt::Assign { span, .. }
            | Stmt::If { span, .. }
            | Stmt::While { span, .. }
            | Stmt::Read { span, .. }
            | Stmt::WriteId { span, .. }
            | Stmt::WriteString { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AExp {
    Var(String, Span),
    Num(i64, Span),
    Aop {
        op: AOp,
        lhs: Box<AExp>,
        rhs: Box<AExp>,
        span: Span,
    },
}

impl AExp {
    pub fn span(&self) -> Span {
        match self {
            AExp::Var(_, span) | AExp::Num(_, span) | AExp::Aop { span, .. } => *span,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BExp {
    True(Span),
    False(Span),
    Bop {
        op: CmpOp,
        lhs: AExp,
        rhs: AExp,
        span: Span,
    },
    Lop {
        op: LogOp,
        lhs: Box<BExp>,
        rhs: Box<BExp>,
        span: Span,
    },
}

impl BExp {
    pub fn span(&self) -> Span {
        match self {
            BExp::True(span) | BExp::False(span) => *span,
            BExp::Bop { span, .. } | BExp::Lop { span, .. } => *span,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stmt_span_reaches_into_every_variant() {
        let span = Span::new(0, 4);
        assert_eq!(Stmt::Skip(span).span(), span);
        assert_eq!(
            Stmt::Read {
                name: "x".into(),
                span,
            }
            .span(),
            span
        );
    }
}
