//! Operators shared by the WHILE and FUN arithmetic/comparison grammars.

/// An arithmetic operator: `+ - * / %`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AOp {
    /// Map an operator lexeme to its variant, or `None` if it is not one of
    /// `+ - * / %`.
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "+" => Some(AOp::Add),
            "-" => Some(AOp::Sub),
            "*" => Some(AOp::Mul),
            "/" => Some(AOp::Div),
            "%" => Some(AOp::Mod),
            _ => None,
        }
    }
}

/// A comparison operator: `== != < > <= >=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
}

impl CmpOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "==" => Some(CmpOp::Eq),
            "!=" => Some(CmpOp::Ne),
            "<" => Some(CmpOp::Lt),
            ">" => Some(CmpOp::Gt),
            "<=" => Some(CmpOp::Le),
            ">=" => Some(CmpOp::Ge),
            _ => None,
        }
    }
}

/// A boolean operator: `&& ||`. WHILE-only — FUN has no logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOp {
    And,
    Or,
}

impl LogOp {
    pub fn from_lexeme(lexeme: &str) -> Option<Self> {
        match lexeme {
            "&&" => Some(LogOp::And),
            "||" => Some(LogOp::Or),
            _ => None,
        }
    }
}
