//! Unary, binary and ternary operators.
//!
//! Each operator knows its source symbol, its precedence and its
//! associativity. Precedence only matters when a tree is rendered back to
//! text: the renderer compares a child's precedence with its parent's to
//! decide whether the child needs parentheses.
//!
//! Lower precedence = looser binding.
//!
//! | level | operators |
//! |---|---|
//! | 1 | `c ? t : f` |
//! | 2 | `??` |
//! | 3 | `\|\|` |
//! | 4 | `&&` |
//! | 5 | `==` `!=` |
//! | 6 | `<` `<=` `>` `>=` |
//! | 7 | `+` `-` |
//! | 8 | `*` `/` `%` |
//! | 9 | prefix `-` `!` |
//! | 10 | `a[i]` `a[i:j]` |
//! | 11 | literals, names, calls, comprehensions |

/// Precedence levels.
pub mod prec {
    pub const CONDITIONAL: u8 = 1;
    pub const COALESCE: u8 = 2;
    pub const OR: u8 = 3;
    pub const AND: u8 = 4;
    pub const EQUALITY: u8 = 5;
    pub const COMPARISON: u8 = 6;
    pub const ADDITIVE: u8 = 7;
    pub const MULTIPLICATIVE: u8 = 8;
    pub const PREFIX: u8 = 9;
    pub const POSTFIX: u8 = 10;
    pub const ATOM: u8 = 11;
}

/// Which side groups first when operators of equal precedence chain.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Associativity {
    Left,
    Right,
}

/// Prefix operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOp {
    /// Arithmetic negation `-x`.
    Neg,
    /// Logical negation `!x`.
    Not,
}

impl UnaryOp {
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }

    pub const fn precedence(self) -> u8 {
        prec::PREFIX
    }

    /// Prefix operators nest to the right: `--x` is `-(-x)`.
    pub const fn associativity(self) -> Associativity {
        Associativity::Right
    }
}

/// Two-operand operators, including indexing.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BinaryOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,

    // Comparison
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,

    // Logical
    And,
    Or,

    // Other
    Coalesce,
    /// Single-element access `a[i]`.
    Index,
}

impl BinaryOp {
    /// Source-level symbol. For `Index` this is the opening bracket.
    pub const fn as_symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "==",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "&&",
            Self::Or => "||",
            Self::Coalesce => "??",
            Self::Index => "[",
        }
    }

    pub const fn precedence(self) -> u8 {
        match self {
            Self::Mul | Self::Div | Self::Mod => prec::MULTIPLICATIVE,
            Self::Add | Self::Sub => prec::ADDITIVE,
            Self::Lt | Self::LtEq | Self::Gt | Self::GtEq => prec::COMPARISON,
            Self::Eq | Self::NotEq => prec::EQUALITY,
            Self::And => prec::AND,
            Self::Or => prec::OR,
            Self::Coalesce => prec::COALESCE,
            Self::Index => prec::POSTFIX,
        }
    }

    /// `a ?? b ?? c` groups as `a ?? (b ?? c)`; everything else groups left.
    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Coalesce => Associativity::Right,
            _ => Associativity::Left,
        }
    }

    /// Suggested operand visitation order, as indices into `[left, right]`.
    ///
    /// Advisory metadata for diagnostic tooling. Evaluation always reads the
    /// left operand first regardless of this value.
    pub const fn calculation_order(self) -> [usize; 2] {
        [0, 1]
    }

    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Mod)
    }

    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Eq | Self::NotEq | Self::Lt | Self::LtEq | Self::Gt | Self::GtEq
        )
    }

    pub const fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }
}

/// Three-operand operators.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum TernaryOp {
    /// `c ? t : f`
    Conditional,
    /// `a[i:j]`, either bound optional.
    Slice,
}

impl TernaryOp {
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Conditional => prec::CONDITIONAL,
            Self::Slice => prec::POSTFIX,
        }
    }

    /// `a ? b : c ? d : e` groups as `a ? b : (c ? d : e)`.
    pub const fn associativity(self) -> Associativity {
        match self {
            Self::Conditional => Associativity::Right,
            Self::Slice => Associativity::Left,
        }
    }

    /// Advisory operand order, see [`BinaryOp::calculation_order`].
    pub const fn calculation_order(self) -> [usize; 3] {
        [0, 1, 2]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert!(BinaryOp::Mul.precedence() > BinaryOp::Add.precedence());
        assert!(BinaryOp::Add.precedence() > BinaryOp::Lt.precedence());
        assert!(BinaryOp::Lt.precedence() > BinaryOp::Eq.precedence());
        assert!(BinaryOp::And.precedence() > BinaryOp::Or.precedence());
        assert!(BinaryOp::Or.precedence() > BinaryOp::Coalesce.precedence());
        assert!(BinaryOp::Coalesce.precedence() > TernaryOp::Conditional.precedence());
    }

    #[test]
    fn postfix_binds_tighter_than_prefix() {
        assert!(BinaryOp::Index.precedence() > UnaryOp::Neg.precedence());
        assert_eq!(BinaryOp::Index.precedence(), TernaryOp::Slice.precedence());
    }

    #[test]
    fn right_associative_operators() {
        assert_eq!(BinaryOp::Coalesce.associativity(), Associativity::Right);
        assert_eq!(TernaryOp::Conditional.associativity(), Associativity::Right);
        assert_eq!(BinaryOp::Sub.associativity(), Associativity::Left);
    }

    #[test]
    fn calculation_order_is_a_permutation() {
        let mut order = BinaryOp::Div.calculation_order();
        order.sort_unstable();
        assert_eq!(order, [0, 1]);
        let mut order = TernaryOp::Conditional.calculation_order();
        order.sort_unstable();
        assert_eq!(order, [0, 1, 2]);
    }

    #[test]
    fn operator_classes() {
        assert!(BinaryOp::Mod.is_arithmetic());
        assert!(BinaryOp::GtEq.is_comparison());
        assert!(BinaryOp::Or.is_logical());
        assert!(!BinaryOp::Coalesce.is_arithmetic());
    }
}
