use crate::ArithmeticOperator;

use std::fmt;

/// Value of a [`Expression::Constant`].
pub type Value = u64;

/// Arithmetic over loop induction variables and external parameters.
///
/// Each [`Expression::BinaryOp`] exclusively owns its operands, so every
/// expression is a finite tree. Expressions are never mutated once built.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Expression {
    BinaryOp {
        operator: ArithmeticOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },

    // Induction variable.
    Variable(String),

    // Compile-time or runtime parameter, rendered with a `$` prefix.
    Parameter(String),

    Constant(Value),
}

impl Expression {
    pub fn binary(operator: ArithmeticOperator, left: Self, right: Self) -> Self {
        Self::BinaryOp {
            operator,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn add(left: Self, right: Self) -> Self {
        Self::binary(ArithmeticOperator::Add, left, right)
    }

    pub fn sub(left: Self, right: Self) -> Self {
        Self::binary(ArithmeticOperator::Subtract, left, right)
    }

    pub fn mul(left: Self, right: Self) -> Self {
        Self::binary(ArithmeticOperator::Multiply, left, right)
    }

    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    pub fn parameter(name: impl Into<String>) -> Self {
        Self::Parameter(name.into())
    }

    pub fn constant(value: Value) -> Self {
        Self::Constant(value)
    }

    /// Canonical diagnostic text: fully parenthesized infix, `$` before
    /// parameter names.
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::BinaryOp { .. })
    }

    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Variable(_))
    }

    pub fn is_parameter(&self) -> bool {
        matches!(self, Self::Parameter(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Self::Constant(_))
    }

    /// Variables and parameters.
    pub fn is_symbol(&self) -> bool {
        self.is_variable() || self.is_parameter()
    }

    /// True when the expression does not depend on any induction variable.
    pub fn is_const_expr(&self) -> bool {
        match self {
            Self::BinaryOp { left, right, .. } => left.is_const_expr() && right.is_const_expr(),
            Self::Variable(_) => false,
            Self::Parameter(_) | Self::Constant(_) => true,
        }
    }

    /// True when the expression is linear in its symbols, treating
    /// parameters as coefficients.
    pub fn is_affine_expr(&self) -> bool {
        match self {
            Self::BinaryOp {
                operator: ArithmeticOperator::Add | ArithmeticOperator::Subtract,
                left,
                right,
            } => left.is_affine_expr() && right.is_affine_expr(),
            Self::BinaryOp {
                operator: ArithmeticOperator::Multiply,
                left,
                right,
            } => {
                (left.is_affine_expr() && right.is_const_expr())
                    || (right.is_affine_expr() && left.is_const_expr())
            }
            Self::Variable(_) | Self::Parameter(_) | Self::Constant(_) => true,
        }
    }

    /// True for a `+` or `-` at the root.
    pub fn is_sum_expr(&self) -> bool {
        matches!(
            self,
            Self::BinaryOp {
                operator: ArithmeticOperator::Add | ArithmeticOperator::Subtract,
                ..
            }
        )
    }

    /// True for a leaf or a product of leaves.
    pub fn is_monomial_expr(&self) -> bool {
        match self {
            Self::BinaryOp {
                operator: ArithmeticOperator::Multiply,
                left,
                right,
            } => left.is_monomial_expr() && right.is_monomial_expr(),
            Self::BinaryOp { .. } => false,
            Self::Variable(_) | Self::Parameter(_) | Self::Constant(_) => true,
        }
    }

    /// Collects the leaves of this tree from left to right.
    pub fn atoms(&self) -> Atoms<'_> {
        let mut atoms = Atoms::default();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms<'a>(&'a self, atoms: &mut Atoms<'a>) {
        match self {
            Self::BinaryOp { left, right, .. } => {
                left.collect_atoms(atoms);
                right.collect_atoms(atoms);
            }
            Self::Variable(name) => atoms.variables.push(name),
            Self::Parameter(name) => atoms.parameters.push(name),
            Self::Constant(value) => atoms.constants.push(*value),
        }
    }
}

/// Leaves of an [`Expression`], repetitions included.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Atoms<'a> {
    pub constants: Vec<Value>,
    pub parameters: Vec<&'a str>,
    pub variables: Vec<&'a str>,
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryOp {
                operator,
                left,
                right,
            } => write!(f, "({left}{operator}{right})"),
            Self::Variable(name) => f.write_str(name),
            Self::Parameter(name) => write!(f, "${name}"),
            Self::Constant(value) => write!(f, "{value}"),
        }
    }
}
