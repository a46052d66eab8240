use crate::expression::{Expression, Value};
use crate::{ArithmeticOperator, ComparisonOperator, Constraint};

use once_cell::sync::Lazy;
use pest::iterators::{Pair, Pairs};
use pest::pratt_parser::{Assoc, Op, PrattParser};
use pest::Parser;
use pest_derive::Parser;
use thiserror::Error;

#[derive(Parser)]
#[grammar = "grammar.pest"] // relative to project `src`
struct ExpressionParser;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Syntax error: {0}")]
    Syntax(Box<pest::error::Error<Rule>>),

    #[error("Constant out of range: {0}")]
    ConstantOutOfRange(String),
}

impl From<pest::error::Error<Rule>> for ParseError {
    fn from(error: pest::error::Error<Rule>) -> Self {
        Self::Syntax(Box::new(error))
    }
}

impl Expression {
    /// Parse an expression written in the dump notation, e.g. `(i+1)*$N`.
    ///
    /// Parentheses are optional: `*` binds tighter than `+` and `-`, and all
    /// three associate to the left. `#` starts a comment running to the end
    /// of the line.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        tracing::trace!(input, "parsing expression");
        let mut pairs = ExpressionParser::parse(Rule::expression, input)?;
        parse_expr(next_inner(&mut pairs))
    }
}

impl Constraint {
    /// Parse `left op right` where `op` is one of `<`, `<=`, `==`, `>=`, `>`.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        tracing::trace!(input, "parsing constraint");
        let mut pairs = ExpressionParser::parse(Rule::constraint, input)?;
        let left = parse_expr(next_inner(&mut pairs))?;
        let operator = match pairs.next().map(|p| p.as_rule()) {
            Some(Rule::less) => ComparisonOperator::LessThan,
            Some(Rule::le) => ComparisonOperator::LessOrEqual,
            Some(Rule::equal) => ComparisonOperator::Equal,
            Some(Rule::ge) => ComparisonOperator::GreaterOrEqual,
            Some(Rule::greater) => ComparisonOperator::GreaterThan,
            x => panic!("Unexpected comparison operator {x:?}"),
        };
        let right = parse_expr(next_inner(&mut pairs))?;
        Ok(Self::new(left, operator, right))
    }
}

fn next_inner<'i>(pairs: &mut Pairs<'i, Rule>) -> Pairs<'i, Rule> {
    match pairs.next() {
        Some(pair) if pair.as_rule() == Rule::expr => pair.into_inner(),
        x => panic!("Expected expression, found {x:?}"),
    }
}

static PRATT_PARSER: Lazy<PrattParser<Rule>> = Lazy::new(|| {
    use Assoc::*;
    use Rule::*;

    PrattParser::new()
        .op(Op::infix(add, Left) | Op::infix(subtract, Left))
        .op(Op::infix(multiply, Left))
});

fn parse_expr(input: Pairs<Rule>) -> Result<Expression, ParseError> {
    PRATT_PARSER
        .map_primary(|pair: Pair<Rule>| match pair.as_rule() {
            Rule::expr => parse_expr(pair.into_inner()),
            Rule::constant => {
                let literal_str = pair.as_str();
                literal_str
                    .parse::<Value>()
                    .map(Expression::Constant)
                    .map_err(|_| ParseError::ConstantOutOfRange(literal_str.to_string()))
            }
            Rule::variable => Ok(Expression::variable(pair.as_str())),
            Rule::parameter => Ok(Expression::parameter(&pair.as_str()[1..])),
            x => panic!("Unexpected primary rule {x:?}"),
        })
        .map_infix(|lhs, op: Pair<Rule>, rhs| {
            let operator = match op.as_rule() {
                Rule::add => ArithmeticOperator::Add,
                Rule::subtract => ArithmeticOperator::Subtract,
                Rule::multiply => ArithmeticOperator::Multiply,
                x => panic!("Unexpected operator {x:?}"),
            };
            Ok(Expression::binary(operator, lhs?, rhs?))
        })
        .parse(input)
}
