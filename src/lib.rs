//! Data model and diagnostic rendering for tensor comprehension range
//! inference.
//!
//! Bound analysis describes the legal values of loop induction variables
//! with [`Constraint`]s between arithmetic [`Expression`]s. A solver living
//! elsewhere in the pipeline turns those into half-open [`Range`]s and
//! records both in an [`InferenceProblem`], whose [`render`] output is the
//! canonical diagnostic dump.
//!
//! [`render`]: InferenceProblem::render
//!
//! # Example
//!
//! ```rust
//! use tc_range_inference::*;
//!
//! let mut problem = InferenceProblem::new();
//! problem.add_constraints(
//!     Expression::constant(0),
//!     Expression::variable("i"),
//!     Expression::parameter("N"),
//! );
//! problem.add_constraint(
//!     Expression::variable("j"),
//!     ComparisonOperator::LessOrEqual,
//!     Expression::add(Expression::variable("i"), Expression::constant(1)),
//! );
//!
//! let expected = "\
//! ranges:
//! 0 <= i < $N
//! constraints:
//! j <= (i+1)
//! ------------------------------------------------------------
//! ";
//! assert_eq!(problem.render(), expected);
//! ```

mod expression;
mod operator;
mod parse;
mod ranges;

/// Uses the [`pest`] parsing expression grammar language.
///
/// ```text
#[doc = include_str!("grammar.pest")]
/// ```
pub mod grammar_doc {}

pub use expression::*;
pub use operator::*;
pub use parse::{ParseError, Rule};
pub use ranges::*;
