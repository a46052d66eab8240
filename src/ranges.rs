use crate::{ComparisonOperator, Expression};

use std::fmt;

/// Width of the `-` line closing an [`InferenceProblem`] dump.
pub const SEPARATOR_WIDTH: usize = 60;

/// The assertion `left operator right`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Constraint {
    pub left: Expression,
    pub operator: ComparisonOperator,
    pub right: Expression,
}

impl Constraint {
    pub fn new(left: Expression, operator: ComparisonOperator, right: Expression) -> Self {
        Self {
            left,
            operator,
            right,
        }
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.operator, self.right)
    }
}

/// Solved half-open interval `low <= variable < up`.
///
/// The bounds must not mention `variable` itself.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Range {
    pub variable: String,
    pub low: Expression,
    pub up: Expression,
}

impl Range {
    pub fn new(variable: impl Into<String>, low: Expression, up: Expression) -> Self {
        Self {
            variable: variable.into(),
            low,
            up,
        }
    }

    /// The two constraints this range solves: `low <= variable` and
    /// `variable < up`.
    pub fn as_constraints(&self) -> [Constraint; 2] {
        let variable = Expression::variable(self.variable.as_str());
        [
            Constraint::new(
                self.low.clone(),
                ComparisonOperator::LessOrEqual,
                variable.clone(),
            ),
            Constraint::new(variable, ComparisonOperator::LessThan, self.up.clone()),
        ]
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Literal symbols, independent of `ComparisonOperator::symbol`.
        write!(f, "{} <= {} < {}", self.low, self.variable, self.up)
    }
}

/// Everything one bound-analysis run has collected: ranges solved so far and
/// the constraints still pending.
///
/// Both sequences keep insertion order. The problem must be fully populated
/// before it is rendered.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct InferenceProblem {
    pub solved: Vec<Range>,
    pub constraints: Vec<Constraint>,
}

impl InferenceProblem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.solved.is_empty() && self.constraints.is_empty()
    }

    pub fn clear(&mut self) {
        self.solved.clear();
        self.constraints.clear();
    }

    /// Records `low <= name < up` unless the same range is already solved.
    pub fn add_range(&mut self, name: impl Into<String>, low: Expression, up: Expression) {
        let range = Range::new(name, low, up);
        if self.solved.contains(&range) {
            tracing::trace!(%range, "skipping duplicate range");
            return;
        }
        self.solved.push(range);
    }

    /// Records `left operator right` unless it is already known, either
    /// verbatim or as one half of a solved range.
    pub fn add_constraint(
        &mut self,
        left: Expression,
        operator: ComparisonOperator,
        right: Expression,
    ) {
        let constraint = Constraint::new(left, operator, right);
        if self
            .solved
            .iter()
            .any(|range| range.as_constraints().contains(&constraint))
        {
            tracing::trace!(%constraint, "constraint implied by a solved range");
            return;
        }
        if self.constraints.contains(&constraint) {
            tracing::trace!(%constraint, "skipping duplicate constraint");
            return;
        }
        self.constraints.push(constraint);
    }

    /// Records `lower <= middle < upper`.
    ///
    /// A variable bounded by constant expressions on both sides is solved
    /// directly into a [`Range`]; anything else becomes two constraints.
    pub fn add_constraints(&mut self, lower: Expression, middle: Expression, upper: Expression) {
        match middle {
            Expression::Variable(name) if lower.is_const_expr() && upper.is_const_expr() => {
                let range = Range::new(name, lower, upper);
                let [low, up] = range.as_constraints();
                self.constraints.retain(|c| *c != low && *c != up);
                tracing::debug!(%range, "solved range from bounds");
                self.add_range(range.variable, range.low, range.up);
            }
            middle => {
                self.add_constraint(lower, ComparisonOperator::LessOrEqual, middle.clone());
                self.add_constraint(middle, ComparisonOperator::LessThan, upper);
            }
        }
    }

    /// Full diagnostic dump: solved ranges, then constraints, then a
    /// separator line.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for InferenceProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ranges:")?;
        for range in &self.solved {
            writeln!(f, "{range}")?;
        }
        writeln!(f, "constraints:")?;
        for constraint in &self.constraints {
            writeln!(f, "{constraint}")?;
        }
        writeln!(f, "{}", "-".repeat(SEPARATOR_WIDTH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ComparisonOperator::*;

    fn var(name: &str) -> Expression {
        Expression::variable(name)
    }

    fn param(name: &str) -> Expression {
        Expression::parameter(name)
    }

    fn lit(value: u64) -> Expression {
        Expression::constant(value)
    }

    #[test]
    fn render_constraint() {
        let c = Constraint::new(var("i"), LessThan, param("N"));
        assert_eq!(c.render(), "i < $N");

        let c = Constraint::new(Expression::add(var("i"), var("k")), Equal, lit(7));
        assert_eq!(c.render(), "(i+k) == 7");
    }

    // Known defect: `>` is rendered with the `<` symbol.
    #[test]
    fn render_greater_than_constraint_uses_less_than_symbol() {
        let c = Constraint::new(var("i"), GreaterThan, lit(0));
        assert_eq!(c.render(), "i < 0");
    }

    #[test]
    fn render_range() {
        let r = Range::new("i", lit(0), param("N"));
        assert_eq!(r.render(), "0 <= i < $N");

        let r = Range::new("j", lit(1), Expression::sub(param("M"), lit(1)));
        assert_eq!(r.render(), "1 <= j < ($M-1)");
    }

    #[test]
    fn render_problem() {
        let problem = InferenceProblem {
            solved: vec![Range::new("i", lit(0), param("N"))],
            constraints: vec![Constraint::new(var("i"), LessThan, param("N"))],
        };
        let expected = "ranges:\n\
                        0 <= i < $N\n\
                        constraints:\n\
                        i < $N\n\
                        ------------------------------------------------------------\n";
        assert_eq!(problem.render(), expected);
        assert_eq!(problem.render(), problem.render());
    }

    #[test]
    fn render_empty_problem() {
        let expected = format!("ranges:\nconstraints:\n{}\n", "-".repeat(60));
        assert_eq!(InferenceProblem::new().render(), expected);
    }

    #[test]
    fn render_preserves_insertion_order() {
        let mut problem = InferenceProblem::new();
        problem.add_range("j", lit(0), param("M"));
        problem.add_range("i", lit(0), param("N"));
        problem.add_constraint(var("k"), LessOrEqual, var("j"));
        problem.add_constraint(var("b"), GreaterOrEqual, var("a"));

        let rendered = problem.render();
        let lines: Vec<_> = rendered.lines().collect();
        assert_eq!(
            lines[..6],
            [
                "ranges:",
                "0 <= j < $M",
                "0 <= i < $N",
                "constraints:",
                "k <= j",
                "b >= a",
            ]
        );
    }

    #[test]
    fn range_as_constraints() {
        let [low, up] = Range::new("i", lit(0), param("N")).as_constraints();
        assert_eq!(low, Constraint::new(lit(0), LessOrEqual, var("i")));
        assert_eq!(up, Constraint::new(var("i"), LessThan, param("N")));
    }

    #[test]
    fn duplicate_ranges_and_constraints_are_dropped() {
        let mut problem = InferenceProblem::new();
        problem.add_range("i", lit(0), param("N"));
        problem.add_range("i", lit(0), param("N"));
        problem.add_constraint(var("j"), LessThan, var("i"));
        problem.add_constraint(var("j"), LessThan, var("i"));
        assert_eq!(problem.solved.len(), 1);
        assert_eq!(problem.constraints.len(), 1);
    }

    #[test]
    fn constraint_implied_by_range_is_dropped() {
        let mut problem = InferenceProblem::new();
        problem.add_range("i", lit(0), param("N"));
        problem.add_constraint(lit(0), LessOrEqual, var("i"));
        problem.add_constraint(var("i"), LessThan, param("N"));
        assert!(problem.constraints.is_empty());
    }

    #[test]
    fn add_constraints_solves_constant_bounds() {
        let mut problem = InferenceProblem::new();
        problem.add_constraint(lit(0), LessOrEqual, var("i"));
        problem.add_constraint(var("j"), LessThan, var("i"));
        problem.add_constraints(lit(0), var("i"), param("N"));

        assert_eq!(problem.solved, vec![Range::new("i", lit(0), param("N"))]);
        assert_eq!(
            problem.constraints,
            vec![Constraint::new(var("j"), LessThan, var("i"))]
        );
    }

    #[test]
    fn add_constraints_keeps_non_constant_bounds_as_constraints() {
        let mut problem = InferenceProblem::new();
        problem.add_constraints(lit(0), var("j"), var("i"));
        problem.add_constraints(lit(0), Expression::add(var("i"), lit(1)), param("N"));

        assert!(problem.solved.is_empty());
        let rendered: Vec<_> = problem.constraints.iter().map(Constraint::render).collect();
        assert_eq!(rendered, ["0 <= j", "j < i", "0 <= (i+1)", "(i+1) < $N"]);
    }

    #[test]
    fn clear_empties_both_sequences() {
        let mut problem = InferenceProblem::new();
        problem.add_constraints(lit(0), var("i"), param("N"));
        problem.add_constraint(var("j"), LessThan, var("i"));
        assert!(!problem.is_empty());
        problem.clear();
        assert!(problem.is_empty());
    }
}
