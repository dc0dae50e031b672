//! Turns raw boundary strings into bound [`BoundaryCondition`]s.
//!
//! Binding is two-phase: [`BoundaryBinder::required_constants`] reports the
//! constant names the strings reference, the caller fills a
//! [`ConstantBinding`], and [`BoundaryBinder::bind`] substitutes them.

use std::collections::{BTreeMap, BTreeSet};

use log::{debug, log, Level};
use thiserror::Error;

use crate::errors::LaplaceError;
use crate::fields::Domain;
use crate::math::Scalar;

use super::edge::{Coordinate, Edge};
use super::expr::{Expr, SyntaxError};

/// Marker recognized as the centered step function.
pub const STEP_MARKER: &str = "V_nought(y)";
/// Constant that supplies the step amplitude.
pub const STEP_AMPLITUDE: &str = "V0";
/// Domain parameters substituted automatically.
const DOMAIN_PARAMETERS: [&str; 2] = ["a", "b"];

/// A boundary string that failed to parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse boundary condition on {edge} ({text:?}): {reason}")]
pub struct ParseError {
    /// Edge the text was supplied for.
    pub edge: Edge,
    /// Raw text as supplied.
    pub text: String,
    /// Underlying syntax problem.
    pub reason: SyntaxError,
}

/// A free symbol with no supplied value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("constant '{name}' used on {edge} has no value")]
pub struct UnboundConstantError {
    /// Edge whose expression references the constant.
    pub edge: Edge,
    /// Name of the constant.
    pub name: String,
}

/// What to do with an edge whose text does not parse.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParsePolicy {
    /// Fail the whole request.
    #[default]
    Abort,
    /// Log the failure and leave the edge unconstrained.
    #[cfg_attr(feature = "serde", serde(rename = "unspecified"))]
    TreatAsUnspecified,
}

/// Raw strings for the six edges. Empty strings mean "unspecified".
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BoundaryInputs {
    /// `V(x=-b, y)`.
    pub x_minus: String,
    /// `V(x=+b, y)`.
    pub x_plus: String,
    /// `V(x, y=-a)`.
    pub y_minus: String,
    /// `V(x, y=+a)`.
    pub y_plus: String,
    /// `V(x=0, y)`.
    pub x_center: String,
    /// `V(x, y=0)`.
    pub y_center: String,
}

impl BoundaryInputs {
    /// Builds inputs from six strings in [`Edge::ALL`] order.
    #[must_use]
    pub fn from_array(texts: [&str; 6]) -> Self {
        let [x_minus, x_plus, y_minus, y_plus, x_center, y_center] = texts.map(str::to_string);
        Self { x_minus, x_plus, y_minus, y_plus, x_center, y_center }
    }

    /// Raw text for `edge`.
    #[must_use]
    pub fn get(&self, edge: Edge) -> &str {
        match edge {
            Edge::XMinus => &self.x_minus,
            Edge::XPlus => &self.x_plus,
            Edge::YMinus => &self.y_minus,
            Edge::YPlus => &self.y_plus,
            Edge::XCenter => &self.x_center,
            Edge::YCenter => &self.y_center,
        }
    }

    /// Iterates `(edge, text)` pairs in input order.
    pub fn iter(&self) -> impl Iterator<Item = (Edge, &str)> + '_ {
        Edge::ALL.into_iter().map(move |edge| (edge, self.get(edge)))
    }
}

/// Values for the free constants referenced by boundary expressions.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstantBinding {
    values: BTreeMap<String, Scalar>,
}

impl ConstantBinding {
    /// Creates an empty binding.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the binding with `name` set to `value`.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: Scalar) -> Self {
        self.insert(name, value);
        self
    }

    /// Sets `name`, returning the previous value if any.
    pub fn insert(&mut self, name: impl Into<String>, value: Scalar) -> Option<Scalar> {
        self.values.insert(name.into(), value)
    }

    /// Value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Scalar> {
        self.values.get(name).copied()
    }

    /// Number of bound names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Names from `required` that have no value here.
    #[must_use]
    pub fn missing<'a>(&self, required: &'a BTreeSet<String>) -> Vec<&'a str> {
        required
            .iter()
            .filter(|name| !self.values.contains_key(name.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Iterates bound `(name, value)` pairs in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Scalar)> + '_ {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl From<BTreeMap<String, Scalar>> for ConstantBinding {
    fn from(values: BTreeMap<String, Scalar>) -> Self {
        Self { values }
    }
}

impl<S: Into<String>> FromIterator<(S, Scalar)> for ConstantBinding {
    fn from_iter<I: IntoIterator<Item = (S, Scalar)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect() }
    }
}

/// Expression whose free symbols have all been substituted.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundExpr(Expr);

impl BoundExpr {
    /// Evaluates at `(x, y)`.
    #[must_use]
    pub fn evaluate(&self, x: Scalar, y: Scalar) -> Scalar {
        self.0.evaluate(x, y)
    }

    /// True if the expression references `coordinate`.
    #[must_use]
    pub fn depends_on(&self, coordinate: Coordinate) -> bool {
        self.0.depends_on(coordinate)
    }

    /// Underlying tree.
    #[must_use]
    pub const fn expr(&self) -> &Expr {
        &self.0
    }
}

/// Bound condition on one edge.
#[derive(Debug, Clone, PartialEq)]
pub enum BoundaryCondition {
    /// No constraint imposed.
    Unspecified,
    /// Uniform value.
    Constant(Scalar),
    /// `v0` for `|y| < half_width`, zero elsewhere.
    Step {
        /// Amplitude inside the step.
        v0: Scalar,
        /// Half of the step's extent along `y` (`a / 2`).
        half_width: Scalar,
    },
    /// Expression in `x` and `y`.
    Expression(BoundExpr),
}

impl BoundaryCondition {
    /// True unless [`BoundaryCondition::Unspecified`].
    #[must_use]
    pub const fn is_specified(&self) -> bool {
        !matches!(self, Self::Unspecified)
    }

    /// Value at `(x, y)`, or `None` if unspecified.
    #[must_use]
    pub fn value_at(&self, x: Scalar, y: Scalar) -> Option<Scalar> {
        match self {
            Self::Unspecified => None,
            Self::Constant(v) => Some(*v),
            Self::Step { v0, half_width } => Some(if y > -half_width && y < *half_width { *v0 } else { 0.0 }),
            Self::Expression(expr) => Some(expr.evaluate(x, y)),
        }
    }

    /// True if the condition references `coordinate`.
    #[must_use]
    pub fn depends_on(&self, coordinate: Coordinate) -> bool {
        match self {
            Self::Unspecified | Self::Constant(_) => false,
            Self::Step { .. } => coordinate == Coordinate::Y,
            Self::Expression(expr) => expr.depends_on(coordinate),
        }
    }
}

/// Bound conditions for all six edges of one domain.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundarySet {
    domain: Domain,
    conditions: [BoundaryCondition; 6],
}

impl BoundarySet {
    /// Creates a set from conditions in [`Edge::ALL`] order.
    #[must_use]
    pub const fn new(domain: Domain, conditions: [BoundaryCondition; 6]) -> Self {
        Self { domain, conditions }
    }

    /// A set with every edge unspecified.
    #[must_use]
    pub fn unspecified(domain: Domain) -> Self {
        Self::new(domain, std::array::from_fn(|_| BoundaryCondition::Unspecified))
    }

    /// Returns the set with `edge` replaced by `condition`.
    #[must_use]
    pub fn with(mut self, edge: Edge, condition: BoundaryCondition) -> Self {
        self.conditions[edge.index()] = condition;
        self
    }

    /// Domain the conditions were bound against.
    #[must_use]
    pub const fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Condition on `edge`.
    #[must_use]
    pub const fn get(&self, edge: Edge) -> &BoundaryCondition {
        &self.conditions[edge.index()]
    }

    /// The condition on `edge` seen as a function of the free coordinate.
    #[must_use]
    pub const fn profile(&self, edge: Edge) -> EdgeProfile<'_> {
        EdgeProfile { edge, domain: &self.domain, condition: &self.conditions[edge.index()] }
    }

    /// Edges carrying a condition.
    pub fn specified_edges(&self) -> impl Iterator<Item = Edge> + '_ {
        Edge::ALL.into_iter().filter(|edge| self.get(*edge).is_specified())
    }
}

/// A boundary condition restricted to its edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeProfile<'a> {
    edge: Edge,
    domain: &'a Domain,
    condition: &'a BoundaryCondition,
}

impl EdgeProfile<'_> {
    /// Edge this profile lives on.
    #[must_use]
    pub const fn edge(&self) -> Edge {
        self.edge
    }

    /// True if the edge carries a condition.
    #[must_use]
    pub const fn is_specified(&self) -> bool {
        self.condition.is_specified()
    }

    /// Value at free-coordinate position `s`; unspecified edges read as zero.
    #[must_use]
    pub fn at(&self, s: Scalar) -> Scalar {
        let (x, y) = self.edge.point(self.domain, s);
        self.condition.value_at(x, y).unwrap_or(0.0)
    }

    /// The single value taken along the edge, if the condition does not vary with
    /// the free coordinate.
    #[must_use]
    pub fn uniform_value(&self) -> Option<Scalar> {
        if !self.is_specified() || self.varies() {
            return None;
        }
        Some(self.at(0.0))
    }

    /// True if the condition changes along the edge.
    #[must_use]
    pub fn varies(&self) -> bool {
        self.condition.depends_on(self.edge.free_coordinate())
    }
}

/// Recognized shape of one boundary string, before constants are bound.
#[derive(Debug, Clone, PartialEq)]
enum RawCondition {
    Unspecified,
    Constant(Scalar),
    Step,
    Expression(Expr),
}

impl RawCondition {
    fn recognize(edge: Edge, text: &str) -> Result<Self, ParseError> {
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
            return Ok(Self::Unspecified);
        }
        let fail = |reason: SyntaxError| ParseError { edge, text: text.to_string(), reason };
        if let Ok(value) = trimmed.parse::<Scalar>() {
            if !value.is_finite() {
                return Err(fail(SyntaxError { offset: 0, message: "constant must be finite".into() }));
            }
            return Ok(Self::Constant(value));
        }
        let compact: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();
        if compact == STEP_MARKER {
            return Ok(Self::Step);
        }
        Expr::parse(trimmed).map(Self::Expression).map_err(fail)
    }

    fn required_constants(&self) -> BTreeSet<String> {
        match self {
            Self::Unspecified | Self::Constant(_) => BTreeSet::new(),
            Self::Step => BTreeSet::from([STEP_AMPLITUDE.to_string()]),
            Self::Expression(expr) => {
                let mut names = expr.free_symbols();
                names.retain(|name| !DOMAIN_PARAMETERS.contains(&name.as_str()));
                names
            }
        }
    }
}

/// Parses and binds boundary strings against one domain.
#[derive(Debug, Clone, Copy)]
pub struct BoundaryBinder {
    domain: Domain,
    policy: ParsePolicy,
}

impl BoundaryBinder {
    /// Creates a binder that aborts on parse errors.
    #[must_use]
    pub fn new(domain: Domain) -> Self {
        Self { domain, policy: ParsePolicy::default() }
    }

    /// Sets the parse-failure policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: ParsePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Applies the parse policy; lenient downgrades are logged at `level`.
    fn recognize(&self, edge: Edge, text: &str, level: Level) -> Result<RawCondition, ParseError> {
        match RawCondition::recognize(edge, text) {
            Ok(raw) => Ok(raw),
            Err(err) if self.policy == ParsePolicy::TreatAsUnspecified => {
                log!(level, "{err}; treating {edge} as unspecified");
                Ok(RawCondition::Unspecified)
            }
            Err(err) => Err(err),
        }
    }

    /// Phase one: names of all constants the six strings need, sorted.
    ///
    /// Edges downgraded by a lenient policy are only logged at debug level here;
    /// [`BoundaryBinder::bind`] warns about them.
    pub fn required_constants(&self, inputs: &BoundaryInputs) -> Result<BTreeSet<String>, ParseError> {
        collect_required_constants(inputs, |edge, text| self.recognize(edge, text, Level::Debug))
    }

    /// Phase two: binds every edge using `binding` for the free constants.
    pub fn bind(&self, inputs: &BoundaryInputs, binding: &ConstantBinding) -> Result<BoundarySet, LaplaceError> {
        let mut set = BoundarySet::unspecified(self.domain);
        for (edge, text) in inputs.iter() {
            let condition = match self.recognize(edge, text, Level::Warn)? {
                RawCondition::Unspecified => BoundaryCondition::Unspecified,
                RawCondition::Constant(v) => BoundaryCondition::Constant(v),
                RawCondition::Step => {
                    let v0 = binding
                        .get(STEP_AMPLITUDE)
                        .ok_or_else(|| UnboundConstantError { edge, name: STEP_AMPLITUDE.to_string() })?;
                    BoundaryCondition::Step { v0, half_width: self.domain.a / 2.0 }
                }
                RawCondition::Expression(expr) => {
                    let lookup = |name: &str| match name {
                        "a" => Some(self.domain.a),
                        "b" => Some(self.domain.b),
                        _ => binding.get(name),
                    };
                    let bound = expr
                        .substitute(&lookup)
                        .map_err(|name| UnboundConstantError { edge, name })?;
                    match bound {
                        Expr::Number(v) => BoundaryCondition::Constant(v),
                        other => BoundaryCondition::Expression(BoundExpr(other)),
                    }
                }
            };
            set = set.with(edge, condition);
        }
        Ok(set)
    }
}

/// Phase one with the default (aborting) policy.
pub fn required_constants(inputs: &BoundaryInputs) -> Result<BTreeSet<String>, ParseError> {
    collect_required_constants(inputs, RawCondition::recognize)
}

fn collect_required_constants<F>(inputs: &BoundaryInputs, mut recognize: F) -> Result<BTreeSet<String>, ParseError>
where
    F: FnMut(Edge, &str) -> Result<RawCondition, ParseError>,
{
    let mut names = BTreeSet::new();
    for (edge, text) in inputs.iter() {
        names.extend(recognize(edge, text)?.required_constants());
    }
    debug!("boundary strings reference constants {names:?}");
    Ok(names)
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn domain() -> Domain {
        Domain::new(1.0, 1.5).expect("valid domain")
    }

    #[test]
    fn recognizes_forms_in_priority_order() {
        let inputs = BoundaryInputs::from_array(["nan", " 5 ", "V_nought( y )", "sin(pi*y/a)", "", "NaN"]);
        let binding = ConstantBinding::new().with("V0", 2.0);
        let set = BoundaryBinder::new(domain()).bind(&inputs, &binding).expect("binds");
        assert_eq!(*set.get(Edge::XMinus), BoundaryCondition::Unspecified);
        assert_eq!(*set.get(Edge::XPlus), BoundaryCondition::Constant(5.0));
        assert_eq!(*set.get(Edge::YMinus), BoundaryCondition::Step { v0: 2.0, half_width: 0.5 });
        assert!(matches!(set.get(Edge::YPlus), BoundaryCondition::Expression(_)));
        assert!(!set.get(Edge::XCenter).is_specified());
        assert_eq!(set.specified_edges().count(), 3);
    }

    #[test]
    fn required_constants_are_shared_across_edges() {
        let inputs = BoundaryInputs::from_array(["k*y", "V_nought(y)", "k + V0", "b*y", "NaN", "c"]);
        let names = required_constants(&inputs).expect("parses");
        let names: Vec<&str> = names.iter().map(String::as_str).collect();
        assert_eq!(names, vec!["V0", "c", "k"]);
    }

    #[test]
    fn bind_reports_unbound_constant_with_edge() {
        let inputs = BoundaryInputs::from_array(["NaN", "k*y", "NaN", "NaN", "NaN", "NaN"]);
        let err = BoundaryBinder::new(domain())
            .bind(&inputs, &ConstantBinding::new())
            .expect_err("k is unbound");
        match err {
            LaplaceError::UnboundConstant(e) => {
                assert_eq!(e.edge, Edge::XPlus);
                assert_eq!(e.name, "k");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn garbage_is_a_parse_error_naming_the_edge() {
        let inputs = BoundaryInputs::from_array(["NaN", "NaN", "NaN", "@@@", "NaN", "NaN"]);
        let err = required_constants(&inputs).expect_err("garbage");
        assert_eq!(err.edge, Edge::YPlus);
        assert_eq!(err.text, "@@@");
        assert!(err.to_string().contains("y=+a"));
    }

    #[test]
    fn lenient_policy_downgrades_unparsable_edges() {
        let inputs = BoundaryInputs::from_array(["@@@", "3", "NaN", "NaN", "NaN", "NaN"]);
        let binder = BoundaryBinder::new(domain()).with_policy(ParsePolicy::TreatAsUnspecified);
        assert!(binder.required_constants(&inputs).expect("lenient").is_empty());
        let set = binder.bind(&inputs, &ConstantBinding::new()).expect("lenient");
        assert!(!set.get(Edge::XMinus).is_specified());
        assert_eq!(*set.get(Edge::XPlus), BoundaryCondition::Constant(3.0));
    }

    #[test]
    fn deeply_nested_text_is_a_parse_error_naming_the_edge() {
        let nested = format!("{}1{}", "(".repeat(10_000), ")".repeat(10_000));
        let inputs = BoundaryInputs::from_array(["NaN", "NaN", "NaN", "NaN", nested.as_str(), "NaN"]);
        match BoundaryBinder::new(domain()).bind(&inputs, &ConstantBinding::new()) {
            Err(LaplaceError::Parse(e)) => assert_eq!(e.edge, Edge::XCenter),
            other => panic!("unexpected result {other:?}"),
        }
        let lenient = BoundaryBinder::new(domain()).with_policy(ParsePolicy::TreatAsUnspecified);
        let set = lenient.bind(&inputs, &ConstantBinding::new()).expect("lenient");
        assert!(!set.get(Edge::XCenter).is_specified());
    }

    #[test]
    fn free_and_binder_phase_one_agree() {
        let inputs = BoundaryInputs::from_array(["k*y", "V_nought(y)", "a*q", "NaN", "2", "x"]);
        let free = required_constants(&inputs).expect("parses");
        let bound = BoundaryBinder::new(domain()).required_constants(&inputs).expect("parses");
        assert_eq!(free, bound);
        assert_eq!(free.len(), 3);
    }

    #[test]
    fn lenient_downgrade_warns_only_when_binding() {
        let inputs = BoundaryInputs::from_array(["NaN", "@downgrade-marker@", "NaN", "NaN", "NaN", "NaN"]);
        let binder = BoundaryBinder::new(domain()).with_policy(ParsePolicy::TreatAsUnspecified);
        let levels = || capture::levels_mentioning("downgrade-marker");

        capture::install();
        binder.required_constants(&inputs).expect("lenient");
        assert_eq!(levels(), vec![Level::Debug]);
        binder.bind(&inputs, &ConstantBinding::new()).expect("lenient");
        assert_eq!(levels(), vec![Level::Debug, Level::Warn]);
    }

    /// Process-wide logger that keeps every record for inspection.
    mod capture {
        use std::sync::{Mutex, Once};

        use log::{Level, Log, Metadata, Record};

        static RECORDS: Mutex<Vec<(Level, String)>> = Mutex::new(Vec::new());
        static INSTALL: Once = Once::new();

        struct Capture;

        impl Log for Capture {
            fn enabled(&self, _: &Metadata<'_>) -> bool {
                true
            }

            fn log(&self, record: &Record<'_>) {
                if let Ok(mut records) = RECORDS.lock() {
                    records.push((record.level(), record.args().to_string()));
                }
            }

            fn flush(&self) {}
        }

        pub fn install() {
            INSTALL.call_once(|| {
                log::set_logger(&Capture).expect("no other logger in unit tests");
                log::set_max_level(log::LevelFilter::Trace);
            });
        }

        pub fn levels_mentioning(needle: &str) -> Vec<Level> {
            RECORDS
                .lock()
                .expect("not poisoned")
                .iter()
                .filter(|(_, message)| message.contains(needle))
                .map(|(level, _)| *level)
                .collect()
        }
    }

    #[test]
    fn non_finite_literal_is_rejected() {
        let inputs = BoundaryInputs::from_array(["inf", "NaN", "NaN", "NaN", "NaN", "NaN"]);
        assert!(required_constants(&inputs).is_err());
    }

    #[test]
    fn profiles_collapse_expressions_constant_along_their_edge() {
        let inputs = BoundaryInputs::from_array(["V0", "x + 1", "y*x", "NaN", "V_nought(y)", "V_nought(y)"]);
        let binding = ConstantBinding::new().with("V0", 4.0);
        let set = BoundaryBinder::new(domain()).bind(&inputs, &binding).expect("binds");

        assert_eq!(*set.get(Edge::XMinus), BoundaryCondition::Constant(4.0));
        assert_relative_eq!(set.profile(Edge::XPlus).uniform_value().expect("uniform"), 2.5);
        // y*x on y=-a varies with x
        assert!(set.profile(Edge::YMinus).varies());
        assert_relative_eq!(set.profile(Edge::YMinus).at(0.5), -0.5);
        // the step varies along x=0 but is flat along y=0
        assert!(set.profile(Edge::XCenter).varies());
        assert_relative_eq!(set.profile(Edge::YCenter).uniform_value().expect("flat"), 4.0);
        assert!(set.profile(Edge::YPlus).uniform_value().is_none());
        assert_relative_eq!(set.profile(Edge::YPlus).at(0.3), 0.0);
    }

    #[test]
    fn step_profile_is_strict_at_its_corners() {
        let set = BoundarySet::unspecified(domain())
            .with(Edge::XMinus, BoundaryCondition::Step { v0: 5.0, half_width: 0.5 });
        let profile = set.profile(Edge::XMinus);
        assert_relative_eq!(profile.at(0.0), 5.0);
        assert_relative_eq!(profile.at(0.5), 0.0);
        assert_relative_eq!(profile.at(-0.49), 5.0);
    }
}
