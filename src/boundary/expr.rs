//! Arithmetic expressions over `x`, `y` and named constants.
//!
//! The grammar is a small recursive-descent subset of the usual calculator syntax:
//!
//! ```text
//! expr    := term (('+' | '-') term)*
//! term    := unary (('*' | '/') unary)*
//! unary   := ('-' | '+') unary | power
//! power   := primary (('^' | '**') unary)?
//! primary := number | ident | ident '(' expr ')' | '(' expr ')'
//! ```
//!
//! `pi` and `E` are numeric constants; every other identifier except `x` and `y`
//! is a free symbol that must be substituted before evaluation.

use std::collections::BTreeSet;
use std::fmt;

use thiserror::Error;

use crate::constants::MAX_EXPR_DEPTH;
use crate::math::Scalar;

use super::edge::Coordinate;

/// Syntax error with the byte offset where it was detected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct SyntaxError {
    /// Byte offset into the source text.
    pub offset: usize,
    /// Description of the problem.
    pub message: String,
}

impl SyntaxError {
    fn new(offset: usize, message: impl Into<String>) -> Self {
        Self { offset, message: message.into() }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `^` or `**`
    Pow,
}

impl BinaryOp {
    fn apply(self, lhs: Scalar, rhs: Scalar) -> Scalar {
        match self {
            Self::Add => lhs + rhs,
            Self::Sub => lhs - rhs,
            Self::Mul => lhs * rhs,
            Self::Div => lhs / rhs,
            Self::Pow => lhs.powf(rhs),
        }
    }

    const fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Pow => "^",
        }
    }
}

/// Elementary functions callable from expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum Function {
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    Ln,
    Sqrt,
    Abs,
    Sign,
    Heaviside,
}

impl Function {
    /// Looks up a function by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let f = match name {
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "sinh" => Self::Sinh,
            "cosh" => Self::Cosh,
            "tanh" => Self::Tanh,
            "exp" => Self::Exp,
            "log" | "ln" => Self::Ln,
            "sqrt" => Self::Sqrt,
            "abs" | "Abs" => Self::Abs,
            "sign" => Self::Sign,
            "Heaviside" => Self::Heaviside,
            _ => return None,
        };
        Some(f)
    }

    fn apply(self, v: Scalar) -> Scalar {
        match self {
            Self::Sin => v.sin(),
            Self::Cos => v.cos(),
            Self::Tan => v.tan(),
            Self::Asin => v.asin(),
            Self::Acos => v.acos(),
            Self::Atan => v.atan(),
            Self::Sinh => v.sinh(),
            Self::Cosh => v.cosh(),
            Self::Tanh => v.tanh(),
            Self::Exp => v.exp(),
            Self::Ln => v.ln(),
            Self::Sqrt => v.sqrt(),
            Self::Abs => v.abs(),
            Self::Sign => {
                if v == 0.0 || v.is_nan() { v } else { v.signum() }
            }
            // H(0) = 1/2
            Self::Heaviside => {
                if v > 0.0 {
                    1.0
                } else if v < 0.0 {
                    0.0
                } else {
                    0.5
                }
            }
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Tan => "tan",
            Self::Asin => "asin",
            Self::Acos => "acos",
            Self::Atan => "atan",
            Self::Sinh => "sinh",
            Self::Cosh => "cosh",
            Self::Tanh => "tanh",
            Self::Exp => "exp",
            Self::Ln => "log",
            Self::Sqrt => "sqrt",
            Self::Abs => "abs",
            Self::Sign => "sign",
            Self::Heaviside => "Heaviside",
        }
    }
}

/// Parsed expression tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal or folded constant.
    Number(Scalar),
    /// Domain coordinate `x` or `y`.
    Variable(Coordinate),
    /// Free symbol awaiting substitution.
    Symbol(String),
    /// Unary negation.
    Neg(Box<Expr>),
    /// Binary operation.
    Binary {
        /// Operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Expr>,
        /// Right operand.
        rhs: Box<Expr>,
    },
    /// Function application.
    Call {
        /// Callee.
        func: Function,
        /// Single argument.
        arg: Box<Expr>,
    },
}

impl Expr {
    /// Parses `text` into an expression tree.
    pub fn parse(text: &str) -> Result<Self, SyntaxError> {
        let tokens = tokenize(text)?;
        let mut parser = Parser { tokens, pos: 0, depth: 0 };
        let (expr, _) = parser.expr()?;
        match parser.peek() {
            (Token::End, _) => Ok(expr),
            (tok, offset) => Err(SyntaxError::new(*offset, format!("unexpected {tok}"))),
        }
    }

    /// Names of free symbols, sorted.
    #[must_use]
    pub fn free_symbols(&self) -> BTreeSet<String> {
        let mut out = BTreeSet::new();
        self.collect_symbols(&mut out);
        out
    }

    fn collect_symbols(&self, out: &mut BTreeSet<String>) {
        match self {
            Self::Number(_) | Self::Variable(_) => {}
            Self::Symbol(name) => {
                out.insert(name.clone());
            }
            Self::Neg(inner) | Self::Call { arg: inner, .. } => inner.collect_symbols(out),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_symbols(out);
                rhs.collect_symbols(out);
            }
        }
    }

    /// True if the tree references the given coordinate.
    #[must_use]
    pub fn depends_on(&self, coordinate: Coordinate) -> bool {
        match self {
            Self::Number(_) | Self::Symbol(_) => false,
            Self::Variable(c) => *c == coordinate,
            Self::Neg(inner) | Self::Call { arg: inner, .. } => inner.depends_on(coordinate),
            Self::Binary { lhs, rhs, .. } => lhs.depends_on(coordinate) || rhs.depends_on(coordinate),
        }
    }

    /// Replaces every free symbol with the value returned by `lookup`, folding
    /// constant subtrees. On a missing value the offending name is returned.
    pub fn substitute<F>(&self, lookup: &F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<Scalar>,
    {
        let out = match self {
            Self::Number(v) => Self::Number(*v),
            Self::Variable(c) => Self::Variable(*c),
            Self::Symbol(name) => Self::Number(lookup(name).ok_or_else(|| name.clone())?),
            Self::Neg(inner) => match inner.substitute(lookup)? {
                Self::Number(v) => Self::Number(-v),
                other => Self::Neg(Box::new(other)),
            },
            Self::Binary { op, lhs, rhs } => {
                match (lhs.substitute(lookup)?, rhs.substitute(lookup)?) {
                    (Self::Number(l), Self::Number(r)) => Self::Number(op.apply(l, r)),
                    // zero products and quotients vanish whatever the other factor is
                    (Self::Number(z), _) if z == 0.0 && matches!(op, BinaryOp::Mul | BinaryOp::Div) => {
                        Self::Number(0.0)
                    }
                    (_, Self::Number(z)) if z == 0.0 && *op == BinaryOp::Mul => Self::Number(0.0),
                    (l, r) => Self::Binary { op: *op, lhs: Box::new(l), rhs: Box::new(r) },
                }
            }
            Self::Call { func, arg } => match arg.substitute(lookup)? {
                Self::Number(v) => Self::Number(func.apply(v)),
                other => Self::Call { func: *func, arg: Box::new(other) },
            },
        };
        Ok(out)
    }

    /// Evaluates the tree at `(x, y)`. Unsubstituted symbols evaluate to `NaN`.
    #[must_use]
    pub fn evaluate(&self, x: Scalar, y: Scalar) -> Scalar {
        match self {
            Self::Number(v) => *v,
            Self::Variable(Coordinate::X) => x,
            Self::Variable(Coordinate::Y) => y,
            Self::Symbol(_) => Scalar::NAN,
            Self::Neg(inner) => -inner.evaluate(x, y),
            Self::Binary { op, lhs, rhs } => op.apply(lhs.evaluate(x, y), rhs.evaluate(x, y)),
            Self::Call { func, arg } => func.apply(arg.evaluate(x, y)),
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "{v}"),
            Self::Variable(c) => f.write_str(c.symbol()),
            Self::Symbol(name) => f.write_str(name),
            Self::Neg(inner) => write!(f, "-({inner})"),
            Self::Binary { op, lhs, rhs } => write!(f, "({lhs} {} {rhs})", op.symbol()),
            Self::Call { func, arg } => write!(f, "{}({arg})", func.name()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(Scalar),
    Ident(String),
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    LParen,
    RParen,
    End,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(v) => write!(f, "number {v}"),
            Self::Ident(name) => write!(f, "identifier '{name}'"),
            Self::Plus => f.write_str("'+'"),
            Self::Minus => f.write_str("'-'"),
            Self::Star => f.write_str("'*'"),
            Self::Slash => f.write_str("'/'"),
            Self::Caret => f.write_str("'^'"),
            Self::LParen => f.write_str("'('"),
            Self::RParen => f.write_str("')'"),
            Self::End => f.write_str("end of input"),
        }
    }
}

fn tokenize(text: &str) -> Result<Vec<(Token, usize)>, SyntaxError> {
    let bytes = text.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let c = bytes[i];
        let start = i;
        match c {
            b' ' | b'\t' | b'\r' | b'\n' => {
                i += 1;
                continue;
            }
            b'+' => tokens.push((Token::Plus, start)),
            b'-' => tokens.push((Token::Minus, start)),
            b'/' => tokens.push((Token::Slash, start)),
            b'^' => tokens.push((Token::Caret, start)),
            b'(' => tokens.push((Token::LParen, start)),
            b')' => tokens.push((Token::RParen, start)),
            b'*' => {
                if bytes.get(i + 1) == Some(&b'*') {
                    tokens.push((Token::Caret, start));
                    i += 1;
                } else {
                    tokens.push((Token::Star, start));
                }
            }
            b'0'..=b'9' | b'.' => {
                i = scan_number(bytes, i);
                let literal = &text[start..i];
                let value = literal
                    .parse::<Scalar>()
                    .map_err(|_| SyntaxError::new(start, format!("invalid number '{literal}'")))?;
                tokens.push((Token::Number(value), start));
                continue;
            }
            c if c.is_ascii_alphabetic() || c == b'_' => {
                while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                    i += 1;
                }
                tokens.push((Token::Ident(text[start..i].to_string()), start));
                continue;
            }
            _ => {
                let ch = text[start..].chars().next().unwrap_or('?');
                return Err(SyntaxError::new(start, format!("unexpected character '{ch}'")));
            }
        }
        i += 1;
    }
    tokens.push((Token::End, text.len()));
    Ok(tokens)
}

/// Returns the end of a numeric literal starting at `i`.
fn scan_number(bytes: &[u8], mut i: usize) -> usize {
    while i < bytes.len() && (bytes[i].is_ascii_digit() || bytes[i] == b'.') {
        i += 1;
    }
    // exponent only when digits follow, so `2*E` style input stays unambiguous
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < bytes.len() && (bytes[j] == b'+' || bytes[j] == b'-') {
            j += 1;
        }
        if j < bytes.len() && bytes[j].is_ascii_digit() {
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
            return j;
        }
    }
    i
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    depth: usize,
}

/// Parsed subtree with its height.
type Node = (Expr, usize);

impl Parser {
    fn peek(&self) -> (&Token, &usize) {
        // tokenize always terminates the stream with End
        let (tok, offset) = &self.tokens[self.pos.min(self.tokens.len() - 1)];
        (tok, offset)
    }

    fn advance(&mut self) -> (Token, usize) {
        let item = self.tokens[self.pos.min(self.tokens.len() - 1)].clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        item
    }

    fn offset(&self) -> usize {
        *self.peek().1
    }

    /// Wraps children into a new node, refusing trees taller than [`MAX_EXPR_DEPTH`].
    fn node(offset: usize, height: usize, expr: Expr) -> Result<Node, SyntaxError> {
        if height > MAX_EXPR_DEPTH {
            return Err(SyntaxError::new(offset, "expression nested too deeply"));
        }
        Ok((expr, height))
    }

    fn binary(offset: usize, op: BinaryOp, lhs: Node, rhs: Node) -> Result<Node, SyntaxError> {
        let height = lhs.1.max(rhs.1) + 1;
        Self::node(offset, height, Expr::Binary { op, lhs: Box::new(lhs.0), rhs: Box::new(rhs.0) })
    }

    fn expr(&mut self) -> Result<Node, SyntaxError> {
        let mut lhs = self.term()?;
        loop {
            let op = match self.peek().0 {
                Token::Plus => BinaryOp::Add,
                Token::Minus => BinaryOp::Sub,
                _ => return Ok(lhs),
            };
            let (_, offset) = self.advance();
            let rhs = self.term()?;
            lhs = Self::binary(offset, op, lhs, rhs)?;
        }
    }

    fn term(&mut self) -> Result<Node, SyntaxError> {
        let mut lhs = self.unary()?;
        loop {
            let op = match self.peek().0 {
                Token::Star => BinaryOp::Mul,
                Token::Slash => BinaryOp::Div,
                _ => return Ok(lhs),
            };
            let (_, offset) = self.advance();
            let rhs = self.unary()?;
            lhs = Self::binary(offset, op, lhs, rhs)?;
        }
    }

    /// Every recursive path passes through here, so the depth guard lives here.
    fn unary(&mut self) -> Result<Node, SyntaxError> {
        if self.depth >= MAX_EXPR_DEPTH {
            return Err(SyntaxError::new(self.offset(), "expression nested too deeply"));
        }
        self.depth += 1;
        let result = self.unary_inner();
        self.depth -= 1;
        result
    }

    fn unary_inner(&mut self) -> Result<Node, SyntaxError> {
        match self.peek().0 {
            Token::Minus => {
                let (_, offset) = self.advance();
                let (inner, height) = self.unary()?;
                Self::node(offset, height + 1, Expr::Neg(Box::new(inner)))
            }
            Token::Plus => {
                self.advance();
                self.unary()
            }
            _ => self.power(),
        }
    }

    fn power(&mut self) -> Result<Node, SyntaxError> {
        let base = self.primary()?;
        if matches!(self.peek().0, Token::Caret) {
            let (_, offset) = self.advance();
            let exponent = self.unary()?;
            return Self::binary(offset, BinaryOp::Pow, base, exponent);
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Node, SyntaxError> {
        let (tok, offset) = self.advance();
        match tok {
            Token::Number(v) => Ok((Expr::Number(v), 1)),
            Token::LParen => {
                let inner = self.expr()?;
                self.expect_close(offset)?;
                Ok(inner)
            }
            Token::Ident(name) => {
                let is_call = matches!(self.peek().0, Token::LParen);
                if let Some(func) = Function::from_name(&name) {
                    if !is_call {
                        return Err(SyntaxError::new(offset, format!("function '{name}' requires an argument")));
                    }
                    let (_, open) = self.advance();
                    let (arg, height) = self.expr()?;
                    self.expect_close(open)?;
                    return Self::node(offset, height + 1, Expr::Call { func, arg: Box::new(arg) });
                }
                if is_call {
                    return Err(SyntaxError::new(offset, format!("unknown function '{name}'")));
                }
                let leaf = match name.as_str() {
                    "x" => Expr::Variable(Coordinate::X),
                    "y" => Expr::Variable(Coordinate::Y),
                    "pi" => Expr::Number(std::f64::consts::PI),
                    "E" => Expr::Number(std::f64::consts::E),
                    _ => Expr::Symbol(name),
                };
                Ok((leaf, 1))
            }
            other => Err(SyntaxError::new(offset, format!("unexpected {other}"))),
        }
    }

    fn expect_close(&mut self, open: usize) -> Result<(), SyntaxError> {
        match self.advance() {
            (Token::RParen, _) => Ok(()),
            _ => Err(SyntaxError::new(open, "unbalanced parenthesis")),
        }
    }
}
