//! Sandboxed arithmetic evaluator for expression cells.
//!
//! Grammar (lowest to highest precedence):
//!
//! ```text
//! expr  := term (('+' | '-') term)*
//! term  := unary (('*' | '/') unary)*
//! unary := ('+' | '-') unary | power
//! power := atom ('**' unary)?
//! atom  := NUMBER | NAME | '(' expr ')'
//! ```
//!
//! `**` is right-associative and binds tighter than unary minus, so
//! `-2**2` is `-4` and `2**-1` is `0.5`. Names are looked up through
//! [`Bindings`]; nothing else (calls, attributes, indexing) is accepted.

use crate::error::{ExprError, ExprResult};
use nom::{
    IResult,
    branch::alt,
    bytes::complete::{tag, take_while, take_while1},
    character::complete::{char, multispace0},
    combinator::{cut, map, map_res, not, opt, recognize},
    error::{ContextError, ErrorKind, ParseError, VerboseError, VerboseErrorKind, context},
    number::complete::recognize_float,
    sequence::{delimited, pair, terminated},
};
use shm_core::Real;

const MAX_LEN: usize = 256;
const MAX_DEPTH: usize = 64;

const OPERAND: &str = "number, name or '('";

type PResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// Source of values for names appearing in an expression.
pub trait Bindings {
    fn value(&self, name: &str) -> Option<Real>;
}

impl<F> Bindings for F
where
    F: Fn(&str) -> Option<Real>,
{
    fn value(&self, name: &str) -> Option<Real> {
        self(name)
    }
}

/// Evaluate `text`, substituting names from `vars`.
pub fn evaluate(text: &str, vars: &dyn Bindings) -> ExprResult<Real> {
    let len = text.chars().count();
    if len > MAX_LEN {
        return Err(ExprError::TooLong {
            len,
            limit: MAX_LEN,
        });
    }

    let value = parse(text)?.eval(vars)?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ExprError::NonFinite)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

#[derive(Clone, Debug, PartialEq)]
enum Expr {
    Number(Real),
    Name(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    fn binary(op: BinOp, left: Expr, right: Expr) -> Expr {
        Expr::Binary {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    fn eval(&self, vars: &dyn Bindings) -> ExprResult<Real> {
        match self {
            Expr::Number(v) => Ok(*v),
            Expr::Name(name) => vars
                .value(name)
                .ok_or_else(|| ExprError::UnknownName { name: name.clone() }),
            Expr::Neg(inner) => Ok(-inner.eval(vars)?),
            Expr::Binary { op, left, right } => {
                let l = left.eval(vars)?;
                let r = right.eval(vars)?;
                match op {
                    BinOp::Add => Ok(l + r),
                    BinOp::Sub => Ok(l - r),
                    BinOp::Mul => Ok(l * r),
                    BinOp::Div if r == 0.0 => Err(ExprError::DivisionByZero),
                    BinOp::Div => Ok(l / r),
                    BinOp::Pow => {
                        let v = l.powf(r);
                        if v.is_finite() {
                            Ok(v)
                        } else {
                            Err(ExprError::NonFinite)
                        }
                    }
                }
            }
        }
    }
}

fn parse(text: &str) -> ExprResult<Expr> {
    match parse_add_sub(text, 0) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(unexpected(text, rest, "end of expression")),
        Err(nom::Err::Error(err) | nom::Err::Failure(err)) => Err(syntax_error(text, err)),
        Err(nom::Err::Incomplete(_)) => Err(ExprError::UnexpectedEnd { expected: OPERAND }),
    }
}

/// Parses left-associative `+`/`-`.
fn parse_add_sub(input: &str, depth: usize) -> PResult<'_, Expr> {
    let (mut input, mut left) = parse_mul_div(input, depth)?;
    loop {
        let (next, op) = opt(alt((ws_char('+'), ws_char('-'))))(input)?;
        let Some(op) = op else {
            break;
        };
        let (next, right) = parse_mul_div(next, depth)?;
        let op = if op == '+' { BinOp::Add } else { BinOp::Sub };
        left = Expr::binary(op, left, right);
        input = next;
    }
    Ok((input, left))
}

/// Parses left-associative `*`/`/`.
fn parse_mul_div(input: &str, depth: usize) -> PResult<'_, Expr> {
    let (mut input, mut left) = parse_unary(input, depth)?;
    loop {
        // A lone `*`; `**` belongs to the power level.
        let times = ws(terminated(char('*'), not(char('*'))));
        let (next, op) = opt(alt((times, ws_char('/'))))(input)?;
        let Some(op) = op else {
            break;
        };
        let (next, right) = parse_unary(next, depth)?;
        let op = if op == '*' { BinOp::Mul } else { BinOp::Div };
        left = Expr::binary(op, left, right);
        input = next;
    }
    Ok((input, left))
}

/// Parses prefix signs, recursively so `--x` works.
fn parse_unary(input: &str, depth: usize) -> PResult<'_, Expr> {
    if let Ok((rest, sign)) = alt((ws_char('-'), ws_char('+')))(input) {
        let depth = descend(rest, depth)?;
        let (rest, inner) = parse_unary(rest, depth)?;
        let expr = if sign == '-' {
            Expr::Neg(Box::new(inner))
        } else {
            inner
        };
        return Ok((rest, expr));
    }
    parse_power(input, depth)
}

/// Parses `atom ** unary`. The exponent goes back through the unary level,
/// which makes `**` right-associative and lets it bind tighter than a
/// leading minus.
fn parse_power(input: &str, depth: usize) -> PResult<'_, Expr> {
    let (input, base) = parse_primary(input, depth)?;
    let (input, op) = opt(ws(tag("**")))(input)?;
    if op.is_none() {
        return Ok((input, base));
    }
    let depth = descend(input, depth)?;
    let (input, exponent) = parse_unary(input, depth)?;
    Ok((input, Expr::binary(BinOp::Pow, base, exponent)))
}

/// Parses expression atoms.
fn parse_primary(input: &str, depth: usize) -> PResult<'_, Expr> {
    if let Ok((rest, _)) = ws_char('(')(input) {
        let depth = descend(rest, depth)?;
        let (rest, inner) = parse_add_sub(rest, depth)?;
        let (rest, _) = cut(context("')'", ws_char(')')))(rest)?;
        return Ok((rest, inner));
    }
    context(OPERAND, alt((parse_number, parse_name)))(input)
}

/// Parses numeric literal expressions.
fn parse_number(input: &str) -> PResult<'_, Expr> {
    map(
        ws(map_res(recognize_float, |s: &str| s.parse::<Real>())),
        Expr::Number,
    )(input)
}

/// Parses a name to be looked up in the bindings.
fn parse_name(input: &str) -> PResult<'_, Expr> {
    map(ws(identifier), Expr::Name)(input)
}

/// Parses identifiers (`[A-Za-z_][A-Za-z0-9_]*`).
fn identifier(input: &str) -> PResult<'_, String> {
    map(
        recognize(pair(
            take_while1(is_ident_start),
            take_while(is_ident_continue),
        )),
        |s: &str| s.to_string(),
    )(input)
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c.is_ascii_alphabetic()
}

fn is_ident_continue(c: char) -> bool {
    c == '_' || c.is_ascii_alphanumeric()
}

/// Wraps a parser with leading/trailing whitespace skipping.
fn ws<'a, O, P>(parser: P) -> impl FnMut(&'a str) -> PResult<'a, O>
where
    P: FnMut(&'a str) -> PResult<'a, O>,
{
    delimited(multispace0, parser, multispace0)
}

/// Parses a specific character token with surrounding whitespace.
fn ws_char<'a>(c: char) -> impl FnMut(&'a str) -> PResult<'a, char> {
    ws(char(c))
}

/// One level deeper into parentheses, signs or exponents.
fn descend(input: &str, depth: usize) -> Result<usize, nom::Err<VerboseError<&str>>> {
    if depth >= MAX_DEPTH {
        let err = VerboseError::from_error_kind(input, ErrorKind::TooLarge);
        return Err(nom::Err::Failure(VerboseError::add_context(
            input,
            "nesting limit",
            err,
        )));
    }
    Ok(depth + 1)
}

fn syntax_error(text: &str, err: VerboseError<&str>) -> ExprError {
    let too_deep = err
        .errors
        .iter()
        .any(|(_, kind)| matches!(kind, VerboseErrorKind::Nom(ErrorKind::TooLarge)));
    if too_deep {
        return ExprError::TooDeep { limit: MAX_DEPTH };
    }
    let expected = err
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(ctx) => Some(*ctx),
            _ => None,
        })
        .unwrap_or(OPERAND);
    let rest = err.errors.first().map_or("", |(input, _)| *input);
    unexpected(text, rest, expected)
}

/// Classify what sits at `rest`, a suffix of `text`.
fn unexpected(text: &str, rest: &str, expected: &'static str) -> ExprError {
    let rest = rest.trim_start();
    match rest.chars().next() {
        None => ExprError::UnexpectedEnd { expected },
        Some(ch) if is_token_char(ch) => ExprError::UnexpectedToken {
            found: describe(rest, ch),
            expected,
        },
        Some(ch) => ExprError::UnexpectedChar {
            ch,
            offset: text.len() - rest.len(),
        },
    }
}

fn is_token_char(c: char) -> bool {
    is_ident_continue(c) || matches!(c, '.' | '+' | '-' | '*' | '/' | '(' | ')')
}

fn describe(rest: &str, first: char) -> String {
    let word: String = rest
        .chars()
        .take_while(|c| is_ident_continue(*c) || *c == '.')
        .collect();
    if !word.is_empty() {
        format!("'{word}'")
    } else if rest.starts_with("**") {
        "'**'".to_string()
    } else {
        format!("'{first}'")
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn never_panics(text in "[0-9a-zA-Z_+*/(). -]{0,40}") {
            let _ = evaluate(&text, &|_: &str| Some(1.0));
        }

        #[test]
        fn literals_evaluate_to_themselves(v in -1.0e6_f64..1.0e6_f64) {
            let text = format!("{v:?}");
            prop_assert_eq!(evaluate(&text, &|_: &str| None), Ok(v));
        }
    }
}
