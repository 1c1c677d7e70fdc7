//! Built-in operation registry.
//!
//! Every operator the engine knows natively is declared once in the
//! [`BUILTIN_OPS`] table and found by exact, case-sensitive name lookup.
//! Operations are grouped by the shape of stack they consume:
//!
//! - **Nullary/Unary/Binary**: pure numeric transforms. Operands are popped
//!   and parsed as `f64`; the result is pushed back as text.
//! - **Stack**: whole-stack reshaping (`dup`, `swap`, `rolln`, `sum`, ...).
//! - **Stateful**: operations that touch the machine itself — the
//!   definition start marker, `store`, and `map`.
//!
//! Binary operators take their operands in push order: the token popped
//! first is the *second* operand, so `6 2 -` leaves `4`.
//!
//! ## Adding a new operation
//!
//! 1. Implement the function with the signature its kind requires.
//! 2. Add a `BuiltinOp` entry to `BUILTIN_OPS` with its name and arity.
//! 3. Add tests covering the edge cases (underflow, operand domain).

use crate::CalcError;
use crate::evaluator::Machine;
use crate::stack::{
    format_number, parse_number, pop_number, pop_number3, pop_token, Stack, Token,
};
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// Token that arms the definition recorder.
pub const FN_START: &str = "(";
/// Token that closes a recording. Matched literally by the recorder, never
/// looked up in the registry.
pub const FN_END: &str = ")";
/// Reserved user-command name holding the most recent anonymous function.
pub const LAMBDA_SLOT: &str = "_";

/// The single place that decides whether a name is the reserved slot.
pub fn is_lambda_slot(name: &str) -> bool {
    name == LAMBDA_SLOT
}

/// Minimum stack depth an operation needs before it can run.
#[derive(Debug, Clone, PartialEq)]
pub enum Arity {
    /// At least n values on the stack.
    AtLeast(usize),
    /// Runs against any stack, including an empty one.
    Any,
}

impl Arity {
    /// Check a stack depth against this constraint.
    pub fn validate(&self, op: &str, depth: usize) -> Result<(), CalcError> {
        match self {
            Arity::AtLeast(n) if depth < *n => Err(CalcError::StackUnderflow {
                op: op.to_string(),
                depth,
            }),
            _ => Ok(()),
        }
    }
}

/// Implementation of a built-in operation.
#[derive(Clone)]
pub enum OpKind {
    /// Push one computed constant.
    Nullary(fn() -> f64),
    /// Pop one number, push `f(a)`.
    Unary(fn(f64) -> f64),
    /// Pop two numbers in push order, push `f(a, b)`.
    Binary(fn(f64, f64) -> f64),
    /// Reshape the stack as a whole.
    Stack(fn(Stack) -> Result<Stack, CalcError>),
    /// Operations that read or mutate the machine (definitions, storage,
    /// higher-order application). Receives the current expansion depth so
    /// recursive evaluation stays under the machine's bound.
    Stateful(fn(&mut Machine, Stack, usize) -> Result<Stack, CalcError>),
}

impl std::fmt::Debug for OpKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OpKind::Nullary(_) => write!(f, "Nullary(<fn>)"),
            OpKind::Unary(_) => write!(f, "Unary(<fn>)"),
            OpKind::Binary(_) => write!(f, "Binary(<fn>)"),
            OpKind::Stack(_) => write!(f, "Stack(<fn>)"),
            OpKind::Stateful(_) => write!(f, "Stateful(<fn>)"),
        }
    }
}

/// Definition of a built-in operation.
#[derive(Debug, Clone)]
pub struct BuiltinOp {
    /// The operator name as it appears in the token stream.
    pub name: &'static str,
    /// The implementation of this operation.
    pub kind: OpKind,
    /// Stack depth required before the operation runs.
    pub arity: Arity,
}

//
// Numeric implementations
//

fn pi() -> f64 {
    std::f64::consts::PI
}

fn euler() -> f64 {
    std::f64::consts::E
}

fn chs(a: f64) -> f64 {
    -a
}

fn inv(a: f64) -> f64 {
    1.0 / a
}

/// Sign of a number: -1, 0, or 1 (`f64::signum` reports 1 for zero).
fn sign(a: f64) -> f64 {
    if a == 0.0 {
        0.0
    } else if a.is_nan() {
        f64::NAN
    } else {
        a.signum()
    }
}

/// Factorial of a non-negative integer; NaN outside that domain.
fn factorial(a: f64) -> f64 {
    if a < 0.0 || a.fract() != 0.0 || !a.is_finite() {
        return f64::NAN;
    }
    (2..=a as u64).map(|i| i as f64).product()
}

fn celsius_to_fahrenheit(a: f64) -> f64 {
    a * 9.0 / 5.0 + 32.0
}

fn fahrenheit_to_celsius(a: f64) -> f64 {
    (a - 32.0) * 5.0 / 9.0
}

const KM_PER_MILE: f64 = 1.60934;
const FT_PER_METER: f64 = 3.28084;

fn miles_to_km(a: f64) -> f64 {
    a * KM_PER_MILE
}

fn km_to_miles(a: f64) -> f64 {
    a / KM_PER_MILE
}

fn meters_to_feet(a: f64) -> f64 {
    a * FT_PER_METER
}

fn feet_to_meters(a: f64) -> f64 {
    a / FT_PER_METER
}

fn modulo(a: f64, b: f64) -> f64 {
    a % b
}

fn nth_root(a: f64, b: f64) -> f64 {
    a.powf(1.0 / b)
}

/// Euclid's algorithm over f64. Remainders are exact for floats, so the
/// sequence terminates; non-finite inputs are rejected up front.
fn gcd(a: f64, b: f64) -> f64 {
    if !a.is_finite() || !b.is_finite() {
        return f64::NAN;
    }
    let (mut a, mut b) = (a, b);
    while b != 0.0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Log of a in base b.
fn log_base(a: f64, b: f64) -> f64 {
    a.ln() / b.ln()
}

//
// Stack-shape implementations
//

fn underflow(op: &str, depth: usize) -> CalcError {
    CalcError::StackUnderflow {
        op: op.to_string(),
        depth,
    }
}

/// Validate a popped count operand: a non-negative integer.
fn count_operand(op: &str, n: f64) -> Result<usize, CalcError> {
    if !n.is_finite() || n < 0.0 || n.fract() != 0.0 {
        return Err(CalcError::InvalidOperand {
            op: op.to_string(),
            reason: format!("count must be a non-negative integer, got {}", n),
        });
    }
    Ok(n as usize)
}

fn op_cls(_stack: Stack) -> Result<Stack, CalcError> {
    Ok(Stack::new())
}

fn op_drop(mut stack: Stack) -> Result<Stack, CalcError> {
    pop_token(&mut stack, "drop")?;
    Ok(stack)
}

fn op_dropn(mut stack: Stack) -> Result<Stack, CalcError> {
    let n = count_operand("dropn", pop_number(&mut stack, "dropn")?)?;
    if n > stack.len() {
        return Err(underflow("dropn", stack.len()));
    }
    stack.truncate(stack.len() - n);
    Ok(stack)
}

fn op_dup(mut stack: Stack) -> Result<Stack, CalcError> {
    let top = stack.last().cloned().ok_or_else(|| underflow("dup", 0))?;
    stack.push(top);
    Ok(stack)
}

fn op_swap(mut stack: Stack) -> Result<Stack, CalcError> {
    let b = pop_token(&mut stack, "swap")?;
    let a = pop_token(&mut stack, "swap")?;
    stack.push(b);
    stack.push(a);
    Ok(stack)
}

/// Move the top token to the bottom of the stack.
fn op_roll(mut stack: Stack) -> Result<Stack, CalcError> {
    let top = pop_token(&mut stack, "roll")?;
    stack.insert(0, top);
    Ok(stack)
}

/// Move the top n tokens, as a block, to the bottom of the stack.
fn op_rolln(mut stack: Stack) -> Result<Stack, CalcError> {
    let n = count_operand("rolln", pop_number(&mut stack, "rolln")?)?;
    if n > stack.len() {
        return Err(underflow("rolln", stack.len()));
    }
    let split = stack.len() - n;
    let mut out = stack.split_off(split);
    out.extend(stack);
    Ok(out)
}

/// Move the bottom token to the top of the stack.
fn op_rot(mut stack: Stack) -> Result<Stack, CalcError> {
    if stack.is_empty() {
        return Err(underflow("rot", 0));
    }
    let bottom = stack.remove(0);
    stack.push(bottom);
    Ok(stack)
}

/// Move the bottom n tokens, as a block, to the top of the stack.
fn op_rotn(mut stack: Stack) -> Result<Stack, CalcError> {
    let n = count_operand("rotn", pop_number(&mut stack, "rotn")?)?;
    if n > stack.len() {
        return Err(underflow("rotn", stack.len()));
    }
    let mut out = stack.split_off(n);
    out.extend(stack);
    Ok(out)
}

/// Collapse the whole stack to the sum of its values.
fn op_sum(stack: Stack) -> Result<Stack, CalcError> {
    let mut total = 0.0;
    for token in &stack {
        total += parse_number(token)?;
    }
    Ok(vec![format_number(total)])
}

/// Collapse the whole stack to the product of its values.
fn op_prod(stack: Stack) -> Result<Stack, CalcError> {
    let mut product = 1.0;
    for token in &stack {
        product *= parse_number(token)?;
    }
    Ok(vec![format_number(product)])
}

/// Pop n, push the integer run 1..=n.
fn op_io(mut stack: Stack) -> Result<Stack, CalcError> {
    let n = count_operand("io", pop_number(&mut stack, "io")?)?;
    for i in 1..=n {
        stack.push(format_number(i as f64));
    }
    Ok(stack)
}

/// Pop from/to/step, push the inclusive arithmetic range. Direction is
/// inferred from `to` vs `from`; only the step's magnitude is used.
fn op_to(mut stack: Stack) -> Result<Stack, CalcError> {
    let (from, to, step) = pop_number3(&mut stack, "to")?;
    if step == 0.0 || step.is_nan() {
        return Err(CalcError::InvalidOperand {
            op: "to".to_string(),
            reason: format!("step must be a non-zero number, got {}", step),
        });
    }
    let step = step.abs();
    let mut n = from;
    if to > from {
        while n <= to {
            stack.push(format_number(n));
            n += step;
        }
    } else {
        while n >= to {
            stack.push(format_number(n));
            n -= step;
        }
    }
    Ok(stack)
}

/// Textual representation of a number's integer part in the given radix.
fn radix_token(n: f64, radix: u32) -> Token {
    let i = n.trunc() as i64;
    let magnitude = i.unsigned_abs();
    let digits = match radix {
        16 => format!("{:x}", magnitude),
        8 => format!("{:o}", magnitude),
        _ => format!("{:b}", magnitude),
    };
    if i < 0 {
        format!("-{}", digits)
    } else {
        digits
    }
}

fn op_dec_hex(mut stack: Stack) -> Result<Stack, CalcError> {
    let a = pop_number(&mut stack, "dec_hex")?;
    stack.push(radix_token(a, 16));
    Ok(stack)
}

fn op_dec_bin(mut stack: Stack) -> Result<Stack, CalcError> {
    let a = pop_number(&mut stack, "dec_bin")?;
    stack.push(radix_token(a, 2));
    Ok(stack)
}

fn op_dec_oct(mut stack: Stack) -> Result<Stack, CalcError> {
    let a = pop_number(&mut stack, "dec_oct")?;
    stack.push(radix_token(a, 8));
    Ok(stack)
}

//
// Stateful implementations
//

/// Arm the definition recorder; the stack passes through untouched.
fn op_define_start(
    machine: &mut Machine,
    stack: Stack,
    _depth: usize,
) -> Result<Stack, CalcError> {
    machine.arm_recorder()?;
    Ok(stack)
}

/// Pop a value and the name beneath it, and define a zero-argument user
/// command whose body is that single value token (`x 5 store` defines `x`).
fn op_store(machine: &mut Machine, mut stack: Stack, _depth: usize) -> Result<Stack, CalcError> {
    let value = pop_token(&mut stack, "store")?;
    let name = pop_token(&mut stack, "store")?;
    debug!(name = %name, value = %value, "store");
    machine.define_command(name, vec![value]);
    Ok(stack)
}

/// Replace the stack by evaluating the anonymous-function body against a
/// singleton stack per element, concatenating the results in order.
fn op_map(machine: &mut Machine, stack: Stack, depth: usize) -> Result<Stack, CalcError> {
    let body = machine
        .command_body(LAMBDA_SLOT)
        .map(<[Token]>::to_vec)
        .ok_or(CalcError::UnknownAnonymousFunction)?;
    let mut out = Stack::new();
    for token in stack {
        out.extend(machine.expand(&body, vec![token], depth + 1)?);
    }
    Ok(out)
}

/// Global registry of all built-in operations.
static BUILTIN_OPS: &[BuiltinOp] = &[
    // Constants
    BuiltinOp {
        name: "pi",
        kind: OpKind::Nullary(pi),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "e",
        kind: OpKind::Nullary(euler),
        arity: Arity::Any,
    },
    // Unary numeric operators
    BuiltinOp {
        name: "abs",
        kind: OpKind::Unary(f64::abs),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "chs",
        kind: OpKind::Unary(chs),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "floor",
        kind: OpKind::Unary(f64::floor),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "ceil",
        kind: OpKind::Unary(f64::ceil),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "inv",
        kind: OpKind::Unary(inv),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "ln",
        kind: OpKind::Unary(f64::ln),
        arity: Arity::AtLeast(1),
    },
    // `log` is base 10, as on most calculators
    BuiltinOp {
        name: "log",
        kind: OpKind::Unary(f64::log10),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "log2",
        kind: OpKind::Unary(f64::log2),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "log10",
        kind: OpKind::Unary(f64::log10),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "round",
        kind: OpKind::Unary(f64::round),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "sgn",
        kind: OpKind::Unary(sign),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "sqrt",
        kind: OpKind::Unary(f64::sqrt),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "!",
        kind: OpKind::Unary(factorial),
        arity: Arity::AtLeast(1),
    },
    // Angle conversions and trigonometry
    BuiltinOp {
        name: "deg_rad",
        kind: OpKind::Unary(f64::to_radians),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "rad_deg",
        kind: OpKind::Unary(f64::to_degrees),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "sin",
        kind: OpKind::Unary(f64::sin),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "cos",
        kind: OpKind::Unary(f64::cos),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "tan",
        kind: OpKind::Unary(f64::tan),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "asin",
        kind: OpKind::Unary(f64::asin),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "acos",
        kind: OpKind::Unary(f64::acos),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "atan",
        kind: OpKind::Unary(f64::atan),
        arity: Arity::AtLeast(1),
    },
    // Unit conversions
    BuiltinOp {
        name: "c_f",
        kind: OpKind::Unary(celsius_to_fahrenheit),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "f_c",
        kind: OpKind::Unary(fahrenheit_to_celsius),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "mi_km",
        kind: OpKind::Unary(miles_to_km),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "km_mi",
        kind: OpKind::Unary(km_to_miles),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "m_ft",
        kind: OpKind::Unary(meters_to_feet),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "ft_m",
        kind: OpKind::Unary(feet_to_meters),
        arity: Arity::AtLeast(1),
    },
    // Radix conversions (push the radix text itself)
    BuiltinOp {
        name: "dec_hex",
        kind: OpKind::Stack(op_dec_hex),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "dec_bin",
        kind: OpKind::Stack(op_dec_bin),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "dec_oct",
        kind: OpKind::Stack(op_dec_oct),
        arity: Arity::AtLeast(1),
    },
    // Binary numeric operators
    BuiltinOp {
        name: "+",
        kind: OpKind::Binary(|a, b| a + b),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "-",
        kind: OpKind::Binary(|a, b| a - b),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "x",
        kind: OpKind::Binary(|a, b| a * b),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "/",
        kind: OpKind::Binary(|a, b| a / b),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "%",
        kind: OpKind::Binary(modulo),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "^",
        kind: OpKind::Binary(f64::powf),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "min",
        kind: OpKind::Binary(f64::min),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "max",
        kind: OpKind::Binary(f64::max),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "nroot",
        kind: OpKind::Binary(nth_root),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "gcd",
        kind: OpKind::Binary(gcd),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "logn",
        kind: OpKind::Binary(log_base),
        arity: Arity::AtLeast(2),
    },
    // Stack-shape operators
    BuiltinOp {
        name: "cls",
        kind: OpKind::Stack(op_cls),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "drop",
        kind: OpKind::Stack(op_drop),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "dropn",
        kind: OpKind::Stack(op_dropn),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "dup",
        kind: OpKind::Stack(op_dup),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "swap",
        kind: OpKind::Stack(op_swap),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: "roll",
        kind: OpKind::Stack(op_roll),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "rolln",
        kind: OpKind::Stack(op_rolln),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "rot",
        kind: OpKind::Stack(op_rot),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "rotn",
        kind: OpKind::Stack(op_rotn),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "sum",
        kind: OpKind::Stack(op_sum),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "prod",
        kind: OpKind::Stack(op_prod),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "io",
        kind: OpKind::Stack(op_io),
        arity: Arity::AtLeast(1),
    },
    BuiltinOp {
        name: "to",
        kind: OpKind::Stack(op_to),
        arity: Arity::AtLeast(3),
    },
    // Storage and the sub-language surface
    BuiltinOp {
        name: "store",
        kind: OpKind::Stateful(op_store),
        arity: Arity::AtLeast(2),
    },
    BuiltinOp {
        name: FN_START,
        kind: OpKind::Stateful(op_define_start),
        arity: Arity::Any,
    },
    BuiltinOp {
        name: "map",
        kind: OpKind::Stateful(op_map),
        arity: Arity::Any,
    },
];

/// Lazy static map from name to BuiltinOp (private - use find_builtin_op)
static BUILTIN_INDEX: LazyLock<HashMap<&'static str, &'static BuiltinOp>> =
    LazyLock::new(|| BUILTIN_OPS.iter().map(|op| (op.name, op)).collect());

/// Get all builtin operations
pub fn get_builtin_ops() -> &'static [BuiltinOp] {
    BUILTIN_OPS
}

/// Find a builtin op by its exact name
pub fn find_builtin_op(name: &str) -> Option<&'static BuiltinOp> {
    BUILTIN_INDEX.get(name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stack_of(tokens: &[&str]) -> Stack {
        tokens.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_registry_lookup() {
        assert!(find_builtin_op("+").is_some());
        assert!(find_builtin_op("sqrt").is_some());
        assert!(find_builtin_op("map").is_some());
        assert!(find_builtin_op(FN_START).is_some());
        // The end marker is recorder syntax, not a registered operation.
        assert!(find_builtin_op(FN_END).is_none());
        // Exact, case-sensitive matches only.
        assert!(find_builtin_op("SQRT").is_none());
        assert!(find_builtin_op("unknown").is_none());
    }

    #[test]
    fn test_registry_names_are_unique() {
        let ops = get_builtin_ops();
        assert_eq!(BUILTIN_INDEX.len(), ops.len());
    }

    #[test]
    fn test_arity_validation() {
        assert!(Arity::AtLeast(2).validate("+", 2).is_ok());
        assert!(Arity::AtLeast(2).validate("+", 5).is_ok());
        assert!(Arity::Any.validate("cls", 0).is_ok());

        match Arity::AtLeast(2).validate("+", 1) {
            Err(CalcError::StackUnderflow { op, depth }) => {
                assert_eq!(op, "+");
                assert_eq!(depth, 1);
            }
            other => panic!("expected StackUnderflow, got {:?}", other),
        }
    }

    #[test]
    fn test_sign() {
        assert_eq!(sign(3.5), 1.0);
        assert_eq!(sign(-2.0), -1.0);
        assert_eq!(sign(0.0), 0.0);
        assert!(sign(f64::NAN).is_nan());
    }

    #[test]
    fn test_factorial() {
        assert_eq!(factorial(0.0), 1.0);
        assert_eq!(factorial(1.0), 1.0);
        assert_eq!(factorial(5.0), 120.0);
        assert_eq!(factorial(10.0), 3628800.0);
        assert!(factorial(-1.0).is_nan());
        assert!(factorial(2.5).is_nan());
        assert!(factorial(f64::INFINITY).is_nan());
    }

    #[test]
    fn test_gcd() {
        assert_eq!(gcd(12.0, 18.0), 6.0);
        assert_eq!(gcd(18.0, 12.0), 6.0);
        assert_eq!(gcd(7.0, 13.0), 1.0);
        assert_eq!(gcd(5.0, 0.0), 5.0);
        assert!(gcd(f64::INFINITY, 2.0).is_nan());
        assert!(gcd(f64::NAN, 2.0).is_nan());
    }

    #[test]
    fn test_rolln_moves_top_block_to_bottom() {
        let stack = stack_of(&["1", "2", "3", "4", "5", "2"]);
        assert_eq!(
            op_rolln(stack).unwrap(),
            stack_of(&["4", "5", "1", "2", "3"])
        );
    }

    #[test]
    fn test_rotn_moves_bottom_block_to_top() {
        let stack = stack_of(&["1", "2", "3", "4", "5", "2"]);
        assert_eq!(
            op_rotn(stack).unwrap(),
            stack_of(&["3", "4", "5", "1", "2"])
        );
    }

    #[test]
    fn test_count_operators_underflow_instead_of_truncating() {
        assert_eq!(
            op_dropn(stack_of(&["1", "5"])),
            Err(CalcError::StackUnderflow {
                op: "dropn".to_string(),
                depth: 1
            })
        );
        assert!(matches!(
            op_rolln(stack_of(&["1", "2", "9"])),
            Err(CalcError::StackUnderflow { .. })
        ));
        assert!(matches!(
            op_rotn(stack_of(&["1", "2", "9"])),
            Err(CalcError::StackUnderflow { .. })
        ));
    }

    #[test]
    fn test_count_operand_domain() {
        assert!(matches!(
            op_dropn(stack_of(&["1", "2", "-1"])),
            Err(CalcError::InvalidOperand { .. })
        ));
        assert!(matches!(
            op_io(stack_of(&["2.5"])),
            Err(CalcError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_range_operators() {
        assert_eq!(
            op_io(stack_of(&["4"])).unwrap(),
            stack_of(&["1", "2", "3", "4"])
        );
        assert_eq!(op_io(stack_of(&["0"])).unwrap(), stack_of(&[]));

        // Ascending, descending, and fractional steps; ends are inclusive.
        assert_eq!(
            op_to(stack_of(&["1", "5", "1"])).unwrap(),
            stack_of(&["1", "2", "3", "4", "5"])
        );
        assert_eq!(
            op_to(stack_of(&["5", "1", "-1"])).unwrap(),
            stack_of(&["5", "4", "3", "2", "1"])
        );
        assert_eq!(
            op_to(stack_of(&["1", "2", "0.5"])).unwrap(),
            stack_of(&["1", "1.5", "2"])
        );
        assert!(matches!(
            op_to(stack_of(&["1", "5", "0"])),
            Err(CalcError::InvalidOperand { .. })
        ));
    }

    #[test]
    fn test_radix_tokens() {
        assert_eq!(radix_token(255.0, 16), "ff");
        assert_eq!(radix_token(-255.0, 16), "-ff");
        assert_eq!(radix_token(5.0, 2), "101");
        assert_eq!(radix_token(8.0, 8), "10");
        assert_eq!(radix_token(9.99, 16), "9");
    }

    #[test]
    fn test_sum_and_prod_collapse_whole_stack() {
        assert_eq!(
            op_sum(stack_of(&["1", "2", "3"])).unwrap(),
            stack_of(&["6"])
        );
        assert_eq!(op_sum(stack_of(&[])).unwrap(), stack_of(&["0"]));
        assert_eq!(
            op_prod(stack_of(&["2", "3", "4"])).unwrap(),
            stack_of(&["24"])
        );
        assert_eq!(op_prod(stack_of(&[])).unwrap(), stack_of(&["1"]));
        assert_eq!(
            op_sum(stack_of(&["1", "banana"])),
            Err(CalcError::NotANumber {
                token: "banana".to_string()
            })
        );
    }

    #[test]
    fn test_shape_operators() {
        assert_eq!(op_cls(stack_of(&["1", "2"])).unwrap(), stack_of(&[]));
        assert_eq!(
            op_dup(stack_of(&["1", "2"])).unwrap(),
            stack_of(&["1", "2", "2"])
        );
        assert_eq!(
            op_swap(stack_of(&["1", "2"])).unwrap(),
            stack_of(&["2", "1"])
        );
        assert_eq!(
            op_roll(stack_of(&["1", "2", "3"])).unwrap(),
            stack_of(&["3", "1", "2"])
        );
        assert_eq!(
            op_rot(stack_of(&["1", "2", "3"])).unwrap(),
            stack_of(&["2", "3", "1"])
        );
        assert_eq!(
            op_dropn(stack_of(&["1", "2", "3", "2"])).unwrap(),
            stack_of(&["1"])
        );
    }
}
