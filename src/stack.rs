//! The value stack and its extraction helpers.
//!
//! Every value on the stack is a plain string token. Whether a token is a
//! number or a symbol is decided by whoever consumes it: numeric operators
//! parse the tokens they pop and fail with [`CalcError::NotANumber`] when
//! the text does not denote an `f64`.

use crate::CalcError;

/// An atomic unit of a program: a numeric literal, an operator name, or an
/// unrecognized symbol pushed verbatim.
pub type Token = String;

/// The value stack. Top of stack is the tail of the vector.
pub type Stack = Vec<Token>;

/// Remove and return the top token.
pub fn pop_token(stack: &mut Stack, op: &str) -> Result<Token, CalcError> {
    let depth = stack.len();
    stack.pop().ok_or_else(|| CalcError::StackUnderflow {
        op: op.to_string(),
        depth,
    })
}

/// Interpret a token as a number.
pub fn parse_number(token: &str) -> Result<f64, CalcError> {
    token.parse::<f64>().map_err(|_| CalcError::NotANumber {
        token: token.to_string(),
    })
}

/// Remove the top token and parse it as a number.
pub fn pop_number(stack: &mut Stack, op: &str) -> Result<f64, CalcError> {
    let token = pop_token(stack, op)?;
    parse_number(&token)
}

/// Pop two numbers, returned in original push order: the token popped first
/// is the *second* operand.
pub fn pop_number2(stack: &mut Stack, op: &str) -> Result<(f64, f64), CalcError> {
    let b = pop_number(stack, op)?;
    let a = pop_number(stack, op)?;
    Ok((a, b))
}

/// Pop three numbers, returned in original push order.
pub fn pop_number3(stack: &mut Stack, op: &str) -> Result<(f64, f64, f64), CalcError> {
    let c = pop_number(stack, op)?;
    let (a, b) = pop_number2(stack, op)?;
    Ok((a, b, c))
}

/// Format a computed number back into its token form (shortest text that
/// round-trips through `f64`).
pub fn format_number(n: f64) -> Token {
    n.to_string()
}
