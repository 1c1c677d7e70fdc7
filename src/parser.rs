//! Line tokenizer for the calculator front end.
//!
//! The engine consumes pre-split token sequences; this module turns a line
//! of source text into one. Tokens are whitespace-separated and otherwise
//! uninterpreted — deciding what a token *means* is the evaluator's job.

use nom::{
    bytes::complete::take_till1, character::complete::multispace0, multi::many0,
    sequence::preceded, IResult,
};

use crate::stack::Token;

fn token(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_till1(char::is_whitespace))(input)
}

/// Split a source line into the engine's token sequence.
pub fn tokenize(input: &str) -> Vec<Token> {
    match many0(token)(input) {
        Ok((_, tokens)) => tokens.into_iter().map(str::to_string).collect(),
        // The inner parser only ever fails at end of input, so many0 cannot
        // error; an empty sequence is the conservative fallback.
        Err(_) => Vec::new(),
    }
}
