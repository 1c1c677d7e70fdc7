//! The evaluation engine.
//!
//! A [`Machine`] folds a token sequence over a stack, one token at a time.
//! Each token is resolved exactly once into one of three roles: a builtin
//! operation, a user-defined command (whose stored body is evaluated
//! recursively against the current stack), or a literal pushed verbatim.
//! While the definition [`Recorder`] is armed, tokens bypass resolution
//! entirely and are captured into a command body instead.

use crate::builtinops::{find_builtin_op, is_lambda_slot, BuiltinOp, OpKind, FN_END};
use crate::stack::{format_number, pop_number, pop_number2, Stack, Token};
use crate::CalcError;
use std::collections::HashMap;
use tracing::{debug, trace};

/// Default bound on user-command expansion depth.
pub const DEFAULT_RECURSION_LIMIT: usize = 128;

/// Recording state of the function-definition sub-language.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Recorder {
    #[default]
    Idle,
    /// Start marker consumed; the next token names the command.
    AwaitingName,
    /// Capturing tokens into the named command body.
    Recording(String),
}

impl Recorder {
    fn is_armed(&self) -> bool {
        !matches!(self, Recorder::Idle)
    }

    /// Drive one token through the recorder. The end marker is matched
    /// literally here; every other token is captured verbatim, including a
    /// nested start marker (nested definitions are unsupported).
    fn feed(
        &mut self,
        commands: &mut HashMap<String, Vec<Token>>,
        token: &str,
    ) -> Result<(), CalcError> {
        match self {
            Recorder::Idle => Err(CalcError::MalformedDefinition(
                "recorder received a token while idle".to_string(),
            )),
            Recorder::AwaitingName => {
                if token == FN_END {
                    *self = Recorder::Idle;
                    return Err(CalcError::MalformedDefinition(
                        "definition closed before a name was given".to_string(),
                    ));
                }
                debug!(name = %token, "recording definition");
                commands.insert(token.to_string(), Vec::new());
                *self = Recorder::Recording(token.to_string());
                Ok(())
            }
            Recorder::Recording(name) => {
                if token == FN_END {
                    debug!(name = %name, "definition complete");
                    *self = Recorder::Idle;
                } else {
                    commands
                        .entry(name.clone())
                        .or_default()
                        .push(token.to_string());
                }
                Ok(())
            }
        }
    }
}

/// Result of the single three-way token lookup.
enum Dispatch {
    Builtin(&'static BuiltinOp),
    UserDefined(Vec<Token>),
    Literal,
}

/// The evaluation engine: owns the user-command store, the definition
/// recorder, and the recursion bound. Both the store and the recorder
/// persist across [`Machine::evaluate`] calls, so definitions accumulate
/// over the machine's lifetime and a recording may span calls.
#[derive(Debug, Clone)]
pub struct Machine {
    commands: HashMap<String, Vec<Token>>,
    recorder: Recorder,
    recursion_limit: usize,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    pub fn new() -> Self {
        Self::with_recursion_limit(DEFAULT_RECURSION_LIMIT)
    }

    /// A machine with an injected bound on user-command expansion depth.
    pub fn with_recursion_limit(limit: usize) -> Self {
        Machine {
            commands: HashMap::new(),
            recorder: Recorder::Idle,
            recursion_limit: limit,
        }
    }

    /// Evaluate a token sequence against an initial stack.
    ///
    /// Tokens are processed strictly left to right. On error the whole call
    /// fails and no partial stack is returned; errors from recursive
    /// user-command expansion propagate unchanged.
    pub fn evaluate(&mut self, ops: &[Token], stack: Stack) -> Result<Stack, CalcError> {
        self.eval_at(ops, stack, 0)
    }

    /// Evaluate a stored body at a given expansion depth. Used by builtins
    /// that replay bodies (`map`).
    pub(crate) fn expand(
        &mut self,
        ops: &[Token],
        stack: Stack,
        depth: usize,
    ) -> Result<Stack, CalcError> {
        self.eval_at(ops, stack, depth)
    }

    fn eval_at(&mut self, ops: &[Token], mut stack: Stack, depth: usize) -> Result<Stack, CalcError> {
        if depth > self.recursion_limit {
            return Err(CalcError::RecursionLimitExceeded(self.recursion_limit));
        }
        for op in ops {
            trace!(op = %op, depth, stack_depth = stack.len(), "token");
            if self.recorder.is_armed() {
                self.recorder.feed(&mut self.commands, op)?;
                continue;
            }
            stack = match self.resolve(op) {
                Dispatch::Builtin(builtin) => self.apply_builtin(builtin, stack, depth)?,
                Dispatch::UserDefined(body) => {
                    debug!(name = %op, depth, "expanding user command");
                    self.eval_at(&body, stack, depth + 1)?
                }
                Dispatch::Literal => {
                    stack.push(op.clone());
                    stack
                }
            };
        }
        Ok(stack)
    }

    /// The single polymorphic lookup deciding a token's role. Builtins
    /// shadow user commands; anything unknown is a literal.
    fn resolve(&self, op: &str) -> Dispatch {
        if let Some(builtin) = find_builtin_op(op) {
            Dispatch::Builtin(builtin)
        } else if let Some(body) = self.commands.get(op) {
            Dispatch::UserDefined(body.clone())
        } else {
            Dispatch::Literal
        }
    }

    fn apply_builtin(
        &mut self,
        op: &'static BuiltinOp,
        mut stack: Stack,
        depth: usize,
    ) -> Result<Stack, CalcError> {
        op.arity.validate(op.name, stack.len())?;
        match &op.kind {
            OpKind::Nullary(f) => {
                stack.push(format_number(f()));
                Ok(stack)
            }
            OpKind::Unary(f) => {
                let a = pop_number(&mut stack, op.name)?;
                stack.push(format_number(f(a)));
                Ok(stack)
            }
            OpKind::Binary(f) => {
                let (a, b) = pop_number2(&mut stack, op.name)?;
                stack.push(format_number(f(a, b)));
                Ok(stack)
            }
            OpKind::Stack(f) => f(stack),
            OpKind::Stateful(f) => f(self, stack, depth),
        }
    }

    /// Arm the definition recorder. Called by the start-marker builtin.
    pub(crate) fn arm_recorder(&mut self) -> Result<(), CalcError> {
        if self.recorder.is_armed() {
            // Dispatch never routes tokens here while armed; reject rather
            // than corrupt the recording if that invariant is ever broken.
            return Err(CalcError::MalformedDefinition(
                "definition started while another is being recorded".to_string(),
            ));
        }
        self.recorder = Recorder::AwaitingName;
        Ok(())
    }

    /// Define or replace a user command.
    pub(crate) fn define_command(&mut self, name: Token, body: Vec<Token>) {
        self.commands.insert(name, body);
    }

    /// Body of a stored user command, if defined.
    pub fn command_body(&self, name: &str) -> Option<&[Token]> {
        self.commands.get(name).map(Vec::as_slice)
    }

    /// Names of all user-defined commands, excluding the reserved
    /// anonymous-function slot. Order is unspecified.
    pub fn user_command_names(&self) -> Vec<String> {
        self.commands
            .keys()
            .filter(|name| !is_lambda_slot(name))
            .cloned()
            .collect()
    }

    /// True while a function definition is being recorded.
    pub fn is_recording(&self) -> bool {
        self.recorder.is_armed()
    }
}
