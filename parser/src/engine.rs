//! The parse engine: a single pass over the token queue.
//!
//! The engine is a small state machine. At most one option is open (waiting
//! for its argument) and at most one `many` operand is open (absorbing
//! positional tokens). Once the terminator is seen every later token is an
//! operand.
//!
//! Dispatch order for each token:
//!
//! 1. an open option takes the token as its argument, unless the token is
//!    another option (error) or the terminator (drops the option);
//! 2. in terminated mode, or for a positional token, the token goes to the
//!    open operand or the next one on the stack;
//! 3. `--` switches to terminated mode;
//! 4. `--name[=value]` resolves a long option;
//! 5. `-abc` resolves a short-option cluster.

use argv_schema_core::{FieldSpec, HELP_ID, OptionSpec, Schema, Value};
use tracing::trace;

use crate::args::ParsedArgs;
use crate::coerce::{coerce, coerce_flag};
use crate::error::ParseError;
use crate::expand::{
    ShortMatch, TERMINATOR, expand_cluster, expand_value, is_option_like, split_long,
};
use crate::token::{Token, TokenKind, TokenQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum State {
    Idle,
    OptionOpen,
    OperandOpen,
    Terminated,
}

/// Raw outcome of a scan, before defaulting.
#[derive(Debug)]
pub(crate) struct Scan {
    pub(crate) args: ParsedArgs,
    pub(crate) help_requested: bool,
}

#[derive(Debug)]
pub(crate) struct Engine<'s> {
    schema: &'s Schema,
    queue: TokenQueue,
    args: ParsedArgs,
    open_option: Option<&'s OptionSpec>,
    open_operand: Option<&'s FieldSpec>,
    next_operand: usize,
    terminated: bool,
    help_requested: bool,
}

impl<'s> Engine<'s> {
    pub(crate) fn new(schema: &'s Schema, queue: TokenQueue) -> Self {
        Self {
            schema,
            queue,
            args: ParsedArgs::default(),
            open_option: None,
            open_operand: None,
            next_operand: 0,
            terminated: false,
            help_requested: false,
        }
    }

    pub(crate) fn state(&self) -> State {
        if self.open_option.is_some() {
            State::OptionOpen
        } else if self.terminated {
            State::Terminated
        } else if self.open_operand.is_some() {
            State::OperandOpen
        } else {
            State::Idle
        }
    }

    /// Consumes the whole queue. Stops early once `help` is matched.
    pub(crate) fn run(mut self) -> Result<Scan, ParseError> {
        while let Some(token) = self.queue.pop() {
            trace!(
                token = %token.text,
                kind = ?token.kind,
                state = ?self.state(),
                "Classifying token"
            );
            self.step(token)?;
            if self.help_requested {
                break;
            }
        }

        if let Some(option) = self.open_option {
            trace!(option = option.id(), "Input ended while option awaited a value");
        }

        Ok(Scan {
            args: self.args,
            help_requested: self.help_requested,
        })
    }

    fn step(&mut self, token: Token) -> Result<(), ParseError> {
        if let Some(option) = self.open_option.take() {
            return self.option_argument(option, token);
        }

        if self.terminated || !is_option_like(&token.text) {
            return self.operand(token);
        }

        if token.text == TERMINATOR {
            self.terminated = true;
            return Ok(());
        }

        match token.text.strip_prefix("--") {
            Some(body) => self.long_option(body),
            None => self.short_cluster(&token.text[1..]),
        }
    }

    fn option_argument(&mut self, option: &'s OptionSpec, token: Token) -> Result<(), ParseError> {
        if token.kind == TokenKind::Surface && is_option_like(&token.text) {
            if token.text == TERMINATOR {
                trace!(option = option.id(), "Terminator dropped open option");
                self.terminated = true;
                return Ok(());
            }
            return Err(ParseError::MissingValue {
                option: option.long_id.clone(),
                token: token.text,
            });
        }

        self.assign(&option.field, &token.text)
    }

    fn operand(&mut self, token: Token) -> Result<(), ParseError> {
        let operand = match self.open_operand {
            Some(open) => open,
            None => {
                let next = self
                    .schema
                    .operands()
                    .get(self.next_operand)
                    .ok_or_else(|| ParseError::UnknownArgument(token.text.clone()))?;
                self.next_operand += 1;
                next
            }
        };

        self.open_operand = operand.many.then_some(operand);
        self.assign(operand, &token.text)
    }

    fn long_option(&mut self, body: &str) -> Result<(), ParseError> {
        let (name, attached) = split_long(body);
        let option = self
            .schema
            .resolve(name)
            .ok_or_else(|| ParseError::UnknownOption(format!("--{name}")))?;

        if !option.takes_value() {
            return self.flag(option, attached);
        }
        if let Some(value) = attached {
            self.queue.push_front(Token::attached(value));
        }
        self.open_option = Some(option);
        Ok(())
    }

    fn short_cluster(&mut self, cluster: &str) -> Result<(), ParseError> {
        let schema = self.schema;
        for matched in expand_cluster(schema, cluster)? {
            match matched {
                ShortMatch::Flag(option) => self.flag(option, None)?,
                ShortMatch::Valued(option, attached) => {
                    if let Some(value) = attached {
                        self.queue.push_front(Token::attached(value));
                    }
                    self.open_option = Some(option);
                }
            }
        }
        Ok(())
    }

    fn flag(&mut self, option: &'s OptionSpec, attached: Option<&str>) -> Result<(), ParseError> {
        let value = coerce_flag(&option.field, attached)?;
        if option.id() == HELP_ID && value == Value::Boolean(true) {
            self.help_requested = true;
        }
        self.args.insert(&option.field, value)
    }

    /// Expands `text` and stores every resulting piece in `field`.
    fn assign(&mut self, field: &'s FieldSpec, text: &str) -> Result<(), ParseError> {
        let first = expand_value(text, &mut self.queue);
        self.store(field, &first)?;
        while let Some(piece) = self.queue.pop_continuation() {
            self.store(field, &piece.text)?;
        }
        Ok(())
    }

    fn store(&mut self, field: &FieldSpec, raw: &str) -> Result<(), ParseError> {
        let value = coerce(field, raw)?;
        trace!(field = %field.id, value = %value, "Stored value");
        self.args.insert(field, value)
    }
}
