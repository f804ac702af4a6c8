use crate::error::RqliteDbError;

/// Lexical context of the splitter. Every variant except `Normal` remembers
/// the byte offset where it was entered so unterminated input can be reported.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum State {
    Normal,
    SingleQuoted(usize),
    DoubleQuoted(usize),
    LineComment,
    BlockComment(usize),
}

/// Outcome of scanning one byte.
pub(super) struct Step {
    pub(super) state: State,
    /// Bytes past the current one that the transition also swallowed.
    pub(super) consumed: usize,
    /// The byte was a top-level `;`.
    pub(super) separator: bool,
}

impl State {
    /// Transition on byte `b` at `idx`, given one byte of lookahead.
    pub(super) fn step(self, idx: usize, b: u8, next: Option<u8>) -> Step {
        let (state, consumed) = match (self, b, next) {
            (State::Normal, b';', _) => {
                return Step {
                    state: self,
                    consumed: 0,
                    separator: true,
                };
            }
            (State::Normal, b'\'', _) => (State::SingleQuoted(idx), 0),
            (State::Normal, b'"', _) => (State::DoubleQuoted(idx), 0),
            (State::Normal, b'-', Some(b'-')) => (State::LineComment, 1),
            (State::Normal, b'/', Some(b'*')) => (State::BlockComment(idx), 1),
            // doubled quote is an escaped quote
            (State::SingleQuoted(_), b'\'', Some(b'\''))
            | (State::DoubleQuoted(_), b'"', Some(b'"')) => (self, 1),
            (State::SingleQuoted(_), b'\'', _)
            | (State::DoubleQuoted(_), b'"', _)
            | (State::LineComment, b'\n', _) => (State::Normal, 0),
            (State::BlockComment(_), b'*', Some(b'/')) => (State::Normal, 1),
            _ => (self, 0),
        };
        Step {
            state,
            consumed,
            separator: false,
        }
    }

    /// Map the state left over at end of input to an error, if it is one.
    pub(super) fn check_terminated(self) -> Result<(), RqliteDbError> {
        match self {
            State::Normal | State::LineComment => Ok(()),
            State::SingleQuoted(offset) => Err(RqliteDbError::UnterminatedInput {
                what: "string literal",
                offset,
            }),
            State::DoubleQuoted(offset) => Err(RqliteDbError::UnterminatedInput {
                what: "quoted identifier",
                offset,
            }),
            State::BlockComment(offset) => Err(RqliteDbError::UnterminatedInput {
                what: "block comment",
                offset,
            }),
        }
    }
}
