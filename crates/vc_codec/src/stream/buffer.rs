use alloc::string::String;
use alloc::vec::Vec;

use crate::StreamError;
use crate::stream::{Scalar, Token, TokenReader, TokenWriter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Frame {
    /// Inside an object; `true` once a field name awaits its value.
    Object(bool),
    Array,
}

/// An in-memory token stream.
///
/// As a [`TokenWriter`] the buffer checks that it receives exactly one
/// well-formed value; [`reader`](Self::reader) replays the tokens.
///
/// # Examples
///
/// ```
/// use vc_codec::stream::{Token, TokenBuffer, TokenReader, TokenWriter};
///
/// let mut buffer = TokenBuffer::new();
/// buffer.write_start_object().unwrap();
/// buffer.write_field_name("x").unwrap();
/// buffer.write_i64(1).unwrap();
/// buffer.write_end_object().unwrap();
/// assert!(buffer.is_complete());
///
/// let mut reader = buffer.reader();
/// assert_eq!(reader.next_token().unwrap(), Some(Token::StartObject));
/// reader.skip_value().unwrap();
/// assert_eq!(reader.next_token().unwrap(), Some(Token::EndObject));
/// assert_eq!(reader.next_token().unwrap(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenBuffer {
    tokens: Vec<Token>,
    stack: Vec<Frame>,
    complete: bool,
}

impl TokenBuffer {
    /// Creates an empty buffer.
    #[inline]
    pub const fn new() -> Self {
        Self {
            tokens: Vec::new(),
            stack: Vec::new(),
            complete: false,
        }
    }

    /// Returns the buffered tokens.
    #[inline]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    #[inline]
    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Returns `true` once one complete value has been written.
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Returns a reader over the buffered tokens.
    #[inline]
    pub fn reader(&self) -> BufferReader<'_> {
        BufferReader::new(&self.tokens)
    }

    // Checks that a value may start here and consumes a pending field name.
    fn begin_value(&mut self) -> Result<(), StreamError> {
        if self.complete {
            return Err(StreamError::TrailingValue);
        }
        match self.stack.last_mut() {
            Some(Frame::Object(named)) => {
                if !*named {
                    return Err(StreamError::MissingFieldName);
                }
                *named = false;
            }
            Some(Frame::Array) | None => {}
        }
        Ok(())
    }

    fn end_value(&mut self) {
        if self.stack.is_empty() {
            self.complete = true;
        }
    }

    fn close(&mut self, frame: Frame, token: Token) -> Result<(), StreamError> {
        let open = match self.stack.last() {
            Some(Frame::Object(false)) => frame == Frame::Object(false),
            Some(Frame::Array) => frame == Frame::Array,
            _ => false,
        };
        if !open {
            return Err(StreamError::Unbalanced(token.describe()));
        }
        self.stack.pop();
        self.tokens.push(token);
        self.end_value();
        Ok(())
    }

    pub(crate) fn from_tokens(tokens: Vec<Token>) -> Self {
        Self {
            complete: !tokens.is_empty(),
            tokens,
            stack: Vec::new(),
        }
    }
}

impl TokenWriter for TokenBuffer {
    fn write_start_object(&mut self) -> Result<(), StreamError> {
        self.begin_value()?;
        self.stack.push(Frame::Object(false));
        self.tokens.push(Token::StartObject);
        Ok(())
    }

    fn write_end_object(&mut self) -> Result<(), StreamError> {
        self.close(Frame::Object(false), Token::EndObject)
    }

    fn write_start_array(&mut self) -> Result<(), StreamError> {
        self.begin_value()?;
        self.stack.push(Frame::Array);
        self.tokens.push(Token::StartArray);
        Ok(())
    }

    fn write_end_array(&mut self) -> Result<(), StreamError> {
        self.close(Frame::Array, Token::EndArray)
    }

    fn write_field_name(&mut self, name: &str) -> Result<(), StreamError> {
        match self.stack.last_mut() {
            Some(Frame::Object(named)) if !*named => {
                *named = true;
                self.tokens.push(Token::FieldName(String::from(name)));
                Ok(())
            }
            Some(Frame::Object(_)) => Err(StreamError::Custom("field name follows a field name".into())),
            _ => Err(StreamError::FieldNameOutsideObject),
        }
    }

    fn write_scalar(&mut self, value: Scalar) -> Result<(), StreamError> {
        self.begin_value()?;
        self.tokens.push(Token::Scalar(value));
        self.end_value();
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// BufferReader

/// Replays the tokens of a [`TokenBuffer`].
#[derive(Debug, Clone)]
pub struct BufferReader<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> BufferReader<'a> {
    /// Creates a reader over raw tokens.
    #[inline]
    pub const fn new(tokens: &'a [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// Returns `true` once every token has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

impl TokenReader for BufferReader<'_> {
    fn next_token(&mut self) -> Result<Option<Token>, StreamError> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        Ok(token)
    }

    fn peek_token(&mut self) -> Result<Option<&Token>, StreamError> {
        Ok(self.tokens.get(self.pos))
    }
}
