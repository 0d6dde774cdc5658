use crate::StreamError;
use crate::stream::Token;

/// Source of tokens consumed by deserializers.
pub trait TokenReader {
    /// Consumes the next token; `None` at the end of the stream.
    fn next_token(&mut self) -> Result<Option<Token>, StreamError>;

    /// Returns the next token without consuming it.
    fn peek_token(&mut self) -> Result<Option<&Token>, StreamError>;

    /// Consumes one complete value, including any nested content.
    fn skip_value(&mut self) -> Result<(), StreamError> {
        let mut depth = 0usize;
        loop {
            match self.next_token()?.ok_or(StreamError::UnexpectedEnd)? {
                Token::StartObject | Token::StartArray => depth += 1,
                Token::EndObject => {
                    depth = depth.checked_sub(1).ok_or(StreamError::Unbalanced("end of object"))?;
                }
                Token::EndArray => {
                    depth = depth.checked_sub(1).ok_or(StreamError::Unbalanced("end of array"))?;
                }
                // The name belongs to the entry whose value follows.
                Token::FieldName(_) => continue,
                Token::Scalar(_) => {}
            }
            if depth == 0 {
                return Ok(());
            }
        }
    }
}
