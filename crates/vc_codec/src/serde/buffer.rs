use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde_core::de::{self, DeserializeSeed, MapAccess, SeqAccess, Visitor};
use serde_core::ser::{self, SerializeMap, SerializeSeq};
use serde_core::{Deserialize, Deserializer, Serialize, Serializer};

use crate::stream::{Scalar, Token, TokenBuffer};

const MALFORMED: &str = "malformed token stream";

#[inline]
fn malformed<E: ser::Error>() -> E {
    E::custom(MALFORMED)
}

// -----------------------------------------------------------------------------
// Serialize

/// Returns the index just past the value starting at `start`.
fn value_end(tokens: &[Token], start: usize) -> Option<usize> {
    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(start) {
        match token {
            Token::StartObject | Token::StartArray => depth += 1,
            Token::EndObject | Token::EndArray => depth = depth.checked_sub(1)?,
            Token::FieldName(_) => continue,
            Token::Scalar(_) => {}
        }
        if depth == 0 {
            return Some(index + 1);
        }
    }
    None
}

/// The tokens of exactly one value.
struct ValueSlice<'a>(&'a [Token]);

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_none(),
            Scalar::Bool(v) => serializer.serialize_bool(*v),
            Scalar::I64(v) => serializer.serialize_i64(*v),
            Scalar::U64(v) => serializer.serialize_u64(*v),
            Scalar::F64(v) => serializer.serialize_f64(*v),
            Scalar::Str(v) => serializer.serialize_str(v),
        }
    }
}

impl Serialize for ValueSlice<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let tokens = self.0;
        let Some(first) = tokens.first() else {
            return Err(ser::Error::custom("empty token stream"));
        };

        match first {
            Token::Scalar(scalar) => scalar.serialize(serializer),
            Token::StartArray => {
                let mut seq = serializer.serialize_seq(None)?;
                let mut pos = 1;
                loop {
                    match tokens.get(pos) {
                        Some(Token::EndArray) => break,
                        Some(_) => {
                            let end = value_end(tokens, pos).ok_or_else(malformed::<S::Error>)?;
                            seq.serialize_element(&ValueSlice(&tokens[pos..end]))?;
                            pos = end;
                        }
                        None => return Err(malformed()),
                    }
                }
                seq.end()
            }
            Token::StartObject => {
                let mut map = serializer.serialize_map(None)?;
                let mut pos = 1;
                loop {
                    match tokens.get(pos) {
                        Some(Token::EndObject) => break,
                        Some(Token::FieldName(name)) => {
                            let end = value_end(tokens, pos + 1).ok_or_else(malformed::<S::Error>)?;
                            map.serialize_entry(name.as_str(), &ValueSlice(&tokens[pos + 1..end]))?;
                            pos = end;
                        }
                        _ => return Err(malformed()),
                    }
                }
                map.end()
            }
            other => Err(ser::Error::custom(format!(
                "{MALFORMED}: value starts with {}",
                other.describe()
            ))),
        }
    }
}

impl Serialize for TokenBuffer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if !self.is_complete() {
            return Err(ser::Error::custom("token buffer does not hold a complete value"));
        }
        ValueSlice(self.tokens()).serialize(serializer)
    }
}

// -----------------------------------------------------------------------------
// Deserialize

/// Appends the tokens of one value.
struct TokenSeed<'a>(&'a mut Vec<Token>);

impl<'de> DeserializeSeed<'de> for TokenSeed<'_> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_any(TokenVisitor(self.0))
    }
}

struct TokenVisitor<'a>(&'a mut Vec<Token>);

impl TokenVisitor<'_> {
    #[inline]
    fn scalar(self, value: Scalar) {
        self.0.push(Token::Scalar(value));
    }
}

impl<'de> Visitor<'de> for TokenVisitor<'_> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any self-describing value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<(), E> {
        self.scalar(Scalar::Bool(v));
        Ok(())
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<(), E> {
        self.scalar(Scalar::I64(v));
        Ok(())
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<(), E> {
        self.scalar(Scalar::U64(v));
        Ok(())
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<(), E> {
        self.scalar(Scalar::F64(v));
        Ok(())
    }

    fn visit_char<E: de::Error>(self, v: char) -> Result<(), E> {
        let mut text = String::new();
        text.push(v);
        self.scalar(Scalar::Str(text));
        Ok(())
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<(), E> {
        self.scalar(Scalar::Str(String::from(v)));
        Ok(())
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<(), E> {
        self.scalar(Scalar::Str(v));
        Ok(())
    }

    fn visit_unit<E: de::Error>(self) -> Result<(), E> {
        self.scalar(Scalar::Null);
        Ok(())
    }

    fn visit_none<E: de::Error>(self) -> Result<(), E> {
        self.scalar(Scalar::Null);
        Ok(())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        TokenSeed(self.0).deserialize(deserializer)
    }

    fn visit_newtype_struct<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        TokenSeed(self.0).deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        let tokens = self.0;
        tokens.push(Token::StartArray);
        while seq.next_element_seed(TokenSeed(&mut *tokens))?.is_some() {}
        tokens.push(Token::EndArray);
        Ok(())
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<(), A::Error> {
        let tokens = self.0;
        tokens.push(Token::StartObject);
        while let Some(key) = map.next_key::<String>()? {
            tokens.push(Token::FieldName(key));
            map.next_value_seed(TokenSeed(&mut *tokens))?;
        }
        tokens.push(Token::EndObject);
        Ok(())
    }
}

impl<'de> Deserialize<'de> for TokenBuffer {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut tokens = Vec::new();
        TokenSeed(&mut tokens).deserialize(deserializer)?;
        Ok(TokenBuffer::from_tokens(tokens))
    }
}

#[cfg(test)]
mod tests {
    use crate::stream::{TokenBuffer, TokenWriter};

    #[test]
    fn json_structure_survives_a_round_trip() {
        let text = r#"{"name":"Ann","tags":["a","b"],"age":7,"score":-1.5,"none":null,"ok":true}"#;
        let buffer: TokenBuffer = serde_json::from_str(text).unwrap();
        assert!(buffer.is_complete());
        assert_eq!(serde_json::to_string(&buffer).unwrap(), text);
    }

    #[test]
    fn incomplete_buffers_are_rejected() {
        let mut buffer = TokenBuffer::new();
        buffer.write_start_array().unwrap();
        buffer.write_i64(1).unwrap();
        assert!(serde_json::to_string(&buffer).is_err());

        buffer.write_end_array().unwrap();
        assert_eq!(serde_json::to_string(&buffer).unwrap(), "[1]");
    }

    #[test]
    fn ron_maps_with_string_keys() {
        let buffer: TokenBuffer = ron::from_str(r#"{"a": 1, "b": [true, false]}"#).unwrap();
        assert_eq!(serde_json::to_string(&buffer).unwrap(), r#"{"a":1,"b":[true,false]}"#);
    }
}
