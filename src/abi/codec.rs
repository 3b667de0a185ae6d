//! Solidity ABI codec
//!
//! Head/tail encoding of the value types the registry contract uses:
//! `uint256`, `address`, `bool`, `string`, dynamic arrays and tuples.
//! Integers are carried as `u128`; the registry never stores values
//! wider than that and wider words are reported as overflow.

use super::error::{AbiError, AbiResult};
use crate::chain::Address;

/// Size of an ABI word in bytes
pub const WORD: usize = 32;

/// A decoded or to-be-encoded ABI value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Uint(u128),
    Address(Address),
    Bool(bool),
    String(String),
    Array(Vec<Token>),
    Tuple(Vec<Token>),
}

/// Type description used to drive decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    Uint,
    Address,
    Bool,
    String,
    Array(Box<ParamType>),
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Dynamic types are encoded out of line behind an offset word
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::String | ParamType::Array(_) => true,
            ParamType::Tuple(items) => items.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Bytes occupied in the head when the type is static
    fn head_len(&self) -> usize {
        match self {
            ParamType::Tuple(items) if !self.is_dynamic() => {
                items.iter().map(ParamType::head_len).sum()
            }
            _ => WORD,
        }
    }
}

impl Token {
    pub fn is_dynamic(&self) -> bool {
        match self {
            Token::String(_) | Token::Array(_) => true,
            Token::Tuple(items) => items.iter().any(Token::is_dynamic),
            _ => false,
        }
    }

    fn head_len(&self) -> usize {
        match self {
            Token::Tuple(items) if !self.is_dynamic() => items.iter().map(Token::head_len).sum(),
            _ => WORD,
        }
    }

    pub fn into_uint(self) -> AbiResult<u128> {
        match self {
            Token::Uint(v) => Ok(v),
            _ => Err(AbiError::UnexpectedToken("uint256")),
        }
    }

    pub fn into_address(self) -> AbiResult<Address> {
        match self {
            Token::Address(a) => Ok(a),
            _ => Err(AbiError::UnexpectedToken("address")),
        }
    }

    pub fn into_bool(self) -> AbiResult<bool> {
        match self {
            Token::Bool(b) => Ok(b),
            _ => Err(AbiError::UnexpectedToken("bool")),
        }
    }

    pub fn into_string(self) -> AbiResult<String> {
        match self {
            Token::String(s) => Ok(s),
            _ => Err(AbiError::UnexpectedToken("string")),
        }
    }

    pub fn into_array(self) -> AbiResult<Vec<Token>> {
        match self {
            Token::Array(items) => Ok(items),
            _ => Err(AbiError::UnexpectedToken("array")),
        }
    }

    pub fn into_tuple(self) -> AbiResult<Vec<Token>> {
        match self {
            Token::Tuple(items) => Ok(items),
            _ => Err(AbiError::UnexpectedToken("tuple")),
        }
    }
}

// ============================================
// Encoding
// ============================================

fn uint_word(value: u128) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[16..].copy_from_slice(&value.to_be_bytes());
    word
}

fn address_word(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[12..].copy_from_slice(address.as_bytes());
    word
}

/// Encode a sequence of tokens as the body of a tuple (call arguments,
/// return data, log data).
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len: usize = tokens.iter().map(Token::head_len).sum();
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();

    for token in tokens {
        if token.is_dynamic() {
            head.extend_from_slice(&uint_word((head_len + tail.len()) as u128));
            encode_tail(token, &mut tail);
        } else {
            encode_static(token, &mut head);
        }
    }

    head.extend_from_slice(&tail);
    head
}

fn encode_static(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::Uint(v) => out.extend_from_slice(&uint_word(*v)),
        Token::Address(a) => out.extend_from_slice(&address_word(a)),
        Token::Bool(b) => out.extend_from_slice(&uint_word(u128::from(*b))),
        Token::Tuple(items) => {
            for item in items {
                encode_static(item, out);
            }
        }
        Token::String(_) | Token::Array(_) => encode_tail(token, out),
    }
}

fn encode_tail(token: &Token, out: &mut Vec<u8>) {
    match token {
        Token::String(s) => {
            let bytes = s.as_bytes();
            out.extend_from_slice(&uint_word(bytes.len() as u128));
            out.extend_from_slice(bytes);
            let padding = (WORD - bytes.len() % WORD) % WORD;
            out.extend(std::iter::repeat(0u8).take(padding));
        }
        Token::Array(items) => {
            out.extend_from_slice(&uint_word(items.len() as u128));
            out.extend_from_slice(&encode(items));
        }
        Token::Tuple(items) => out.extend_from_slice(&encode(items)),
        _ => encode_static(token, out),
    }
}

// ============================================
// Decoding
// ============================================

fn word_at(data: &[u8], offset: usize) -> AbiResult<&[u8]> {
    let end = offset.checked_add(WORD).ok_or(AbiError::InvalidOffset(offset))?;
    data.get(offset..end).ok_or(AbiError::Truncated {
        offset,
        needed: WORD,
        available: data.len(),
    })
}

fn uint_at(data: &[u8], offset: usize) -> AbiResult<u128> {
    let word = word_at(data, offset)?;
    if word[..16].iter().any(|b| *b != 0) {
        return Err(AbiError::Overflow(format!("0x{}", hex::encode(word))));
    }
    let mut low = [0u8; 16];
    low.copy_from_slice(&word[16..]);
    Ok(u128::from_be_bytes(low))
}

fn usize_at(data: &[u8], offset: usize) -> AbiResult<usize> {
    let value = uint_at(data, offset)?;
    usize::try_from(value).map_err(|_| AbiError::Overflow(value.to_string()))
}

/// Decode `data` as a tuple body with the given element types
pub fn decode(types: &[ParamType], data: &[u8]) -> AbiResult<Vec<Token>> {
    decode_params(types, data, 0)
}

fn decode_params(types: &[ParamType], data: &[u8], base: usize) -> AbiResult<Vec<Token>> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut head = base;

    for ty in types {
        if ty.is_dynamic() {
            let offset = usize_at(data, head)?;
            let at = base.checked_add(offset).ok_or(AbiError::InvalidOffset(offset))?;
            tokens.push(decode_at(ty, data, at)?);
            head += WORD;
        } else {
            tokens.push(decode_static(ty, data, head)?);
            head += ty.head_len();
        }
    }

    Ok(tokens)
}

fn decode_static(ty: &ParamType, data: &[u8], at: usize) -> AbiResult<Token> {
    match ty {
        ParamType::Uint => uint_at(data, at).map(Token::Uint),
        ParamType::Bool => match uint_at(data, at) {
            Ok(0) => Ok(Token::Bool(false)),
            Ok(1) => Ok(Token::Bool(true)),
            Ok(_) | Err(AbiError::Overflow(_)) => Err(AbiError::InvalidBool),
            Err(e) => Err(e),
        },
        ParamType::Address => {
            let word = word_at(data, at)?;
            if word[..12].iter().any(|b| *b != 0) {
                return Err(AbiError::InvalidAddress);
            }
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(&word[12..]);
            Ok(Token::Address(Address::from_bytes(bytes)))
        }
        ParamType::Tuple(items) => decode_params(items, data, at).map(Token::Tuple),
        ParamType::String | ParamType::Array(_) => decode_at(ty, data, at),
    }
}

fn decode_at(ty: &ParamType, data: &[u8], at: usize) -> AbiResult<Token> {
    match ty {
        ParamType::String => {
            let len = usize_at(data, at)?;
            let start = at + WORD;
            let end = start.checked_add(len).ok_or(AbiError::InvalidOffset(len))?;
            let bytes = data.get(start..end).ok_or(AbiError::Truncated {
                offset: start,
                needed: len,
                available: data.len(),
            })?;
            String::from_utf8(bytes.to_vec())
                .map(Token::String)
                .map_err(|e| AbiError::InvalidUtf8(e.to_string()))
        }
        ParamType::Array(inner) => {
            let len = usize_at(data, at)?;
            // Every element needs at least one head word.
            if len > data.len() / WORD {
                return Err(AbiError::InvalidOffset(len));
            }
            let types = vec![inner.as_ref().clone(); len];
            decode_params(&types, data, at + WORD).map(Token::Array)
        }
        ParamType::Tuple(items) => decode_params(items, data, at).map(Token::Tuple),
        _ => decode_static(ty, data, at),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word_hex(data: &[u8], index: usize) -> String {
        hex::encode(&data[index * WORD..(index + 1) * WORD])
    }

    #[test]
    fn test_encode_static_words() {
        let addr: Address = "0x00000000000000000000000000000000000000aa".parse().unwrap();
        let data = encode(&[Token::Uint(7), Token::Address(addr), Token::Bool(true)]);
        assert_eq!(data.len(), 3 * WORD);
        assert_eq!(word_hex(&data, 0), format!("{}07", "0".repeat(62)));
        assert_eq!(word_hex(&data, 1), format!("{}aa", "0".repeat(62)));
        assert_eq!(word_hex(&data, 2), format!("{}01", "0".repeat(62)));
    }

    #[test]
    fn test_encode_string_layout() {
        // Standard example: f(uint256, string) with (1, "Buddy")
        let data = encode(&[Token::Uint(1), Token::String("Buddy".into())]);
        assert_eq!(data.len(), 4 * WORD);
        assert_eq!(word_hex(&data, 1), format!("{}40", "0".repeat(62)));
        assert_eq!(word_hex(&data, 2), format!("{}05", "0".repeat(62)));
        assert_eq!(&data[3 * WORD..3 * WORD + 5], b"Buddy");
        assert!(data[3 * WORD + 5..].iter().all(|b| *b == 0));
    }

    #[test]
    fn test_empty_string_has_no_padding_word() {
        let data = encode(&[Token::String(String::new())]);
        assert_eq!(data.len(), 2 * WORD);
    }

    #[test]
    fn test_decode_dynamic_tuple_return() {
        let owner: Address = "0x1111111111111111111111111111111111111111".parse().unwrap();
        let record = Token::Tuple(vec![
            Token::String("Buddy".into()),
            Token::Uint(1_577_836_800),
            Token::Address(owner),
            Token::Bool(false),
        ]);
        let data = encode(std::slice::from_ref(&record));

        let ty = ParamType::Tuple(vec![
            ParamType::String,
            ParamType::Uint,
            ParamType::Address,
            ParamType::Bool,
        ]);
        let decoded = decode(&[ty], &data).unwrap();
        assert_eq!(decoded, vec![record]);
    }

    #[test]
    fn test_decode_uint_array() {
        let data = encode(&[Token::Array(vec![Token::Uint(3), Token::Uint(9)])]);
        let decoded = decode(&[ParamType::Array(Box::new(ParamType::Uint))], &data).unwrap();
        assert_eq!(
            decoded,
            vec![Token::Array(vec![Token::Uint(3), Token::Uint(9)])]
        );

        let empty = encode(&[Token::Array(vec![])]);
        let decoded = decode(&[ParamType::Array(Box::new(ParamType::Uint))], &empty).unwrap();
        assert_eq!(decoded, vec![Token::Array(vec![])]);
    }

    #[test]
    fn test_decode_rejects_truncated_data() {
        let err = decode(&[ParamType::Uint, ParamType::Uint], &[0u8; 40]).unwrap_err();
        assert!(matches!(err, AbiError::Truncated { offset: 32, .. }));
    }

    #[test]
    fn test_decode_rejects_wide_uint() {
        let data = [0xffu8; WORD];
        assert!(matches!(
            decode(&[ParamType::Uint], &data),
            Err(AbiError::Overflow(_))
        ));
    }

    #[test]
    fn test_decode_rejects_bad_bool_and_address() {
        let mut data = [0u8; WORD];
        data[31] = 2;
        assert_eq!(decode(&[ParamType::Bool], &data), Err(AbiError::InvalidBool));

        let mut data = [0u8; WORD];
        data[0] = 1;
        assert_eq!(
            decode(&[ParamType::Address], &data),
            Err(AbiError::InvalidAddress)
        );
    }

    #[test]
    fn test_decode_rejects_oversized_array_length() {
        let mut data = encode(&[Token::Array(vec![])]);
        data[WORD + 31] = 0xff;
        assert!(decode(&[ParamType::Array(Box::new(ParamType::Uint))], &data).is_err());
    }
}
