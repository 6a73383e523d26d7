use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// Table byte used for tokens identifying annotated types.
pub const TYPE_TABLE: u8 = 0x02;
/// Table byte used for tokens identifying methods.
pub const METHOD_TABLE: u8 = 0x06;

const MAX_ROW: u32 = 0x00FF_FFFF;

static NEXT_TYPE_ROW: AtomicU32 = AtomicU32::new(1);
static NEXT_METHOD_ROW: AtomicU32 = AtomicU32::new(1);

/// An identity token for an entity known to the annotation engine.
///
/// Tokens consist of a 32-bit value where:
/// - The high byte (bits 24-31) indicates the kind of entity (see [`TYPE_TABLE`], [`METHOD_TABLE`])
/// - The low 24 bits (bits 0-23) hold a process-unique row number within that kind
///
/// Tokens handed out by [`Token::next_type`] and [`Token::next_method`] are labels for display
/// and diagnostics. Once the 24-bit row space of a kind is used up, further allocations return
/// that kind's null row (row 0) instead of wrapping around. Type identity does not depend on
/// tokens, see [`TypeHandle::id`](crate::metadata::typesystem::TypeHandle::id).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Token(pub u32);

impl Token {
    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Allocates a fresh type token, or the null row of [`TYPE_TABLE`] once rows are exhausted
    #[must_use]
    pub fn next_type() -> Self {
        Self::allocate(TYPE_TABLE, &NEXT_TYPE_ROW)
    }

    /// Allocates a fresh method token, or the null row of [`METHOD_TABLE`] once rows are exhausted
    #[must_use]
    pub fn next_method() -> Self {
        Self::allocate(METHOD_TABLE, &NEXT_METHOD_ROW)
    }

    fn allocate(table: u8, counter: &AtomicU32) -> Self {
        let row = counter
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |row| {
                (row <= MAX_ROW).then_some(row + 1)
            })
            .unwrap_or(0);

        Token((u32::from(table) << 24) | row)
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & 0x00FF_FFFF
    }

    /// Returns true if this token has no row, as handed out once a kind ran out of rows
    #[must_use]
    pub fn is_null_row(&self) -> bool {
        self.row() == 0
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_parts() {
        let token = Token(0x06000001);
        assert_eq!(token.table(), METHOD_TABLE);
        assert_eq!(token.row(), 1);
        assert!(!token.is_null());
        assert!(Token(0).is_null());
    }

    #[test]
    fn test_allocated_tokens_are_unique() {
        let tokens: HashSet<Token> = (0..256).map(|_| Token::next_type()).collect();
        assert_eq!(tokens.len(), 256);
        assert!(tokens.iter().all(|token| token.table() == TYPE_TABLE));

        let method = Token::next_method();
        assert_eq!(method.table(), METHOD_TABLE);
        assert!(!tokens.contains(&method));
    }

    #[test]
    fn test_exhausted_rows_do_not_wrap() {
        let counter = AtomicU32::new(MAX_ROW);

        let last = Token::allocate(TYPE_TABLE, &counter);
        assert_eq!(last.row(), MAX_ROW);
        assert_eq!(last.table(), TYPE_TABLE);

        for _ in 0..3 {
            let exhausted = Token::allocate(TYPE_TABLE, &counter);
            assert!(exhausted.is_null_row());
            assert_eq!(exhausted.table(), TYPE_TABLE);
            assert_ne!(exhausted, Token::new(0x02000001));
        }
        assert_eq!(counter.load(Ordering::Relaxed), MAX_ROW + 1);
    }

    #[test]
    fn test_token_display() {
        let token = Token(0x02000010);
        assert_eq!(format!("{}", token), "0x02000010");

        let debug_str = format!("{:?}", token);
        assert!(debug_str.contains("table: 0x02"));
        assert!(debug_str.contains("row: 16"));
    }
}
