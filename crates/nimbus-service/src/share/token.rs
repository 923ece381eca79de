//! Share token generation.

use rand::RngExt;

/// Number of random bytes per token. 32 bytes gives 256 bits of entropy,
/// well past the point where guessing or collision is a concern; the
/// database unique index is the backstop.
const TOKEN_BYTES: usize = 32;

/// Generates opaque share tokens from a cryptographically secure source.
#[derive(Debug, Clone)]
pub struct TokenGenerator;

impl TokenGenerator {
    /// Creates a new token generator.
    pub fn new() -> Self {
        Self
    }

    /// Generates a fixed-length random token, hex-encoded.
    pub fn generate(&self) -> String {
        let mut rng = rand::rng();
        let bytes: [u8; TOKEN_BYTES] = rng.random();
        hex::encode(bytes)
    }
}

impl Default for TokenGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_token_shape() {
        let token = TokenGenerator::new().generate();
        assert_eq!(token.len(), TOKEN_BYTES * 2);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let generator = TokenGenerator::new();
        let tokens: HashSet<String> = (0..1000).map(|_| generator.generate()).collect();
        assert_eq!(tokens.len(), 1000);
    }
}
