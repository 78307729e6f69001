use crate::domain::ports::RandomSource;
use serde::Serialize;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Shape of one display token: a fixed prefix plus an upper-cased base-36
/// suffix of fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenFormat {
    pub prefix: &'static str,
    pub suffix_len: usize,
}

impl TokenFormat {
    pub const ORDER: Self = Self {
        prefix: "ORD-",
        suffix_len: 9,
    };
    pub const OPERATION: Self = Self {
        prefix: "OP-",
        suffix_len: 12,
    };
    pub const PAYMENT: Self = Self {
        prefix: "PAY-",
        suffix_len: 10,
    };

    pub fn generate(&self, random: &mut dyn RandomSource) -> String {
        let suffix: String = (0..self.suffix_len)
            .map(|_| BASE36[random.uniform(0, BASE36.len() as u64) as usize] as char)
            .collect();
        format!("{}{}", self.prefix, suffix.to_uppercase())
    }

    pub fn matches(&self, token: &str) -> bool {
        token.strip_prefix(self.prefix).is_some_and(|suffix| {
            suffix.len() == self.suffix_len
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_uppercase())
        })
    }
}

/// The three opaque tokens shown for one payment attempt.
///
/// Display-only: collisions are possible and harmless.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SessionIdentifiers {
    pub order_number: String,
    pub operation_number: String,
    pub payment_number: String,
}

impl SessionIdentifiers {
    pub fn generate(random: &mut dyn RandomSource) -> Self {
        Self {
            order_number: TokenFormat::ORDER.generate(random),
            operation_number: TokenFormat::OPERATION.generate(random),
            payment_number: TokenFormat::PAYMENT.generate(random),
        }
    }
}
