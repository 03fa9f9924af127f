// src/utils/id_generator.rs
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IdType {
    Dispatch,
}

impl IdType {
    pub fn to_prefix(&self) -> &'static str {
        match self {
            IdType::Dispatch => "dsp",
        }
    }
}

impl fmt::Display for IdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_prefix())
    }
}

pub struct IdGenerator;

impl IdGenerator {
    /// Generate a unique ID with format: {prefix}-{YYMMDD}-{suffix}
    pub fn generate(id_type: IdType) -> String {
        Self::generate_with_timestamp(id_type, Utc::now())
    }

    pub fn generate_with_timestamp(id_type: IdType, timestamp: DateTime<Utc>) -> String {
        let date_part = timestamp.format("%y%m%d").to_string();
        format!("{}-{}-{}", id_type.to_prefix(), date_part, Self::random_suffix())
    }

    /// 5 characters: 3 hex + 2 alphanumeric, or the other way round
    fn random_suffix() -> String {
        if rand::random::<bool>() {
            format!("{}{}", Self::from_chars(HEX_CHARS, 3), Self::from_chars(ALPHANUMERIC_CHARS, 2))
        } else {
            format!("{}{}", Self::from_chars(ALPHANUMERIC_CHARS, 3), Self::from_chars(HEX_CHARS, 2))
        }
    }

    fn from_chars(charset: &[u8], n: usize) -> String {
        let mut rng = rand::rng();
        (0..n)
            .map(|_| charset[rng.random_range(0..charset.len())] as char)
            .collect()
    }
}

const HEX_CHARS: &[u8] = b"0123456789abcdef";
const ALPHANUMERIC_CHARS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
