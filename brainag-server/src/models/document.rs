//! Producer documents - CPF (individuals) and CNPJ (companies)
//!
//! Both are Brazilian tax ids ending in two mod-11 check digits.
//! Accepted input: bare digits or the canonical mask.
//! Stored form: digits only.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// `52998224725` or `529.982.247-25`
static CPF_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{11}|\d{3}\.\d{3}\.\d{3}-\d{2})$").expect("invalid CPF regex")
});

/// `11222333000181` or `11.222.333/0001-81`
static CNPJ_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\d{14}|\d{2}\.\d{3}\.\d{3}/\d{4}-\d{2})$").expect("invalid CNPJ regex")
});

const CPF_WEIGHTS: [&[u32]; 2] = [
    &[10, 9, 8, 7, 6, 5, 4, 3, 2],
    &[11, 10, 9, 8, 7, 6, 5, 4, 3, 2],
];

const CNPJ_WEIGHTS: [&[u32]; 2] = [
    &[5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2],
    &[6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2],
];

/// Declared document kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DocType {
    Cpf,
    Cnpj,
}

impl DocType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Cpf => "CPF",
            Self::Cnpj => "CNPJ",
        }
    }

    /// Number of digits, check digits included.
    pub fn digit_count(&self) -> usize {
        match self {
            Self::Cpf => 11,
            Self::Cnpj => 14,
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            Self::Cpf => &CPF_RE,
            Self::Cnpj => &CNPJ_RE,
        }
    }

    fn weights(&self) -> [&'static [u32]; 2] {
        match self {
            Self::Cpf => CPF_WEIGHTS,
            Self::Cnpj => CNPJ_WEIGHTS,
        }
    }

    /// Compute both check digits for the leading `digit_count() - 2` digits.
    pub fn check_digits(&self, body: &[u32]) -> [u32; 2] {
        let [first_weights, second_weights] = self.weights();
        let first = mod11(body, first_weights);

        let mut extended = body.to_vec();
        extended.push(first);
        let second = mod11(&extended, second_weights);

        [first, second]
    }

    /// Whether `document` (masked or bare) is a valid id of this kind.
    pub fn is_valid(&self, document: &str) -> bool {
        if !self.pattern().is_match(document) {
            return false;
        }

        let digits = digits_of(document);
        if digits.len() != self.digit_count() || digits.iter().all(|d| *d == digits[0]) {
            return false;
        }

        let (body, check) = digits.split_at(self.digit_count() - 2);
        self.check_digits(body) == [check[0], check[1]]
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CPF" => Ok(Self::Cpf),
            "CNPJ" => Ok(Self::Cnpj),
            other => Err(ValidationError::InvalidVariant {
                field: "docType",
                value: other.to_owned(),
            }),
        }
    }
}

fn mod11(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

fn digits_of(s: &str) -> Vec<u32> {
    s.chars().filter_map(|c| c.to_digit(10)).collect()
}

/// Drop mask punctuation, keeping ASCII digits only.
pub fn strip_mask(raw: &str) -> String {
    raw.chars().filter(char::is_ascii_digit).collect()
}

/// Validated document, stored as digits only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Document {
    doc_type: DocType,
    digits: String,
}

impl Document {
    /// Validate `raw` against the checksum of `doc_type`.
    ///
    /// # Example
    /// ```
    /// use brainag_server::models::{DocType, Document};
    ///
    /// let doc = Document::new(DocType::Cpf, "529.982.247-25").unwrap();
    /// assert_eq!(doc.as_str(), "52998224725");
    /// assert!(Document::new(DocType::Cpf, "529.982.247-26").is_err());
    /// assert!(Document::new(DocType::Cnpj, "52998224725").is_err());
    /// ```
    pub fn new(doc_type: DocType, raw: &str) -> Result<Self, ValidationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::Empty { field: "document" });
        }

        if !doc_type.pattern().is_match(raw) {
            return Err(ValidationError::InvalidFormat {
                field: "document",
                reason: match doc_type {
                    DocType::Cpf => "CPF must be 11 digits, optionally formatted as 000.000.000-00",
                    DocType::Cnpj => {
                        "CNPJ must be 14 digits, optionally formatted as 00.000.000/0000-00"
                    }
                },
            });
        }

        if !doc_type.is_valid(raw) {
            return Err(ValidationError::InvalidDocument { doc_type });
        }

        Ok(Self {
            doc_type,
            digits: strip_mask(raw),
        })
    }

    pub fn doc_type(&self) -> DocType {
        self.doc_type
    }

    /// Digits only.
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}
