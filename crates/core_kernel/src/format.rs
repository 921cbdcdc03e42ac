//! Format checkers
//!
//! Pure syntax checks over raw strings. Each checker is a unit type exposing
//! `is_valid`; the identity card checker also derives the holder's gender and
//! birthday, which cross-field validators compare against stored values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidateEmail, ValidateUrl};

static PASSPORT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]{5,17}$").expect("Invalid passport regex"));

static OFFICER_CARD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\p{Han}A-Za-z0-9.\-]{4,20}$").expect("Invalid officer card regex")
});

static MOBILE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(1[3-9]\d{9}|\+\d{6,15})$").expect("Invalid mobile regex"));

static LOCAL_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("Invalid date regex"));

static INTEGER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+$").expect("Invalid integer regex"));

static FLOAT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?$").expect("Invalid float regex")
});

static ALPHA_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9]+$").expect("Invalid alphanumeric regex"));

/// Gender encoded in a national identity card number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardGender {
    Male,
    Female,
}

impl CardGender {
    /// Value key of the matching gender enumeration member
    pub fn value(&self) -> &'static str {
        match self {
            CardGender::Male => "MALE",
            CardGender::Female => "FEMALE",
        }
    }
}

/// Mainland China resident identity card numbers (GB 11643)
pub struct IdentityCard;

const ID_WEIGHTS: [u32; 17] = [7, 9, 10, 5, 8, 4, 2, 1, 6, 3, 7, 9, 10, 5, 8, 4, 2];
const ID_CHECK_CHARS: [char; 11] = ['1', '0', 'X', '9', '8', '7', '6', '5', '4', '3', '2'];

struct ParsedIdentityCard {
    birthday: NaiveDate,
    gender: CardGender,
}

impl IdentityCard {
    /// Checks an 18-digit number (with MOD 11-2 check character) or a legacy
    /// 15-digit number, including the embedded birthday
    pub fn is_valid(number: &str) -> bool {
        Self::parse(number).is_some()
    }

    /// Gender of the holder, if the number is valid
    pub fn gender(number: &str) -> Option<CardGender> {
        Self::parse(number).map(|parsed| parsed.gender)
    }

    /// Birthday of the holder, if the number is valid
    pub fn birthday(number: &str) -> Option<NaiveDate> {
        Self::parse(number).map(|parsed| parsed.birthday)
    }

    /// The MOD 11-2 check character for the first 17 digits of a number
    pub fn check_char(body: &str) -> Option<char> {
        if body.len() != 17 || !body.bytes().all(|digit| digit.is_ascii_digit()) {
            return None;
        }
        let sum: u32 = body
            .bytes()
            .zip(ID_WEIGHTS.iter())
            .map(|(digit, weight)| u32::from(digit - b'0') * weight)
            .sum();
        Some(ID_CHECK_CHARS[(sum % 11) as usize])
    }

    fn parse(number: &str) -> Option<ParsedIdentityCard> {
        if !number.is_ascii() {
            return None;
        }
        match number.len() {
            18 => Self::parse_current(number),
            15 => Self::parse_legacy(number),
            _ => None,
        }
    }

    fn parse_current(number: &str) -> Option<ParsedIdentityCard> {
        let bytes = number.as_bytes();
        if !bytes[..17].iter().all(u8::is_ascii_digit) || bytes[0] == b'0' {
            return None;
        }

        let expected = Self::check_char(&number[..17])?;
        if char::from(bytes[17]).to_ascii_uppercase() != expected {
            return None;
        }

        let birthday = NaiveDate::parse_from_str(&number[6..14], "%Y%m%d").ok()?;
        Some(ParsedIdentityCard {
            birthday,
            gender: Self::gender_of(bytes[16]),
        })
    }

    fn parse_legacy(number: &str) -> Option<ParsedIdentityCard> {
        let bytes = number.as_bytes();
        if !bytes.iter().all(u8::is_ascii_digit) || bytes[0] == b'0' {
            return None;
        }
        let birthday = NaiveDate::parse_from_str(&format!("19{}", &number[6..12]), "%Y%m%d").ok()?;
        Some(ParsedIdentityCard {
            birthday,
            gender: Self::gender_of(bytes[14]),
        })
    }

    fn gender_of(digit: u8) -> CardGender {
        if (digit - b'0') % 2 == 1 {
            CardGender::Male
        } else {
            CardGender::Female
        }
    }
}

/// Passport numbers: 5 to 17 letters or digits
pub struct Passport;

impl Passport {
    pub fn is_valid(number: &str) -> bool {
        PASSPORT.is_match(number)
    }
}

/// Military officer card numbers: 4 to 20 Chinese characters, letters, digits, dots or dashes
pub struct OfficerCard;

impl OfficerCard {
    pub fn is_valid(number: &str) -> bool {
        OFFICER_CARD.is_match(number)
    }
}

/// Any other credential: non-blank, at most 50 characters, no whitespace
pub struct OtherCredential;

impl OtherCredential {
    pub fn is_valid(number: &str) -> bool {
        !number.is_empty()
            && number.chars().count() <= 50
            && !number.chars().any(char::is_whitespace)
    }
}

/// Mobile numbers: mainland 11-digit numbers or `+` followed by 6 to 15 digits
pub struct Mobile;

impl Mobile {
    pub fn is_valid(number: &str) -> bool {
        MOBILE.is_match(number)
    }
}

pub struct Email;

impl Email {
    pub fn is_valid(address: &str) -> bool {
        address.to_string().validate_email()
    }
}

pub struct Url;

impl Url {
    pub fn is_valid(url: &str) -> bool {
        url.to_string().validate_url()
    }
}

/// Calendar dates in `YYYY-MM-DD` form
pub struct LocalDate;

impl LocalDate {
    pub fn is_valid(date: &str) -> bool {
        Self::parse(date).is_some()
    }

    pub fn parse(date: &str) -> Option<NaiveDate> {
        if !LOCAL_DATE.is_match(date) {
            return None;
        }
        NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
    }
}

/// Timestamps in RFC 3339 form, or `YYYY-MM-DD HH:MM:SS` local time
pub struct Timestamp;

impl Timestamp {
    pub fn is_valid(timestamp: &str) -> bool {
        DateTime::parse_from_rfc3339(timestamp).is_ok()
            || NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").is_ok()
    }
}

pub struct Integer;

impl Integer {
    pub fn is_valid(number: &str) -> bool {
        INTEGER.is_match(number)
    }
}

pub struct Float;

impl Float {
    pub fn is_valid(number: &str) -> bool {
        FLOAT.is_match(number)
    }
}

pub struct AlphaNumeric;

impl AlphaNumeric {
    pub fn is_valid(text: &str) -> bool {
        ALPHA_NUMERIC.is_match(text)
    }
}
