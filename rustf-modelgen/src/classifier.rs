//! Raw column type classification

use crate::types::SemanticType;
use once_cell::sync::Lazy;
use regex::Regex;

static NUMERIC_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tinyint|smallint|mediumint|bigint|int|decimal|float|double|real|bit|serial")
        .expect("classifier: invalid numeric type regex")
});

static INTEGER_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)tinyint|smallint|mediumint|bigint|int")
        .expect("classifier: invalid integer type regex")
});

static TEMPORAL_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)datetime|timestamp|date|time|year")
        .expect("classifier: invalid temporal type regex")
});

static LENGTH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+").expect("classifier: invalid length regex"));

/// Classify a raw column type such as `tinyint(1)` or `varchar(255)`
///
/// Never fails: anything unrecognized is a `String`.
pub fn classify(raw_type: &str) -> SemanticType {
    if NUMERIC_TYPE.is_match(raw_type) {
        if extract_length(raw_type) == Some(1) {
            return SemanticType::Boolean;
        }
        if INTEGER_TYPE.is_match(raw_type) {
            return SemanticType::Integer;
        }
        return SemanticType::Float;
    }

    match raw_type.trim().to_ascii_lowercase().as_str() {
        "longtext" => SemanticType::ArrayBlob,
        "datetime" => SemanticType::DateTime,
        "date" => SemanticType::Date,
        "time" => SemanticType::Time,
        _ => SemanticType::String,
    }
}

/// First run of digits in the raw type, e.g. `10` for `decimal(10,2)`
pub fn extract_length(raw_type: &str) -> Option<u32> {
    LENGTH
        .find(raw_type)
        .and_then(|m| m.as_str().parse().ok())
}

/// Timestamp-like types (`timestamp`, `datetime`, `year`, ...)
pub fn is_temporal(raw_type: &str) -> bool {
    TEMPORAL_TYPE.is_match(raw_type)
}
