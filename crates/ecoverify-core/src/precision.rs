//! Four-decimal float precision for serialized results
//!
//! Every score and distance field in the result records serializes through
//! these helpers so external consumers see a uniform 4-decimal contract.

use serde::Serializer;
use std::collections::BTreeMap;

/// Round to 4 decimal places
pub fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}

pub fn ser_round4<S>(v: &f64, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(round4(*v))
}

pub fn ser_round4_map<S>(map: &BTreeMap<String, f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(map.iter().map(|(k, v)| (k, round4(*v))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round4() {
        assert_eq!(round4(0.123456), 0.1235);
        assert_eq!(round4(0.123449), 0.1234);
        assert_eq!(round4(1.0), 1.0);
        assert_eq!(round4(0.0), 0.0);
    }

    #[test]
    fn test_round4_negative() {
        assert_eq!(round4(-0.987654), -0.9877);
    }
}
