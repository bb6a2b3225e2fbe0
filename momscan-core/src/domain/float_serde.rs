//! Serde helpers for floats that may be infinite.
//!
//! JSON has no representation for `inf`/`NaN` and `serde_json` writes them as
//! `null`, which cannot be read back into an `f64`. Non-finite values are
//! written as the strings `"inf"`, `"-inf"` and `"nan"` instead.

use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_finite() {
        serializer.serialize_f64(*value)
    } else if value.is_nan() {
        serializer.serialize_str("nan")
    } else if value.is_sign_positive() {
        serializer.serialize_str("inf")
    } else {
        serializer.serialize_str("-inf")
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Repr {
    Number(f64),
    Text(String),
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    match Repr::deserialize(deserializer)? {
        Repr::Number(v) => Ok(v),
        Repr::Text(s) => match s.as_str() {
            "inf" => Ok(f64::INFINITY),
            "-inf" => Ok(f64::NEG_INFINITY),
            "nan" => Ok(f64::NAN),
            other => Err(serde::de::Error::custom(format!(
                "expected a number, \"inf\", \"-inf\" or \"nan\", got \"{other}\""
            ))),
        },
    }
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Wrapper {
        #[serde(with = "super")]
        v: f64,
    }

    #[test]
    fn infinities_survive_json() {
        for v in [f64::INFINITY, f64::NEG_INFINITY, 0.25] {
            let json = serde_json::to_string(&Wrapper { v }).unwrap();
            let back: Wrapper = serde_json::from_str(&json).unwrap();
            assert_eq!(back.v, v);
        }
    }

    #[test]
    fn nan_is_written_as_text() {
        let json = serde_json::to_string(&Wrapper { v: f64::NAN }).unwrap();
        assert_eq!(json, r#"{"v":"nan"}"#);
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert!(back.v.is_nan());
    }

    #[test]
    fn unknown_text_is_rejected() {
        assert!(serde_json::from_str::<Wrapper>(r#"{"v":"lots"}"#).is_err());
    }
}
