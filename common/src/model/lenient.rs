//! Deserializers for numeric columns the API may send either as JSON numbers
//! or as strings (decimal columns come back quoted).

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText {
    Number(f64),
    Text(String),
}

pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<NumberOrText> = Option::deserialize(deserializer)?;
    let value = match raw {
        Some(NumberOrText::Number(n)) => Some(n),
        Some(NumberOrText::Text(s)) => s.trim().parse::<f64>().ok(),
        None => None,
    };
    // "NaN" and "inf" parse as floats but are no position.
    Ok(value.filter(|v| v.is_finite()))
}

pub fn i32_or_text<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrText::deserialize(deserializer)? {
        NumberOrText::Number(n) => Ok(n as i32),
        NumberOrText::Text(s) => s
            .trim()
            .parse::<i32>()
            .map_err(|_| serde::de::Error::custom(format!("invalid year: {s}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Row {
        #[serde(default, deserialize_with = "opt_f64")]
        lat: Option<f64>,
    }

    fn lat(json: &str) -> Option<f64> {
        serde_json::from_str::<Row>(json).unwrap().lat
    }

    #[test]
    fn quoted_and_plain_numbers_are_read() {
        assert_eq!(lat(r#"{"lat": 34.5}"#), Some(34.5));
        assert_eq!(lat(r#"{"lat": " -5.25 "}"#), Some(-5.25));
        assert_eq!(lat(r#"{"lat": null}"#), None);
        assert_eq!(lat("{}"), None);
    }

    #[test]
    fn non_finite_text_is_no_coordinate() {
        for text in ["NaN", "inf", "-infinity"] {
            assert_eq!(lat(&format!(r#"{{"lat": "{text}"}}"#)), None, "{text}");
        }
    }
}
