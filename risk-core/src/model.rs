use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw text of the latitude and longitude fields, sent as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: String,
    pub longitude: String,
}

impl Coordinates {
    pub fn new(latitude: impl Into<String>, longitude: impl Into<String>) -> Self {
        Self { latitude: latitude.into(), longitude: longitude.into() }
    }
}

/// Weather parameters keyed by name, in the order the server sent them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherData(Map<String, Value>);

impl WeatherData {
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Display rows, one per parameter.
    pub fn rows(&self) -> Vec<WeatherRow> {
        self.iter().map(|(name, value)| WeatherRow::from_entry(name, value)).collect()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for WeatherData {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// One rendered line of the weather table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeatherRow {
    pub name: String,
    pub value: String,
}

impl WeatherRow {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self { name: name.into(), value: value.into() }
    }

    pub fn from_entry(name: &str, value: &Value) -> Self {
        Self { name: display_name(name), value: display_value(value) }
    }
}

/// `wind_speed_10m` -> `wind speed 10m`
pub fn display_name(param: &str) -> String {
    param.replace('_', " ")
}

/// Text shown for a value cell, as a browser would show it when assigned to
/// `innerText`: strings verbatim, null as nothing, numbers per [`number_text`].
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.as_f64().map(number_text).unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

/// Shortest round-trip decimal text of `f`, switching to exponent notation
/// below `1e-6` and from `1e21` up (`12.0` -> `12`, `1e-7` -> `1e-7`,
/// `1e21` -> `1e+21`).
pub fn number_text(f: f64) -> String {
    if f == 0.0 {
        return "0".to_string();
    }
    if !f.is_finite() {
        return f.to_string();
    }

    let sign = if f < 0.0 { "-" } else { "" };
    // `{:e}` gives the shortest digits that round-trip, e.g. `1.2345e3`.
    let sci = format!("{:e}", f.abs());
    let Some((mantissa, exp)) = sci.split_once('e') else { return f.to_string() };
    let Ok(exp) = exp.parse::<i32>() else { return f.to_string() };

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    let k = digits.len() as i32;
    // Position of the decimal point relative to the first digit.
    let n = exp + 1;

    let body = if (k..=21).contains(&n) {
        format!("{digits}{}", "0".repeat((n - k) as usize))
    } else if (1..=21).contains(&n) {
        let (int, frac) = digits.split_at(n as usize);
        format!("{int}.{frac}")
    } else if (-5..=0).contains(&n) {
        format!("0.{}{digits}", "0".repeat((-n) as usize))
    } else {
        let (first, rest) = digits.split_at(1);
        let exp_sign = if n - 1 < 0 { '-' } else { '+' };
        if rest.is_empty() {
            format!("{first}e{exp_sign}{}", (n - 1).abs())
        } else {
            format!("{first}.{rest}e{exp_sign}{}", (n - 1).abs())
        }
    };

    format!("{sign}{body}")
}

/// Body of a `/risk_assessment` reply.
///
/// A non-null `error` field makes the reply an [`AssessmentResponse::Rejected`]
/// even if the other fields are present too.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawAssessmentResponse")]
pub enum AssessmentResponse {
    Rejected { error: String },
    Assessed { risk_level: String, weather_data: WeatherData },
}

#[derive(Debug, Deserialize)]
struct RawAssessmentResponse {
    error: Option<String>,
    risk_level: Option<String>,
    weather_data: Option<WeatherData>,
}

impl TryFrom<RawAssessmentResponse> for AssessmentResponse {
    type Error = String;

    fn try_from(raw: RawAssessmentResponse) -> Result<Self, String> {
        if let Some(error) = raw.error {
            return Ok(AssessmentResponse::Rejected { error });
        }

        match (raw.risk_level, raw.weather_data) {
            (Some(risk_level), Some(weather_data)) => {
                Ok(AssessmentResponse::Assessed { risk_level, weather_data })
            }
            (None, _) => Err("response has neither `error` nor `risk_level`".to_string()),
            (Some(_), None) => Err("response is missing `weather_data`".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn coordinates_serialize_as_plain_strings() {
        let body = serde_json::to_value(Coordinates::new("51.5", "-0.12")).unwrap();
        assert_eq!(body, json!({ "latitude": "51.5", "longitude": "-0.12" }));
    }

    #[test]
    fn error_field_wins_over_assessment_fields() {
        let parsed: AssessmentResponse = serde_json::from_value(json!({
            "error": "No weather data found for the provided latitude and longitude",
            "risk_level": "Low",
            "weather_data": {}
        }))
        .unwrap();

        assert_eq!(
            parsed,
            AssessmentResponse::Rejected {
                error: "No weather data found for the provided latitude and longitude".into()
            }
        );
    }

    #[test]
    fn null_error_is_treated_as_absent() {
        let parsed: AssessmentResponse = serde_json::from_value(json!({
            "error": null,
            "risk_level": "High",
            "weather_data": { "rain": 7.5 }
        }))
        .unwrap();

        match parsed {
            AssessmentResponse::Assessed { risk_level, weather_data } => {
                assert_eq!(risk_level, "High");
                assert_eq!(weather_data.len(), 1);
            }
            other => panic!("expected assessment, got {other:?}"),
        }
    }

    #[test]
    fn missing_fields_fail_to_parse() {
        let err = serde_json::from_value::<AssessmentResponse>(json!({ "foo": 1 })).unwrap_err();
        assert!(err.to_string().contains("neither `error` nor `risk_level`"));

        let err = serde_json::from_value::<AssessmentResponse>(json!({ "risk_level": "Low" }))
            .unwrap_err();
        assert!(err.to_string().contains("missing `weather_data`"));
    }

    #[test]
    fn weather_data_keeps_response_order() {
        let data: WeatherData =
            serde_json::from_str(r#"{"wind_speed": 12, "temp_c": 5, "cloud_cover": 0.4}"#).unwrap();

        let names: Vec<_> = data.rows().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["wind speed", "temp c", "cloud cover"]);
    }

    #[test]
    fn rows_format_names_but_not_values() {
        let data: WeatherData = [
            ("wind_speed", json!(12)),
            ("temp_c", json!(5)),
            ("station_id", json!("EG_LL_01")),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            data.rows(),
            vec![
                WeatherRow::new("wind speed", "12"),
                WeatherRow::new("temp c", "5"),
                WeatherRow::new("station id", "EG_LL_01"),
            ]
        );
    }

    #[test]
    fn display_value_uses_shortest_number_form() {
        assert_eq!(display_value(&json!(12)), "12");
        assert_eq!(display_value(&json!(-3)), "-3");
        assert_eq!(display_value(&json!(12.0)), "12");
        assert_eq!(display_value(&json!(1013.25)), "1013.25");
        assert_eq!(display_value(&json!("gusty")), "gusty");
        assert_eq!(display_value(&json!(true)), "true");
    }

    #[test]
    fn null_value_shows_as_empty_cell() {
        assert_eq!(display_value(&Value::Null), "");
    }

    #[test]
    fn number_text_switches_to_exponent_at_the_edges() {
        assert_eq!(number_text(1e-7), "1e-7");
        assert_eq!(number_text(1.5e-7), "1.5e-7");
        assert_eq!(number_text(0.000001), "0.000001");
        assert_eq!(number_text(0.4), "0.4");
        assert_eq!(number_text(123.456), "123.456");
        assert_eq!(number_text(-0.5), "-0.5");
        assert_eq!(number_text(-0.0), "0");
        assert_eq!(number_text(1e20), "100000000000000000000");
        assert_eq!(number_text(1e21), "1e+21");
        assert_eq!(number_text(2.5e22), "2.5e+22");
        assert_eq!(display_value(&json!(1e21)), "1e+21");
    }
}
