use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

/// Closed category vocabulary. Values outside this set never reach storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Electricity,
    Canteen,
    Furniture,
    Campus,
}

pub const VOCABULARY: &[Tag] = &[Tag::Electricity, Tag::Canteen, Tag::Furniture, Tag::Campus];

impl Tag {
    pub fn parse(s: &str) -> Option<Tag> {
        match s {
            "electricity" => Some(Tag::Electricity),
            "canteen" => Some(Tag::Canteen),
            "furniture" => Some(Tag::Furniture),
            "campus" => Some(Tag::Campus),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Electricity => "electricity",
            Tag::Canteen => "canteen",
            Tag::Furniture => "furniture",
            Tag::Campus => "campus",
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
#[error("tags must be a list of strings")]
pub struct InvalidFormat;

/// Filter candidate tags down to the vocabulary.
///
/// Accepts either a native JSON array of strings or a string holding a
/// JSON-encoded array (multipart form fields arrive as text). Unknown tags are
/// dropped silently; an unparseable payload is an error. Order is preserved
/// and duplicates collapse to the first occurrence.
pub fn validate(raw: &Value) -> Result<Vec<Tag>, InvalidFormat> {
    let names: Vec<String> = match raw {
        Value::String(s) => serde_json::from_str(s).map_err(|_| InvalidFormat)?,
        Value::Array(items) => items
            .iter()
            .map(|v| v.as_str().map(str::to_owned).ok_or(InvalidFormat))
            .collect::<Result<_, _>>()?,
        Value::Null => Vec::new(),
        _ => return Err(InvalidFormat),
    };
    let mut out = Vec::new();
    for name in &names {
        if let Some(tag) = Tag::parse(name) {
            if !out.contains(&tag) {
                out.push(tag);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn keeps_known_drops_unknown() {
        let got = validate(&json!(["electricity", "bogus", "canteen"])).unwrap();
        assert_eq!(got, vec![Tag::Electricity, Tag::Canteen]);
    }

    #[test]
    fn idempotent_on_valid_sets() {
        let once = validate(&json!(["furniture", "campus"])).unwrap();
        let names: Vec<Value> = once.iter().map(|t| json!(t.as_str())).collect();
        let twice = validate(&Value::Array(names)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn accepts_string_encoded_lists() {
        let got = validate(&json!("[\"canteen\",\"nope\"]")).unwrap();
        assert_eq!(got, vec![Tag::Canteen]);
    }

    #[test]
    fn rejects_unparseable_payloads() {
        assert_eq!(validate(&json!("not json")), Err(InvalidFormat));
        assert_eq!(validate(&json!(42)), Err(InvalidFormat));
        assert_eq!(validate(&json!([1, 2])), Err(InvalidFormat));
    }

    #[test]
    fn null_and_empty_mean_no_tags() {
        assert_eq!(validate(&Value::Null).unwrap(), vec![]);
        assert_eq!(validate(&json!([])).unwrap(), vec![]);
    }

    #[test]
    fn duplicates_collapse() {
        let got = validate(&json!(["campus", "campus", "electricity"])).unwrap();
        assert_eq!(got, vec![Tag::Campus, Tag::Electricity]);
    }
}
