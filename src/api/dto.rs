use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

/// One identified ingredient. Duplicate names within a result are legal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientInfo {
    pub name: String,
    #[serde(rename = "eNumber", default, skip_serializing_if = "Option::is_none")]
    pub e_number: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub category: String,
    #[serde(default, deserialize_with = "nullable")]
    pub purpose: String,
    #[serde(default, deserialize_with = "nullable")]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alternative_names: Option<Vec<String>>,
    #[serde(default, deserialize_with = "nullable")]
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub safety_note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub scan_id: String,
    #[serde(default, deserialize_with = "nullable")]
    pub ingredients: Vec<IngredientInfo>,
    #[serde(default, deserialize_with = "nullable")]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanSummary {
    pub scan_id: String,
    #[serde(with = "timestamp")]
    pub timestamp: OffsetDateTime,
    #[serde(default, deserialize_with = "nullable")]
    pub ingredient_names: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopIngredient {
    pub ingredient_name: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub uid: String,
    #[serde(default, deserialize_with = "nullable")]
    pub email: String,
    #[serde(default, deserialize_with = "nullable")]
    pub display_name: String,
    #[serde(default, deserialize_with = "nullable")]
    pub ingredient_counts: BTreeMap<String, u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scan_history: Option<Vec<ScanSummary>>,
}

/// Partial profile for `POST /user/profile`; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl ProfileUpdate {
    pub fn display_name(name: impl Into<String>) -> Self {
        Self {
            display_name: Some(name.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzeRequest<'a> {
    pub ingredients: &'a str,
}

/// Treats an explicit JSON `null` like a missing field.
pub(crate) fn nullable<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

/// Scan timestamps: RFC 3339, or an offset-less ISO-8601 local time read as UTC.
pub mod timestamp {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};
    use time::{
        format_description::well_known::{Iso8601, Rfc3339},
        OffsetDateTime, PrimitiveDateTime,
    };

    pub fn parse(raw: &str) -> Result<OffsetDateTime, time::error::Parse> {
        OffsetDateTime::parse(raw, &Rfc3339).or_else(|_| {
            PrimitiveDateTime::parse(raw, &Iso8601::DEFAULT).map(PrimitiveDateTime::assume_utc)
        })
    }

    pub fn serialize<S: Serializer>(ts: &OffsetDateTime, s: S) -> Result<S::Ok, S::Error> {
        let out = ts.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        s.serialize_str(&out)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<OffsetDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).map_err(|e| D::Error::custom(format!("invalid timestamp {:?}: {}", raw, e)))
    }
}
