use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Member identifier; the data file uses numbers, other feeds use strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl RecordId {
    pub fn matches(&self, raw: &str) -> bool {
        let raw = raw.trim();
        match self {
            Self::Number(n) => raw.parse::<i64>().is_ok_and(|v| v == *n),
            Self::Text(s) => s.eq_ignore_ascii_case(raw),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// Membership level. Values outside the known set are kept, lowercased, so they
/// can still be filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Tier {
    Gold,
    Silver,
    Bronze,
    Nonprofit,
    Unknown(String),
}

impl Tier {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "gold" => Self::Gold,
            "silver" => Self::Silver,
            "bronze" => Self::Bronze,
            "nonprofit" | "non-profit" | "np" => Self::Nonprofit,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Gold => "gold",
            Self::Silver => "silver",
            Self::Bronze => "bronze",
            Self::Nonprofit => "nonprofit",
            Self::Unknown(raw) => raw,
        }
    }
}

impl Default for Tier {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl From<String> for Tier {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Tier> for String {
    fn from(tier: Tier) -> Self {
        tier.as_str().to_string()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One directory entry.
///
/// `name` and `category` are required by the data format. The presentation
/// fields are optional and blank strings are read as absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    pub id: RecordId,
    pub name: String,
    pub category: String,
    #[serde(rename = "membershipLevel", alias = "tier", default)]
    pub tier: Tier,
    #[serde(default)]
    pub description: String,
    /// Year used for newest/oldest ordering.
    #[serde(rename = "yearEstablished", alias = "joinYear", alias = "joined", default)]
    pub established: Option<i32>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub phone: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub website: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub image: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty()))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub member_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_directory_member() {
        let json = r#"{
            "id": 7,
            "name": "Cactus Creative Agency",
            "category": "Marketing",
            "membershipLevel": "gold",
            "description": "Full-service marketing.",
            "yearEstablished": 2011,
            "address": "  ",
            "phone": "(480) 555-0107",
            "website": "https://cactus.example"
        }"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Number(7));
        assert_eq!(record.tier, Tier::Gold);
        assert_eq!(record.established, Some(2011));
        assert_eq!(record.address, None);
        assert_eq!(record.image, None);
        assert_eq!(record.phone.as_deref(), Some("(480) 555-0107"));
    }

    #[test]
    fn accepts_alternate_field_names() {
        let json = r#"{"id": "m-1", "name": "A", "category": "Retail", "tier": "NP", "joinYear": 2019}"#;
        let record: Record = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, RecordId::Text("m-1".to_string()));
        assert_eq!(record.tier, Tier::Nonprofit);
        assert_eq!(record.established, Some(2019));
        assert_eq!(record.description, "");
    }

    #[test]
    fn missing_name_is_rejected() {
        let json = r#"{"id": 1, "category": "Retail"}"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn unknown_tier_is_preserved_lowercased() {
        assert_eq!(Tier::parse(" Platinum "), Tier::Unknown("platinum".to_string()));
        assert_eq!(Tier::parse("Platinum").as_str(), "platinum");
        assert_eq!(Tier::parse("SILVER"), Tier::Silver);
    }

    #[test]
    fn record_id_matching() {
        assert!(RecordId::Number(14).matches(" 14 "));
        assert!(!RecordId::Number(14).matches("14a"));
        assert!(RecordId::Text("Abc".to_string()).matches("abc"));
    }
}
