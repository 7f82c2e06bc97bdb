use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A student as held by the remote store.
///
/// `id` is assigned by the store and is `None` only for candidates that
/// have not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub full_name: String,
    #[serde(default, with = "birth_date")]
    pub birth_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub school_category: String,
}

impl StudentRecord {
    pub fn new(
        full_name: impl Into<String>,
        birth_date: Option<NaiveDate>,
        school_category: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            full_name: full_name.into(),
            birth_date,
            school_category: school_category.into(),
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// Copy of this record without its identifier, as sent on create.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    pub fn id_display(&self) -> String {
        self.id.map(|id| id.to_string()).unwrap_or_default()
    }
}

/// Sort a freshly listed collection ascending by `id`.
///
/// The sort is stable, so records sharing an id keep the store's order.
pub fn sort_by_id(students: &mut [StudentRecord]) {
    students.sort_by_key(|s| s.id);
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Wire format for `birthDate`: `"YYYY-MM-DD"`, `""` or `null`.
/// Anything else reads as no date.
mod birth_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};
    use tracing::warn;

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match date {
            Some(d) => serializer.serialize_str(&d.format(FORMAT).to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        let raw = match raw.as_deref().map(str::trim) {
            None | Some("") => return Ok(None),
            Some(s) => s,
        };
        // Datetime strings ("2000-01-01T00:00:00") carry the date in the first 10 chars
        let date_part = raw.get(..10).unwrap_or(raw);
        match NaiveDate::parse_from_str(date_part, FORMAT) {
            Ok(date) => Ok(Some(date)),
            Err(e) => {
                // Degrade this record only; the rest of the list still loads
                warn!(birth_date = raw, error = %e, "Unreadable birthDate, showing it as empty");
                Ok(None)
            }
        }
    }
}
