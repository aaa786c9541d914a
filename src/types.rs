use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::NyimboError;

pub const NYIMBO_DIR: &str = ".nyimbo";

/// Name of the document collection holding sheet records.
pub const SHEETS_COLLECTION: &str = "music_sheets";

/// Name of the document collection holding per-user profile documents.
pub const USERS_COLLECTION: &str = "users";

/// Object key prefix for profile pictures.
pub const PROFILE_PICS_PREFIX: &str = "profile_pics";

/// Opaque document identifier assigned by the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SheetId(String);

impl SheetId {
    pub fn new(id: impl Into<String>) -> Self {
        SheetId(id.into())
    }

    /// Generate a fresh identifier for a document being added.
    pub fn generate() -> Self {
        SheetId(uuid::Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SheetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SheetId {
    fn from(s: &str) -> Self {
        SheetId(s.to_string())
    }
}

/// Liturgical category a sheet is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Entrance,
    Mass,
    Readings,
    Psalms,
    Offertory,
    Communion,
    Thanksgiving,
    Exit,
    Marian,
    Ordination,
    SetPieces,
    Adoration,
}

impl Category {
    pub const ALL: [Category; 12] = [
        Category::Entrance,
        Category::Mass,
        Category::Readings,
        Category::Psalms,
        Category::Offertory,
        Category::Communion,
        Category::Thanksgiving,
        Category::Exit,
        Category::Marian,
        Category::Ordination,
        Category::SetPieces,
        Category::Adoration,
    ];

    /// Label stored in documents and shown to users.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Entrance => "Kuingira (entrance)",
            Category::Mass => "Mass (MITHA)",
            Category::Readings => "Mathomo (readings)",
            Category::Psalms => "Thaburi (Psalms)",
            Category::Offertory => "Matega (sadaka)",
            Category::Communion => "Wamukiri (communion)",
            Category::Thanksgiving => "Gucokia ngatho (thanksgiving)",
            Category::Exit => "Kurikia Mitha (EXIT SONG)",
            Category::Marian => "Nyimbo cia maria (marian songs)",
            Category::Ordination => "Ngunurano (ordination songs)",
            Category::SetPieces => "Nyimboo cia macindano (Set pieces)",
            Category::Adoration => "Itiia (Eucharist Adoration songs)",
        }
    }

    /// The Kikuyu name, lowercased, without the parenthesised gloss.
    pub fn keyword(&self) -> &'static str {
        match self {
            Category::Entrance => "kuingira",
            Category::Mass => "mass",
            Category::Readings => "mathomo",
            Category::Psalms => "thaburi",
            Category::Offertory => "matega",
            Category::Communion => "wamukiri",
            Category::Thanksgiving => "gucokia ngatho",
            Category::Exit => "kurikia mitha",
            Category::Marian => "nyimbo cia maria",
            Category::Ordination => "ngunurano",
            Category::SetPieces => "nyimboo cia macindano",
            Category::Adoration => "itiia",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = NyimboError;

    /// Accepts the full label in any spelling variant that keeps the Kikuyu
    /// name in front (`Kuingira(entrance)`, `MATHOMo (readings)`), the bare
    /// keyword, or the keyword's first word.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.split('(').next().unwrap_or("").trim().to_lowercase();
        if key.is_empty() {
            return Err(NyimboError::InvalidCategory(s.to_string()));
        }

        Category::ALL
            .iter()
            .copied()
            .find(|c| {
                let keyword = c.keyword();
                keyword == key || keyword.split_whitespace().next() == Some(key.as_str())
            })
            .ok_or_else(|| NyimboError::InvalidCategory(s.to_string()))
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A music sheet document as stored in the catalog.
///
/// Every field other than `id` is optional: documents are written by more
/// than one client and a malformed field must not prevent the rest of the
/// catalog from loading. Values of the wrong shape deserialize as `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetRecord {
    pub id: SheetId,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub title: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub composer: Option<String>,

    /// Lyrics or notes
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_category",
        skip_serializing_if = "Option::is_none"
    )]
    pub category: Option<Category>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_url: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub file_name: Option<String>,

    /// User id of the uploader; the only user allowed to edit or delete
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_by: Option<String>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub uploaded_at: Option<Timestamp>,

    #[serde(
        default,
        deserialize_with = "lenient_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<Timestamp>,
}

impl SheetRecord {
    /// Title, or the empty string when the document has none.
    pub fn title_str(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    /// Composer, or the empty string when the document has none.
    pub fn composer_str(&self) -> &str {
        self.composer.as_deref().unwrap_or("")
    }

    /// Route of the detail view for this sheet.
    pub fn detail_path(&self) -> String {
        format!("/Sheetpreview/{}", self.id)
    }

    pub fn is_owned_by(&self, user: &str) -> bool {
        self.uploaded_by.as_deref() == Some(user)
    }
}

/// Fields of a sheet about to be added; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSheet {
    pub title: String,
    pub composer: String,
    #[serde(default)]
    pub description: String,
    pub category: Category,
    pub file_url: String,
    pub file_name: String,
    pub uploaded_by: String,
    pub uploaded_at: Timestamp,
}

impl NewSheet {
    pub fn into_record(self, id: SheetId) -> SheetRecord {
        SheetRecord {
            id,
            title: Some(self.title),
            composer: Some(self.composer),
            description: Some(self.description),
            category: Some(self.category),
            file_url: Some(self.file_url),
            file_name: Some(self.file_name),
            uploaded_by: Some(self.uploaded_by),
            uploaded_at: Some(self.uploaded_at),
            updated_at: None,
        }
    }
}

/// Partial update of a sheet. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub composer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl SheetPatch {
    pub fn apply(&self, record: &mut SheetRecord) {
        if let Some(title) = &self.title {
            record.title = Some(title.clone());
        }
        if let Some(composer) = &self.composer {
            record.composer = Some(composer.clone());
        }
        if let Some(description) = &self.description {
            record.description = Some(description.clone());
        }
        if let Some(category) = self.category {
            record.category = Some(category);
        }
        if let Some(file_url) = &self.file_url {
            record.file_url = Some(file_url.clone());
        }
        if let Some(file_name) = &self.file_name {
            record.file_name = Some(file_name.clone());
        }
        if let Some(updated_at) = self.updated_at {
            record.updated_at = Some(updated_at);
        }
    }
}

/// Profile document of one user, keyed by user id.
///
/// Written with merge semantics: only fields that are set are sent to the
/// store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(
        default,
        deserialize_with = "lenient_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_pic_url: Option<String>,
}

fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

fn lenient_category<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Category>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    })
}

fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Timestamp>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(timestamp_from_value))
}

/// Interpret a stored timestamp value.
///
/// Accepts RFC 3339 strings and the `{seconds, nanoseconds}` object shape
/// (with or without leading underscores) that document stores emit for
/// native timestamps. Anything else is treated as absent.
pub fn timestamp_from_value(value: &Value) -> Option<Timestamp> {
    match value {
        Value::String(s) => s.parse::<Timestamp>().ok(),
        Value::Object(map) => {
            let seconds = map
                .get("seconds")
                .or_else(|| map.get("_seconds"))
                .and_then(Value::as_i64)?;
            let nanos = map
                .get("nanoseconds")
                .or_else(|| map.get("_nanoseconds"))
                .and_then(Value::as_i64)
                .unwrap_or(0);
            Timestamp::new(seconds, i32::try_from(nanos).ok()?).ok()
        }
        _ => None,
    }
}
