//! Mock data builders for creating test sheets without a store.

use nyimbo::types::{Category, SheetId, SheetRecord};
use serde_json::{Value, json};

/// Builder for creating test sheets
pub struct SheetBuilder {
    record: SheetRecord,
}

impl SheetBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            record: SheetRecord {
                id: SheetId::new(id),
                ..Default::default()
            },
        }
    }

    pub fn title(mut self, title: &str) -> Self {
        self.record.title = Some(title.to_string());
        self
    }

    pub fn composer(mut self, composer: &str) -> Self {
        self.record.composer = Some(composer.to_string());
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.record.category = Some(category);
        self
    }

    pub fn uploaded_by(mut self, user: &str) -> Self {
        self.record.uploaded_by = Some(user.to_string());
        self
    }

    pub fn uploaded_at(mut self, timestamp: &str) -> Self {
        self.record.uploaded_at = Some(timestamp.parse().expect("test timestamp should be valid"));
        self
    }

    pub fn build(self) -> SheetRecord {
        self.record
    }
}

/// Create a sheet with a title and composer
pub fn mock_sheet(id: &str, title: &str, composer: &str) -> SheetRecord {
    SheetBuilder::new(id).title(title).composer(composer).build()
}

/// The three-sheet corpus used throughout the search scenarios
pub fn scenario_corpus() -> Vec<SheetRecord> {
    vec![
        mock_sheet("1", "Amen", "X"),
        mock_sheet("2", "Banana", "Y"),
        mock_sheet("3", "Apple", "Z"),
    ]
}

/// A catalog file as another client might have written it: mixed timestamp
/// shapes, a missing composer, an untitled document and one that is not a
/// sheet at all.
pub fn mixed_catalog_documents() -> Value {
    json!([
        {
            "id": "wamukiri-1",
            "title": "Wamukiri wa Mwathani",
            "composer": "Kariuki",
            "category": "Wamukiri (communion)",
            "uploadedBy": "wanjiru",
            "uploadedAt": "2024-05-12T08:30:00Z"
        },
        {
            "id": "amen-1",
            "title": "Amen Alleluia",
            "composer": "Njoroge",
            "category": "Kuingira(entrance)",
            "uploadedBy": "kamau",
            "uploadedAt": {"seconds": 1700000000, "nanoseconds": 0}
        },
        {
            "id": "ngai-1",
            "title": "Ngai Mwega",
            "uploadedBy": "kamau"
        },
        {
            "id": "untitled-1",
            "composer": "Gitau"
        },
        {
            "title": "Missing id"
        }
    ])
}
