//! # Book Data Model
//!
//! Typed view of a book configuration file:
//!
//! ```yaml
//! name: Intro to Rust
//! sortOrder: 1
//! variables:
//!   release: "1.0"
//! chapters:            # or `modules`
//!   - name: Basics
//!     pages:           # or `lessons`
//!       - name: Hello
//!         shortName: hello
//!         file: basics/hello.md
//!         required: true
//! ```
//!
//! The typed models deserialize a document that already passed schema
//! validation. The uniqueness checks do not go through them; they walk the
//! untyped tree so that documents with schema errors are still checked.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// File name suffix of a book configuration file.
pub const BOOK_CONFIG_SUFFIX: &str = ".book.yml";

/// Root-level keys whose values must be unique across all books.
pub const UNIQUE_ACROSS_FILES_KEYS: [&str; 2] = ["name", "sortOrder"];

/// Page key whose values must be unique within one book.
pub const UNIQUE_WITHIN_FILE_KEY: &str = "shortName";

/// Variable holding the release name.
pub const RELEASE_VARIABLE: &str = "release";

/// Variable holding the release date.
pub const RELEASE_DATE_VARIABLE: &str = "release_date";

/// A scalar variable value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum VariableValue {
    /// An integer.
    Integer(i64),
    /// A non-integer number.
    Float(f64),
    /// A string.
    Text(String),
}

/// Variables available for interpolation, keyed by name.
pub type Variables = BTreeMap<String, VariableValue>;

/// One page (or lesson) of a chapter.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageConfig {
    /// The name of the lesson.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short name used in reports; unique within a book.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_name: Option<String>,
    /// Page-level variables.
    #[serde(default, skip_serializing_if = "Variables::is_empty")]
    pub variables: Variables,
    /// Markdown file location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// Whether the page must be completed to continue.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    /// Keys not covered by the schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One chapter (or module) of a book.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterConfig {
    /// Name of the chapter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Chapter-level variables.
    #[serde(default, skip_serializing_if = "Variables::is_empty")]
    pub variables: Variables,
    /// Pages, when the chapter uses the `pages` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pages: Option<Vec<PageConfig>>,
    /// Pages, when the chapter uses the `lessons` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lessons: Option<Vec<PageConfig>>,
    /// Keys not covered by the schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ChapterConfig {
    /// The chapter's pages, whichever key holds them.
    pub fn pages(&self) -> &[PageConfig] {
        self.pages
            .as_deref()
            .or(self.lessons.as_deref())
            .unwrap_or_default()
    }
}

/// A book configuration, one per `.book.yml` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookConfig {
    /// The book's name; unique across all books.
    pub name: String,
    /// The book's description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Sort order in UI menus; unique across all books.
    pub sort_order: i64,
    /// Book-level variables.
    #[serde(default, skip_serializing_if = "Variables::is_empty")]
    pub variables: Variables,
    /// Chapters, when the book uses the `chapters` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapters: Option<Vec<ChapterConfig>>,
    /// Chapters, when the book uses the `modules` key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<Vec<ChapterConfig>>,
    /// Keys not covered by the schema.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl BookConfig {
    /// The book's chapters, whichever key holds them.
    pub fn chapters(&self) -> &[ChapterConfig] {
        self.chapters
            .as_deref()
            .or(self.modules.as_deref())
            .unwrap_or_default()
    }

    /// Total number of pages across all chapters.
    pub fn page_count(&self) -> usize {
        self.chapters().iter().map(|c| c.pages().len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn deserializes_chapters_and_pages() {
        let book: BookConfig = serde_json::from_value(json!({
            "name": "Intro",
            "sortOrder": 1,
            "variables": {"release": "1.0", "seats": 30},
            "chapters": [
                {"name": "One", "pages": [{"shortName": "a"}, {"shortName": "b"}]},
                {"lessons": [{"shortName": "c", "required": true}]}
            ]
        }))
        .unwrap();
        assert_eq!(book.chapters().len(), 2);
        assert_eq!(book.page_count(), 3);
        assert_eq!(book.chapters()[1].pages()[0].required, Some(true));
        assert_eq!(book.variables[RELEASE_VARIABLE], VariableValue::Text("1.0".into()));
        assert_eq!(book.variables["seats"], VariableValue::Integer(30));
    }

    #[test]
    fn modules_alias_chapters() {
        let book: BookConfig = serde_json::from_value(json!({
            "name": "Intro",
            "sortOrder": 2,
            "modules": [{"pages": [{"shortName": "a"}]}]
        }))
        .unwrap();
        assert_eq!(book.chapters().len(), 1);
        assert_eq!(book.page_count(), 1);
    }

    #[test]
    fn stub_book_has_no_chapters() {
        let book: BookConfig =
            serde_json::from_value(json!({"name": "Stub", "sortOrder": 3})).unwrap();
        assert!(book.chapters().is_empty());
        assert!(book.variables.is_empty());
    }

    #[test]
    fn keeps_unknown_keys() {
        let book: BookConfig = serde_json::from_value(json!({
            "name": "Intro",
            "sortOrder": 1,
            "theme": "dark"
        }))
        .unwrap();
        assert_eq!(book.extra["theme"], "dark");
    }
}
