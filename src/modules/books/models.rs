use serde::{Deserialize, Serialize};

/// A stored book as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    /// Store-assigned identifier, never changed after creation
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
}

impl Book {
    /// Build a stored book from a creation payload and its assigned id.
    pub fn from_new(id: String, book: NewBook) -> Self {
        Self {
            id,
            title: book.title,
            author: book.author,
            genre: book.genre,
            published_year: book.published_year,
        }
    }

    /// Overwrite the fields carried by `patch`, leaving the others untouched.
    pub fn apply(&mut self, patch: BookPatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(author) = patch.author {
            self.author = author;
        }
        if let Some(genre) = patch.genre {
            self.genre = Some(genre);
        }
        if let Some(published_year) = patch.published_year {
            self.published_year = Some(published_year);
        }
    }
}

/// Request body for creating a book. Unknown fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
}

/// Partial update. Only the fields present are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_year: Option<i64>,
}

/// Body returned by a successful delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dune() -> Book {
        Book::from_new(
            "b1".to_string(),
            NewBook {
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                genre: Some("SciFi".to_string()),
                published_year: Some(1965),
            },
        )
    }

    #[test]
    fn book_serializes_camel_case() {
        let value = serde_json::to_value(dune()).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "b1",
                "title": "Dune",
                "author": "Herbert",
                "genre": "SciFi",
                "publishedYear": 1965
            })
        );
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let book: NewBook = serde_json::from_value(json!({
            "title": "Emma",
            "author": "Austen",
            "isbn": "978-0141439587"
        }))
        .unwrap();

        let value = serde_json::to_value(&book).unwrap();
        assert_eq!(value, json!({ "title": "Emma", "author": "Austen" }));
    }

    #[test]
    fn patch_only_touches_present_fields() {
        let mut book = dune();
        book.apply(BookPatch {
            genre: Some("Classic".to_string()),
            ..BookPatch::default()
        });

        assert_eq!(book.genre.as_deref(), Some("Classic"));
        assert_eq!(book.title, "Dune");
        assert_eq!(book.published_year, Some(1965));
    }

    #[test]
    fn empty_patch_serializes_to_empty_object() {
        assert_eq!(serde_json::to_value(BookPatch::default()).unwrap(), json!({}));
    }
}
