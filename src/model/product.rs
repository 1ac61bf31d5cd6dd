use crate::store::{Document, ID_FIELD};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a product in the catalog.
///
/// The `id` is assigned by the store on creation and is empty until then.
/// `number` is a business key and is not guaranteed to be unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub number: String,
    pub description: String,
}

impl Product {
    /// Creates a new Product instance.
    ///
    /// # Arguments
    /// * `id` - Store-assigned identifier (empty for a product not yet persisted)
    /// * `number` - Product number
    /// * `description` - Free-text description
    pub fn new(id: impl Into<String>, number: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            number: number.into(),
            description: description.into(),
        }
    }

    /// Builds a transient (unsaved) product from a payload.
    pub fn from_payload(payload: &ProductPayload) -> Self {
        Self::new("", payload.number.clone(), payload.description.clone())
    }

    /// Reads a product out of a stored document.
    ///
    /// Missing or non-string fields come back empty rather than failing, so a
    /// partially written document is still listed.
    pub fn from_document(document: &Document) -> Self {
        let text = |key: &str| {
            document
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        Self {
            id: text(ID_FIELD),
            number: text("number"),
            description: text("description"),
        }
    }
}

/// The fields carried by `ADD` and `UPDATE` commands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductPayload {
    pub number: String,
    pub description: String,
}

impl ProductPayload {
    /// Converts the payload into the document fields it sets.
    pub fn into_document(self) -> Document {
        let mut document = Document::new();
        document.insert("number".to_string(), Value::String(self.number));
        document.insert("description".to_string(), Value::String(self.description));
        document
    }
}

/// Errors raised while validating inbound product input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Field '{0}' is required")]
    MissingField(&'static str),
}

/// Product fields as they arrive in an HTTP request body.
///
/// Both fields are optional here so that a missing field is reported as a
/// validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductInput {
    pub number: Option<String>,
    pub description: Option<String>,
}

impl ProductInput {
    /// Checks that both fields are present and not blank.
    pub fn validate(self) -> Result<ProductPayload, ValidationError> {
        let number = required(self.number, "number")?;
        let description = required(self.description, "description")?;
        Ok(ProductPayload {
            number,
            description,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ValidationError> {
    match value {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ValidationError::MissingField(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_accepts_complete_input() {
        let input = ProductInput {
            number: Some("432".into()),
            description: Some("Item 2".into()),
        };
        let payload = input.validate().unwrap();
        assert_eq!(payload.number, "432");
        assert_eq!(payload.description, "Item 2");
    }

    #[test]
    fn test_validate_rejects_missing_and_blank_fields() {
        let missing = ProductInput {
            number: None,
            description: Some("Item".into()),
        };
        assert_eq!(
            missing.validate().unwrap_err(),
            ValidationError::MissingField("number")
        );

        let blank = ProductInput {
            number: Some("1".into()),
            description: Some("   ".into()),
        };
        assert_eq!(
            blank.validate().unwrap_err(),
            ValidationError::MissingField("description")
        );
    }

    #[test]
    fn test_from_document_reads_store_identifier() {
        let document = json!({ "_id": "abc", "number": "7", "description": "Seven" });
        let product = Product::from_document(document.as_object().unwrap());
        assert_eq!(product, Product::new("abc", "7", "Seven"));
    }

    #[test]
    fn test_product_serializes_with_plain_id_key() {
        let product = Product::new("34241123", "432", "Item 2");
        assert_eq!(
            serde_json::to_value(&product).unwrap(),
            json!({ "id": "34241123", "number": "432", "description": "Item 2" })
        );
    }
}
