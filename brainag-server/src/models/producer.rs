//! Rural producers

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::validation::{non_blank, optional_text, required_text};
use super::document::strip_mask;
use super::{Columns, Criteria, DocType, Document, ValidationError, Value};

/// Producer record
#[derive(Debug, Clone, PartialEq)]
pub struct Producer {
    pub id: Uuid,
    pub name: String,
    pub document: String,
    pub doc_type: DocType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Columns for Producer {
    fn column(&self, name: &str) -> Option<Value> {
        match name {
            "id" => Some(self.id.into()),
            "name" => Some(self.name.as_str().into()),
            "document" => Some(self.document.as_str().into()),
            "doc_type" => Some(self.doc_type.as_str().into()),
            "created_at" => Some(self.created_at.into()),
            "updated_at" => Some(self.updated_at.into()),
            _ => None,
        }
    }
}

/// Validated input for a new producer
#[derive(Debug, Clone, PartialEq)]
pub struct NewProducer {
    pub name: String,
    pub document: Document,
}

impl NewProducer {
    pub fn new(name: &str, doc_type: DocType, document: &str) -> Result<Self, ValidationError> {
        Ok(Self {
            name: required_text("name", name)?,
            document: Document::new(doc_type, document)?,
        })
    }
}

/// Partial update; `None` leaves the column untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProducerChanges {
    pub name: Option<String>,
    pub document: Option<Document>,
}

impl ProducerChanges {
    /// `document` and `doc_type` travel together: both or neither.
    pub fn new(
        name: Option<&str>,
        doc_type: Option<DocType>,
        document: Option<&str>,
    ) -> Result<Self, ValidationError> {
        let document = match (doc_type, document) {
            (Some(kind), Some(raw)) => Some(Document::new(kind, raw)?),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ValidationError::Unpaired {
                    field: "docType",
                    requires: "document",
                })
            }
            (None, Some(_)) => {
                return Err(ValidationError::Unpaired {
                    field: "document",
                    requires: "docType",
                })
            }
        };

        Ok(Self {
            name: optional_text("name", name)?,
            document,
        })
    }
}

/// List filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProducerFilter {
    /// Case-insensitive substring
    pub name: Option<String>,
    /// Substring of the stored digits; mask characters are dropped
    pub document: Option<String>,
    pub doc_type: Option<DocType>,
    pub created_from: Option<DateTime<Utc>>,
    pub created_to: Option<DateTime<Utc>>,
}

impl ProducerFilter {
    pub fn new(
        name: Option<&str>,
        document: Option<&str>,
        doc_type: Option<DocType>,
        created_from: Option<DateTime<Utc>>,
        created_to: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            name: non_blank(name),
            document: document.map(strip_mask).filter(|d| !d.is_empty()),
            doc_type,
            created_from,
            created_to,
        }
    }

    pub fn criteria(&self) -> Criteria {
        Criteria::new()
            .contains_ignore_case_opt("name", self.name.as_deref())
            .contains_opt("document", self.document.as_deref())
            .equals_opt("doc_type", self.doc_type.map(|d| d.as_str()))
            .at_least_opt("created_at", self.created_from)
            .at_most_opt("created_at", self.created_to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CPF: &str = "52998224725";

    #[test]
    fn new_producer_validates() {
        let p = NewProducer::new(" João da Silva ", DocType::Cpf, CPF).unwrap();
        assert_eq!(p.name, "João da Silva");
        assert_eq!(p.document.as_str(), CPF);

        assert!(NewProducer::new("", DocType::Cpf, CPF).is_err());
        assert!(NewProducer::new("João", DocType::Cnpj, CPF).is_err());
    }

    #[test]
    fn changes_require_document_pair() {
        assert!(matches!(
            ProducerChanges::new(None, Some(DocType::Cpf), None),
            Err(ValidationError::Unpaired { .. })
        ));
        assert!(matches!(
            ProducerChanges::new(None, None, Some(CPF)),
            Err(ValidationError::Unpaired { .. })
        ));

        let changes = ProducerChanges::new(Some("Maria"), None, None).unwrap();
        assert_eq!(changes.name.as_deref(), Some("Maria"));
        assert!(changes.document.is_none());

        let changes = ProducerChanges::new(None, Some(DocType::Cpf), Some(CPF)).unwrap();
        assert_eq!(changes.document.unwrap().doc_type(), DocType::Cpf);
    }

    #[test]
    fn filter_matches_case_insensitive_name() {
        let now = Utc::now();
        let producer = Producer {
            id: Uuid::new_v4(),
            name: "AgroTech LTDA".into(),
            document: "11222333000181".into(),
            doc_type: DocType::Cnpj,
            created_at: now,
            updated_at: now,
        };

        let filter = ProducerFilter::new(Some("agrotech"), None, Some(DocType::Cnpj), None, None);
        assert!(filter.criteria().matches(&producer));

        let filter = ProducerFilter::new(None, Some("2223"), None, None, None);
        assert!(filter.criteria().matches(&producer));

        let filter = ProducerFilter::new(None, Some("11.222.333/0001"), None, None, None);
        assert_eq!(filter.document.as_deref(), Some("112223330001"));
        assert!(filter.criteria().matches(&producer));

        let filter = ProducerFilter::new(None, Some(" ./- "), None, None, None);
        assert!(filter.criteria().is_empty());

        let filter = ProducerFilter::new(None, None, Some(DocType::Cpf), None, None);
        assert!(!filter.criteria().matches(&producer));

        let filter = ProducerFilter::new(None, None, None, Some(now), Some(now));
        assert!(filter.criteria().matches(&producer));
    }
}
