//! Collection of uploaded document metadata, keyed by document id.

use std::collections::HashMap;

use crate::types::DocumentMetadata;

/// Uploaded documents in first-seen order, de-duplicated by id.
///
/// Merging an entry whose id is already present replaces it in place, so a
/// re-upload updates metadata without moving the document in the list.
#[derive(Debug, Clone, Default)]
pub struct DocumentCollection {
    docs: Vec<DocumentMetadata>,
    index: HashMap<String, usize>,
}

impl DocumentCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one document, overwriting any entry with the same id.
    /// Returns `true` if the id was new.
    pub fn upsert(&mut self, doc: DocumentMetadata) -> bool {
        match self.index.get(&doc.document_id) {
            Some(&pos) => {
                self.docs[pos] = doc;
                false
            }
            None => {
                self.index.insert(doc.document_id.clone(), self.docs.len());
                self.docs.push(doc);
                true
            }
        }
    }

    /// Merge a batch of documents. Returns how many ids were new.
    pub fn merge<I>(&mut self, docs: I) -> usize
    where
        I: IntoIterator<Item = DocumentMetadata>,
    {
        let mut added = 0;
        for doc in docs {
            if self.upsert(doc) {
                added += 1;
            }
        }
        added
    }

    pub fn get(&self, document_id: &str) -> Option<&DocumentMetadata> {
        self.index.get(document_id).map(|&pos| &self.docs[pos])
    }

    pub fn contains(&self, document_id: &str) -> bool {
        self.index.contains_key(document_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocumentMetadata> {
        self.docs.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.docs.iter().map(|d| d.document_id.as_str())
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }

    pub fn clear(&mut self) {
        self.docs.clear();
        self.index.clear();
    }
}
