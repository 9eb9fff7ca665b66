use crate::core::types::DocId;

/// Posting list for a term
/// Note: kept in insertion order, not sorted; a document appears once per indexing call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostingList {
    pub doc_ids: Vec<DocId>,
}

impl PostingList {
    pub fn new() -> Self {
        PostingList {
            doc_ids: Vec::new(),
        }
    }

    /// Appends `doc_id` unless it is already the tail entry. A single
    /// indexing call holds the write lock, so repeats of a term inside one
    /// document always land back to back.
    pub fn add(&mut self, doc_id: &DocId) {
        if self.doc_ids.last() != Some(doc_id) {
            self.doc_ids.push(doc_id.clone());
        }
    }

    pub fn remove(&mut self, doc_id: &DocId) {
        self.doc_ids.retain(|id| id != doc_id);
    }

    pub fn iter(&self) -> impl Iterator<Item = &DocId> {
        self.doc_ids.iter()
    }

    pub fn len(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.doc_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_tail_is_collapsed() {
        let mut list = PostingList::new();
        list.add(&DocId::from("a"));
        list.add(&DocId::from("a"));
        list.add(&DocId::from("b"));
        list.add(&DocId::from("a"));
        assert_eq!(list.doc_ids, vec![DocId::from("a"), DocId::from("b"), DocId::from("a")]);

        list.remove(&DocId::from("a"));
        assert_eq!(list.doc_ids, vec![DocId::from("b")]);
    }
}
