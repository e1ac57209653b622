use lopdf::{Document, Object, ObjectId};

use crate::Result;
use crate::sanitize::{INHERITABLE, inherited};

/// Accumulates documents into one page tree, in append order.
///
/// The first document becomes the base; later ones are renumbered past
/// the base's highest object id and their pages are attached to the
/// base's root `Pages` node.
#[derive(Debug, Default)]
pub struct PdfMerger {
    merged: Option<Document>,
    documents: usize,
    pages: usize,
}

impl PdfMerger {
    /// Create an empty merger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append all pages of `doc`. Returns the number of pages added.
    ///
    /// # Errors
    ///
    /// Returns an error if the base document has no usable page tree.
    pub fn append(&mut self, mut doc: Document) -> Result<usize> {
        let Some(merged) = self.merged.as_mut() else {
            let page_count = doc.get_pages().len();
            self.merged = Some(doc);
            self.documents = 1;
            self.pages = page_count;
            return Ok(page_count);
        };

        // Avoid object id collisions by renumbering the incoming document
        doc.renumber_objects_with(merged.max_id + 1);
        merged.max_id = doc.max_id;

        let page_ids: Vec<ObjectId> = doc.get_pages().into_values().collect();
        inline_inherited_attributes(&mut doc, &page_ids);

        merged.objects.extend(doc.objects);
        Self::append_pages_to_page_tree(merged, &page_ids)?;

        self.documents += 1;
        self.pages += page_ids.len();
        Ok(page_ids.len())
    }

    /// Total pages appended so far.
    pub fn page_count(&self) -> usize {
        self.pages
    }

    /// Number of documents appended so far.
    pub fn document_count(&self) -> usize {
        self.documents
    }

    /// The merged document, or `None` if nothing was appended.
    ///
    /// Catalogs and page-tree roots of appended documents are left
    /// unreachable by the merge and pruned here.
    pub fn finish(self) -> Option<Document> {
        let mut merged = self.merged?;
        merged.prune_objects();
        Some(merged)
    }

    /// Appends the given page references to the merged document's main Pages dictionary.
    fn append_pages_to_page_tree(merged: &mut Document, page_ids: &[ObjectId]) -> Result<()> {
        let pages_id = merged.catalog()?.get(b"Pages")?.as_reference()?;

        for &id in page_ids {
            if let Ok(page) = merged.get_object_mut(id).and_then(Object::as_dict_mut) {
                page.set("Parent", pages_id);
            }
        }

        let pages_dict = merged.get_object_mut(pages_id)?.as_dict_mut()?;

        let kids_array = pages_dict.get_mut(b"Kids")?.as_array_mut()?;
        kids_array.extend(page_ids.iter().map(|&id| Object::Reference(id)));

        let current_count = pages_dict.get(b"Count")?.as_i64()?;
        pages_dict.set("Count", Object::Integer(current_count + page_ids.len() as i64));

        Ok(())
    }
}

/// Copy inherited page attributes onto the pages before they change parent.
fn inline_inherited_attributes(doc: &mut Document, page_ids: &[ObjectId]) {
    for &id in page_ids {
        let Ok(page) = doc.get_dictionary(id) else {
            continue;
        };

        let missing: Vec<(&[u8], Object)> = INHERITABLE
            .iter()
            .filter(|key| !page.has(key))
            .filter_map(|key| inherited(doc, page, key).map(|value| (*key, value)))
            .collect();

        if let Ok(page) = doc.get_dictionary_mut(id) {
            for (key, value) in missing {
                page.set(key.to_vec(), value);
            }
        }
    }
}
