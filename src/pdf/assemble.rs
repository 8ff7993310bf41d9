use anyhow::{Context, Result};
use lopdf::{dictionary, Document, Object, ObjectId};
use tracing::debug;

use crate::pdf::PdfDocument;
use crate::plan::merge::Segment;

/// Page attributes a page may inherit from its ancestors in the page tree
const INHERITABLE: [&[u8]; 4] = [b"Resources", b"MediaBox", b"CropBox", b"Rotate"];

/// Guards against cyclic Parent chains in malformed files
const MAX_TREE_DEPTH: usize = 64;

/// Build a new document from pages of one or more source files.
///
/// Each segment's document is loaded once and its objects renumbered past the
/// ones already taken. Selected pages are moved under a single new page tree
/// in segment order and everything left unreferenced is pruned.
pub fn assemble(segments: &[Segment<'_>]) -> Result<Document> {
    let mut merged = Document::with_version("1.5");
    let pages_id = merged.new_object_id();
    let mut kids = Vec::new();

    for segment in segments {
        let mut doc = PdfDocument::open_unlocked(segment.path)?.doc;
        doc.renumber_objects_with(merged.max_id + 1);

        let page_ids = doc.get_pages();
        let mut selected = Vec::with_capacity(segment.pages.len());
        for page in &segment.pages {
            let id = page_ids.get(page).copied().with_context(|| {
                format!("Page {} not found in {}", page, segment.path.display())
            })?;
            selected.push((id, inherited_attributes(&doc, id)));
        }

        let max_id = doc.objects.keys().map(|(id, _)| *id).max().unwrap_or(0);
        merged.max_id = merged.max_id.max(max_id);
        merged.objects.extend(doc.objects);

        for (id, inherited) in selected {
            let page = merged
                .get_dictionary_mut(id)
                .with_context(|| format!("Malformed page object in {}", segment.path.display()))?;
            for (key, value) in inherited {
                page.set(key, value);
            }
            page.set("Parent", pages_id);
            kids.push(Object::Reference(id));
        }

        debug!(
            path = %segment.path.display(),
            pages = segment.pages.len(),
            "appended pages"
        );
    }

    let count = kids.len() as i64;
    merged.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(count),
        }),
    );
    let catalog_id = merged.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    merged.trailer.set("Root", catalog_id);
    merged.prune_objects();

    Ok(merged)
}

/// Attributes the page does not set itself but picks up from an ancestor
fn inherited_attributes(doc: &Document, page_id: ObjectId) -> Vec<(&'static [u8], Object)> {
    let mut found = Vec::new();
    let Ok(page) = doc.get_dictionary(page_id) else {
        return found;
    };

    let mut missing: Vec<&'static [u8]> = INHERITABLE
        .into_iter()
        .filter(|key| !page.has(key))
        .collect();
    let mut parent = page.get(b"Parent").and_then(Object::as_reference).ok();

    for _ in 0..MAX_TREE_DEPTH {
        let Some(parent_id) = parent else { break };
        if missing.is_empty() {
            break;
        }
        let Ok(node) = doc.get_dictionary(parent_id) else {
            break;
        };
        missing.retain(|key| match node.get(key) {
            Ok(value) => {
                found.push((*key, value.clone()));
                false
            }
            Err(_) => true,
        });
        parent = node.get(b"Parent").and_then(Object::as_reference).ok();
    }

    found
}
