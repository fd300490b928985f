//! Generated-Document Service: the current document of a project, its
//! provenance hashes and a bounded history of superseded versions.
//!
//! `save` reads the current document, pushes its content onto the history
//! and writes the result back with a single `put`. The put is atomic, the
//! read-then-put pair is not: two concurrent saves on one project can both
//! read the same previous version, and one superseded version is then lost.
//! Callers are expected to serialize edits per project.

use crate::codec::{decode, encode};
use chrono::Utc;
use pressroom_core::document::{
    GeneratedDocument, GeneratedDocumentPatch, HistoryEntry, NewGeneratedDocument,
};
use pressroom_core::error::{DocumentError, Error, Result, StoreError};
use pressroom_core::parse::parse_press_release;
use pressroom_core::store::{Collection, ProjectStore};
use pressroom_core::TargetGroup;
use std::sync::Arc;
use tracing::{debug, warn};

const COLLECTION: Collection = Collection::GeneratedDocuments;

#[derive(Clone)]
pub struct DocumentService {
    store: Arc<dyn ProjectStore>,
}

impl DocumentService {
    pub fn new(store: Arc<dyn ProjectStore>) -> Self {
        Self { store }
    }

    async fn load(&self, project_id: &str) -> std::result::Result<Option<GeneratedDocument>, StoreError> {
        match self.store.get(COLLECTION, project_id).await? {
            Some(value) => decode(COLLECTION, project_id, value).map(Some),
            None => Ok(None),
        }
    }

    async fn load_existing(&self, project_id: &str) -> Result<GeneratedDocument> {
        self.load(project_id).await?.ok_or_else(|| {
            Error::Document(DocumentError::NotFound {
                kind: "generated document".into(),
                project_id: project_id.to_string(),
            })
        })
    }

    /// The current document, or `None` if absent or unreadable.
    pub async fn get(&self, project_id: &str) -> Option<GeneratedDocument> {
        match self.load(project_id).await {
            Ok(document) => document,
            Err(e) => {
                warn!(project_id = %project_id, error = %e, "Generated document read failed");
                None
            }
        }
    }

    pub async fn exists(&self, project_id: &str) -> bool {
        self.get(project_id).await.is_some()
    }

    /// Store `next` as the current version, pushing the previous one (if
    /// any) onto the front of the history.
    ///
    /// Identical content still produces a history entry: supersession is
    /// tracked by call order, not by content.
    pub async fn save(&self, project_id: &str, next: NewGeneratedDocument) -> Result<GeneratedDocument> {
        let previous = self.load(project_id).await?;
        let document = GeneratedDocument::supersede(project_id, previous, next, Utc::now());
        self.store
            .put(COLLECTION, project_id, encode(&document)?)
            .await?;
        debug!(
            project_id = %project_id,
            history_len = document.history.len(),
            "Saved generated document"
        );
        Ok(document)
    }

    /// Merge a partial field update into the current version. No history push.
    pub async fn update(&self, project_id: &str, patch: GeneratedDocumentPatch) -> Result<GeneratedDocument> {
        let mut document = self.load_existing(project_id).await?;
        document.apply(patch);
        self.store
            .put(COLLECTION, project_id, encode(&document)?)
            .await?;
        debug!(project_id = %project_id, "Updated generated document");
        Ok(document)
    }

    /// Returns whether a document existed.
    pub async fn delete(&self, project_id: &str) -> Result<bool> {
        let removed = self.store.delete(COLLECTION, project_id).await?;
        debug!(project_id = %project_id, removed, "Deleted generated document");
        Ok(removed)
    }

    /// Make history slot `index` the current version again.
    ///
    /// This is a regular save: the version being replaced goes onto the
    /// history, so the restore itself can be undone. The restored version
    /// keeps the provenance of the document it replaces.
    pub async fn restore_from_history(&self, project_id: &str, index: usize) -> Result<GeneratedDocument> {
        let current = self.load_existing(project_id).await?;
        let entry = current
            .history
            .get(index)
            .ok_or(DocumentError::HistoryIndexOutOfRange {
                index,
                len: current.history.len(),
            })?;

        let next = NewGeneratedDocument {
            content: entry.content.clone(),
            target_group: current.target_group,
            brand_voice_hash: current.brand_voice_hash.clone(),
            fact_record_hash: current.fact_record_hash.clone(),
        };
        let document = GeneratedDocument::supersede(project_id, Some(current), next, Utc::now());
        self.store
            .put(COLLECTION, project_id, encode(&document)?)
            .await?;
        debug!(project_id = %project_id, index, "Restored generated document from history");
        Ok(document)
    }

    /// True iff a stored hash differs from the current one. No document
    /// (or an unreadable one) is not outdated.
    pub async fn is_outdated(&self, project_id: &str, current_brand_hash: &str, current_fact_hash: &str) -> bool {
        self.get(project_id)
            .await
            .is_some_and(|document| document.is_outdated(current_brand_hash, current_fact_hash))
    }

    /// Plain-text press release layout, or an empty string without document.
    pub async fn export_as_text(&self, project_id: &str) -> String {
        self.get(project_id)
            .await
            .map(|document| document.content.export_as_text())
            .unwrap_or_default()
    }

    /// Superseded versions, newest first.
    pub async fn history(&self, project_id: &str) -> Vec<HistoryEntry> {
        self.get(project_id)
            .await
            .map(|document| document.history)
            .unwrap_or_default()
    }

    /// Parse generator output, render its HTML and save it with provenance.
    pub async fn ingest(
        &self,
        project_id: &str,
        generated_text: &str,
        target_group: TargetGroup,
        brand_voice_hash: &str,
        fact_record_hash: &str,
    ) -> Result<GeneratedDocument> {
        let mut content = parse_press_release(generated_text);
        content.html_content = Some(content.render_html());
        self.save(
            project_id,
            NewGeneratedDocument {
                content,
                target_group,
                brand_voice_hash: brand_voice_hash.to_string(),
                fact_record_hash: fact_record_hash.to_string(),
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::InMemoryStore;
    use pressroom_core::document::{GeneratedDocumentContent, Quote, HISTORY_CAPACITY};

    fn content(version: usize) -> GeneratedDocumentContent {
        GeneratedDocumentContent {
            headline: format!("Version {version}"),
            lead_paragraph: format!("Lead {version}"),
            body_paragraphs: vec![format!("Absatz {version}")],
            quote: Quote {
                text: "Zitat".into(),
                person: "Anna Weber".into(),
                role: "CEO".into(),
                company: "DataCo".into(),
            },
            cta: "Mehr unter dataco.de".into(),
            hashtags: vec!["#Analytics".into(), "#Daten".into()],
            html_content: None,
        }
    }

    fn new_doc(version: usize, brand: &str, fact: &str) -> NewGeneratedDocument {
        NewGeneratedDocument {
            content: content(version),
            target_group: TargetGroup::Zg1,
            brand_voice_hash: brand.into(),
            fact_record_hash: fact.into(),
        }
    }

    fn service() -> DocumentService {
        DocumentService::new(Arc::new(InMemoryStore::new()))
    }

    #[tokio::test]
    async fn first_save_has_empty_history() {
        let docs = service();
        let saved = docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        assert!(saved.history.is_empty());
        assert_eq!(docs.get("p1").await.unwrap(), saved);
    }

    #[tokio::test]
    async fn history_is_bounded_newest_first() {
        let docs = service();
        for v in 1..=6 {
            docs.save("p1", new_doc(v, "b", "f")).await.unwrap();
        }
        let doc = docs.get("p1").await.unwrap();
        assert_eq!(doc.content.headline, "Version 6");
        assert_eq!(doc.history.len(), HISTORY_CAPACITY);
        let headlines: Vec<&str> = doc.history.iter().map(|h| h.content.headline.as_str()).collect();
        assert_eq!(headlines, vec!["Version 5", "Version 4", "Version 3"]);
    }

    #[tokio::test]
    async fn identical_saves_still_push_history() {
        let docs = service();
        docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        let second = docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        assert_eq!(second.history.len(), 1);
        assert_eq!(second.history[0].content, content(1));
    }

    #[tokio::test]
    async fn update_does_not_touch_history() {
        let docs = service();
        docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        docs.save("p1", new_doc(2, "b", "f")).await.unwrap();
        let updated = docs
            .update(
                "p1",
                GeneratedDocumentPatch {
                    headline: Some("Korrigiert".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.content.headline, "Korrigiert");
        assert_eq!(updated.content.lead_paragraph, "Lead 2");
        assert_eq!(updated.history.len(), 1);
    }

    #[tokio::test]
    async fn update_of_missing_document_fails() {
        let err = service()
            .update("ghost", GeneratedDocumentPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Document(DocumentError::NotFound { .. })));
    }

    #[tokio::test]
    async fn restore_is_recorded_in_history() {
        let docs = service();
        for v in 1..=3 {
            docs.save("p1", new_doc(v, "b", "f")).await.unwrap();
        }
        // history: [2, 1]; restore version 1
        let restored = docs.restore_from_history("p1", 1).await.unwrap();
        assert_eq!(restored.content.headline, "Version 1");
        let headlines: Vec<&str> = restored.history.iter().map(|h| h.content.headline.as_str()).collect();
        assert_eq!(headlines, vec!["Version 3", "Version 2", "Version 1"]);
        assert_eq!(restored.brand_voice_hash, "b");
    }

    #[tokio::test]
    async fn restore_out_of_range_fails() {
        let docs = service();
        docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        let err = docs.restore_from_history("p1", 0).await.unwrap_err();
        assert!(matches!(
            err,
            Error::Document(DocumentError::HistoryIndexOutOfRange { index: 0, len: 0 })
        ));
        // Nothing was written.
        assert_eq!(docs.get("p1").await.unwrap().content.headline, "Version 1");
    }

    #[tokio::test]
    async fn staleness_tracks_both_hashes() {
        let docs = service();
        assert!(!docs.is_outdated("p1", "b", "f").await);

        docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        assert!(!docs.is_outdated("p1", "b", "f").await);
        assert!(docs.is_outdated("p1", "b2", "f").await);
        assert!(docs.is_outdated("p1", "b", "f2").await);
    }

    #[tokio::test]
    async fn export_layout_and_absence() {
        let docs = service();
        assert_eq!(docs.export_as_text("p1").await, "");
        docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        let text = docs.export_as_text("p1").await;
        assert!(text.starts_with("Version 1\n\n**Lead 1**\n\n"));
        assert!(text.ends_with("[[HASHTAGS: #Analytics #Daten]]"));
    }

    #[tokio::test]
    async fn ingest_parses_and_renders_html() {
        let docs = service();
        let text = content(7).export_as_text();
        let doc = docs
            .ingest("p1", &text, TargetGroup::Zg3, "b", "f")
            .await
            .unwrap();
        assert_eq!(doc.content.headline, "Version 7");
        assert_eq!(doc.content.body_paragraphs, vec!["Absatz 7".to_string()]);
        assert_eq!(doc.content.hashtags, content(7).hashtags);
        assert_eq!(doc.target_group, TargetGroup::Zg3);
        assert!(doc.content.html_content.is_some());
    }

    #[tokio::test]
    async fn delete_then_absent() {
        let docs = service();
        docs.save("p1", new_doc(1, "b", "f")).await.unwrap();
        assert!(docs.delete("p1").await.unwrap());
        assert!(!docs.exists("p1").await);
        assert!(docs.history("p1").await.is_empty());
    }
}
