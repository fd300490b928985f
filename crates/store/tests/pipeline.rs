//! End-to-end tests for the press-release pipeline.
//!
//! These exercise fact persistence, brief resolution, ingestion of generator
//! output, staleness detection and history, plus the failure tiers and the
//! documented lost-update race of concurrent saves.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::NaiveDate;
use pressroom_core::document::{GeneratedDocumentContent, NewGeneratedDocument, Quote};
use pressroom_core::error::{Error, StoreError};
use pressroom_core::fact::{Details, FactRecord, FactRecordPatch, Hook, HookPatch, RawQuote};
use pressroom_core::hash::brand_voice_hash;
use pressroom_core::store::{Collection, ProjectStore};
use pressroom_core::{SpeakerRosterEntry, TargetGroup};
use pressroom_prompt::{FactResolver, ResolverInput, SpeakerSource};
use pressroom_store::{DocumentService, FactService, InMemoryStore};
use serde_json::Value;
use tokio::sync::Barrier;

// ── Fixtures ─────────────────────────────────────────────────────────────

const BRAND: &str = "\
Modern, klar, verständlich.

**📋 KERNBOTSCHAFTEN:**
→ FÜR: ZG1 (B2B Entscheider)
- Wir reduzieren Komplexität in der Automatisierung

**🚫 BLACKLIST:**
- Gamechanger

**📍 FIRMENSTAMMDATEN:**
Sitz: München";

fn autoflow() -> FactRecord {
    FactRecord {
        hook: Hook {
            event: "TechInnovate launcht AutoFlow".into(),
            location: "Hannover".into(),
            date: "15. März 2024".into(),
        },
        details: Details {
            delta: "KI-Workflows ohne Programmierkenntnisse".into(),
            evidence: "Pilot bei 12 Unternehmen: 67% Zeitersparnis".into(),
        },
        quote: RawQuote {
            speaker_id: "ceo".into(),
            raw_statement: "Automatisierung muss einfach sein.".into(),
        },
    }
}

fn roster() -> Vec<SpeakerRosterEntry> {
    vec![
        SpeakerRosterEntry::new("ceo", "Dr. Sarah Müller", "CEO & Gründerin"),
        SpeakerRosterEntry::new("cto", "Thomas Weber", "CTO"),
    ]
}

/// Stand-in for the external generator: answers in the marker layout.
fn generator_output(headline: &str) -> String {
    format!(
        "{headline}\n\n\
         **München, 15. März 2024 – Die TechInnovate GmbH bringt AutoFlow auf den Markt.**\n\n\
         Erstmals erstellen Fertigungsbetriebe KI-Workflows ohne Programmierkenntnisse.\n\n\
         Die Pilotleiterin sagt: Der Zeitaufwand sank um 67 Prozent. Kontakt: pilot@techinnovate.de\n\n\
         \"Automatisierung muss einfach sein\", sagt Dr. Sarah Müller, CEO & Gründerin bei TechInnovate GmbH.\n\n\
         [[CTA: Demo unter demo.techinnovate.de]]\n\n\
         [[HASHTAGS: #KI #Automatisierung]]"
    )
}

fn content(headline: &str) -> GeneratedDocumentContent {
    GeneratedDocumentContent {
        headline: headline.into(),
        lead_paragraph: "Lead".into(),
        body_paragraphs: vec!["Absatz".into()],
        quote: Quote {
            text: "Zitat".into(),
            person: "Dr. Sarah Müller".into(),
            role: "CEO".into(),
            company: "TechInnovate GmbH".into(),
        },
        cta: "demo.techinnovate.de".into(),
        hashtags: vec!["#KI".into(), "#Automatisierung".into()],
        html_content: None,
    }
}

fn new_doc(headline: &str) -> NewGeneratedDocument {
    NewGeneratedDocument {
        content: content(headline),
        target_group: TargetGroup::Zg1,
        brand_voice_hash: "brand".into(),
        fact_record_hash: "facts".into(),
    }
}

// ── E2E: Full pipeline ───────────────────────────────────────────────────

#[tokio::test]
async fn e2e_facts_to_brief_to_document_lifecycle() {
    let store = Arc::new(InMemoryStore::new());
    let facts = FactService::new(store.clone());
    let docs = DocumentService::new(store.clone());
    let project = "project-autoflow";

    // 1. Persist the fact record and hash it
    facts.save(project, autoflow()).await.unwrap();
    let fact_hash = facts.hash(project).await.unwrap();
    let brand_hash = brand_voice_hash(BRAND);

    // 2. Resolve the generation brief
    let stored = facts.get(project).await.unwrap();
    let roster = roster();
    let brief = FactResolver::default().resolve(&ResolverInput {
        brand_document: BRAND,
        facts: &stored.facts,
        roster: &roster,
        target_group: Some(TargetGroup::Zg1),
        organization: "TechInnovate GmbH",
        as_of: NaiveDate::from_ymd_opt(2024, 3, 15),
    });
    assert_eq!(brief.speaker.name, "Dr. Sarah Müller");
    assert_eq!(brief.speaker.source, SpeakerSource::RosterId);
    assert!(brief.text.contains("**München, 15. März 2024 – TechInnovate GmbH"));
    assert!(brief.text.contains("Ereignis-Ort: Hannover"));
    assert!(brief.text.contains("Wir reduzieren Komplexität"));

    // 3. Ingest the generator's answer
    let doc = docs
        .ingest(project, &generator_output("AutoFlow startet"), TargetGroup::Zg1, &brand_hash, &fact_hash)
        .await
        .unwrap();
    assert_eq!(doc.content.headline, "AutoFlow startet");
    assert_eq!(doc.content.body_paragraphs.len(), 2);
    assert!(doc.content.body_paragraphs[1].starts_with("Die Pilotleiterin sagt:"));
    assert_eq!(doc.content.quote.person, "Dr. Sarah Müller");
    assert_eq!(doc.content.cta, "Demo unter demo.techinnovate.de");
    assert!(doc.content.html_content.as_deref().unwrap().contains("<h1>AutoFlow startet</h1>"));
    assert!(!docs.is_outdated(project, &brand_hash, &fact_hash).await);

    // 4. Facts change -> document is stale
    facts
        .update(
            project,
            FactRecordPatch {
                hook: Some(HookPatch {
                    date: Some("16. März 2024".into()),
                    ..Default::default()
                }),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let new_fact_hash = facts.hash(project).await.unwrap();
    assert_ne!(new_fact_hash, fact_hash);
    assert!(docs.is_outdated(project, &brand_hash, &new_fact_hash).await);

    // 5. Regenerate, then undo via history
    docs.ingest(project, &generator_output("AutoFlow ist da"), TargetGroup::Zg1, &brand_hash, &new_fact_hash)
        .await
        .unwrap();
    assert!(!docs.is_outdated(project, &brand_hash, &new_fact_hash).await);
    let history = docs.history(project).await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content.headline, "AutoFlow startet");

    let restored = docs.restore_from_history(project, 0).await.unwrap();
    assert_eq!(restored.content.headline, "AutoFlow startet");
    assert_eq!(restored.history[0].content.headline, "AutoFlow ist da");

    // 6. Export round-trip of the marker layout
    let text = docs.export_as_text(project).await;
    let reparsed = pressroom_core::parse_press_release(&text);
    assert_eq!(reparsed.headline, restored.content.headline);
    assert_eq!(reparsed.body_paragraphs, restored.content.body_paragraphs);
    assert_eq!(reparsed.hashtags, restored.content.hashtags);
}

#[tokio::test]
async fn e2e_sqlite_backend_runs_the_same_lifecycle() {
    let store = Arc::new(pressroom_store::SqliteStore::new("sqlite::memory:").await.unwrap());
    let facts = FactService::new(store.clone());
    let docs = DocumentService::new(store);

    facts.save("p1", autoflow()).await.unwrap();
    let fact_hash = facts.hash("p1").await.unwrap();
    for v in 1..=4 {
        docs.save(
            "p1",
            NewGeneratedDocument {
                fact_record_hash: fact_hash.clone(),
                ..new_doc(&format!("v{v}"))
            },
        )
        .await
        .unwrap();
    }
    let doc = docs.get("p1").await.unwrap();
    assert_eq!(doc.history.len(), 3);
    assert_eq!(doc.history[0].content.headline, "v3");
    assert!(!docs.is_outdated("p1", "brand", &fact_hash).await);
}

// ── Concurrency: lost history on racing saves ────────────────────────────

/// Holds every generated-document read at a barrier while armed, so two
/// saves are guaranteed to read the same previous version.
struct GatedStore {
    inner: InMemoryStore,
    barrier: Barrier,
    armed: AtomicBool,
}

#[async_trait]
impl ProjectStore for GatedStore {
    fn name(&self) -> &str {
        "gated"
    }

    async fn get(&self, collection: Collection, project_id: &str) -> Result<Option<Value>, StoreError> {
        let value = self.inner.get(collection, project_id).await?;
        if collection == Collection::GeneratedDocuments && self.armed.load(Ordering::SeqCst) {
            self.barrier.wait().await;
        }
        Ok(value)
    }

    async fn put(&self, collection: Collection, project_id: &str, document: Value) -> Result<(), StoreError> {
        self.inner.put(collection, project_id, document).await
    }

    async fn delete(&self, collection: Collection, project_id: &str) -> Result<bool, StoreError> {
        self.inner.delete(collection, project_id).await
    }
}

#[tokio::test]
async fn concurrent_saves_lose_one_history_entry() {
    let store = Arc::new(GatedStore {
        inner: InMemoryStore::new(),
        barrier: Barrier::new(2),
        armed: AtomicBool::new(false),
    });
    let docs = DocumentService::new(store.clone());
    docs.save("p1", new_doc("v1")).await.unwrap();

    store.armed.store(true, Ordering::SeqCst);
    let (a, b) = tokio::join!(docs.save("p1", new_doc("v2")), docs.save("p1", new_doc("v3")));
    store.armed.store(false, Ordering::SeqCst);
    a.unwrap();
    b.unwrap();

    // Both saves superseded v1; whichever wrote last wins and the other
    // version is gone. With serialized saves the history would hold two.
    let doc = docs.get("p1").await.unwrap();
    assert_eq!(doc.history.len(), 1);
    assert_eq!(doc.history[0].content.headline, "v1");

    let winner = doc.content.headline.as_str();
    assert!(winner == "v2" || winner == "v3");
    let loser = if winner == "v2" { "v3" } else { "v2" };
    assert!(doc.history.iter().all(|h| h.content.headline != loser));
}

#[tokio::test]
async fn sequential_saves_keep_every_history_entry() {
    let docs = DocumentService::new(Arc::new(InMemoryStore::new()));
    for v in ["v1", "v2", "v3"] {
        docs.save("p1", new_doc(v)).await.unwrap();
    }
    assert_eq!(docs.history("p1").await.len(), 2);
}

// ── Failure tiers ────────────────────────────────────────────────────────

/// Every operation fails as if the database were unreachable.
struct UnreachableStore;

#[async_trait]
impl ProjectStore for UnreachableStore {
    fn name(&self) -> &str {
        "unreachable"
    }

    async fn get(&self, _: Collection, _: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn put(&self, _: Collection, _: &str, _: Value) -> Result<(), StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }

    async fn delete(&self, _: Collection, _: &str) -> Result<bool, StoreError> {
        Err(StoreError::Unavailable("connection refused".into()))
    }
}

#[tokio::test]
async fn read_paths_report_absence_on_failure() {
    let store: Arc<dyn ProjectStore> = Arc::new(UnreachableStore);
    let facts = FactService::new(store.clone());
    let docs = DocumentService::new(store);

    assert!(facts.get("p1").await.is_none());
    assert!(!facts.exists("p1").await);
    assert_eq!(facts.export_for_ai("p1").await, "");
    assert!(facts.hash("p1").await.is_none());
    assert!(facts.get_with_hash("p1").await.is_none());

    assert!(docs.get("p1").await.is_none());
    assert!(!docs.exists("p1").await);
    assert_eq!(docs.export_as_text("p1").await, "");
    assert!(!docs.is_outdated("p1", "b", "f").await);
    assert!(docs.history("p1").await.is_empty());
}

#[tokio::test]
async fn write_paths_propagate_failure() {
    let store: Arc<dyn ProjectStore> = Arc::new(UnreachableStore);
    let facts = FactService::new(store.clone());
    let docs = DocumentService::new(store);

    let unavailable = |e: Error| matches!(e, Error::Store(StoreError::Unavailable(_)));

    assert!(unavailable(facts.save("p1", autoflow()).await.unwrap_err()));
    assert!(unavailable(facts.update("p1", FactRecordPatch::default()).await.unwrap_err()));
    assert!(unavailable(facts.delete("p1").await.unwrap_err()));

    assert!(unavailable(docs.save("p1", new_doc("v1")).await.unwrap_err()));
    assert!(unavailable(docs.restore_from_history("p1", 0).await.unwrap_err()));
    assert!(unavailable(docs.delete("p1").await.unwrap_err()));
}

#[tokio::test]
async fn corrupt_record_reads_as_absent() {
    let store = Arc::new(InMemoryStore::new());
    store
        .put(Collection::FactRecords, "p1", serde_json::json!({"hook": 42}))
        .await
        .unwrap();
    let facts = FactService::new(store);
    assert!(facts.get("p1").await.is_none());
    assert!(facts.update("p1", FactRecordPatch::default()).await.is_err());
}

#[tokio::test]
async fn save_over_corrupt_record_fails_until_deleted() {
    fn corrupt(err: Error) -> bool {
        matches!(err, Error::Store(StoreError::Corrupt { .. }))
    }

    let store = Arc::new(InMemoryStore::new());
    let junk = serde_json::json!({"hook": 42});
    store.put(Collection::FactRecords, "p1", junk.clone()).await.unwrap();
    store.put(Collection::GeneratedDocuments, "p1", junk.clone()).await.unwrap();
    let facts = FactService::new(store.clone());
    let docs = DocumentService::new(store.clone());

    assert!(corrupt(facts.save("p1", autoflow()).await.unwrap_err()));
    assert!(corrupt(docs.save("p1", new_doc("v1")).await.unwrap_err()));
    assert_eq!(store.get(Collection::FactRecords, "p1").await.unwrap(), Some(junk.clone()));
    assert_eq!(store.get(Collection::GeneratedDocuments, "p1").await.unwrap(), Some(junk));

    assert!(facts.delete("p1").await.unwrap());
    assert!(docs.delete("p1").await.unwrap());
    facts.save("p1", autoflow()).await.unwrap();
    let doc = docs.save("p1", new_doc("v1")).await.unwrap();
    assert!(doc.history.is_empty());
}
