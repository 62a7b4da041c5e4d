//! Extraction Pipeline - Rule-based entity mining
//!
//! Consumes one (user message, AI reply) pair, applies the ordered
//! pattern rules, upserts discovered entities into the graph store,
//! and appends one audit record per event. The pipeline is stateless:
//! it holds nothing beyond a reference to the store.
//!
//! Extraction is best-effort and must never abort the conversation
//! turn that triggered it. The public path is therefore the
//! fire-and-forget [`ExtractionWorker`]; [`run_extraction`] is the
//! synchronous building block underneath it (and the unit-test seam).

mod rules;
mod worker;

pub use rules::{
    activity_candidates, emotion_candidates, person_candidates, ACTIVITY_TEMPLATES,
    EMOTION_VOCABULARY,
};
pub use worker::{ExtractionJob, ExtractionWorker};

use crate::graph::{EntityType, ExtractionRecord};
use crate::storage::{GraphStore, Result};

/// Run the extraction rules for one conversation turn and store the
/// results.
///
/// Rule order is fixed: persons, then emotions, then activities. Every
/// surviving candidate is upserted with its category's entity type, and
/// one [`ExtractionRecord`] is appended afterward referencing all
/// produced node ids — also for empty or whitespace-only messages,
/// which yield no candidates but still leave an audit trail. The reply
/// text is recorded in the job for audit symmetry but not mined.
pub fn run_extraction(store: &GraphStore, job: &ExtractionJob) -> Result<ExtractionRecord> {
    let mut node_ids = Vec::new();

    for name in person_candidates(&job.user_text) {
        let node = store.upsert_node(&job.profile_id, EntityType::Person.as_str(), &name)?;
        node_ids.push(node.id);
    }
    for name in emotion_candidates(&job.user_text) {
        let node = store.upsert_node(&job.profile_id, EntityType::Emotion.as_str(), &name)?;
        node_ids.push(node.id);
    }
    for name in activity_candidates(&job.user_text) {
        let node = store.upsert_node(&job.profile_id, EntityType::Activity.as_str(), &name)?;
        node_ids.push(node.id);
    }

    tracing::debug!(
        profile_id = %job.profile_id,
        conversation_id = %job.conversation_id,
        nodes = node_ids.len(),
        reply_len = job.reply_text.len(),
        "Extraction complete"
    );

    store.append_extraction_record(
        &job.profile_id,
        &job.conversation_id,
        &job.user_text,
        node_ids,
    )
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_test_store() -> GraphStore {
        let dir = tempdir().unwrap();
        GraphStore::new(Some(dir.path().join("test.db"))).unwrap()
    }

    fn job(user_text: &str) -> ExtractionJob {
        ExtractionJob {
            profile_id: "p1".to_string(),
            conversation_id: "c1".to_string(),
            user_text: user_text.to_string(),
            reply_text: "That sounds lovely!".to_string(),
        }
    }

    #[test]
    fn test_lunch_with_sarah() {
        let store = create_test_store();
        let record =
            run_extraction(&store, &job("I had lunch with Sarah and felt happy")).unwrap();

        let person = store.find_node("p1", "person", "Sarah").unwrap().unwrap();
        let emotion = store.find_node("p1", "emotion", "happy").unwrap().unwrap();
        let activity = store
            .find_node("p1", "activity", "had lunch")
            .unwrap()
            .unwrap();

        // The audit record references every produced node.
        for id in [&person.id, &emotion.id, &activity.id] {
            assert!(record.node_ids.contains(id));
        }
        assert_eq!(record.node_ids.len(), 3);
        assert!(record.edge_ids.is_empty());
    }

    #[test]
    fn test_empty_message_still_logged() {
        let store = create_test_store();
        let record = run_extraction(&store, &job("   ")).unwrap();
        assert!(record.node_ids.is_empty());
        assert!(store.recent_nodes("p1", 10).unwrap().is_empty());
    }

    #[test]
    fn test_repeat_extraction_increments_mention_count() {
        let store = create_test_store();
        run_extraction(&store, &job("Sarah came by")).unwrap();
        run_extraction(&store, &job("Sarah called again")).unwrap();

        let node = store.find_node("p1", "person", "Sarah").unwrap().unwrap();
        assert_eq!(node.mention_count, 2);
    }

    #[test]
    fn test_no_cross_type_deduplication() {
        // The same surface form under different rules stores two nodes.
        let store = create_test_store();
        run_extraction(&store, &job("feeling content")).unwrap();
        store.upsert_node("p1", "goal", "content").unwrap();

        assert!(store.find_node("p1", "emotion", "content").unwrap().is_some());
        assert!(store.find_node("p1", "goal", "content").unwrap().is_some());
    }

    #[test]
    fn test_category_caps_applied() {
        let store = create_test_store();
        let record = run_extraction(
            &store,
            &job("Al, Bo, Cy, Di went to town, had tea, played cards; happy sad angry"),
        )
        .unwrap();
        // 3 persons + 2 emotions + 2 activities.
        assert_eq!(record.node_ids.len(), 7);
    }
}
