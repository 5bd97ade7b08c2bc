use super::coordinator::MAX_BATCH_SIZE;
use super::record::ScoreSubmission;
use super::store::ScoreStore;
use super::validate::RejectReason;
use super::{MemoryStore, SubmissionCoordinator};
use chrono::Utc;

fn submission(nickname: &str, points: i64) -> ScoreSubmission {
    ScoreSubmission {
        nickname: nickname.into(),
        points,
        ..Default::default()
    }
}

#[test]
fn accepted_submission_echoes_input_with_server_metadata() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
    let now = Utc::now();

    let mut input = submission("Player1", 1000);
    input.lines = Some(42);
    input.seed = Some("bag7:12345".into());

    let record = coordinator.submit_one(input, now).unwrap();
    assert_eq!(record.nickname, "Player1");
    assert_eq!(record.points, 1000);
    assert_eq!(record.lines, 42);
    assert_eq!(record.seed.as_deref(), Some("bag7:12345"));
    assert_eq!(record.created_at, now);
    assert!(!record.id.is_empty());
}

#[test]
fn single_submission_rejection_propagates_reason() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());

    let err = coordinator
        .submit_one(submission("", 10), Utc::now())
        .unwrap_err();
    assert_eq!(err, RejectReason::EmptyNickname);
    assert_eq!(coordinator.store().count(), 0);
}

#[test]
fn suspect_verdict_is_persisted_but_does_not_reject() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
    let now = Utc::now();

    let record = coordinator
        .submit_one(submission("speedrun", 1_500_000), now)
        .unwrap();
    assert!(record.suspect);

    // Suspect records still rank
    let page = coordinator.store().query(10, None, None);
    assert_eq!(page.items.len(), 1);
    assert!(page.items[0].suspect);
}

#[test]
fn oversized_client_ua_never_reaches_the_store() {
    use super::record::{CLIENT_UA_MAX_LEN, ClientInfo};

    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());

    let mut input = submission("Player1", 1000);
    input.client = Some(ClientInfo {
        version: None,
        platform: None,
        ua: Some("x".repeat(5000)),
    });

    let err = coordinator.submit_one(input, Utc::now()).unwrap_err();
    assert_eq!(err, RejectReason::ClientUaTooLong);
    assert_eq!(coordinator.store().count(), 0);

    // A ua at the limit is stored verbatim
    let mut input = submission("Player1", 1000);
    input.client = Some(ClientInfo {
        version: None,
        platform: None,
        ua: Some("x".repeat(CLIENT_UA_MAX_LEN)),
    });

    let record = coordinator.submit_one(input, Utc::now()).unwrap();
    let stored_ua = record.client.unwrap().ua.unwrap();
    assert_eq!(stored_ua.chars().count(), CLIENT_UA_MAX_LEN);
}

#[test]
fn batch_partial_acceptance() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
    let now = Utc::now();

    let batch = vec![
        submission("alice", 200),
        submission("", 50),
        submission("bob", 300),
    ];

    let outcome = coordinator.submit_batch(batch, now).unwrap();
    assert_eq!(outcome.accepted.len(), 2);
    assert_eq!(outcome.rejected.len(), 1);
    assert_eq!(outcome.rejected[0].0, RejectReason::EmptyNickname);

    // Both accepted items are retrievable afterwards
    let page = coordinator.store().query(10, None, None);
    let names: Vec<&str> = page.items.iter().map(|r| r.nickname.as_str()).collect();
    assert_eq!(names, ["bob", "alice"]);
}

#[test]
fn batch_rejections_carry_the_original_payload() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());

    let bad = ScoreSubmission {
        nickname: "tagged".into(),
        points: 10,
        tags: Some(vec!["t".into(); 6]),
        ..Default::default()
    };

    let outcome = coordinator
        .submit_batch(vec![bad.clone()], Utc::now())
        .unwrap();
    assert_eq!(outcome.rejected.len(), 1);
    let (reason, payload) = &outcome.rejected[0];
    assert_eq!(*reason, RejectReason::TooManyTags);
    assert_eq!(*payload, bad);
}

#[test]
fn batch_of_exactly_max_size_is_processed() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
    let batch: Vec<_> = (0..MAX_BATCH_SIZE)
        .map(|i| submission(&format!("p{i}"), i as i64))
        .collect();

    let outcome = coordinator.submit_batch(batch, Utc::now()).unwrap();
    assert_eq!(outcome.accepted.len(), MAX_BATCH_SIZE);
    assert!(outcome.rejected.is_empty());
}

#[test]
fn oversized_batch_is_refused_wholesale() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
    let batch: Vec<_> = (0..MAX_BATCH_SIZE + 1)
        .map(|i| submission(&format!("p{i}"), i as i64))
        .collect();

    let err = coordinator.submit_batch(batch, Utc::now()).unwrap_err();
    assert_eq!(
        err,
        super::BatchError::TooLarge {
            len: 51,
            max: MAX_BATCH_SIZE
        }
    );
    // Nothing was stored, not even the valid prefix
    assert_eq!(coordinator.store().count(), 0);
}

#[test]
fn ids_stay_unique_across_batches() {
    let mut coordinator = SubmissionCoordinator::new(MemoryStore::new());
    let now = Utc::now();

    for _ in 0..3 {
        let batch: Vec<_> = (0..10).map(|i| submission(&format!("p{i}"), i)).collect();
        coordinator.submit_batch(batch, now).unwrap();
    }

    let page = coordinator.store().query(100, None, None);
    let mut ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
    let total = ids.len();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), total);
}
