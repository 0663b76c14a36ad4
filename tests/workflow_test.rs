use bridger_core::adapters::{InMemoryTransactionRepository, LoggingNotifier};
use bridger_core::domain::{Status, Transaction};
use bridger_core::ports::TransactionRepository;
use bridger_core::services::{TransactionWorkflow, WorkflowError};
use chrono::{TimeZone, Utc};
use std::sync::Arc;

fn seeded(records: Vec<(&str, Status)>) -> (TransactionWorkflow, Arc<InMemoryTransactionRepository>) {
    let transactions = records.into_iter().map(|(id, status)| {
        let mut tx = Transaction::new(
            id,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            "ACH DEPOSIT",
            0,
            25_000,
        );
        tx.status = status;
        tx
    });
    let repo = Arc::new(InMemoryTransactionRepository::with_transactions(transactions));
    let workflow = TransactionWorkflow::new(repo.clone(), Arc::new(LoggingNotifier));
    (workflow, repo)
}

#[tokio::test]
async fn test_approve_sets_labels_and_bumps_timestamp() {
    let (workflow, repo) = seeded(vec![("t1", Status::AutoCategorized)]);
    let before = repo.find_by_id("t1").await.unwrap().unwrap();

    let approved = workflow
        .transition_status(
            "t1",
            Status::Approved,
            Some("Acme".to_string()),
            Some("Sales".to_string()),
        )
        .await
        .unwrap();

    assert_eq!(approved.status, Status::Approved);
    assert_eq!(approved.vendor.as_deref(), Some("Acme"));
    assert_eq!(approved.category.as_deref(), Some("Sales"));
    assert!(approved.last_updated > before.last_updated);
}

#[tokio::test]
async fn test_approved_cannot_be_excluded() {
    let (workflow, repo) = seeded(vec![("t1", Status::Approved)]);

    let err = workflow.exclude("t1").await.unwrap_err();

    assert!(matches!(
        err,
        WorkflowError::InvalidTransition {
            from: Status::Approved,
            to: Status::Excluded
        }
    ));
    assert_eq!(
        repo.find_by_id("t1").await.unwrap().unwrap().status,
        Status::Approved
    );
}

#[tokio::test]
async fn test_terminal_statuses_reject_every_transition() {
    for terminal in Status::ALL.into_iter().filter(|s| s.is_terminal()) {
        let (workflow, _) = seeded(vec![("t1", terminal)]);
        for target in Status::ALL {
            let result = workflow.transition_status("t1", target, None, None).await;
            assert!(
                matches!(result, Err(WorkflowError::InvalidTransition { .. })),
                "{terminal} -> {target}"
            );
        }
    }
}

#[tokio::test]
async fn test_set_vendor_twice_is_stable_but_advances_timestamp() {
    let (workflow, _) = seeded(vec![("t1", Status::AutoCategorized)]);

    let first = workflow.set_vendor("t1", "Acme").await.unwrap();
    let second = workflow.set_vendor("t1", "Acme").await.unwrap();

    assert_eq!(first.vendor.as_deref(), Some("Acme"));
    assert_eq!(second.vendor, first.vendor);
    assert!(second.last_updated > first.last_updated);
}

#[tokio::test]
async fn test_review_round_trip_through_client() {
    let (workflow, repo) = seeded(vec![("t1", Status::AutoCategorized)]);

    workflow.send_to_client("t1").await.unwrap();
    let sent = workflow
        .notify_client_for_pending(vec!["t1".to_string()], "Please review")
        .await
        .unwrap();
    assert_eq!(sent, vec!["t1".to_string()]);

    workflow
        .transition_status("t1", Status::NeedsHumanReview, None, None)
        .await
        .unwrap();
    let approved = workflow
        .approve("t1", "Acme".to_string(), "Office".to_string())
        .await
        .unwrap();
    assert_eq!(approved.status, Status::Approved);

    let stored = repo.find_by_id("t1").await.unwrap().unwrap();
    assert_eq!(stored, approved);
}

#[tokio::test]
async fn test_notify_mixed_batch_changes_nothing() {
    let (workflow, repo) = seeded(vec![
        ("t1", Status::PendingSendToClient),
        ("t2", Status::SentToClient),
    ]);

    let err = workflow
        .notify_client_for_pending(vec!["t1".to_string(), "t2".to_string()], "hi")
        .await
        .unwrap_err();

    assert!(matches!(err, WorkflowError::InvalidPrecondition { .. }));
    assert_eq!(
        repo.find_by_id("t1").await.unwrap().unwrap().status,
        Status::PendingSendToClient
    );
    assert_eq!(
        repo.find_by_id("t2").await.unwrap().unwrap().status,
        Status::SentToClient
    );
}

#[tokio::test]
async fn test_notify_all_pending_returns_ids_in_order() {
    let (workflow, repo) = seeded(vec![
        ("t2", Status::PendingSendToClient),
        ("t1", Status::PendingSendToClient),
    ]);

    let ids = vec!["t2".to_string(), "t1".to_string()];
    let result = workflow.notify_client_for_pending(ids.clone(), "hi").await.unwrap();

    assert_eq!(result, ids);
    for id in ["t1", "t2"] {
        assert_eq!(
            repo.find_by_id(id).await.unwrap().unwrap().status,
            Status::SentToClient
        );
    }
}
