use book_catalog::{
    models::CheckoutRecord,
    repository::{CheckoutLedger, JsonCheckoutLedger},
    services::Services,
    AppError,
};
use chrono::Utc;

use crate::{book, catalog_with};

/// Every book is available exactly when it has no open ledger record
fn assert_flags_match_ledger(services: &Services) {
    let history = services.checkouts.all_history().unwrap();
    for book in services.catalog.list_books().unwrap() {
        let open = history
            .iter()
            .filter(|r| r.book_id == book.book_id && r.is_open())
            .count();
        assert!(open <= 1, "book {} has {} open records", book.book_id, open);
        assert_eq!(book.available, open == 0, "flag out of sync for {}", book.book_id);
    }
}

#[test]
fn test_checkout_checkin_checkout_scenario() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);

    let receipt = services.checkouts.checkout("B1").unwrap();
    assert_eq!(receipt.title, "Dune");
    assert!(!services.catalog.get_book("B1").unwrap().available);
    let history = services.checkouts.history_for_book("B1").unwrap();
    assert_eq!(history.len(), 1);
    assert!(history[0].is_open());
    assert_eq!(history[0].id, receipt.checkout_id);

    let checkin = services.checkouts.checkin("B1").unwrap();
    assert_eq!(checkin.checkout_id, receipt.checkout_id);
    assert!(services.catalog.get_book("B1").unwrap().available);
    let history = services.checkouts.history_for_book("B1").unwrap();
    assert!(!history[0].is_open());
    assert!(history[0].checked_in_at.unwrap() >= history[0].checked_out_at);

    let second = services.checkouts.checkout("B1").unwrap();
    assert_ne!(second.checkout_id, receipt.checkout_id);

    let history = services.checkouts.history_for_book("B1").unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].id, receipt.checkout_id);
    assert!(!history[0].is_open());
    assert_eq!(history[1].id, second.checkout_id);
    assert!(history[1].is_open());
    assert_flags_match_ledger(&services);
}

#[test]
fn test_unknown_book() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);

    assert!(matches!(services.checkouts.checkout("nope"), Err(AppError::BookNotFound(_))));
    assert!(matches!(services.checkouts.checkin("nope"), Err(AppError::BookNotFound(_))));
    assert!(matches!(
        services.checkouts.history_for_book("nope"),
        Err(AppError::BookNotFound(_))
    ));
    assert!(services.checkouts.all_history().unwrap().is_empty());
}

#[test]
fn test_double_checkout_rejected() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);

    services.checkouts.checkout("B1").unwrap();
    let err = services.checkouts.checkout("B1").unwrap_err();
    assert!(matches!(err, AppError::AlreadyCheckedOut { ref title, .. } if title == "Dune"));
    assert_eq!(services.checkouts.all_history().unwrap().len(), 1);
    assert_flags_match_ledger(&services);
}

#[test]
fn test_checkin_without_checkout_rejected() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);

    let err = services.checkouts.checkin("B1").unwrap_err();
    assert!(matches!(err, AppError::NotCheckedOut { .. }));

    services.checkouts.checkout("B1").unwrap();
    services.checkouts.checkin("B1").unwrap();
    let err = services.checkouts.checkin("B1").unwrap_err();
    assert!(matches!(err, AppError::NotCheckedOut { .. }));
    assert_flags_match_ledger(&services);
}

#[test]
fn test_flags_stay_in_sync_across_books() {
    let (_dir, services) = catalog_with(&[
        book("B1", "Dune"),
        book("B2", "Emma"),
        book("B3", "Ulysses"),
    ]);

    let steps: &[(&str, bool)] = &[
        ("B1", true),
        ("B2", true),
        ("B1", false),
        ("B3", true),
        ("B2", false),
        ("B1", true),
        ("B3", false),
    ];
    for (book_id, is_checkout) in steps {
        if *is_checkout {
            services.checkouts.checkout(book_id).unwrap();
        } else {
            services.checkouts.checkin(book_id).unwrap();
        }
        assert_flags_match_ledger(&services);
    }

    let all = services.checkouts.all_history().unwrap();
    let order: Vec<&str> = all.iter().map(|r| r.book_id.as_str()).collect();
    assert_eq!(order, vec!["B1", "B2", "B3", "B1"]);
}

#[test]
fn test_checkin_closes_latest_when_ledger_was_tampered() {
    let (dir, services) = catalog_with(&[book("B1", "Dune")]);
    services.checkouts.checkout("B1").unwrap();

    // A second writer slips in another open record
    let ledger = JsonCheckoutLedger::open(dir.path().join("checkout_history.json")).unwrap();
    let stray = CheckoutRecord::new("B1", Utc::now()).unwrap();
    ledger.append(&stray).unwrap();

    let receipt = services.checkouts.checkin("B1").unwrap();
    assert_eq!(receipt.checkout_id, stray.id);

    let open = ledger.find_open_by_book_id("B1").unwrap();
    assert_eq!(open.len(), 1);
    assert_ne!(open[0].id, stray.id);
}

#[test]
fn test_removing_checked_out_book_refused() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);
    services.checkouts.checkout("B1").unwrap();

    assert!(matches!(
        services.catalog.remove_book("B1"),
        Err(AppError::AlreadyCheckedOut { .. })
    ));

    services.checkouts.checkin("B1").unwrap();
    services.catalog.remove_book("B1").unwrap();
    assert!(services.catalog.list_books().unwrap().is_empty());
    // history survives the book
    assert_eq!(services.checkouts.all_history().unwrap().len(), 1);
}

#[test]
fn test_existing_history_file_from_earlier_tool() {
    let (dir, services) = catalog_with(&[book("B1", "Dune")]);
    std::fs::write(
        dir.path().join("checkout_history.json"),
        r#"[
  {
    "checkout_history_id": "0b7e4d52-2f7a-4a8e-9c1d-5e6f7a8b9c0d",
    "book_id": "B1",
    "checked_out_time": "2025-01-10T09:30:00.000001",
    "checked_in_time": "2025-01-12T17:45:10.250000"
  },
  {
    "checkout_history_id": "9a1b2c3d-4e5f-4a6b-8c7d-0e1f2a3b4c5d",
    "book_id": "B1",
    "checked_out_time": "2025-02-01T08:00:00",
    "checked_in_time": null
  }
]"#,
    )
    .unwrap();

    let history = services.checkouts.history_for_book("B1").unwrap();
    assert_eq!(history.len(), 2);
    assert!(!history[0].is_open());
    assert!(history[1].is_open());

    let receipt = services.checkouts.checkin("B1").unwrap();
    assert_eq!(receipt.checkout_id.to_string(), "9a1b2c3d-4e5f-4a6b-8c7d-0e1f2a3b4c5d");
    assert!(services.catalog.get_book("B1").unwrap().available);
    assert!(services.checkouts.all_history().unwrap().iter().all(|r| !r.is_open()));
}

#[test]
fn test_blank_book_id_never_reaches_ledger() {
    let (_dir, services) = catalog_with(&[book("", "Nameless")]);

    assert!(matches!(services.checkouts.checkout(""), Err(AppError::Validation(_))));
    assert!(services.checkouts.all_history().unwrap().is_empty());
    assert!(services.catalog.get_book("").unwrap().available);
}
