use std::io::Cursor;

use book_catalog::{repl::Repl, services::Services};

use crate::{book, catalog_with};

fn run_script(services: &Services, script: &str) -> String {
    let mut repl = Repl::new(services, Cursor::new(script.to_string()), Vec::new());
    repl.run().unwrap();
    String::from_utf8(repl.into_output()).unwrap()
}

#[test]
fn test_checkout_session() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);

    let output = run_script(
        &services,
        "checkout\nB1\ncheckout\nB1\ncheckin\nB1\ncheckin\nB1\nhistory\nB1\nexit\n",
    );

    assert!(output.contains("Book 'Dune' checked out successfully. Checkout ID:"));
    assert!(output.contains("[BookNotAvailable 2] Book 'Dune' is already checked out"));
    assert!(output.contains("Book 'Dune' checked in successfully."));
    assert!(output.contains("[BookNotBorrowed 3] Book 'Dune' is not currently checked out"));
    assert!(output.contains("book=B1"));
    assert!(output.ends_with("Goodbye!\n"));
    assert!(services.catalog.get_book("B1").unwrap().available);
}

#[test]
fn test_errors_do_not_stop_the_loop() {
    let (_dir, services) = catalog_with(&[]);

    let output = run_script(&services, "checkout\nghost\nfrobnicate\nhelp\n");

    assert!(output.contains("[NoSuchBook 1] Book with ID ghost not found"));
    assert!(output.contains("Please use a valid command!"));
    assert!(output.contains("Available commands:"));
}

#[test]
fn test_add_and_edit_book() {
    let (_dir, services) = catalog_with(&[]);

    let output = run_script(
        &services,
        "addBook\nEmma\nJane Austen\neditBook\nEmma\navailable\nprice_usd\n7.5\nfindByName\nEmma\nexit\n",
    );

    assert!(output.contains("Added book "));
    assert!(output.contains("===Invalid Entry==="));
    assert!(output.contains("Successfully changed Emma's price_usd to: 7.5"));

    let books = services.catalog.find_by_title("Emma").unwrap();
    assert_eq!(books.len(), 1);
    assert_eq!(books[0].price_usd.map(|p| p.to_string()), Some("7.5".to_string()));
    assert!(books[0].available);
}

#[test]
fn test_invalid_book_is_reported() {
    let (_dir, services) = catalog_with(&[]);

    let output = run_script(&services, "addBook\n\nSomeone\ngetAllRecords\n");

    assert!(output.contains("[BadValue 6] Validation error: Title must not be empty"));
    assert!(output.contains("The catalog is empty."));
}

#[test]
fn test_end_of_input_mid_prompt() {
    let (_dir, services) = catalog_with(&[book("B1", "Dune")]);

    let output = run_script(&services, "checkout\n");

    assert!(output.contains("Book ID: "));
    assert!(services.checkouts.all_history().unwrap().is_empty());
}
