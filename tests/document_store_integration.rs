//! Integration tests for the single-document store over real backends.
#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc)]

use listkeep::DocumentStore;
use listkeep::storage::{FilesystemBackend, SqliteBackend};
use tempfile::TempDir;

fn file_doc(dir: &TempDir) -> DocumentStore {
    DocumentStore::new(Box::new(
        FilesystemBackend::new(dir.path(), "document.txt").unwrap(),
    ))
}

fn sqlite_doc(dir: &TempDir) -> DocumentStore {
    DocumentStore::new(Box::new(
        SqliteBackend::open(dir.path().join("listkeep.db"), "document.txt").unwrap(),
    ))
}

#[test]
fn absent_document_reads_as_none_not_error() {
    let dir = TempDir::new().unwrap();

    assert!(file_doc(&dir).read().unwrap().is_none());
    assert!(sqlite_doc(&dir).read().unwrap().is_none());
}

#[test]
fn document_survives_reopen_verbatim() {
    let dir = TempDir::new().unwrap();

    file_doc(&dir).save("conteúdo salvo\ncom quebra de linha").unwrap();

    let reopened = file_doc(&dir);
    assert_eq!(
        reopened.read().unwrap().as_deref(),
        Some("conteúdo salvo\ncom quebra de linha")
    );
}

#[test]
fn info_reports_byte_size() {
    let dir = TempDir::new().unwrap();
    let doc = file_doc(&dir);

    let info = doc.info().unwrap();
    assert!(!info.exists);
    assert_eq!(info.size, 0);

    doc.save("abcd").unwrap();
    let info = doc.info().unwrap();
    assert!(info.exists);
    assert_eq!(info.size, 4);
}

#[test]
fn delete_is_idempotent_across_backends() {
    let dir = TempDir::new().unwrap();

    for doc in [file_doc(&dir), sqlite_doc(&dir)] {
        doc.save("temporary").unwrap();
        doc.delete().unwrap();
        doc.delete().unwrap();
        assert!(doc.read().unwrap().is_none());
    }
}

#[test]
fn list_and_document_share_a_database_without_clashing() {
    use listkeep::{InsertPosition, ListStore};

    let dir = TempDir::new().unwrap();
    let db = dir.path().join("listkeep.db");

    let list = ListStore::new(Box::new(SqliteBackend::open(&db, "my_items").unwrap()));
    let doc = DocumentStore::new(Box::new(SqliteBackend::open(&db, "document.txt").unwrap()));

    list.add("item", InsertPosition::Append).unwrap();
    doc.save("document body").unwrap();
    list.clear().unwrap();

    // Clearing the list leaves the document untouched.
    assert_eq!(doc.read().unwrap().as_deref(), Some("document body"));
}
