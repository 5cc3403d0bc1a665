#![allow(clippy::unwrap_used, clippy::expect_used)]

// SqliteStore behaves like the in-memory store for every catalog operation

use snipcat_core::errors::ExErrorKind;
use snipcat_core::model::{NewCategory, NewSnippet};
use snipcat_core::ops::catalog;
use snipcat_core::SnippetStore;
use snipcat_store::SqliteStore;

fn store_with_category() -> SqliteStore {
    let mut store = SqliteStore::in_memory().unwrap();
    catalog::create_category(&mut store, NewCategory::new("Product Pages", "product-pages"))
        .unwrap();
    store
}

fn snippet(title: &str, description: &str) -> NewSnippet {
    NewSnippet {
        title: title.to_string(),
        description: description.to_string(),
        html: Some("<div class=\"zoom\"></div>".to_string()),
        css: None,
        javascript: Some("console.log('zoom')".to_string()),
        installation: Some("<p>Paste it</p>".to_string()),
        how_it_works: None,
        category_id: 1,
        tags: vec!["Zoom".to_string(), "UX".to_string()],
        compatibility: "All versions".to_string(),
    }
}

#[test]
fn test_snippet_round_trip() {
    let mut store = store_with_category();
    let created =
        catalog::create_snippet(&mut store, snippet("Image Zoom", "Zoom images on hover")).unwrap();

    let loaded = store.snippet_by_id(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.tags, vec!["Zoom".to_string(), "UX".to_string()]);
    assert_eq!(loaded.css, None);
}

#[test]
fn test_duplicate_category_slug() {
    let mut store = store_with_category();
    let err = catalog::create_category(&mut store, NewCategory::new("Other", "product-pages"))
        .unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::AlreadyExists);
}

#[test]
fn test_category_lookup() {
    let store = store_with_category();
    assert_eq!(store.category_by_id(1).unwrap().unwrap().slug, "product-pages");
    assert!(store.category_by_slug("missing").unwrap().is_none());
}

#[test]
fn test_view_count_persists() {
    let mut store = store_with_category();
    let created =
        catalog::create_snippet(&mut store, snippet("Image Zoom", "Zoom images on hover")).unwrap();

    catalog::view_snippet(&mut store, created.id).unwrap();
    let viewed = catalog::view_snippet(&mut store, created.id).unwrap();

    assert_eq!(viewed.view_count, 2);
    assert_eq!(
        catalog::get_snippet(&store, created.id).unwrap().view_count,
        2
    );
}

#[test]
fn test_view_missing_snippet() {
    let mut store = store_with_category();
    let err = catalog::view_snippet(&mut store, 404).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::NotFound);
}

#[test]
fn test_search_case_insensitive_title_or_description() {
    let mut store = store_with_category();
    catalog::create_snippet(&mut store, snippet("Image Zoom", "Magnify product photos")).unwrap();
    catalog::create_snippet(&mut store, snippet("Sticky Cart", "Keeps the CART visible")).unwrap();

    let hits = catalog::list_or_search(&store, Some("ZOOM")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Image Zoom");

    let hits = catalog::list_or_search(&store, Some("cart vis")).unwrap();
    assert_eq!(hits.len(), 1);
}

#[test]
fn test_search_treats_wildcards_literally() {
    let mut store = store_with_category();
    catalog::create_snippet(&mut store, snippet("Discount Badge", "Shows 50% off labels"))
        .unwrap();
    catalog::create_snippet(&mut store, snippet("Sale Banner", "Shows a 50 percent banner"))
        .unwrap();

    let hits = catalog::list_or_search(&store, Some("50%")).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].title, "Discount Badge");

    assert!(catalog::list_or_search(&store, Some("_")).unwrap().is_empty());
}

#[test]
fn test_category_with_snippets() {
    let mut store = store_with_category();
    catalog::create_category(&mut store, NewCategory::new("Analytics", "analytics")).unwrap();
    let mut tracked = snippet("Click Tracker", "Counts button clicks");
    tracked.category_id = 2;
    catalog::create_snippet(&mut store, tracked).unwrap();
    catalog::create_snippet(&mut store, snippet("Image Zoom", "Zoom images on hover")).unwrap();

    let listing = catalog::category_with_snippets(&store, "analytics").unwrap();
    assert_eq!(listing.snippets.len(), 1);
    assert_eq!(listing.snippets[0].title, "Click Tracker");
}

#[test]
fn test_on_disk_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("catalog.db");

    {
        let mut store = SqliteStore::open(&path).unwrap();
        catalog::create_category(&mut store, NewCategory::new("Analytics", "analytics"))
            .unwrap();
    }

    let store = SqliteStore::open(&path).unwrap();
    assert_eq!(catalog::list_categories(&store).unwrap().len(), 1);
}
