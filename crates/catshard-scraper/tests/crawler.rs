//! Integration tests for `PaginationCrawler::crawl`.
//!
//! A scripted `RenderSession` serves canned HTML from a map, records every
//! navigation, and reports whether it was closed. Shards land in a
//! `tempfile::TempDir`.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use catshard_core::{ProductRecord, SourceId};
use catshard_scraper::{Document, PaginationCrawler, RenderSession, ScraperError, Site};
use catshard_store::ShardStore;
use tempfile::TempDir;

/// Serves pages from a fixed map; unknown URLs answer 404.
#[derive(Clone, Default)]
struct ScriptedSession {
    pages: Rc<HashMap<String, String>>,
    visits: Rc<RefCell<Vec<String>>>,
    closed: Rc<Cell<bool>>,
}

impl ScriptedSession {
    fn new(pages: Vec<(String, String)>) -> Self {
        Self {
            pages: Rc::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    fn visits(&self) -> Vec<String> {
        self.visits.borrow().clone()
    }
}

impl RenderSession for ScriptedSession {
    async fn navigate(&mut self, url: &str) -> Result<Document, ScraperError> {
        if self.closed.get() {
            return Err(ScraperError::SessionClosed);
        }
        self.visits.borrow_mut().push(url.to_owned());
        match self.pages.get(url) {
            Some(body) => Ok(Document::parse(url, body)),
            None => Err(ScraperError::UnexpectedStatus {
                status: 404,
                url: url.to_owned(),
            }),
        }
    }

    async fn close(&mut self) {
        self.closed.set(true);
    }
}

const CANDO: &str = "https://netshop.cando-web.co.jp";
const WATTS: &str = "https://watts-online.jp";

fn cando_listing(page: u32, total: u32, items: &[&str], has_next: bool) -> String {
    let links: String = items
        .iter()
        .map(|id| {
            format!(
                r#"<li class="item-list-name"><a href="/view/item/{id}?category_page_id=all_items">{id}</a></li>"#
            )
        })
        .collect();
    // Both controls share one class; the last page shows only "前へ".
    let controls = match (page, has_next) {
        (1, false) => String::new(),
        (1, true) => next_control(page + 1),
        (_, false) => previous_control(page - 1),
        (_, true) => format!("{}{}", previous_control(page - 1), next_control(page + 1)),
    };
    format!(
        r#"<html><body><p class="item-count">{total}件</p><ul>{links}</ul>{controls}</body></html>"#
    )
}

fn previous_control(page: u32) -> String {
    format!(r#"<a href="/view/category/all_items?page={page}"><span class="btn-prev">前へ</span></a>"#)
}

fn next_control(page: u32) -> String {
    format!(r#"<a href="/view/category/all_items?page={page}"><span class="btn-prev">次へ</span></a>"#)
}

fn cando_detail(id: &str) -> String {
    format!(
        r#"<html><body><h2 class="item-name">商品{id}</h2>
        <span data-id="makeshop-item-price:1">110</span>
        <div class="original-code"><span class="value">49{id}</span></div>
        <div class="item-description-01">本体サイズ(約)：W{id}×D10cm</div>
        </body></html>"#
    )
}

fn cando_page_url(page: u32) -> String {
    format!("{CANDO}/view/category/all_items?page={page}")
}

fn cando_item_url(id: &str) -> String {
    format!("{CANDO}/view/item/{id}?category_page_id=all_items")
}

/// Three listing pages, two items each; page 3 has no next control.
fn cando_catalog() -> Vec<(String, String)> {
    let mut pages = Vec::new();
    for (page, items) in [(1, ["a1", "a2"]), (2, ["b1", "b2"]), (3, ["c1", "c2"])] {
        pages.push((cando_page_url(page), cando_listing(page, 6, &items, page < 3)));
        for id in items {
            pages.push((cando_item_url(id), cando_detail(id)));
        }
    }
    pages
}

fn watts_detail(name: &str) -> String {
    format!(
        r#"<html><head><script type="application/ld+json">
        {{"@type":"Product","name":"{name}","offers":[{{"price":"330","gtin13":"4900000000001"}}]}}
        </script></head><body>
        <table class="c-product-description__table"><tr><td>パッケージサイズ</td><td>30×20×5</td></tr></table>
        </body></html>"#
    )
}

fn setup(source: SourceId) -> (TempDir, ShardStore, Site) {
    let dir = TempDir::new().expect("failed to create temp dir");
    let store = ShardStore::new(dir.path().join("output"));
    let site = Site::for_source(source).expect("built-in rules compile");
    (dir, store, site)
}

// ---------------------------------------------------------------------------
// termination
// ---------------------------------------------------------------------------

#[tokio::test]
async fn crawl_stops_at_page_without_next_control() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let session = ScriptedSession::new(cando_catalog());

    let report = PaginationCrawler::new(&site, &store)
        .crawl(session.clone(), &cando_page_url(1), 1)
        .await
        .expect("crawl should succeed");

    assert_eq!(report.pages, [1, 2, 3]);
    assert_eq!(report.records, 6);
    assert!(report.failures.is_empty());

    let shards: Vec<u32> = store
        .list(SourceId::Cando)
        .unwrap()
        .iter()
        .map(|s| s.page)
        .collect();
    assert_eq!(shards, [1, 2, 3]);
    assert!(!store.shard_path(SourceId::Cando, 4).exists());
    assert!(session.closed.get(), "session must be closed after success");
}

#[tokio::test]
async fn last_page_with_only_previous_control_ends_crawl() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let session = ScriptedSession::new(vec![
        (cando_page_url(1), cando_listing(1, 2, &[], true)),
        (cando_page_url(2), cando_listing(2, 2, &[], false)),
    ]);

    let report = PaginationCrawler::new(&site, &store)
        .with_max_pages(6)
        .crawl(session.clone(), &cando_page_url(1), 1)
        .await
        .expect("a lone previous control must end the crawl");

    assert_eq!(report.pages, [1, 2]);
    assert_eq!(session.visits(), [cando_page_url(1), cando_page_url(2)]);
    let shards: Vec<u32> = store
        .list(SourceId::Cando)
        .unwrap()
        .iter()
        .map(|s| s.page)
        .collect();
    assert_eq!(shards, [1, 2]);
}

#[tokio::test]
async fn next_link_on_highest_page_number_ends_crawl() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let session = ScriptedSession::new(cando_catalog());

    let report = PaginationCrawler::new(&site, &store)
        .crawl(session.clone(), &cando_page_url(1), u32::MAX)
        .await
        .expect("page overflow must end the crawl, not panic");

    assert_eq!(report.pages, [u32::MAX]);
    assert_eq!(session.visits().len(), 3);
}

#[tokio::test]
async fn crawl_visits_listing_then_details_in_order() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let session = ScriptedSession::new(cando_catalog());

    PaginationCrawler::new(&site, &store)
        .crawl(session.clone(), &cando_page_url(1), 1)
        .await
        .unwrap();

    assert_eq!(
        session.visits(),
        [
            cando_page_url(1),
            cando_item_url("a1"),
            cando_item_url("a2"),
            cando_page_url(2),
            cando_item_url("b1"),
            cando_item_url("b2"),
            cando_page_url(3),
            cando_item_url("c1"),
            cando_item_url("c2"),
        ]
    );
}

#[tokio::test]
async fn crawl_writes_normalized_records_per_page() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let session = ScriptedSession::new(cando_catalog());

    PaginationCrawler::new(&site, &store)
        .crawl(session, &cando_page_url(1), 1)
        .await
        .unwrap();

    let path = store.shard_path(SourceId::Cando, 2);
    let records = store.read(SourceId::Cando, &path).unwrap();
    let ProductRecord::Basic(first) = &records[0] else {
        panic!("expected basic record, got: {:?}", records[0]);
    };
    assert_eq!(first.name, "商品b1");
    assert_eq!(first.code, "49b1");
    assert_eq!(first.size, "Wb1×D10cm");
    assert_eq!(first.url, format!("{CANDO}/view/item/b1"));
}

#[tokio::test]
async fn crawl_numbers_pages_from_start_page() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let session = ScriptedSession::new(cando_catalog());

    let report = PaginationCrawler::new(&site, &store)
        .crawl(session, &cando_page_url(2), 2)
        .await
        .unwrap();

    assert_eq!(report.pages, [2, 3]);
    assert!(!store.shard_path(SourceId::Cando, 1).exists());
}

// ---------------------------------------------------------------------------
// per-item isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn malformed_item_is_skipped_and_reported() {
    let (_dir, store, site) = setup(SourceId::Watts);
    let listing_url = format!("{WATTS}/collections/all");
    let links: String = (1..=3)
        .map(|i| format!(r#"<a class="product-item__title" href="/products/p{i}">p{i}</a>"#))
        .collect();
    let listing = format!(
        r#"<html><body><span class="collection__products-count">3 商品</span>
        <div class="collection__dynamic-part">{links}</div></body></html>"#
    );
    let broken = r#"<html><head><script type="application/ld+json">{"name": </script></head></html>"#;

    let session = ScriptedSession::new(vec![
        (listing_url.clone(), listing),
        (format!("{WATTS}/products/p1"), watts_detail("one")),
        (format!("{WATTS}/products/p2"), broken.to_owned()),
        (format!("{WATTS}/products/p3"), watts_detail("three")),
    ]);

    let report = PaginationCrawler::new(&site, &store)
        .crawl(session, &listing_url, 1)
        .await
        .expect("item failures must not abort the crawl");

    assert_eq!(report.pages, [1]);
    assert_eq!(report.records, 2);
    assert_eq!(report.failures.len(), 1);
    let failure = &report.failures[0];
    assert_eq!(failure.page, 1);
    assert_eq!(failure.index, 2);
    assert_eq!(failure.url, format!("{WATTS}/products/p2"));

    let records = store
        .read(SourceId::Watts, &store.shard_path(SourceId::Watts, 1))
        .unwrap();
    let names: Vec<&str> = records.iter().map(ProductRecord::name).collect();
    assert_eq!(names, ["one", "three"]);
    let ProductRecord::Extended(first) = &records[0] else {
        panic!("expected extended record");
    };
    assert_eq!(first.package_size, "30×20×5");
}

#[tokio::test]
async fn empty_listing_still_writes_a_shard() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let url = cando_page_url(1);
    let session = ScriptedSession::new(vec![(url.clone(), cando_listing(1, 0, &[], false))]);

    let report = PaginationCrawler::new(&site, &store)
        .crawl(session, &url, 1)
        .await
        .unwrap();

    assert_eq!(report.pages, [1]);
    assert_eq!(report.records, 0);
    let path = store.shard_path(SourceId::Cando, 1);
    assert!(path.exists());
    assert!(store.read(SourceId::Cando, &path).unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// fatal errors
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listing_failure_aborts_with_page_and_url_and_closes_session() {
    let (_dir, store, site) = setup(SourceId::Cando);
    // Page 2's listing is absent, so navigating to it fails.
    let pages: Vec<(String, String)> = cando_catalog()
        .into_iter()
        .filter(|(url, _)| *url != cando_page_url(2))
        .collect();
    let session = ScriptedSession::new(pages);

    let err = PaginationCrawler::new(&site, &store)
        .crawl(session.clone(), &cando_page_url(1), 1)
        .await
        .unwrap_err();

    match &err {
        ScraperError::Navigation { url, page, source } => {
            assert_eq!(*url, cando_page_url(2));
            assert_eq!(*page, 2);
            assert!(matches!(
                **source,
                ScraperError::UnexpectedStatus { status: 404, .. }
            ));
        }
        other => panic!("expected Navigation, got: {other:?}"),
    }
    assert!(session.closed.get(), "session must be closed after failure");
    assert!(store.shard_path(SourceId::Cando, 1).exists());
    assert!(!store.shard_path(SourceId::Cando, 2).exists());
}

#[tokio::test]
async fn detail_failure_is_fatal() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let pages: Vec<(String, String)> = cando_catalog()
        .into_iter()
        .filter(|(url, _)| *url != cando_item_url("a2"))
        .collect();
    let session = ScriptedSession::new(pages);

    let err = PaginationCrawler::new(&site, &store)
        .crawl(session.clone(), &cando_page_url(1), 1)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::Navigation { page: 1, .. }),
        "expected Navigation on page 1, got: {err:?}"
    );
    assert!(session.closed.get());
    assert!(!store.shard_path(SourceId::Cando, 1).exists());
}

#[tokio::test]
async fn cycling_next_link_hits_page_limit() {
    let (_dir, store, site) = setup(SourceId::Cando);
    let url = cando_page_url(1);
    // Page 1 links "next" to page 2, which links back to itself forever.
    let cycle = r#"<html><body><p class="item-count">0件</p>
        <a href="/view/category/all_items?page=2"><span class="btn-prev">次へ</span></a>
        </body></html>"#;
    let session = ScriptedSession::new(vec![
        (url.clone(), cycle.to_owned()),
        (cando_page_url(2), cycle.to_owned()),
    ]);

    let err = PaginationCrawler::new(&site, &store)
        .with_max_pages(5)
        .crawl(session.clone(), &url, 1)
        .await
        .unwrap_err();

    assert!(
        matches!(err, ScraperError::PaginationLimit { max_pages: 5, .. }),
        "expected PaginationLimit, got: {err:?}"
    );
    assert_eq!(session.visits().len(), 5);
    assert!(session.closed.get());
}
