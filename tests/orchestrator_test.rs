mod common;

use catalog_enricher::driver::BrowserDriver;
use catalog_enricher::page_extractor::BaseRecord;
use catalog_enricher::{
    CancelSignal, CatalogCrawler, CrawlError, EnrichConfig, NoOpProgress, ProgressReporter,
    SelectionRequest,
};
use common::{CATALOG_URL, FakeBrowser, NodeSpec, PageSpec};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Loaded(usize),
    Range(usize, usize),
    Started(usize),
    Completed(usize),
    Skipped(usize),
    Failed(usize),
    Done(usize),
}

#[derive(Clone, Default)]
struct RecordingProgress {
    events: Arc<Mutex<Vec<Event>>>,
    cancel_after: Option<(usize, CancelSignal)>,
}

impl RecordingProgress {
    fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    fn push(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

impl ProgressReporter for RecordingProgress {
    fn catalog_loaded(&self, total: usize) {
        self.push(Event::Loaded(total));
    }

    fn range_resolved(&self, begin: usize, end: usize) {
        self.push(Event::Range(begin, end));
    }

    fn item_started(&self, position: usize, _base: &BaseRecord) {
        self.push(Event::Started(position));
    }

    fn item_completed(&self, position: usize) {
        self.push(Event::Completed(position));
        if let Some((after, cancel)) = &self.cancel_after
            && *after == position
        {
            cancel.cancel();
        }
    }

    fn item_skipped(&self, position: usize, _reason: &str) {
        self.push(Event::Skipped(position));
    }

    fn item_failed(&self, position: usize, _error: &str) {
        self.push(Event::Failed(position));
    }

    fn completed(&self, collected: usize) {
        self.push(Event::Done(collected));
    }
}

fn indices(results: &catalog_enricher::ResultSet) -> Vec<usize> {
    results.records().iter().map(|record| record.index()).collect()
}

fn assert_tabs_restored(browser: &FakeBrowser) {
    assert_eq!(browser.open_tabs(), vec![0]);
    assert_eq!(browser.focused(), Some(0));
}

#[tokio::test(start_paused = true)]
async fn middle_slice_of_a_paged_catalog_is_enriched_in_order() {
    let browser = common::catalog_site(10, vec![6, 10]);
    let config = common::fast_config();
    let progress = RecordingProgress::default();

    let results = CatalogCrawler::new(&browser, &config, progress.clone())
        .run(SelectionRequest::new(3, 4))
        .await
        .expect("run succeeds");

    assert_eq!(indices(&results), vec![4, 5, 6]);
    for record in results.records() {
        let n = record.index();
        assert_eq!(record.base.company, Some(format!("Company {n}")));
        assert_eq!(record.base.detail_url, Some(common::detail_url(n)));
        assert_eq!(record.detail.mission, Some(format!("Mission {n}")));
        assert_eq!(record.detail.external_profile_url, common::profile_url(n));
    }
    assert!(!results.was_cancelled());

    let events = progress.events();
    assert_eq!(events.first(), Some(&Event::Loaded(10)));
    assert_eq!(events.get(1), Some(&Event::Range(3, 6)));
    assert_eq!(events.last(), Some(&Event::Done(3)));

    assert_tabs_restored(&browser);
    assert_eq!(browser.url_of(0).as_deref(), Some(CATALOG_URL));
}

#[tokio::test(start_paused = true)]
async fn zero_count_enriches_the_whole_catalog() {
    let browser = common::catalog_site(10, vec![6, 10]);
    let config = common::fast_config();

    let results = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::all())
        .await
        .expect("run succeeds");

    assert_eq!(indices(&results), (1..=10).collect::<Vec<_>>());
    assert_tabs_restored(&browser);
}

#[tokio::test(start_paused = true)]
async fn start_past_the_catalog_fails_after_pagination() {
    let browser = common::catalog_site(10, vec![6, 10]);
    let config = common::fast_config();

    let err = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::new(1, 11))
        .await
        .expect_err("start 11 is out of range");

    assert!(matches!(
        err,
        CrawlError::InvalidStartPosition { start: 11, total: 10 }
    ));
    assert_eq!(browser.max_open_tabs(), 1);
}

#[tokio::test(start_paused = true)]
async fn rejected_range_captures_an_error_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let browser = common::catalog_site(4, vec![4]);
    let config = EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .sort_option_selector(None)
        .debug_screenshot_dir(dir.path())
        .build()
        .unwrap();

    CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::new(1, 9))
        .await
        .expect_err("start 9 is out of range");

    let captured = screenshot_files(dir.path());
    assert_eq!(captured.len(), 1);
    assert!(captured[0].starts_with("debug_error_"));
}

#[tokio::test(start_paused = true)]
async fn missing_profile_link_leaves_other_fields_intact() {
    let browser = common::catalog_site(1, vec![1]);
    browser.add_page(&common::detail_url(1), common::detail_page_without_link(1));
    let config = common::fast_config();

    let results = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::new(1, 1))
        .await
        .expect("run succeeds");

    let record = &results.records()[0];
    assert_eq!(record.detail.external_profile_url, "");
    assert_eq!(record.detail.mission.as_deref(), Some("Mission 1"));
    assert_eq!(record.detail.sector.as_deref(), Some("Distribution"));
    assert_eq!(
        record.detail.key_facts.get("headcount").map(String::as_str),
        Some("10 salariés")
    );
}

#[tokio::test(start_paused = true)]
async fn empty_catalog_is_an_error_and_captures_a_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let browser = FakeBrowser::new();
    browser.add_page(CATALOG_URL, PageSpec::new());
    let config = EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .control_timeout(Duration::from_secs(1))
        .sort_option_selector(None)
        .debug_screenshot_dir(dir.path())
        .build()
        .unwrap();

    let err = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::default())
        .await
        .expect_err("nothing to enrich");

    assert!(matches!(err, CrawlError::NoItemsFound));
    assert_eq!(browser.screenshots(), 1);

    let captured: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(captured.len(), 1);
    assert!(captured[0].starts_with("debug_catalog_"));
    assert!(captured[0].ends_with(".png"));
}

#[tokio::test(start_paused = true)]
async fn unreachable_catalog_is_fatal() {
    let browser = common::catalog_site(3, vec![3]);
    browser.fail_navigation(CATALOG_URL);
    let config = common::fast_config();

    let err = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::default())
        .await
        .expect_err("catalog cannot load");

    assert!(matches!(err, CrawlError::Browser(_)), "got {err:?}");
}

fn screenshot_files(dir: &std::path::Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

#[tokio::test(start_paused = true)]
async fn failed_catalog_navigation_captures_a_screenshot() {
    let dir = tempfile::tempdir().unwrap();
    let browser = common::catalog_site(3, vec![3]);
    browser.fail_navigation(CATALOG_URL);
    let config = EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .sort_option_selector(None)
        .debug_screenshot_dir(dir.path())
        .build()
        .unwrap();

    let err = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::default())
        .await
        .expect_err("catalog cannot load");

    assert!(matches!(err, CrawlError::Browser(_)), "got {err:?}");
    assert_eq!(browser.screenshots(), 1);
    let captured = screenshot_files(dir.path());
    assert_eq!(captured.len(), 1);
    assert!(captured[0].starts_with("debug_navigation_"));
    assert!(captured[0].ends_with(".png"));
}

#[tokio::test(start_paused = true)]
async fn sub_second_page_load_timeout_bounds_catalog_navigation() {
    let dir = tempfile::tempdir().unwrap();
    let browser = common::catalog_site(3, vec![3]);
    browser.hang_navigation(CATALOG_URL);
    let config = EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .page_load_timeout(Duration::from_millis(900))
        .sort_option_selector(None)
        .debug_screenshot_dir(dir.path())
        .build()
        .unwrap();

    let started = tokio::time::Instant::now();
    let err = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::default())
        .await
        .expect_err("navigation never finishes");

    assert!(started.elapsed() >= Duration::from_millis(900));
    assert!(started.elapsed() < Duration::from_secs(1));
    assert!(err.to_string().contains("timeout after 0.9 seconds"), "got {err}");
    assert!(screenshot_files(dir.path())[0].starts_with("debug_navigation_"));
}

#[tokio::test(start_paused = true)]
async fn entry_without_detail_link_is_skipped() {
    let browser = FakeBrowser::new();
    browser.add_page(
        CATALOG_URL,
        PageSpec::new()
            .with(".catalog__item", common::catalog_entry(1))
            .with(
                ".catalog__item",
                NodeSpec::empty().child(".catalog-company", NodeSpec::text("Linkless")),
            )
            .with(".catalog__item", common::catalog_entry(3)),
    );
    browser.add_page(&common::detail_url(1), common::detail_page(1));
    browser.add_page(&common::detail_url(3), common::detail_page(3));
    let config = common::fast_config();
    let progress = RecordingProgress::default();

    let results = CatalogCrawler::new(&browser, &config, progress.clone())
        .run(SelectionRequest::all())
        .await
        .expect("run succeeds");

    assert_eq!(indices(&results), vec![1, 3]);
    assert!(progress.events().contains(&Event::Skipped(2)));
}

#[tokio::test(start_paused = true)]
async fn failing_detail_page_degrades_only_its_entry() {
    let browser = common::catalog_site(3, vec![3]);
    browser.fail_navigation(&common::detail_url(2));
    let config = common::fast_config();

    let results = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::all())
        .await
        .expect("run succeeds");

    assert_eq!(indices(&results), vec![1, 2, 3]);
    assert!(results.records()[1].detail.is_absent());
    assert!(!results.records()[0].detail.is_absent());
    assert!(!results.records()[2].detail.is_absent());
    assert_tabs_restored(&browser);
}

#[tokio::test(start_paused = true)]
async fn cancellation_stops_between_entries() {
    let browser = common::catalog_site(5, vec![5]);
    let config = common::fast_config();
    let cancel = CancelSignal::new();
    let progress = RecordingProgress {
        cancel_after: Some((2, cancel.clone())),
        ..RecordingProgress::default()
    };

    let results = CatalogCrawler::new(&browser, &config, progress.clone())
        .with_cancel(cancel)
        .run(SelectionRequest::all())
        .await
        .expect("cancelled run still returns records");

    assert_eq!(indices(&results), vec![1, 2]);
    assert!(results.was_cancelled());
    assert!(!progress.events().contains(&Event::Started(3)));
    assert_tabs_restored(&browser);
}

#[tokio::test(start_paused = true)]
async fn sort_option_is_selected_before_paging() {
    let browser = common::catalog_site(2, vec![2]);
    browser.add_page(
        CATALOG_URL,
        PageSpec::new()
            .with("#orderBy_2", NodeSpec::empty().inert().on_click(common::ClickAction::Select))
            .with(".catalog__item", common::catalog_entry(1))
            .with(".catalog__item", common::catalog_entry(2)),
    );
    let config = EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .scroll_settle(Duration::ZERO)
        .load_more_settle(Duration::ZERO)
        .detail_settle(Duration::ZERO)
        .redirect_settle(Duration::ZERO)
        .item_delay(Duration::ZERO)
        .build()
        .unwrap();

    let results = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::default())
        .await
        .expect("run succeeds");

    assert!(browser.is_node_selected(CATALOG_URL, "#orderBy_2"));
    assert_eq!(results.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn missing_sort_option_is_not_fatal() {
    let browser = common::catalog_site(2, vec![2]);
    let config = EnrichConfig::builder()
        .catalog_url(CATALOG_URL)
        .control_timeout(Duration::from_secs(1))
        .item_delay(Duration::ZERO)
        .build()
        .unwrap();

    let results = CatalogCrawler::new(&browser, &config, NoOpProgress)
        .run(SelectionRequest::default())
        .await
        .expect("run succeeds without ordering control");

    assert_eq!(results.len(), 2);
    assert_eq!(browser.current_tab().await.unwrap(), 0);
}
