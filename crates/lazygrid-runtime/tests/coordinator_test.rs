use chrono::Duration as TtlDuration;
use lazygrid_cache::ResultCache;
use lazygrid_runtime::{GridEvent, LoadCoordinator};
use lazygrid_testing::{eventually, sample_records, ManualSource, SampleRecord};
use lazygrid_types::{FilterSet, LoadStatus};
use std::sync::Arc;
use std::time::Duration;

const PAGE_SIZE: usize = 20;
const WAIT: Duration = Duration::from_secs(5);

fn new_coordinator(
    source: Arc<ManualSource>,
    cache: Arc<ResultCache<SampleRecord>>,
) -> LoadCoordinator<SampleRecord> {
    LoadCoordinator::new(source, cache, PAGE_SIZE, TtlDuration::minutes(5))
}

fn records_range(from_id: u64, to_id: u64) -> Vec<SampleRecord> {
    sample_records(to_id as usize)
        .into_iter()
        .filter(|r| r.id >= from_id)
        .collect()
}

fn settle(coordinator: &mut LoadCoordinator<SampleRecord>) {
    assert!(
        eventually(WAIT, || {
            coordinator.poll();
            !coordinator.state().status.is_loading()
        }),
        "coordinator did not settle, status {}",
        coordinator.state().status
    );
}

#[test]
fn full_first_page_reports_has_more() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    assert_eq!(coordinator.state().status, LoadStatus::LoadingInitial);

    let pending = source.next_request(WAIT).expect("initial fetch");
    assert_eq!(pending.request.page, 1);
    assert_eq!(pending.request.page_size, PAGE_SIZE);
    pending.respond(records_range(1, 20));

    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::HasMore);
    assert_eq!(coordinator.state().current_page, 1);
    assert_eq!(coordinator.rows().len(), 20);
}

#[test]
fn short_page_exhausts_with_merged_set() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 20));
    settle(&mut coordinator);

    coordinator.load_more().unwrap();
    assert_eq!(coordinator.state().status, LoadStatus::LoadingMore);

    let pending = source.next_request(WAIT).expect("load-more fetch");
    assert_eq!(pending.request.page, 2);
    pending.respond(records_range(21, 27));

    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::Exhausted);
    assert_eq!(coordinator.rows().len(), 27);
}

#[test]
fn exhausted_ignores_further_load_more() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 7));
    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::Exhausted);

    coordinator.load_more().unwrap();
    assert_eq!(coordinator.state().status, LoadStatus::Exhausted);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(source.pending_count(), 0);
}

#[test]
fn filter_change_mid_load_more_supersedes_cleanly() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    let filters_a = FilterSet::new().with("status", "active");
    coordinator.apply_filters(filters_a).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 20));
    settle(&mut coordinator);

    coordinator.load_more().unwrap();
    let stale = source.next_request(WAIT).expect("page-2 fetch for old filters");

    // Filter change while page 2 is in flight: the merged set clears
    // immediately and the page counter resets
    let filters_b = FilterSet::new().with("status", "archived");
    coordinator.apply_filters(filters_b.clone()).unwrap();
    assert_eq!(coordinator.rows().len(), 0);
    assert_eq!(coordinator.state().status, LoadStatus::LoadingInitial);
    assert_eq!(coordinator.state().current_page, 1);

    // The superseded response arrives late and must change nothing
    stale.respond(records_range(21, 40));
    std::thread::sleep(Duration::from_millis(50));
    coordinator.poll();
    assert_eq!(coordinator.rows().len(), 0);
    assert_eq!(coordinator.state().status, LoadStatus::LoadingInitial);

    let pending = source.next_request(WAIT).expect("fetch for new filters");
    assert_eq!(pending.request.fingerprint, filters_b.fingerprint());
    assert_eq!(pending.request.page, 1);
    pending.respond(records_range(61, 70));

    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::Exhausted);
    let ids: Vec<u64> = coordinator.rows().iter().map(|r| r.id).collect();
    assert_eq!(ids, (61..=70).collect::<Vec<u64>>());
}

#[test]
fn slow_initial_response_cannot_overwrite_newer_filter() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator
        .apply_filters(FilterSet::new().with("q", "avery"))
        .unwrap();
    let slow = source.next_request(WAIT).expect("fetch for first filters");

    coordinator
        .apply_filters(FilterSet::new().with("q", "blake"))
        .unwrap();
    let fresh = source.next_request(WAIT).expect("fetch for second filters");
    fresh.respond(records_range(2, 2));
    settle(&mut coordinator);
    assert_eq!(coordinator.rows().len(), 1);

    // First filter's response lands after the grid has moved on
    slow.respond(records_range(1, 20));
    std::thread::sleep(Duration::from_millis(50));
    coordinator.poll();
    assert_eq!(coordinator.rows().len(), 1);
    assert_eq!(coordinator.rows()[0].id, 2);
}

#[test]
fn failed_load_more_preserves_rows_and_supports_retry() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 20));
    settle(&mut coordinator);

    coordinator.load_more().unwrap();
    source.next_request(WAIT).unwrap().fail("connection reset");

    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::Error);
    assert_eq!(
        coordinator.state().error.as_deref(),
        Some("connection reset")
    );
    assert_eq!(coordinator.rows().len(), 20);

    // Retry re-requests the failed page without clearing anything
    coordinator.retry().unwrap();
    assert_eq!(coordinator.state().status, LoadStatus::LoadingMore);
    let pending = source.next_request(WAIT).expect("retried fetch");
    assert_eq!(pending.request.page, 2);
    pending.respond(records_range(21, 40));

    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::HasMore);
    assert_eq!(coordinator.rows().len(), 40);
}

#[test]
fn failed_initial_load_leaves_empty_error_state() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().fail("503");

    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::Error);
    assert!(coordinator.rows().is_empty());

    // Retry from an empty set goes back through the initial-load state
    coordinator.retry().unwrap();
    assert_eq!(coordinator.state().status, LoadStatus::LoadingInitial);
    let pending = source.next_request(WAIT).unwrap();
    assert_eq!(pending.request.page, 1);
}

#[test]
fn overlapping_page_dedups_by_identity() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 20));
    settle(&mut coordinator);

    coordinator.load_more().unwrap();
    // Page 2 overlaps the tail of page 1 (rows shifted server-side)
    source.next_request(WAIT).unwrap().respond(records_range(16, 35));
    settle(&mut coordinator);

    let ids: Vec<u64> = coordinator.rows().iter().map(|r| r.id).collect();
    assert_eq!(ids.len(), 35);
    assert_eq!(ids, (1..=35).collect::<Vec<u64>>());
}

#[test]
fn cache_hit_skips_the_network_on_filter_change() {
    let source = ManualSource::new();
    let cache = ResultCache::shared();
    let filters = FilterSet::new().with("status", "active");

    {
        let mut first = new_coordinator(source.clone(), cache.clone());
        first.apply_filters(filters.clone()).unwrap();
        source.next_request(WAIT).unwrap().respond(records_range(1, 20));
        settle(&mut first);

        first.load_more().unwrap();
        source.next_request(WAIT).unwrap().respond(records_range(21, 27));
        settle(&mut first);
        assert_eq!(first.state().status, LoadStatus::Exhausted);
    }

    // A second grid instance over the same shared cache restores the full
    // merged set without touching the source
    let mut second = new_coordinator(source.clone(), cache);
    second.apply_filters(filters).unwrap();

    assert_eq!(second.state().status, LoadStatus::Exhausted);
    assert_eq!(second.state().current_page, 2);
    assert_eq!(second.rows().len(), 27);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(source.pending_count(), 0);
}

#[test]
fn cached_has_more_resumes_pagination_position() {
    let source = ManualSource::new();
    let cache = ResultCache::shared();
    let filters = FilterSet::new().with("status", "pending");

    {
        let mut first = new_coordinator(source.clone(), cache.clone());
        first.apply_filters(filters.clone()).unwrap();
        source.next_request(WAIT).unwrap().respond(records_range(1, 20));
        settle(&mut first);
    }

    let mut second = new_coordinator(source.clone(), cache);
    second.apply_filters(filters).unwrap();
    assert_eq!(second.state().status, LoadStatus::HasMore);
    assert_eq!(second.state().current_page, 1);

    // Loading continues from page 2, not from scratch
    second.load_more().unwrap();
    let pending = source.next_request(WAIT).unwrap();
    assert_eq!(pending.request.page, 2);
}

#[test]
fn refresh_invalidates_and_refetches() {
    let source = ManualSource::new();
    let cache = ResultCache::shared();
    let mut coordinator = new_coordinator(source.clone(), cache.clone());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 7));
    settle(&mut coordinator);
    assert_eq!(coordinator.state().status, LoadStatus::Exhausted);
    assert_eq!(cache.len(), 1);

    // Refresh re-arms the exhausted grid and bypasses the cached snapshot
    coordinator.refresh().unwrap();
    assert_eq!(coordinator.state().status, LoadStatus::LoadingInitial);
    assert!(coordinator.rows().is_empty());

    let pending = source.next_request(WAIT).expect("refresh fetch");
    assert_eq!(pending.request.page, 1);
    pending.respond(records_range(1, 9));
    settle(&mut coordinator);
    assert_eq!(coordinator.rows().len(), 9);
}

#[test]
fn mutation_hook_clears_the_shared_cache() {
    let source = ManualSource::new();
    let cache = ResultCache::shared();
    let mut coordinator = new_coordinator(source.clone(), cache.clone());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 7));
    settle(&mut coordinator);
    assert_eq!(cache.len(), 1);

    coordinator.invalidate_after_mutation();
    assert!(cache.is_empty());
}

#[test]
fn reapplying_identical_filters_is_a_no_op() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    let filters = FilterSet::new().with("status", "active");
    coordinator.apply_filters(filters.clone()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 20));
    settle(&mut coordinator);

    // Same fingerprint, different insertion order: nothing happens
    let mut same = FilterSet::new();
    same.set("status", "active");
    coordinator.apply_filters(same).unwrap();
    assert_eq!(coordinator.rows().len(), 20);
    assert_eq!(coordinator.state().status, LoadStatus::HasMore);
    std::thread::sleep(Duration::from_millis(50));
    assert_eq!(source.pending_count(), 0);
}

#[test]
fn events_narrate_the_load_sequence() {
    let source = ManualSource::new();
    let mut coordinator = new_coordinator(source.clone(), ResultCache::shared());

    coordinator.apply_filters(FilterSet::new()).unwrap();
    source.next_request(WAIT).unwrap().respond(records_range(1, 20));
    settle(&mut coordinator);

    let events: Vec<GridEvent> = coordinator.events().try_iter().collect();
    assert!(matches!(events.first(), Some(GridEvent::Reset)));
    assert!(events
        .iter()
        .any(|event| matches!(event, GridEvent::RowsAppended { count: 20 })));
    assert!(events
        .iter()
        .any(|event| matches!(event, GridEvent::StateChanged(state) if state.status == LoadStatus::HasMore)));
}
