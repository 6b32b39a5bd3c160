use std::{fs, time::Duration};

use gridmark_config::HttpConfig;
use gridmark_core::{
    AssetKind, ClearScope, FetchFailure, HeadshotSize, PlayerQuery, TeamKey,
    urls::headshot_url,
};

mod support;

use support::{ARI_LOGO, BUF_LOGO, Harness, KC_LOGO, KC_WORDMARK, Reply};

async fn populate(h: &Harness) {
    h.fetcher.body(ARI_LOGO, b"aaaa");
    h.fetcher.body(KC_LOGO, b"kkkkkk");
    h.fetcher.body(KC_WORDMARK, b"wordmark");
    h.fetcher.body(BUF_LOGO, b"bb");
    let full = headshot_url("3139477", HeadshotSize::Full).unwrap();
    h.fetcher.body(full.as_str(), b"headshot!");

    h.cache.logo("ARI").await.unwrap();
    h.cache.logo("KC").await.unwrap();
    h.cache.wordmark("KC").await.unwrap();
    h.cache.wordmark("BUF").await.unwrap();
    h.cache
        .headshot(PlayerQuery::by_vendor_id("3139477").unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn empty_cache_reports_zero_for_every_kind() {
    let h = Harness::new();
    let stats = h.cache.stats().await.unwrap();
    assert_eq!(stats.root, h.dir.path());
    for kind in AssetKind::ALL {
        assert_eq!(stats.counts_by_kind[&kind], 0);
        assert_eq!(stats.bytes_by_kind[&kind], 0);
    }
    assert_eq!(stats.total_bytes, 0);
    assert!(h.cache.entries(AssetKind::Logo).await.unwrap().is_empty());
}

#[tokio::test]
async fn stats_count_files_and_bytes_per_kind() {
    let h = Harness::new();
    populate(&h).await;

    let stats = h.cache.stats().await.unwrap();
    assert_eq!(stats.counts_by_kind[&AssetKind::Logo], 2);
    assert_eq!(stats.bytes_by_kind[&AssetKind::Logo], 10);
    assert_eq!(stats.counts_by_kind[&AssetKind::Wordmark], 2);
    assert_eq!(stats.bytes_by_kind[&AssetKind::Wordmark], 10);
    assert_eq!(stats.counts_by_kind[&AssetKind::Headshot], 1);
    assert_eq!(stats.total_count(), 5);
    assert_eq!(stats.total_bytes, 29);
}

#[tokio::test]
async fn entries_are_sorted_and_carry_sidecar_data() {
    let h = Harness::new();
    populate(&h).await;

    let logos = h.cache.entries(AssetKind::Logo).await.unwrap();
    let names: Vec<String> = logos.iter().map(|e| e.key.file_name()).collect();
    assert_eq!(names, ["ARI.png", "KC.png"]);
    assert_eq!(logos[0].size_bytes, 4);
    assert_eq!(logos[0].source_url.as_deref(), Some(ARI_LOGO));
    assert!(logos[0].fetched_at.is_some());
    assert_eq!(logos[0].local_path, h.dir.path().join("logos").join("ARI.png"));
}

#[tokio::test]
async fn entry_without_sidecar_falls_back_to_mtime() {
    let h = Harness::new();
    let dir = h.dir.path().join("logos");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("NYG.png"), b"giants").unwrap();

    let entries = h.cache.entries(AssetKind::Logo).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].source_url, None);
    assert!(entries[0].fetched_at.is_some());
}

#[tokio::test]
async fn clear_one_kind_leaves_the_others() {
    let h = Harness::new();
    populate(&h).await;

    let report = h.cache.clear(AssetKind::Logo).await.unwrap();
    assert_eq!(report.removed_files, 2);
    assert_eq!(report.freed_bytes, 10);

    let stats = h.cache.stats().await.unwrap();
    assert_eq!(stats.counts_by_kind[&AssetKind::Logo], 0);
    assert_eq!(stats.counts_by_kind[&AssetKind::Wordmark], 2);
    assert_eq!(stats.counts_by_kind[&AssetKind::Headshot], 1);

    // Sidecars go with their files; the directory stays.
    let logos = h.dir.path().join("logos");
    assert!(logos.is_dir());
    assert_eq!(fs::read_dir(&logos).unwrap().count(), 0);
}

#[tokio::test]
async fn clear_all_then_refetch() {
    let h = Harness::new();
    populate(&h).await;

    let report = h.cache.clear(ClearScope::All).await.unwrap();
    assert_eq!(report.removed_files, 5);
    assert_eq!(report.freed_bytes, 29);
    assert_eq!(h.cache.stats().await.unwrap().total_count(), 0);

    // Clearing an empty cache is not an error.
    let again = h.cache.clear(ClearScope::All).await.unwrap();
    assert_eq!(again.removed_files, 0);

    h.cache.logo("ARI").await.unwrap();
    assert_eq!(h.fetcher.calls(ARI_LOGO), 2);
}

#[tokio::test]
async fn unrelated_files_are_ignored() {
    let h = Harness::new();
    populate(&h).await;
    let logos = h.dir.path().join("logos");
    fs::write(logos.join("notes.txt.bak"), b"keep me").unwrap();
    fs::create_dir_all(logos.join("nested")).unwrap();

    let stats = h.cache.stats().await.unwrap();
    assert_eq!(stats.counts_by_kind[&AssetKind::Logo], 2);

    h.cache.clear(AssetKind::Logo).await.unwrap();
    assert!(logos.join("notes.txt.bak").exists());
}

#[tokio::test]
async fn url_check_splits_reachable_from_unreachable() {
    let h = Harness::with_http(HttpConfig {
        logo_timeout: Duration::from_millis(50),
        ..HttpConfig::default()
    });
    h.fetcher.body(ARI_LOGO, b"aaaa");
    h.fetcher.body(KC_WORDMARK, b"wordmark");
    h.fetcher.reply(KC_LOGO, Reply::Status(404));
    h.fetcher.reply(BUF_LOGO, Reply::Hang);

    let report = h.cache.check_urls(2).await;
    assert!(!report.all_reachable());

    let reachable: Vec<_> = report
        .reachable
        .iter()
        .map(|t| (t.kind, t.team, t.url.as_str()))
        .collect();
    assert_eq!(
        reachable,
        [
            (AssetKind::Logo, TeamKey::Ari, ARI_LOGO),
            (AssetKind::Wordmark, TeamKey::Kc, KC_WORDMARK),
        ]
    );

    assert_eq!(report.unreachable.len(), 2);
    let buf = &report.unreachable[0];
    assert_eq!(buf.target.team, TeamKey::Buf);
    assert!(matches!(buf.failure, FetchFailure::Timeout { .. }));
    let kc = &report.unreachable[1];
    assert_eq!((kc.target.kind, kc.target.team), (AssetKind::Logo, TeamKey::Kc));
    assert!(matches!(kc.failure, FetchFailure::Status { status: 404, .. }));

    // Every URL requested once, nothing cached.
    assert_eq!(h.fetcher.total(), 4);
    assert_eq!(h.cache.stats().await.unwrap().total_count(), 0);
}

#[tokio::test]
async fn url_check_with_zero_concurrency_still_runs() {
    let h = Harness::new();
    for url in [ARI_LOGO, KC_LOGO, KC_WORDMARK, BUF_LOGO] {
        h.fetcher.body(url, b"ok");
    }

    let report = h.cache.check_urls(0).await;
    assert!(report.all_reachable());
    assert_eq!(report.reachable.len(), 4);
}
