use std::sync::Arc;

use httpmock::prelude::*;

use batas::cache::{MemoryCache, SourceCache};
use batas::coverage::{analyze, SurveyError, SurveyFetcher, SurveySource, SurveyTable};
use batas::models::{Boundary, GeometryError, Tier};
use batas::pip::BoundaryIndex;

const SHEET: &str = "Timestamp,Petugas,SLS\n\
2024-05-01 08:00,Ani,RT 9 LINGKUNGAN GATEP\n\
2024-05-01 09:00,Budi,rt 09 lingkungan gatep\n\
2024-05-02 10:00,Ani,RT 12 LINGKUNGAN KARANG BARU\n\
2024-05-02 11:00,Citra,\n";

fn source(server: &MockServer, path: &str) -> SurveySource {
    SurveySource::from(server.url(path).as_str())
}

#[tokio::test]
async fn test_fetch_csv_over_http() {
    let server = MockServer::start_async().await;
    let sheet = server
        .mock_async(|when, then| {
            when.method(GET).path("/export");
            then.status(200).header("content-type", "text/csv").body(SHEET);
        })
        .await;

    let fetcher = SurveyFetcher::new(None).unwrap();
    let table = fetcher.fetch(&source(&server, "/export")).await.unwrap();

    sheet.assert_async().await;
    assert_eq!(table.column, "SLS");
    assert_eq!(table.len(), 3);
    assert_eq!(table.normalized_names().len(), 2);
}

#[tokio::test]
async fn test_http_error_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/export");
            then.status(404);
        })
        .await;

    let fetcher = SurveyFetcher::new(None).unwrap();
    let err = fetcher.fetch(&source(&server, "/export")).await.unwrap_err();
    assert!(matches!(err, SurveyError::Status { .. }));
}

#[tokio::test]
async fn test_cached_fetch_hits_source_once_until_cleared() {
    let server = MockServer::start_async().await;
    let sheet = server
        .mock_async(|when, then| {
            when.method(GET).path("/export");
            then.status(200).body(SHEET);
        })
        .await;

    let fetcher = SurveyFetcher::new(None).unwrap();
    let cache: MemoryCache<SurveySource, Arc<SurveyTable>> = MemoryCache::new();
    let src = source(&server, "/export");

    let a = fetcher.fetch_cached(&src, &cache).await.unwrap();
    let b = fetcher.fetch_cached(&src, &cache).await.unwrap();
    assert!(Arc::ptr_eq(&a, &b));
    sheet.assert_hits_async(1).await;

    cache.clear();
    fetcher.fetch_cached(&src, &cache).await.unwrap();
    sheet.assert_hits_async(2).await;
}

#[tokio::test]
async fn test_failed_fetch_is_not_cached() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/export");
            then.status(500);
        })
        .await;

    let fetcher = SurveyFetcher::new(None).unwrap();
    let cache: MemoryCache<SurveySource, Arc<SurveyTable>> = MemoryCache::new();
    assert!(fetcher
        .fetch_cached(&source(&server, "/export"), &cache)
        .await
        .is_err());
    assert!(cache.is_empty());
}

#[tokio::test]
async fn test_coverage_from_fetched_sheet() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/export");
            then.status(200).body(SHEET);
        })
        .await;

    let sls = [
        "RT 009 LINGKUNGAN GATEP",
        "RT 010 LINGKUNGAN GATEP",
        "RT 012 LINGKUNGAN KARANG BARU",
    ]
    .into_iter()
    .map(|n| Boundary::new(Tier::Sls, n, Err(GeometryError::Missing)))
    .collect();
    let index = BoundaryIndex::from_tiers([(Tier::Sls, sls)]);

    let fetcher = SurveyFetcher::new(None).unwrap();
    let table = fetcher.fetch(&source(&server, "/export")).await.unwrap();
    let report = analyze(&index, Tier::Sls, &table);

    let flags: Vec<bool> = report.units.iter().map(|u| u.covered).collect();
    assert_eq!(flags, vec![true, false, true]);
    assert!(report.orphans.is_empty());
}

#[tokio::test]
async fn test_local_file_source() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("survey.csv");
    tokio::fs::write(&path, SHEET).await.unwrap();

    let fetcher = SurveyFetcher::new(None).unwrap();
    let table = fetcher.fetch(&SurveySource::Path(path)).await.unwrap();
    assert_eq!(table.len(), 3);

    let missing = SurveySource::Path(dir.path().join("nope.csv"));
    assert!(matches!(fetcher.fetch(&missing).await, Err(SurveyError::Io { .. })));
}
