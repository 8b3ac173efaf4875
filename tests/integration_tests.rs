use scorer_etl::core::parser::RecordParser;
use scorer_etl::domain::ports::ScorerStore;
use scorer_etl::{
    AnyStore, MalformedRowPolicy, ScorePolicy, ScorerError, ScorerService, ServerSettings,
    SqliteStore,
};
use tempfile::TempDir;
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;

const SAMPLE: &str = "First Name,Second Name,Score\r\n\
Dee,Moore,56\r\n\
Sipho,Lolo,78\r\n\
Noosrat,Hoosain,64\r\n\
George,of the Jungle,78\r\n";

fn sqlite_service(dir: &TempDir) -> (ScorerService<SqliteStore>, SqliteStore) {
    let store = SqliteStore::open(dir.path().join("scorers.db")).unwrap();
    let service = ScorerService::new(
        store.clone(),
        RecordParser::default(),
        MalformedRowPolicy::Skip,
    );
    (service, store)
}

#[tokio::test]
async fn test_end_to_end_ingest_and_query_with_sqlite() {
    let temp_dir = TempDir::new().unwrap();
    let (service, store) = sqlite_service(&temp_dir);
    let cancel = CancellationToken::new();

    let summary = service.ingest_content(SAMPLE, &cancel).await.unwrap();
    assert_eq!(summary.persisted.len(), 4);
    assert!(summary.skipped.is_empty());
    assert_eq!(store.get_all().await.unwrap().len(), 4);

    let top = service.top_scorers(&cancel).await.unwrap();
    assert_eq!(top.max_score, Some(78));
    let names: Vec<_> = top
        .scorers
        .iter()
        .map(|s| s.record.first_name.as_str())
        .collect();
    assert_eq!(names, vec!["George", "Sipho"]);

    let found = service.find_by_name("hoosain", &cancel).await.unwrap();
    assert_eq!(found.unwrap().record.score, 64);
    assert!(service
        .find_by_name("Nobody", &cancel)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_reingesting_the_same_content_appends_again() {
    let temp_dir = TempDir::new().unwrap();
    let (service, store) = sqlite_service(&temp_dir);
    let cancel = CancellationToken::new();

    service.ingest_content(SAMPLE, &cancel).await.unwrap();
    service.ingest_content(SAMPLE, &cancel).await.unwrap();

    assert_eq!(store.get_all().await.unwrap().len(), 8);
    let top = service.top_scorers(&cancel).await.unwrap();
    assert_eq!(top.len(), 4);
}

#[tokio::test]
async fn test_stream_ingest_from_file() {
    let temp_dir = TempDir::new().unwrap();
    let csv_path = temp_dir.path().join("scores.csv");
    std::fs::write(
        &csv_path,
        "FirstName,SecondName,Score\nAlice,Smith,90\nBob,Jones\nCara,Lee,abc\n",
    )
    .unwrap();

    let (service, _store) = sqlite_service(&temp_dir);
    let cancel = CancellationToken::new();
    let file = tokio::fs::File::open(&csv_path).await.unwrap();

    let summary = service
        .ingest_stream(BufReader::new(file), &cancel)
        .await
        .unwrap();

    assert_eq!(summary.lines_read, 4);
    assert_eq!(summary.persisted.len(), 2);
    assert_eq!(summary.skipped.len(), 1);
    assert_eq!(summary.skipped[0].line_number, 3);
    assert_eq!(summary.persisted[1].record.score, 0);
}

#[tokio::test]
async fn test_data_persists_across_store_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let cancel = CancellationToken::new();
    {
        let (service, _store) = sqlite_service(&temp_dir);
        service.ingest_content(SAMPLE, &cancel).await.unwrap();
    }

    let (service, _store) = sqlite_service(&temp_dir);
    let csv = service.export_top_scorers_csv(&cancel).await.unwrap();
    assert_eq!(
        csv,
        "FirstName,SecondName,Score\nGeorge,of the Jungle,78\nSipho,Lolo,78\n"
    );
}

#[tokio::test]
async fn test_strict_settings_reject_malformed_rows() {
    let settings = ServerSettings {
        score_policy: ScorePolicy::RejectRow,
        malformed_row_policy: MalformedRowPolicy::Fail,
        ..ServerSettings::default()
    };
    let store = AnyStore::open(None).unwrap();
    let service = ScorerService::from_config(store.clone(), &settings);
    let cancel = CancellationToken::new();

    let result = service
        .ingest_content("h\nAnn,Lee,12\nBen,Kim,twelve\n", &cancel)
        .await;

    assert!(matches!(
        result,
        Err(ScorerError::MalformedRow { line: 3, .. })
    ));
    assert!(store.get_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cancelled_token_stops_ingestion_before_store_call() {
    let store = AnyStore::open(None).unwrap();
    let service = ScorerService::from_config(store.clone(), &ServerSettings::default());
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = service.ingest_content(SAMPLE, &cancel).await;

    assert!(matches!(result, Err(ScorerError::Cancelled)));
    assert!(store.get_all().await.unwrap().is_empty());
}
