//! Store behaviour seen through the sync engine's write path

use chrono::{Duration, Utc};
use lastseen::adapters::database::TaxonStore;
use lastseen::adapters::memory::InMemoryTaxonStore;
use lastseen::core::persistence::PersistenceCoordinator;
use lastseen::domain::{CountryCode, Observation, Taxon, TaxonId};
use std::collections::HashSet;
use std::sync::Arc;

fn observation(taxon: &str, country: &str, date: &str) -> Observation {
    Observation::new(
        format!("{taxon}-{country}-{date}"),
        TaxonId::new(taxon).unwrap(),
        CountryCode::new(country).unwrap(),
        date,
        date,
    )
}

#[tokio::test]
async fn test_replace_a_then_b_keeps_only_b() {
    let store = Arc::new(InMemoryTaxonStore::new());
    let coordinator = PersistenceCoordinator::new(store.clone());
    let taxon = TaxonId::new("4492208").unwrap();

    let set_a = vec![
        observation("4492208", "AT", "2019-01-01"),
        observation("4492208", "CH", "2017-05-01"),
    ];
    let set_b = vec![observation("4492208", "DE", "2021-08-30")];

    assert_eq!(coordinator.replace(&taxon, &set_a).await.unwrap(), 2);
    assert_eq!(coordinator.replace(&taxon, &set_b).await.unwrap(), 1);

    let rows = store.observations_for(&taxon).await.unwrap();
    assert_eq!(rows, set_b);
}

#[tokio::test]
async fn test_duplicate_country_keeps_first_row() {
    let store = Arc::new(InMemoryTaxonStore::new());
    let coordinator = PersistenceCoordinator::new(store.clone());
    let taxon = TaxonId::new("4492208").unwrap();

    let rows = vec![
        observation("4492208", "AT", "2020-06-15"),
        observation("4492208", "AT", "2019-01-01"),
    ];
    assert_eq!(coordinator.replace(&taxon, &rows).await.unwrap(), 1);

    let stored = store.observations_for(&taxon).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].observation_date, "2020-06-15");
}

#[tokio::test]
async fn test_concurrent_replaces_never_mix_sets() {
    let store = Arc::new(InMemoryTaxonStore::new());
    let coordinator = Arc::new(PersistenceCoordinator::new(store.clone()));
    let taxon = TaxonId::new("4492208").unwrap();

    let set_a = vec![
        observation("4492208", "AT", "2019-01-01"),
        observation("4492208", "CH", "2017-05-01"),
    ];
    let set_b = vec![
        observation("4492208", "DE", "2021-08-30"),
        observation("4492208", "FR", "2020-02-02"),
        observation("4492208", "IT", "2018-03-03"),
    ];

    let mut handles = Vec::new();
    for i in 0..20 {
        let coordinator = coordinator.clone();
        let taxon = taxon.clone();
        let rows = if i % 2 == 0 { set_a.clone() } else { set_b.clone() };
        handles.push(tokio::spawn(async move {
            coordinator.replace(&taxon, &rows).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let stored = store.observations_for(&taxon).await.unwrap();
    assert!(stored == set_a || stored == set_b);
}

#[tokio::test]
async fn test_sample_respects_synonyms_limit_and_staleness() {
    let now = Utc::now();
    let cutoff = now - Duration::days(180);

    let mut taxa = Vec::new();
    for i in 0..10 {
        taxa.push(Taxon::builder().taxon_id(format!("{i}")).unwrap().build().unwrap());
    }
    taxa.push(
        Taxon::builder()
            .taxon_id("100")
            .unwrap()
            .last_fetch(now - Duration::days(365))
            .build()
            .unwrap(),
    );
    taxa.push(
        Taxon::builder()
            .taxon_id("101")
            .unwrap()
            .synonym_of("1")
            .unwrap()
            .build()
            .unwrap(),
    );
    let store = InMemoryTaxonStore::with_taxa(taxa);

    let sampled = store.sample_taxa(4, cutoff).await.unwrap();
    assert_eq!(sampled.len(), 4);
    let unique: HashSet<_> = sampled.iter().collect();
    assert_eq!(unique.len(), 4);

    let everything = store.sample_taxa(100, cutoff).await.unwrap();
    assert_eq!(everything.len(), 10);
    assert!(!everything.contains(&TaxonId::new("100").unwrap()));
    assert!(!everything.contains(&TaxonId::new("101").unwrap()));
}

#[tokio::test]
async fn test_statistics_count_recent_fetches() {
    let now = Utc::now();
    let store = Arc::new(InMemoryTaxonStore::with_taxa(vec![
        Taxon::builder().taxon_id("1").unwrap().build().unwrap(),
        Taxon::builder()
            .taxon_id("2")
            .unwrap()
            .last_fetch(now - Duration::days(400))
            .build()
            .unwrap(),
    ]));
    let coordinator = PersistenceCoordinator::new(store.clone());
    let taxon = TaxonId::new("1").unwrap();

    coordinator.mark_fetched(&taxon).await.unwrap();
    coordinator
        .replace(&taxon, &[observation("1", "AT", "2020-01-01")])
        .await
        .unwrap();

    let stats = store.statistics(now - Duration::days(30)).await.unwrap();
    assert_eq!(stats.taxa, 2);
    assert_eq!(stats.observations, 1);
    assert_eq!(stats.fetched_since, 1);
}
