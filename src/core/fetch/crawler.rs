//! Paginated occurrence crawling
//!
//! One crawl covers a single (taxon, country, year) tuple and returns at most one
//! observation: the newest accepted record. Pages are fetched strictly one after
//! another with a pause in between to stay within GBIF's rate limits.

use super::discovery::CountryYears;
use crate::adapters::gbif::{GbifClient, SearchQuery};
use crate::config::GbifConfig;
use crate::core::dates::clean_date;
use crate::core::shutdown;
use crate::domain::{CountryCode, Observation, Result, SyncError, TaxonId};
use crate::log_page_progress;
use std::time::Duration;
use tokio::sync::watch;

/// Raw event dates shorter than this carry no usable year
const MIN_EVENT_DATE_LEN: usize = 4;

#[derive(Debug, Clone)]
pub struct ObservationCrawler {
    client: GbifClient,
    page_size: usize,
    page_delay: Duration,
}

impl ObservationCrawler {
    pub fn new(client: GbifClient, page_size: usize, page_delay: Duration) -> Self {
        Self {
            client,
            page_size,
            page_delay,
        }
    }

    /// Crawler with page size and delay taken from the `[gbif]` section
    pub fn from_config(client: GbifClient, config: &GbifConfig) -> Self {
        Self::new(
            client,
            config.page_size,
            Duration::from_millis(config.page_delay_ms),
        )
    }

    /// Newest observation of `taxon_id` in `country` during `year`
    ///
    /// The crawl ends at end-of-records, on a page that yields no data, or right
    /// after accepting a record dated December 31 of `year` or later. A record
    /// is skipped when more than one record has been accepted already and its
    /// date does not move past the last accepted one.
    ///
    /// # Errors
    ///
    /// Only [`SyncError::Cancelled`]. Shutdown is checked before every page and
    /// interrupts the pause between pages.
    pub async fn crawl_country(
        &self,
        taxon_id: &TaxonId,
        country: &CountryCode,
        year: i32,
        signal: &watch::Receiver<bool>,
    ) -> Result<Option<Observation>> {
        let mut signal = signal.clone();
        let year_end = format!("{year}-12-31");
        let mut accepted: Vec<Observation> = Vec::new();
        let mut offset = 0;

        loop {
            if shutdown::is_requested(&signal) {
                return Err(cancelled(taxon_id, country));
            }

            let query = SearchQuery::occurrences(taxon_id, country, year, offset, self.page_size);
            let Some(page) = self.client.search(&query).await.into_data() else {
                break;
            };
            if page.count < 0 {
                break;
            }
            log_page_progress!(country, offset, page.results.len());

            let mut reached_year_end = false;
            for record in &page.results {
                if record.event_date.len() < MIN_EVENT_DATE_LEN {
                    continue;
                }

                let date = clean_date(&record.event_date);
                let regresses = accepted.len() > 1
                    && accepted
                        .last()
                        .is_some_and(|last| date <= last.observation_date);
                if regresses {
                    continue;
                }

                reached_year_end = date >= year_end;
                accepted.push(Observation::new(
                    record.key.to_string(),
                    taxon_id.clone(),
                    country.clone(),
                    date,
                    record.event_date.clone(),
                ));

                if reached_year_end {
                    break;
                }
            }

            if reached_year_end || page.end_of_records || page.results.is_empty() {
                break;
            }

            offset += self.page_size;
            if shutdown::sleep_or_shutdown(&mut signal, self.page_delay).await {
                return Err(cancelled(taxon_id, country));
            }
        }

        accepted.sort_by(|a, b| b.observation_date.cmp(&a.observation_date));
        Ok(accepted.into_iter().next())
    }

    /// One crawl per discovered country; the union of the per-country winners
    ///
    /// # Errors
    ///
    /// Only [`SyncError::Cancelled`].
    pub async fn crawl_all(
        &self,
        taxon_id: &TaxonId,
        countries: &CountryYears,
        signal: &watch::Receiver<bool>,
    ) -> Result<Vec<Observation>> {
        let mut observations = Vec::with_capacity(countries.len());

        for (country, &year) in countries {
            match self.crawl_country(taxon_id, country, year, signal).await? {
                Some(observation) => {
                    tracing::debug!(
                        taxon_id = %taxon_id,
                        country = %country,
                        date = %observation.observation_date,
                        "Latest observation found"
                    );
                    observations.push(observation);
                }
                None => {
                    tracing::debug!(taxon_id = %taxon_id, country = %country, year, "No usable observation");
                }
            }
        }

        Ok(observations)
    }
}

fn cancelled(taxon_id: &TaxonId, country: &CountryCode) -> SyncError {
    SyncError::Cancelled(format!("crawl of taxon {taxon_id} in {country}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Mock, ServerGuard};

    fn crawler(base_url: String) -> ObservationCrawler {
        let config = GbifConfig {
            base_url,
            page_delay_ms: 0,
            ..Default::default()
        };
        ObservationCrawler::from_config(GbifClient::new(&config).unwrap(), &config)
    }

    fn page_body(records: &[(i64, &str)], end_of_records: bool) -> String {
        let results: Vec<String> = records
            .iter()
            .map(|(key, date)| format!(r#"{{"key":{key},"datasetKey":"d","eventDate":"{date}"}}"#))
            .collect();
        format!(
            r#"{{"offset":0,"limit":300,"endOfRecords":{end_of_records},"count":{},"results":[{}]}}"#,
            records.len(),
            results.join(",")
        )
    }

    async fn page(server: &mut ServerGuard, offset: usize, body: String, hits: usize) -> Mock {
        server
            .mock("GET", "/occurrence/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("country".into(), "AT".into()),
                Matcher::UrlEncoded("year".into(), "2020".into()),
                Matcher::UrlEncoded("occurrenceStatus".into(), "PRESENT".into()),
                Matcher::UrlEncoded("offset".into(), offset.to_string()),
            ]))
            .with_status(200)
            .with_body(body)
            .expect(hits)
            .create_async()
            .await
    }

    fn ids() -> (TaxonId, CountryCode) {
        (
            TaxonId::new("4492208").unwrap(),
            CountryCode::new("AT").unwrap(),
        )
    }

    #[tokio::test]
    async fn test_newest_across_pages() {
        let mut server = mockito::Server::new_async().await;
        let first = page(&mut server, 0, page_body(&[(1, "2020-01-01")], false), 1).await;
        let second = page(&mut server, 300, page_body(&[(2, "2020-06-15")], true), 1).await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap()
            .expect("one observation");

        assert_eq!(observation.observation_date, "2020-06-15");
        assert_eq!(observation.observation_id, "2");
        assert_eq!(observation.country_code, country);
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_stops_after_year_end() {
        let mut server = mockito::Server::new_async().await;
        let first = page(
            &mut server,
            0,
            page_body(&[(1, "2020-03-01"), (2, "2020-12-31T23:00:00"), (3, "2020-05-05")], false),
            1,
        )
        .await;
        let never = page(&mut server, 300, page_body(&[(4, "2020-07-01")], true), 0).await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(observation.observation_date, "2020-12-31");
        assert_eq!(observation.original_date, "2020-12-31T23:00:00");
        first.assert_async().await;
        never.assert_async().await;
    }

    #[tokio::test]
    async fn test_short_dates_skipped() {
        let mut server = mockito::Server::new_async().await;
        let _page = page(&mut server, 0, page_body(&[(1, ""), (2, "20")], true), 1).await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap();

        assert!(observation.is_none());
    }

    #[tokio::test]
    async fn test_null_event_date_skipped_without_losing_page() {
        let mut server = mockito::Server::new_async().await;
        let body = r#"{"offset":0,"limit":300,"endOfRecords":true,"count":3,"results":[
            {"key":1,"datasetKey":null,"eventDate":null},
            {"key":2,"datasetKey":"d","eventDate":"2020-06-15"},
            {"key":3,"eventDate":null}
        ]}"#;
        let mock = page(&mut server, 0, body.to_string(), 1).await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap()
            .expect("valid record on a page with null dates");

        assert_eq!(observation.observation_id, "2");
        assert_eq!(observation.observation_date, "2020-06-15");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_first_two_records_never_deduplicated() {
        // Newest-first pages: the second record is accepted even though it is
        // older, the third is skipped because it does not pass the second.
        let mut server = mockito::Server::new_async().await;
        let _page = page(
            &mut server,
            0,
            page_body(&[(1, "2020-08-01"), (2, "2020-02-01"), (3, "2020-01-15"), (4, "2020-04-01")], true),
            1,
        )
        .await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(observation.observation_id, "1");
        assert_eq!(observation.observation_date, "2020-08-01");
    }

    #[tokio::test]
    async fn test_failed_page_ends_crawl_with_what_was_accepted() {
        let mut server = mockito::Server::new_async().await;
        let _first = page(&mut server, 0, page_body(&[(1, "2020-02-02")], false), 1).await;
        let _second = server
            .mock("GET", "/occurrence/search")
            .match_query(Matcher::UrlEncoded("offset".into(), "300".into()))
            .with_status(502)
            .create_async()
            .await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(observation.observation_date, "2020-02-02");
    }

    #[tokio::test]
    async fn test_negative_count_stops() {
        let mut server = mockito::Server::new_async().await;
        let _page = page(
            &mut server,
            0,
            r#"{"count":-1,"results":[{"key":1,"eventDate":"2020-02-02"}]}"#.to_string(),
            1,
        )
        .await;

        let (taxon_id, country) = ids();
        let (_tx, rx) = watch::channel(false);
        let observation = crawler(server.url())
            .crawl_country(&taxon_id, &country, 2020, &rx)
            .await
            .unwrap();

        assert!(observation.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_page_delay() {
        let mut server = mockito::Server::new_async().await;
        let _first = page(&mut server, 0, page_body(&[(1, "2020-02-02")], false), 1).await;

        let config = GbifConfig {
            base_url: server.url(),
            ..Default::default()
        };
        let crawler = ObservationCrawler::new(
            GbifClient::new(&config).unwrap(),
            300,
            Duration::from_secs(60),
        );

        let (tx, rx) = watch::channel(false);
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = tx.send(true);
        });

        let (taxon_id, country) = ids();
        let result = crawler.crawl_country(&taxon_id, &country, 2020, &rx).await;
        assert!(matches!(result, Err(SyncError::Cancelled(_))));
    }

    #[tokio::test]
    async fn test_crawl_all_unions_countries() {
        let mut server = mockito::Server::new_async().await;
        let _at = page(&mut server, 0, page_body(&[(1, "2020-05-05")], true), 1).await;
        let _de = server
            .mock("GET", "/occurrence/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("country".into(), "DE".into()),
                Matcher::UrlEncoded("year".into(), "2019".into()),
            ]))
            .with_status(200)
            .with_body(page_body(&[], true))
            .create_async()
            .await;

        let mut countries = CountryYears::new();
        countries.insert(CountryCode::new("AT").unwrap(), 2020);
        countries.insert(CountryCode::new("DE").unwrap(), 2019);

        let (taxon_id, _) = ids();
        let (_tx, rx) = watch::channel(false);
        let observations = crawler(server.url())
            .crawl_all(&taxon_id, &countries, &rx)
            .await
            .unwrap();

        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].country_code.as_str(), "AT");
    }
}
