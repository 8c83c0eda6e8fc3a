// src/pipeline/bot.rs

//! Bot orchestration: one full fetch → filter → publish → persist run.

use std::sync::Arc;

use crate::error::Result;
use crate::models::{BotOptions, Config, Credentials, FeedItem, History};
use crate::pipeline::filter::filter_new;
use crate::pipeline::publish::publish_new_items;
use crate::services::{BskyAgent, BskyPublisher, FeedClient, Publisher};
use crate::storage::{HistoryStore, JsonHistoryStore};
use crate::utils::http;

/// The bot, holding an authenticated publisher and a feed client.
pub struct Bot {
    publisher: BskyPublisher,
    feed: FeedClient,
}

impl Bot {
    /// Build the HTTP client, authenticate, and return a ready bot.
    ///
    /// Login failure is the one fatal error of a run.
    pub async fn connect(config: Arc<Config>, credentials: &Credentials) -> Result<Self> {
        let client = http::create_async_client(&config.http)?;

        let mut agent = BskyAgent::new(client.clone(), &credentials.service);
        agent.login(credentials).await?;

        Ok(Self {
            publisher: BskyPublisher::new(agent, config),
            feed: FeedClient::new(client),
        })
    }

    /// Run the bot once against a feed URL.
    ///
    /// Returns the new (post-filter) items of this run in the feed's
    /// native order, whether or not they were published — the return
    /// value is for inspection and logging.
    pub async fn run(feed_url: &str, options: &BotOptions, config: Config) -> Result<Vec<FeedItem>> {
        let config = Arc::new(config);
        let credentials = Credentials::from_env()?;

        let bot = Self::connect(config, &credentials).await?;
        let items = bot.feed.fetch_items(feed_url).await;

        let store = JsonHistoryStore::new(&options.cache_file);
        execute(&bot.publisher, &store, items, options).await
    }
}

/// The run pipeline, independent of the concrete publisher and store.
async fn execute(
    publisher: &dyn Publisher,
    store: &dyn HistoryStore,
    items: Vec<FeedItem>,
    options: &BotOptions,
) -> Result<Vec<FeedItem>> {
    // A missing store file marks the first run for this feed, which gets
    // its own publish quota.
    let (mut history, quota) = if store.exists().await {
        (store.load().await, options.post_limit)
    } else {
        log::debug!("No cache file found, treating this as the first run");
        (History::new(), options.initial_post_limit)
    };

    let new_items = filter_new(&items, &history);
    log::debug!(
        "{} of {} feed items are new",
        new_items.len(),
        items.len()
    );

    if options.dry_run {
        log::info!(
            "Dry run: {} new items, nothing published",
            new_items.len()
        );
    } else {
        // Publish oldest first so the account timeline reads in
        // published order.
        let chronological: Vec<FeedItem> = new_items.iter().rev().cloned().collect();
        let outcome =
            publish_new_items(publisher, &chronological, quota, &mut history).await;
        log::info!(
            "Published {}/{} new items ({} skipped by limit, {} failed)",
            outcome.published,
            outcome.attempted,
            outcome.skipped,
            outcome.failed
        );
    }

    store.persist(options.cache_limit, &history).await;

    Ok(new_items)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tempfile::TempDir;

    use super::*;
    use crate::error::AppError;
    use crate::models::PostReceipt;
    use crate::utils::fingerprint;

    #[derive(Default)]
    struct MockPublisher {
        fail_links: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockPublisher {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Publisher for MockPublisher {
        async fn publish(&self, item: &FeedItem) -> crate::error::Result<PostReceipt> {
            self.calls.lock().unwrap().push(item.link.clone());
            if self.fail_links.contains(&item.link) {
                return Err(AppError::publish(item.title.clone(), "api rejected"));
            }
            Ok(PostReceipt {
                uri: format!("at://did:plc:test/app.bsky.feed.post/{}", item.title),
                cid: "bafyrei".to_string(),
            })
        }
    }

    fn item(title: &str) -> FeedItem {
        FeedItem {
            title: title.to_string(),
            link: format!("https://example.com/{}", title.to_lowercase()),
            comments: None,
            published: None,
        }
    }

    fn options_in(tmp: &TempDir) -> BotOptions {
        BotOptions {
            cache_file: tmp.path().join("cache.json"),
            ..BotOptions::default()
        }
    }

    #[tokio::test]
    async fn test_first_run_scenario() {
        // Feed [A(newest), B, C(oldest)], no cache, initial limit 2:
        // C then B are published, A stays a candidate.
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            initial_post_limit: 2,
            post_limit: 1,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        let publisher = MockPublisher::default();
        let items = vec![item("A"), item("B"), item("C")];

        let result = execute(&publisher, &store, items.clone(), &options)
            .await
            .unwrap();

        // Feed-native order in the return value.
        assert_eq!(result, items);
        assert_eq!(
            publisher.calls(),
            vec!["https://example.com/c", "https://example.com/b"]
        );
        let persisted = store.load().await;
        assert_eq!(
            persisted.entries(),
            &[
                fingerprint("https://example.com/c"),
                fingerprint("https://example.com/b"),
            ]
        );
    }

    #[tokio::test]
    async fn test_steady_state_scenario() {
        // History already holds B; feed [A, B, C] with quota 5 publishes
        // C then A and appends them after B.
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            post_limit: 5,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        store
            .persist(
                100,
                &History::from_entries(vec![fingerprint("https://example.com/b")]),
            )
            .await;

        let publisher = MockPublisher::default();
        let items = vec![item("A"), item("B"), item("C")];

        let result = execute(&publisher, &store, items, &options).await.unwrap();

        let titles: Vec<_> = result.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
        assert_eq!(
            publisher.calls(),
            vec!["https://example.com/c", "https://example.com/a"]
        );
        assert_eq!(
            store.load().await.entries(),
            &[
                fingerprint("https://example.com/b"),
                fingerprint("https://example.com/c"),
                fingerprint("https://example.com/a"),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_run_uses_initial_limit() {
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            initial_post_limit: 0,
            post_limit: 5,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        let publisher = MockPublisher::default();

        execute(&publisher, &store, vec![item("A")], &options)
            .await
            .unwrap();

        assert!(publisher.calls().is_empty());
        // Nothing published, so no cache file either.
        assert!(!store.exists().await);
    }

    #[tokio::test]
    async fn test_existing_store_uses_post_limit() {
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            initial_post_limit: 5,
            post_limit: 0,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        store
            .persist(100, &History::from_entries(vec!["seed".to_string()]))
            .await;

        let publisher = MockPublisher::default();
        execute(&publisher, &store, vec![item("A")], &options)
            .await
            .unwrap();

        assert!(publisher.calls().is_empty());
    }

    #[tokio::test]
    async fn test_dry_run_publishes_and_persists_nothing() {
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            dry_run: true,
            initial_post_limit: 5,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        let publisher = MockPublisher::default();
        let items = vec![item("A"), item("B")];

        let result = execute(&publisher, &store, items.clone(), &options)
            .await
            .unwrap();

        // The dedup result is still computed and returned.
        assert_eq!(result, items);
        assert!(publisher.calls().is_empty());
        assert!(!store.exists().await);
    }

    #[tokio::test]
    async fn test_empty_feed_degenerates_gracefully() {
        let tmp = TempDir::new().unwrap();
        let options = options_in(&tmp);
        let store = JsonHistoryStore::new(&options.cache_file);
        let publisher = MockPublisher::default();

        let result = execute(&publisher, &store, Vec::new(), &options)
            .await
            .unwrap();

        assert!(result.is_empty());
        assert!(publisher.calls().is_empty());
        assert!(!store.exists().await);
    }

    #[tokio::test]
    async fn test_failed_item_kept_out_of_history() {
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            initial_post_limit: 5,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        let publisher = MockPublisher {
            fail_links: ["https://example.com/b".to_string()].into(),
            ..MockPublisher::default()
        };

        execute(
            &publisher,
            &store,
            vec![item("A"), item("B"), item("C")],
            &options,
        )
        .await
        .unwrap();

        let persisted = store.load().await;
        assert_eq!(
            persisted.entries(),
            &[
                fingerprint("https://example.com/c"),
                fingerprint("https://example.com/a"),
            ]
        );
    }

    #[tokio::test]
    async fn test_cache_limit_applied_on_persist() {
        let tmp = TempDir::new().unwrap();
        let options = BotOptions {
            cache_limit: 2,
            initial_post_limit: 5,
            ..options_in(&tmp)
        };
        let store = JsonHistoryStore::new(&options.cache_file);
        let publisher = MockPublisher::default();

        execute(
            &publisher,
            &store,
            vec![item("A"), item("B"), item("C")],
            &options,
        )
        .await
        .unwrap();

        // C, B, A were published; only the newest two survive eviction.
        assert_eq!(
            store.load().await.entries(),
            &[
                fingerprint("https://example.com/b"),
                fingerprint("https://example.com/a"),
            ]
        );
    }
}
