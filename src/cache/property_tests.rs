//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check read/write semantics of the shared cache.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::{Cache, CacheStore, ExpiryPolicy};
use crate::tasks::spawn_reaper;

// == Test Configuration ==
const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
/// Generates request-URL-like keys
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9-]{1,24}".prop_map(|path| format!("https://pokeapi.co/api/v2/{}", path))
}

/// Generates arbitrary byte payloads, including empty ones
fn value_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: String, value: Vec<u8> },
    Get { key: String },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), value_strategy()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Put then Get returns exactly what was stored
    #[test]
    fn prop_roundtrip_storage(key in key_strategy(), value in value_strategy()) {
        let cache = Cache::new(TEST_TTL).unwrap();

        let retrieved = tokio_test::block_on(async {
            cache.put(key.clone(), value.clone()).await;
            cache.get(&key).await
        });

        prop_assert_eq!(retrieved, Some(value));
    }

    // A key that was never inserted is a miss
    #[test]
    fn prop_miss_on_unknown_key(
        stored in prop::collection::vec(key_strategy(), 0..10),
        absent in key_strategy()
    ) {
        prop_assume!(!stored.contains(&absent));
        let cache = Cache::new(TEST_TTL).unwrap();

        let retrieved = tokio_test::block_on(async {
            for key in &stored {
                cache.put(key.clone(), b"x".to_vec()).await;
            }
            cache.get(&absent).await
        });

        prop_assert_eq!(retrieved, None);
    }

    // Last write wins and only one entry remains
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in value_strategy(),
        value2 in value_strategy()
    ) {
        let cache = Cache::new(TEST_TTL).unwrap();

        let (retrieved, len) = tokio_test::block_on(async {
            cache.put(key.clone(), value1).await;
            cache.put(key.clone(), value2.clone()).await;
            (cache.get(&key).await, cache.len().await)
        });

        prop_assert_eq!(retrieved, Some(value2));
        prop_assert_eq!(len, 1);
    }

    // The store agrees with a plain map model for any sequence of operations
    #[test]
    fn prop_matches_map_model(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new();
        let mut model: HashMap<String, Vec<u8>> = HashMap::new();
        let now = tokio::time::Instant::now();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    store.insert(key.clone(), value.clone(), now);
                    model.insert(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(
                        store.lookup(&key, now, TEST_TTL, ExpiryPolicy::Relaxed),
                        model.get(&key).map(Vec::as_slice)
                    );
                }
            }
        }

        prop_assert_eq!(store.len(), model.len());
    }

    // Hits and misses are counted once per read
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..50)) {
        let cache = Cache::new(TEST_TTL).unwrap();

        let (expected_hits, expected_misses, stats) = tokio_test::block_on(async {
            let mut hits = 0u64;
            let mut misses = 0u64;
            for op in ops {
                match op {
                    CacheOp::Put { key, value } => cache.put(key, value).await,
                    CacheOp::Get { key } => match cache.get(&key).await {
                        Some(_) => hits += 1,
                        None => misses += 1,
                    },
                }
            }
            (hits, misses, cache.stats().await)
        });

        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.reclaimed, 0);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    // Concurrent writers and readers never observe a value nobody wrote
    #[test]
    fn prop_concurrent_operation_correctness(
        keys in prop::collection::vec(key_strategy(), 1..5),
        rounds in 10usize..50
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache = Cache::new(TEST_TTL).unwrap();
            let mut handles = vec![];

            for writer in 0..4u8 {
                let cache = cache.clone();
                let keys = keys.clone();
                handles.push(tokio::spawn(async move {
                    for round in 0..rounds {
                        let key = &keys[round % keys.len()];
                        // Every payload is a run of one repeated byte
                        cache.put(key.clone(), vec![writer; 64]).await;
                        if let Some(value) = cache.get(key).await {
                            let intact = value.len() == 64
                                && value[0] < 4
                                && value.iter().all(|b| *b == value[0]);
                            if !intact {
                                return Err(format!("Corrupted value for {}: {:?}", key, value));
                            }
                        }
                    }
                    Ok::<_, String>(())
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            let mut unique = keys.clone();
            unique.sort();
            unique.dedup();
            prop_assert_eq!(cache.len().await, unique.len());
            for key in &unique {
                prop_assert!(cache.get(key).await.is_some(), "Lost entry for {}", key);
            }

            Ok(())
        })?;
    }

    // Reads and writes racing the reaper's delete phase never see a torn value
    #[test]
    fn prop_concurrent_access_with_reaper(
        key_count in 1usize..8,
        rounds in 200usize..1000
    ) {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(4)
            .enable_all()
            .build()
            .unwrap();

        rt.block_on(async {
            let cache = Cache::new(Duration::from_millis(5)).unwrap();
            let reaper = spawn_reaper(&cache);
            let keys: Vec<String> = (0..key_count).map(|i| format!("key-{}", i)).collect();
            let mut handles = vec![];

            for writer in 0..8u8 {
                let cache = cache.clone();
                let keys = keys.clone();
                handles.push(tokio::spawn(async move {
                    for round in 0..rounds {
                        let key = &keys[(round + writer as usize) % keys.len()];
                        if round % 3 == 0 {
                            cache.put(key.clone(), vec![writer; 32]).await;
                        }
                        if let Some(value) = cache.get(key).await {
                            let intact = value.len() == 32
                                && value[0] < 8
                                && value.iter().all(|b| *b == value[0]);
                            if !intact {
                                return Err(format!("Corrupted value for {}: {:?}", key, value));
                            }
                        }
                        if round % 50 == 0 {
                            tokio::task::yield_now().await;
                        }
                    }
                    Ok::<_, String>(())
                }));
            }

            for handle in handles {
                let result = handle.await.expect("Task should not panic");
                prop_assert!(result.is_ok(), "Concurrent operation failed: {:?}", result);
            }

            // Once writes stop, the reaper drains every entry
            let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
            while !cache.is_empty().await && tokio::time::Instant::now() < deadline {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            let remaining = cache.len().await;
            prop_assert_eq!(remaining, 0, "Reaper left {} entries", remaining);
            prop_assert!(cache.stats().await.reclaimed >= 1);

            reaper.shutdown().await;
            Ok(())
        })?;
    }
}
