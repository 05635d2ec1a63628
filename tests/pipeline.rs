//! Integration tests for the discovery pipeline.
//!
//! These tests drive `search` end-to-end over a recording mock transport:
//! gate ordering and its zero-search invariants, result accumulation and
//! truncation, and the rate-limit backoff behavior.

use std::time::Duration;

use media_scout::config::{Config, GatewayConfig, PipelineConfig, ServerConfig, SourcesConfig};
use media_scout::models::{DenialReason, GateDecision, RequesterId, SourceId};
use media_scout::search::{search, SearchError, SearchOutcome};
use media_scout::testing::{item, MockTransport};
use media_scout::transport::TransportError;

const REQUESTER: RequesterId = RequesterId(12345);

// ─── Config fixture ─────────────────────────────────────────────────

fn test_config(channels: &[i64]) -> Config {
    Config {
        gateway: GatewayConfig {
            base_url: "https://gateway.test".to_string(),
            token: "test-token".to_string(),
            timeout_secs: 30,
        },
        pipeline: PipelineConfig {
            // No politeness pause so un-paused tests run instantly.
            source_pause_ms: 0,
            ..PipelineConfig::default()
        },
        server: ServerConfig {
            bind: "127.0.0.1:0".to_string(),
        },
        sources: SourcesConfig {
            channels: channels.iter().map(|&id| SourceId(id)).collect(),
        },
    }
}

// ─── Gate semantics ─────────────────────────────────────────────────

#[tokio::test]
async fn membership_denial_blocks_before_any_search() {
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new()
        .deny_membership(SourceId(-1002))
        .with_items(SourceId(-1001), vec![item(SourceId(-1001), 1, "Movie 720p")]);

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert_eq!(
        outcome,
        SearchOutcome::Rejected(GateDecision::deny(
            SourceId(-1002),
            DenialReason::NotMember
        ))
    );
    assert!(transport.search_calls().is_empty());
}

#[tokio::test]
async fn membership_is_reported_before_permission() {
    // The first channel is missing the service permission, the second is
    // missing the requester's membership. Membership runs over all
    // channels first, so the denial is NotMember on the second channel.
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new()
        .deny_permission(SourceId(-1001))
        .deny_membership(SourceId(-1002));

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert_eq!(
        outcome,
        SearchOutcome::Rejected(GateDecision::deny(
            SourceId(-1002),
            DenialReason::NotMember
        ))
    );
    assert!(transport.permission_calls().is_empty());
    assert!(transport.search_calls().is_empty());
}

#[tokio::test]
async fn permission_denial_names_the_failing_channel() {
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new().deny_permission(SourceId(-1002));

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert_eq!(
        outcome,
        SearchOutcome::Rejected(GateDecision::deny(
            SourceId(-1002),
            DenialReason::BotLacksPermission
        ))
    );
    assert!(transport.search_calls().is_empty());
}

#[tokio::test]
async fn invalid_query_is_rejected_before_gating() {
    let config = test_config(&[-1001]);
    let transport = MockTransport::new();

    let err = search(&transport, &config, REQUESTER, "   ").await.unwrap_err();

    assert_eq!(err, SearchError::InvalidQuery);
    assert!(transport.member_calls().is_empty());
    assert!(transport.search_calls().is_empty());
}

#[tokio::test]
async fn empty_channel_list_passes_gate_and_finds_nothing() {
    let config = test_config(&[]);
    let transport = MockTransport::new();

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert_eq!(outcome, SearchOutcome::NoResults);
    assert!(transport.member_calls().is_empty());
    assert!(transport.search_calls().is_empty());
}

// ─── Aggregation and formatting ─────────────────────────────────────

#[tokio::test]
async fn results_preserve_channel_and_message_order() {
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new()
        .with_items(
            SourceId(-1001),
            vec![
                item(SourceId(-1001), 1, "Alpha (2020) [English] 720p"),
                item(SourceId(-1001), 2, "just chatter"),
                item(SourceId(-1001), 3, "Beta (2021) 1080p"),
            ],
        )
        .with_items(
            SourceId(-1002),
            vec![item(SourceId(-1002), 4, "Gamma [Hindi] BluRay")],
        );

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    let report = match outcome {
        SearchOutcome::Results(report) => report,
        other => panic!("expected results, got {:?}", other),
    };
    assert_eq!(report.overflow, 0);
    assert_eq!(report.lines.len(), 3);
    assert!(report.lines[0].contains("Alpha"));
    assert!(report.lines[1].contains("Beta"));
    assert!(report.lines[2].contains("Gamma"));

    // Channels were searched sequentially in configuration order.
    let searched: Vec<SourceId> = transport.search_calls().iter().map(|c| c.0).collect();
    assert_eq!(searched, vec![SourceId(-1001), SourceId(-1002)]);
}

#[tokio::test]
async fn fifteen_matches_show_ten_with_overflow_note() {
    let items: Vec<_> = (1..=15)
        .map(|id| {
            item(
                SourceId(-1001),
                id,
                &format!("Feature {} (2019) [English] 1080p", id),
            )
        })
        .collect();
    let config = test_config(&[-1001]);
    let transport = MockTransport::new().with_items(SourceId(-1001), items);

    let outcome = search(&transport, &config, REQUESTER, "feature").await.unwrap();

    let report = match &outcome {
        SearchOutcome::Results(report) => report,
        other => panic!("expected results, got {:?}", other),
    };
    assert_eq!(report.lines.len(), 10);
    assert_eq!(report.overflow, 5);
    assert!(outcome
        .render("feature")
        .ends_with("... and 5 more results found!"));
}

#[tokio::test]
async fn no_extractable_records_is_a_distinct_outcome() {
    let config = test_config(&[-1001]);
    let transport = MockTransport::new().with_items(
        SourceId(-1001),
        vec![item(SourceId(-1001), 1, "no release tags here")],
    );

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert_eq!(outcome, SearchOutcome::NoResults);
    assert_eq!(
        outcome.render("movie"),
        "❌ No results found for 'movie' in any connected channels."
    );
}

#[tokio::test]
async fn links_are_derived_from_the_item_locator() {
    let config = test_config(&[-1008484894]);
    let transport = MockTransport::new().with_items(
        SourceId(-1008484894),
        vec![item(SourceId(-1008484894), 77, "Alpha (2020) 720p")],
    );

    let outcome = search(&transport, &config, REQUESTER, "alpha").await.unwrap();

    let report = match outcome {
        SearchOutcome::Results(report) => report,
        other => panic!("expected results, got {:?}", other),
    };
    assert!(report.lines[0].contains("https://t.me/c/8484894/77"));
}

// ─── Fault absorption ───────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn rate_limit_retries_once_without_aborting_the_pipeline() {
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new()
        .with_search_fault(
            SourceId(-1001),
            TransportError::RateLimited {
                retry_after: Duration::from_secs(4),
            },
        )
        .with_items(
            SourceId(-1001),
            vec![item(SourceId(-1001), 1, "Alpha (2020) 720p")],
        )
        .with_items(
            SourceId(-1002),
            vec![item(SourceId(-1002), 2, "Beta (2021) 1080p")],
        );

    let started = tokio::time::Instant::now();
    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert!(started.elapsed() >= Duration::from_secs(4));

    let report = match outcome {
        SearchOutcome::Results(report) => report,
        other => panic!("expected results, got {:?}", other),
    };
    assert_eq!(report.lines.len(), 2);

    // Retried channel was searched twice, the other exactly once.
    let searched: Vec<SourceId> = transport.search_calls().iter().map(|c| c.0).collect();
    assert_eq!(
        searched,
        vec![SourceId(-1001), SourceId(-1001), SourceId(-1002)]
    );
}

#[tokio::test(start_paused = true)]
async fn repeated_rate_limit_degrades_to_zero_results_for_that_channel() {
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new()
        .with_search_fault(
            SourceId(-1001),
            TransportError::RateLimited {
                retry_after: Duration::from_secs(1),
            },
        )
        .with_search_fault(
            SourceId(-1001),
            TransportError::RateLimited {
                retry_after: Duration::from_secs(1),
            },
        )
        .with_items(
            SourceId(-1001),
            vec![item(SourceId(-1001), 1, "Alpha (2020) 720p")],
        )
        .with_items(
            SourceId(-1002),
            vec![item(SourceId(-1002), 2, "Beta (2021) 1080p")],
        );

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    let report = match outcome {
        SearchOutcome::Results(report) => report,
        other => panic!("expected results, got {:?}", other),
    };
    assert_eq!(report.lines.len(), 1);
    assert!(report.lines[0].contains("Beta"));
}

#[tokio::test]
async fn transport_fault_on_one_channel_spares_the_others() {
    let config = test_config(&[-1001, -1002]);
    let transport = MockTransport::new()
        .with_search_fault(
            SourceId(-1001),
            TransportError::Inaccessible("kicked from channel".to_string()),
        )
        .with_items(
            SourceId(-1002),
            vec![item(SourceId(-1002), 2, "Beta (2021) 1080p")],
        );

    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    let report = match outcome {
        SearchOutcome::Results(report) => report,
        other => panic!("expected results, got {:?}", other),
    };
    assert_eq!(report.lines.len(), 1);
    assert!(report.lines[0].contains("Beta"));
}

// ─── Pacing ─────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn pause_is_inserted_between_channels() {
    let mut config = test_config(&[-1001, -1002, -1003]);
    config.pipeline.source_pause_ms = 1000;
    let transport = MockTransport::new();

    let started = tokio::time::Instant::now();
    let outcome = search(&transport, &config, REQUESTER, "movie").await.unwrap();

    assert_eq!(outcome, SearchOutcome::NoResults);
    // Two gaps between three channels, none after the last.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_secs(2), "elapsed: {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(3), "elapsed: {:?}", elapsed);
}
