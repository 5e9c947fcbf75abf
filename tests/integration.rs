//! Integration Tests against a real search engine
//!
//! These tests need a Redis server with the search module loaded. They use
//! testcontainers to start `redis/redis-stack-server`, so no external
//! docker-compose is required.
//!
//! # Running Tests
//! ```bash
//! # Run all integration tests (requires Docker)
//! cargo test --test integration -- --ignored
//!
//! # Run only happy-path tests
//! cargo test --test integration happy -- --ignored
//!
//! # Run only failure scenario tests
//! cargo test --test integration failure -- --ignored
//! ```
//!
//! # Test Organization
//! - `happy_*` - Normal operation: index lifecycle, search, aggregate, cursors
//! - `failure_*` - Server-side rejections surface as typed errors

use std::thread;
use std::time::Duration;

use redisearch_protocol::client::RedisTransport;
use redisearch_protocol::command::{
    Aggregate, AliasAdd, AliasDelete, DictAdd, DictDelete, DictDump, DropIndex, IndexBuilder, Info,
    ListIndexes, Search, SpellCheck, SugAdd, SugGet, SugLen, TagValues,
};
use redisearch_protocol::option::aggregate::{GroupBy, Reducer, WithCursor};
use redisearch_protocol::option::schema::SchemaField;
use redisearch_protocol::option::search::SortDirection;
use redisearch_protocol::query::QueryBuilder;
use redisearch_protocol::{Client, ClientConfig, Error};

use testcontainers::{clients::Cli, core::WaitFor, Container, GenericImage};

// =============================================================================
// Container Helpers
// =============================================================================

/// Redis Stack (search module included)
fn redis_stack_container(docker: &Cli) -> Container<'_, GenericImage> {
    let image = GenericImage::new("redis/redis-stack-server", "latest")
        .with_exposed_port(6379)
        .with_wait_for(WaitFor::message_on_stdout("Ready to accept connections"));
    docker.run(image)
}

fn connect(container: &Container<'_, GenericImage>) -> Client {
    let config = ClientConfig {
        redis_url: Some(format!("redis://127.0.0.1:{}", container.get_host_port_ipv4(6379))),
        protocol_version: "2.4.3".into(),
        detect_version: true,
        ..Default::default()
    };
    Client::connect(&config).expect("Failed to connect")
}

/// Seed hashes through the raw call path.
fn seed_products(client: &Client, count: usize) {
    let brands = ["acme", "globex", "initech"];
    for i in 0..count {
        let key = format!("product:{}", i);
        let brand = brands[i % brands.len()];
        let price = (i * 10).to_string();
        let name = format!("widget model {}", i);
        client
            .call(
                "HSET",
                &[
                    key.into(),
                    "name".into(),
                    name.into(),
                    "brand".into(),
                    brand.into(),
                    "price".into(),
                    price.into(),
                ],
            )
            .expect("HSET failed");
    }
}

fn create_products_index(client: &Client) {
    let create = IndexBuilder::new("products")
        .on_hash()
        .prefix("product:")
        .text_sortable("name")
        .tag("brand")
        .field(SchemaField::numeric("price").sortable())
        .build();
    client.execute(&create).expect("FT.CREATE failed");
}

/// Wait for the background scan to finish.
fn wait_indexed(client: &Client, index: &str) {
    for _ in 0..50 {
        let info = client.execute(&Info::new(index)).expect("FT.INFO failed");
        if !info.indexing {
            return;
        }
        thread::sleep(Duration::from_millis(100));
    }
    panic!("index {} never finished scanning", index);
}

// =============================================================================
// Happy Path Tests - Normal Operation
// =============================================================================

#[test]
#[ignore] // Requires Docker
fn happy_index_lifecycle() {
    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let client = connect(&redis);
    assert!(client.detect_version().expect("MODULE LIST failed").major >= 2);

    create_products_index(&client);
    seed_products(&client, 9);
    wait_indexed(&client, "products");

    let indexes = client.execute(&ListIndexes::new()).expect("FT._LIST failed");
    assert_eq!(indexes, vec!["products".to_string()]);

    let info = client.execute(&Info::new("products")).expect("FT.INFO failed");
    assert_eq!(info.name, "products");
    assert_eq!(info.num_docs, 9);

    let mut brands = client
        .execute(&TagValues::new("products", "brand"))
        .expect("FT.TAGVALS failed");
    brands.sort();
    assert_eq!(brands, vec!["acme", "globex", "initech"]);

    client
        .execute(&AliasAdd::new("current_products", "products"))
        .expect("FT.ALIASADD failed");
    let page = client
        .execute(&Search::new("current_products", "*").no_content())
        .expect("search through alias failed");
    assert_eq!(page.total(), 9);
    client
        .execute(&AliasDelete::new("current_products"))
        .expect("FT.ALIASDEL failed");

    client
        .execute(&DropIndex::new("products").delete_documents())
        .expect("FT.DROPINDEX failed");
    assert!(client.execute(&ListIndexes::new()).unwrap().is_empty());
}

#[test]
#[ignore] // Requires Docker
fn happy_search_pages_through_results() {
    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let client = connect(&redis);
    create_products_index(&client);
    seed_products(&client, 7);
    wait_indexed(&client, "products");

    let query = QueryBuilder::new().word("widget").render();
    let search = Search::new("products", query)
        .sort_by("price", Some(SortDirection::Asc))
        .limit(0, 2);
    let response = client.execute(&search).expect("FT.SEARCH failed");
    assert_eq!(response.total(), 7);
    assert_eq!(response.page_count(), 4);

    let prices: Vec<String> = response
        .pages()
        .collect::<Result<Vec<_>, _>>()
        .expect("page fetch failed")
        .into_iter()
        .flatten()
        .filter_map(|doc| doc.get("price"))
        .collect();
    assert_eq!(prices, ["0", "10", "20", "30", "40", "50", "60"]);
}

#[test]
#[ignore] // Requires Docker
fn happy_facets_and_ranges() {
    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let client = connect(&redis);
    create_products_index(&client);
    seed_products(&client, 9);
    wait_indexed(&client, "products");

    let query = QueryBuilder::new()
        .tags("brand", ["acme"])
        .expect("tag facet")
        .numeric_range("price", Some(10.0), None)
        .render();
    let response = client
        .execute(&Search::new("products", query).no_content())
        .expect("FT.SEARCH failed");
    // acme holds products 0, 3, 6; price 0 is excluded
    assert_eq!(response.total(), 2);
}

#[test]
#[ignore] // Requires Docker
fn happy_aggregate_with_cursor() {
    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let client = connect(&redis);
    create_products_index(&client);
    seed_products(&client, 30);
    wait_indexed(&client, "products");

    let aggregate = Aggregate::new("products", "*")
        .load(["@price"])
        .apply("@price * 2", "double")
        .with_cursor(WithCursor::new().count(4));
    let cursor = client
        .execute(&aggregate)
        .expect("FT.AGGREGATE failed")
        .into_cursor()
        .expect("cursor reply");
    let rows: usize = cursor
        .pages()
        .map(|page| page.expect("cursor read failed").len())
        .sum();
    assert_eq!(rows, 30);

    let grouped = Aggregate::new("products", "*")
        .group_by(GroupBy::new(["@brand"]).reduce(Reducer::count().alias("n")))
        .limit(0, 10);
    let result = client.execute(&grouped).expect("FT.AGGREGATE failed");
    let total: f64 = result.rows().iter().filter_map(|row| row.get_f64("n")).sum();
    assert_eq!(total, 30.0);
}

#[test]
#[ignore] // Requires Docker
fn happy_dictionaries_and_suggestions() {
    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let client = connect(&redis);
    create_products_index(&client);
    seed_products(&client, 3);
    wait_indexed(&client, "products");

    assert_eq!(client.execute(&DictAdd::new("extra", ["widgt", "gadget"])).unwrap(), 2);
    let mut terms = client.execute(&DictDump::new("extra")).unwrap();
    terms.sort();
    assert_eq!(terms, vec!["gadget", "widgt"]);

    let corrections = client
        .execute(&SpellCheck::new("products", "widgte"))
        .expect("FT.SPELLCHECK failed");
    assert!(corrections.iter().any(|result| result.term == "widgte"));
    assert_eq!(client.execute(&DictDelete::new("extra", ["widgt"])).unwrap(), 1);

    client.execute(&SugAdd::new("ac", "hello world", 1.0)).unwrap();
    client.execute(&SugAdd::new("ac", "help desk", 0.5)).unwrap();
    assert_eq!(client.execute(&SugLen::new("ac")).unwrap(), 2);
    let suggestions = client
        .execute(&SugGet::new("ac", "hel").with_scores().max(5))
        .expect("FT.SUGGET failed");
    assert_eq!(suggestions.len(), 2);
    assert!(suggestions.iter().all(|s| s.score.is_some()));
}

// =============================================================================
// Failure Scenarios
// =============================================================================

#[test]
#[ignore] // Requires Docker
fn failure_unknown_index_is_server_error() {
    let docker = Cli::default();
    let redis = redis_stack_container(&docker);
    let client = connect(&redis);

    let err = client.execute(&Info::new("nope")).unwrap_err();
    assert!(matches!(err, Error::Server(_)), "unexpected error: {:?}", err);
}

#[test]
#[ignore] // Requires Docker
fn failure_connection_refused_is_transport_error() {
    let config = ClientConfig {
        redis_url: Some("redis://127.0.0.1:1".into()),
        ..Default::default()
    };
    assert!(matches!(Client::connect(&config), Err(Error::Transport(_))));
    assert!(RedisTransport::connect("not a url").is_err());
}
