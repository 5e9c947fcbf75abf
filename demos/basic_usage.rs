// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Basic usage example.
//!
//! Demonstrates:
//! 1. Connecting to Redis Stack and detecting the search module version
//! 2. Creating a hash index with the fluent builder
//! 3. Writing a handful of documents
//! 4. Searching with a composed query and paging through the results
//! 5. Aggregating through a server-side cursor
//! 6. Dropping the index
//!
//! # Prerequisites
//!
//! ```bash
//! docker run -d -p 6379:6379 redis/redis-stack-server:latest
//! ```
//!
//! # Run
//!
//! ```bash
//! cargo run --example basic_usage
//! ```

use redisearch_protocol::command::{Aggregate, DropIndex, IndexBuilder, Info, Search};
use redisearch_protocol::option::aggregate::{GroupBy, Reducer, WithCursor};
use redisearch_protocol::option::search::SortDirection;
use redisearch_protocol::query::{NumericFacet, QueryBuilder, TagFacet};
use redisearch_protocol::{Client, ClientConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().with_target(false).compact().init();

    println!("\n╔═══════════════════════════════════════════════════════════════╗");
    println!("║         redisearch-protocol: Basic Usage Example              ║");
    println!("╚═══════════════════════════════════════════════════════════════╝\n");

    // ─────────────────────────────────────────────────────────────────────────
    // 1. Connect
    // ─────────────────────────────────────────────────────────────────────────
    let config = ClientConfig {
        redis_url: Some(std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".into())),
        protocol_version: "2.4.3".into(),
        detect_version: true,
        ..Default::default()
    };
    let client = Client::connect(&config)?;
    println!("🔌 Connected. Server search module: {}", client.detect_version()?);

    // ─────────────────────────────────────────────────────────────────────────
    // 2. Create the index
    // ─────────────────────────────────────────────────────────────────────────
    let create = IndexBuilder::new("demo_products")
        .on_hash()
        .prefix("demo:product:")
        .text_sortable("name")
        .tag("brand")
        .numeric_sortable("price", "price")
        .build();
    client.execute(&create)?;
    println!("📦 Created index demo_products");

    // ─────────────────────────────────────────────────────────────────────────
    // 3. Write documents
    // ─────────────────────────────────────────────────────────────────────────
    let products = [
        ("anvil", "acme", 120),
        ("rocket skates", "acme", 950),
        ("portal gun", "globex", 4000),
        ("stapler", "initech", 15),
        ("tps report", "initech", 1),
    ];
    for (i, (name, brand, price)) in products.iter().enumerate() {
        let key = format!("demo:product:{}", i);
        client.call(
            "HSET",
            &[
                key.into(),
                "name".into(),
                (*name).into(),
                "brand".into(),
                (*brand).into(),
                "price".into(),
                (*price).into(),
            ],
        )?;
    }
    let info = client.execute(&Info::new("demo_products"))?;
    println!("📝 Wrote {} documents (indexing: {})", info.num_docs, info.indexing);

    // ─────────────────────────────────────────────────────────────────────────
    // 4. Search
    // ─────────────────────────────────────────────────────────────────────────
    let query = QueryBuilder::new()
        .add(TagFacet::new(["brand"], ["acme", "initech"])?)
        .add(NumericFacet::less_than("price", 1000.0))
        .render();
    println!("\n🔍 Query: {}", query);

    let search = Search::new("demo_products", query)
        .sort_by("price", Some(SortDirection::Desc))
        .limit(0, 2);
    let response = client.execute(&search)?;
    println!("   {} matches over {} pages", response.total(), response.page_count());
    for (page, documents) in response.pages().enumerate() {
        for document in documents? {
            println!(
                "   └─ page {}: {} → {} ({})",
                page,
                document.id,
                document.get("name").unwrap_or_default(),
                document.get("price").unwrap_or_default()
            );
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 5. Aggregate through a cursor
    // ─────────────────────────────────────────────────────────────────────────
    println!("\n📊 Products per brand:");
    let aggregate = Aggregate::new("demo_products", "*")
        .group_by(
            GroupBy::new(["@brand"])
                .reduce(Reducer::count().alias("products"))
                .reduce(Reducer::avg("@price").alias("avg_price")),
        )
        .with_cursor(WithCursor::new().count(2));
    if let Some(cursor) = client.execute(&aggregate)?.into_cursor() {
        for rows in cursor.pages() {
            for row in rows? {
                println!(
                    "   └─ {}: {} products, avg price {:.1}",
                    row.get("brand").unwrap_or_default(),
                    row.get("products").unwrap_or_default(),
                    row.get_f64("avg_price").unwrap_or_default()
                );
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // 6. Clean up
    // ─────────────────────────────────────────────────────────────────────────
    client.execute(&DropIndex::new("demo_products").delete_documents())?;
    println!("\n🧹 Dropped index and documents\n");
    Ok(())
}
