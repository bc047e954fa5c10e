//! Quick benchmark for parse + evaluate over a synthetic document

use serde_json::{json, Value};
use sitegen::{parse, Block, EvalContext, MemoryStore, MockFetcher};
use std::time::Instant;

fn repos(count: usize) -> Value {
    let items: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "name": format!("repo-{i}"),
                "stargazers_count": (i * 7919) % 1000,
                "pushed_at": format!("2024-{:02}-{:02}T10:00:00Z", i % 12 + 1, i % 28 + 1),
                "owner": {"login": "someone"},
            })
        })
        .collect();
    Value::Array(items)
}

const DOC: &str = "\
repos = repos.json
!langs = langs.json << http://bench/{repo.name}

{intro: Repositories}
[for repo in repos: stargazers_count, pushed_at]
  repo.name
  repo.owner.login
  langs.Rust
";

fn main() {
    let iterations = 1_000;

    println!("Render Performance Test");
    println!("=======================\n");

    let start = Instant::now();
    for _ in 0..iterations {
        let _ = parse(DOC);
    }
    let elapsed = start.elapsed();
    println!("Parse x{iterations}: {elapsed:?} ({:?}/op)\n", elapsed / iterations);

    for count in [10usize, 100, 1_000] {
        let mut store = MemoryStore::new();
        store.insert_json("repos.json", &repos(count));
        let doc = match parse(DOC) {
            Ok(doc) => doc,
            Err(e) => {
                eprintln!("parse failed: {e}");
                return;
            }
        };
        let identity = |s: &str| s.to_string();

        // cold: every lazy key fetched once
        let mut fetcher = MockFetcher::new().with_default(r#"{"Rust": 1}"#);
        let start = Instant::now();
        let mut ctx = match EvalContext::new(&doc, &store, &mut fetcher) {
            Ok(ctx) => ctx,
            Err(e) => {
                eprintln!("context failed: {e}");
                return;
            }
        };
        let blocks = ctx.evaluate(&doc.nodes, &identity);
        let cold = start.elapsed();

        // warm: every lazy key served from the cache
        let start = Instant::now();
        let rounds = 20;
        for _ in 0..rounds {
            let _ = ctx.evaluate(&doc.nodes, &identity);
        }
        let warm = start.elapsed() / rounds;

        println!("Items: {count}");
        println!("  Fields: {}", Block::field_texts(&blocks).len());
        println!("  Cold evaluate: {cold:?}");
        println!("  Warm evaluate: {warm:?}\n");
    }
}
