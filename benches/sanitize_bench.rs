//! Benchmarks for schema dump sanitization.
//!
//! Tests:
//! - Clean dumps (nothing to rewrite)
//! - Dumps with managed-service extensions and replication objects

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use tusk::sanitizer::sanitize;

/// Schema dump with `tables` CREATE TABLE blocks and an optional noisy preamble
fn generate_dump(tables: usize, noisy: bool) -> String {
    let mut ddl = String::new();
    if noisy {
        ddl.push_str("CREATE EXTENSION IF NOT EXISTS aws_s3 WITH SCHEMA public;\n");
        ddl.push_str("COMMENT ON EXTENSION aws_s3 IS 'AWS S3 extension';\n");
        ddl.push_str("CREATE EXTENSION IF NOT EXISTS pg_cron WITH SCHEMA pg_catalog;\n");
        ddl.push_str("CREATE EXTENSION IF NOT EXISTS postgis WITH SCHEMA public;\n");
        ddl.push_str("CREATE PUBLICATION analytics FOR ALL TABLES;\n");
    }
    for i in 0..tables {
        ddl.push_str(&format!(
            "CREATE TABLE public.table_{i} (\n    id bigint NOT NULL,\n    name text,\n    created_at timestamp with time zone DEFAULT now()\n);\n\n\
             ALTER TABLE ONLY public.table_{i}\n    ADD CONSTRAINT table_{i}_pkey PRIMARY KEY (id);\n\n"
        ));
    }
    ddl
}

fn bench_sanitize(c: &mut Criterion) {
    let mut group = c.benchmark_group("sanitize");
    for tables in [10usize, 100, 1000] {
        for noisy in [false, true] {
            let ddl = generate_dump(tables, noisy);
            let label = if noisy { "noisy" } else { "clean" };
            group.throughput(Throughput::Bytes(ddl.len() as u64));
            group.bench_with_input(
                BenchmarkId::new(label, tables),
                &ddl,
                |b, ddl| b.iter(|| sanitize(black_box(ddl))),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_sanitize);
criterion_main!(benches);
