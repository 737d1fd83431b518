//! Criterion benchmarks for emotecss critical paths
//!
//! Benchmarks the core operations on a generated stylesheet:
//! - Stylesheet: reading rules from text
//! - Selector: emote selector classification
//! - Pipeline: rules to finished catalog

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use emotecss::diagnostics::Diagnostics;
use emotecss::pipeline::extract_catalog;
use emotecss::selector::parse_emote_selector;
use emotecss::stylesheet::parse_stylesheet;
use std::collections::HashSet;

// =============================================================================
// Test Data Generators
// =============================================================================

/// Generate a stylesheet with `n` spritesheet emotes (each with a hover
/// variant) spread over sheets of 20, plus a small ignore region.
fn make_stylesheet(n: usize) -> String {
    let mut css = String::new();
    for i in 0..n {
        let sheet = i / 20;
        let slot = (i % 20) as i32;
        css.push_str(&format!(
            "a[href|=\"/emote{i}\"] {{ display: block; float: left; \
             background-image: url(%%sheet{sheet}%%); width: 70px; height: 70px; \
             background-position: {x}px 0px }}\n\
             a[href|=\"/emote{i}\"]:hover {{ background-position: {x}px -70px }}\n",
            i = i,
            sheet = sheet,
            x = -70 * slot,
        ));
    }
    css.push_str("START-PONYSCRIPT-IGNORE { }\n");
    css.push_str("a[href|=\"/hidden\"] { color: red }\n");
    css.push_str("END-PONYSCRIPT-IGNORE { }\n");
    css
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_stylesheet(c: &mut Criterion) {
    let mut group = c.benchmark_group("stylesheet");
    for n in [100, 1000] {
        let css = make_stylesheet(n);
        group.throughput(Throughput::Bytes(css.len() as u64));
        group.bench_with_input(BenchmarkId::new("parse", n), &css, |b, css| {
            b.iter(|| parse_stylesheet(black_box(css)))
        });
    }
    group.finish();
}

fn bench_selector(c: &mut Criterion) {
    let selectors = [
        r#"a[href|="/ajlie"]"#,
        r#"a[href|="/ajlie"]:hover"#,
        r#"a:active[href|="/pp:3"]"#,
        ".md a:not(.x)",
    ];
    c.bench_function("selector/classify", |b| {
        b.iter(|| {
            let mut diags = Diagnostics::new();
            for selector in selectors {
                black_box(parse_emote_selector(black_box(selector), &mut diags));
            }
        })
    });
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");
    let requested = HashSet::new();
    for n in [100, 1000] {
        let rules = parse_stylesheet(&make_stylesheet(n)).expect("generated stylesheet parses");
        group.throughput(Throughput::Elements(rules.len() as u64));
        group.bench_with_input(BenchmarkId::new("extract_catalog", n), &rules, |b, rules| {
            b.iter(|| {
                let mut diags = Diagnostics::new();
                extract_catalog(black_box(rules), &requested, &mut diags)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stylesheet, bench_selector, bench_pipeline);
criterion_main!(benches);
