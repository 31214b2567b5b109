// Copyright (c) 2026 Bountyy Oy. All rights reserved.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use vserver::{extract_array, ListingPage};

fn listing_page(rows: usize) -> String {
    let mut list = String::new();
    for i in 0..rows {
        list.push_str(&format!(
            "{p},{p},0,\"192.168.0.{h}\",1,1,\n",
            p = 1000 + i,
            h = i % 250 + 1
        ));
    }
    format!(
        "<script>\nvar virServerListPara = new Array(\n{list}0,0 );\n</script>\n\
         <script>\nvar virServerPara = new Array(\n1,0,{rows},6,{rows},\n0,0 );\n</script>\n\
         <script>\nvar protocolList = new Array(\n\"ALL\",\"TCP\",\"UDP\",\n0,0 );\n</script>\n"
    )
}

fn extract_benchmark(c: &mut Criterion) {
    let html = listing_page(8);

    c.bench_function("extract_array", |b| {
        b.iter(|| extract_array(black_box(&html), "virServerListPara"))
    });
}

fn parse_page_benchmark(c: &mut Criterion) {
    let html = listing_page(64);

    c.bench_function("parse_listing_page", |b| {
        b.iter(|| ListingPage::parse(black_box(&html), 1))
    });
}

criterion_group!(benches, extract_benchmark, parse_page_benchmark);
criterion_main!(benches);
