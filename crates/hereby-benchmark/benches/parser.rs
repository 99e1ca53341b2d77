use std::hint::black_box;

use codspeed_criterion_compat::{
    BenchmarkId, Criterion, Throughput, criterion_group, criterion_main,
};
use hereby_inputs::File;
use hereby_parse::FileParse as _;

fn benchmark_parser(c: &mut Criterion) {
    let db = salsa::DatabaseImpl::new();
    let files = vec![
        File::new(
            &db,
            "Simple".into(),
            r#"<?php
            $x = $cond ? 1 : 2;
            "#
            .to_string(),
        ),
        File::new(
            &db,
            "Medium".into(),
            r#"<?php
            function render(array $user, $tags): string {
                if ($user['admin']) {
                    $role = 'admin';
                } elseif ($user['editor']) {
                    $role = 'editor';
                } else {
                    $role = $user['guest'] ? 'guest' : 'anonymous';
                }

                foreach ($tags as $i => $tag) {
                    $line = 'Tag ' . $i . ': ' . strtoupper($tag) . "\n";
                    echo $line;
                }

                return "Role: {$role}" . ' (' . count($tags) . ')';
            }
            "#
            .to_string(),
        ),
    ];

    let mut group = c.benchmark_group("Parser Benchmark");

    for file in files {
        let code_length = file.text(&db).len() as u64;
        group.throughput(Throughput::Bytes(code_length));
        group.bench_with_input(
            BenchmarkId::new("parse_code", file.path(&db)),
            &file,
            |b, &file| {
                b.iter(|| {
                    let parse = file.parse(&db);
                    black_box(parse);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, benchmark_parser);
criterion_main!(benches);
