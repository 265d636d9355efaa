use criterion::{black_box, criterion_group, criterion_main, Criterion};
use lazy_static::lazy_static;
use lexcore::compile::{compile, CompileOptions, Rule};
use proptest::prelude::*;
use proptest::strategy::ValueTree;
use proptest::test_runner::TestRunner;
use regex::Regex as LibRegex;

lazy_static! {
    static ref IDENT_RULES: Vec<Rule> = vec![
        Rule::new(r#""while""#, "KW_WHILE"),
        Rule::new(r#""if""#, "KW_IF"),
        Rule::new(r#""for""#, "KW_FOR"),
        Rule::new("/[a-zA-Z_][a-zA-Z0-9_]*/", "IDENT"),
        Rule::new("/[0-9]+(\\.[0-9]+)?/", "NUMBER"),
        Rule::new("/\"([^\"\\\\]|\\\\.)*\"/", "STRING"),
        Rule::new("/[ \\t\\n\\r]+/", "WS"),
    ];
    static ref IDENT_PATTERN: &'static str = "[a-zA-Z_][a-zA-Z0-9_]*";
}

pub fn pipeline_stages(c: &mut Criterion) {
    c.bench_function("parse+nfa+subset (no minimize)", |b| {
        b.iter(|| {
            compile(
                black_box(&IDENT_RULES),
                CompileOptions { minimize: false, compress: false, verbose: false },
            )
            .unwrap()
        })
    });

    c.bench_function("parse+nfa+subset+minimize", |b| {
        b.iter(|| {
            compile(
                black_box(&IDENT_RULES),
                CompileOptions { minimize: true, compress: false, verbose: false },
            )
            .unwrap()
        })
    });

    c.bench_function("full pipeline with compression", |b| {
        b.iter(|| compile(black_box(&IDENT_RULES), CompileOptions::default()).unwrap())
    });
}

pub fn against_library_regex_compile(c: &mut Criterion) {
    c.bench_function("lexcore single-rule compile", |b| {
        b.iter(|| {
            let rules = vec![Rule::new(
                black_box(format!("/{}/", *IDENT_PATTERN)),
                "IDENT",
            )];
            compile(&rules, CompileOptions::default()).unwrap()
        })
    });

    c.bench_function("regex crate compile", |b| {
        b.iter(|| LibRegex::new(black_box(*IDENT_PATTERN)).unwrap())
    });
}

pub fn against_library_regex_match(c: &mut Criterion) {
    let mut runner = TestRunner::default();
    let string_gen = "[a-z]{1,12}".new_tree(&mut runner).unwrap();

    let rules = vec![Rule::new(format!("/{}/", *IDENT_PATTERN), "IDENT")];
    let compiled = compile(&rules, CompileOptions::default()).unwrap();

    c.bench_function("lexcore dfa match", |b| {
        b.iter(|| compiled.dfa.simulate(black_box(string_gen.current().as_bytes())))
    });

    let anchored = format!("^({})$", *IDENT_PATTERN);
    let lib_regex = LibRegex::new(&anchored).unwrap();
    c.bench_function("regex crate is_match", |b| {
        b.iter(|| lib_regex.is_match(black_box(&string_gen.current())))
    });
}

criterion_group!(
    benches,
    pipeline_stages,
    against_library_regex_compile,
    against_library_regex_match
);
criterion_main!(benches);
