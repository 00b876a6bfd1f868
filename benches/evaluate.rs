use autoresponder::{MatchType, Request, Rule, RuleInput, compile, compile_with_cache, validate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Build `n` rules cycling through the match types, none of which match the
/// benchmark request except the last.
fn build_rules(n: usize) -> Vec<Rule> {
    let kinds = [
        MatchType::Contains,
        MatchType::Prefix,
        MatchType::Suffix,
        MatchType::Wildcard,
        MatchType::Regex,
    ];
    let mut rules: Vec<Rule> = (0..n.saturating_sub(1))
        .map(|i| {
            let kind = kinds[i % kinds.len()];
            let pattern = match kind {
                MatchType::Prefix => format!("https://host{i}.com/"),
                MatchType::Suffix => format!(".ext{i}"),
                MatchType::Wildcard => format!("https://*/path{i}/*"),
                MatchType::Regex => format!(r"/item/{i}/\d+$"),
                _ => format!("segment{i}"),
            };
            validate(RuleInput::new(pattern, "body").match_type(kind)).unwrap()
        })
        .collect();
    rules.push(validate(RuleInput::new("api/users", r#"{"a":1}"#).response_type("json")).unwrap());
    rules
}

fn bench_evaluate(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let request = Request::document("https://x.com/api/users/1");

    for &n in &[5, 50, 500] {
        let set = compile(&build_rules(n), true).rule_set;
        group.bench_function(&format!("{n}_rules"), |b| {
            b.iter(|| set.evaluate(black_box(&request)));
        });
    }

    group.finish();
}

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for &n in &[50, 500] {
        let rules = build_rules(n);
        group.bench_function(&format!("{n}_rules_cold"), |b| {
            b.iter(|| compile(black_box(&rules), true));
        });

        let warm = compile(&rules, true).cache;
        group.bench_function(&format!("{n}_rules_cached"), |b| {
            b.iter(|| compile_with_cache(black_box(&rules), true, &warm));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate, bench_compile);
criterion_main!(benches);
