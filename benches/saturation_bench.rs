#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use indexmap::IndexSet;
use proplog::{Atom, KnowledgeBase, Rule};

fn atom(s: &str) -> Atom {
    Atom::new(s).unwrap()
}

/// Build a chain `p1 <-- p0, p2 <-- p1, ...` in reverse order so that every
/// pass fires exactly one rule, the worst case for pass count.
fn chain_rules(len: usize) -> Vec<Rule> {
    (0..len)
        .rev()
        .map(|i| Rule::parse(&format!("p{} <-- p{i}", i + 1)).unwrap())
        .collect()
}

/// Benchmark for adding facts to the knowledge base
fn bench_tell_facts(c: &mut Criterion) {
    c.bench_function("tell_facts", |b| {
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            for i in 0..1000 {
                kb.tell(black_box(atom(&format!("fact_{i}"))));
            }
            black_box(kb)
        });
    });
}

/// Benchmark for saturating a deep implication chain
fn bench_chain_saturation(c: &mut Criterion) {
    c.bench_function("chain_saturation", |b| {
        let rules = chain_rules(200);
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            kb.set_rules(rules.clone());
            kb.tell(atom("p0"));
            black_box(kb.infer_all())
        });
    });
}

/// Benchmark for a wide rule set where every rule hangs off one seed fact
fn bench_wide_saturation(c: &mut Criterion) {
    c.bench_function("wide_saturation", |b| {
        let rules: Vec<Rule> = (0..500)
            .map(|i| Rule::parse(&format!("h{i} <-- seed")).unwrap())
            .collect();
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            kb.set_rules(rules.clone());
            kb.tell(atom("seed"));
            black_box(kb.infer_all())
        });
    });
}

/// Benchmark for a rule set mixing multi-atom bodies and shared conclusions
fn bench_layered_saturation(c: &mut Criterion) {
    c.bench_function("layered_saturation", |b| {
        let mut rules = Vec::new();
        // Three layers; each atom needs two atoms from the layer below.
        for layer in 1..4 {
            for i in 0..30 {
                rules.push(
                    Rule::parse(&format!(
                        "l{layer}_{i} <-- l{}_{i} & l{}_{}",
                        layer - 1,
                        layer - 1,
                        (i + 1) % 30
                    ))
                    .unwrap(),
                );
            }
        }
        b.iter(|| {
            let mut kb = KnowledgeBase::new();
            kb.set_rules(rules.clone());
            for i in 0..30 {
                kb.tell(atom(&format!("l0_{i}")));
            }
            black_box(kb.infer_all())
        });
    });
}

/// Benchmark for re-saturating an already saturated base (fixpoint no-op)
fn bench_resaturation(c: &mut Criterion) {
    let mut kb = KnowledgeBase::new();
    kb.set_rules(chain_rules(200));
    kb.tell(atom("p0"));
    let derived = kb.infer_all();
    assert_eq!(derived.len(), 200);

    c.bench_function("resaturation", |b| {
        b.iter(|| {
            let new_atoms: IndexSet<Atom> = kb.infer_all();
            assert!(new_atoms.is_empty());
            black_box(new_atoms)
        });
    });
}

criterion_group!(
    benches,
    bench_tell_facts,
    bench_chain_saturation,
    bench_wide_saturation,
    bench_layered_saturation,
    bench_resaturation
);
criterion_main!(benches);
