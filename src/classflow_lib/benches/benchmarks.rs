//! Microbenchmarks for classflow.
//!
//! The benchmarks compare the two fixpoint strategies of the intraprocedural solver
//! on generated methods of increasing size:
//!
//! - live variables (backward),
//! - constant propagation (forward),
//!
//! as well as the construction of control flow graphs.
//!
//! # Running the Benchmarks
//!
//! To compare a change against the current master, first save a baseline on master:
//!
//! ```
//! $ git checkout master
//! $ cargo bench --bench "benchmarks" -- --save-baseline master
//! ```
//!
//! Then, checkout your feature branch and compare to the baseline:
//!
//! ```
//! $ git checkout my_awesome_fix
//! $ cargo bench --bench "benchmarks" -- --verbose --baseline master
//! ```
//!
//! Absolute results are tied to the system that they were measured on,
//! so only relative results should be reported.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use classflow_lib::analysis::cfg::Cfg;
use classflow_lib::analysis::constant_propagation::compute_constants;
use classflow_lib::analysis::dataflow::SolverKind;
use classflow_lib::analysis::live_variables::compute_live_variables;
use classflow_lib::intermediate_representation::parsing::{parse_stmt, parse_variable};
use classflow_lib::intermediate_representation::{Method, Stmt, Subsignature};

mod inputs {
    //! Generated input methods.
    use super::*;

    /// The number of loop blocks of the generated methods.
    pub const SIZES: [usize; 3] = [10, 100, 1000];

    /// Generate a method consisting of `blocks` consecutive loops,
    /// each of which contains a branch and updates a few variables.
    pub fn generate_method(blocks: usize) -> Method {
        let mut body: Vec<Stmt> = vec![parse_stmt("i = 0"), parse_stmt("acc = p")];
        for _ in 0..blocks {
            let head = body.len();
            let lines = [
                "c = 7".to_string(),
                format!("if i >= p goto {}", head + 9),
                "t = acc + c".to_string(),
                format!("if t > 100 goto {}", head + 6),
                "acc = t * 2".to_string(),
                format!("goto {}", head + 7),
                "acc = t - c".to_string(),
                "i = i + 1".to_string(),
                format!("goto {}", head + 1),
            ];
            body.extend(lines.iter().map(parse_stmt));
        }
        body.push(parse_stmt("return acc"));
        Method {
            declaring_class: "Bench".to_string(),
            subsignature: Subsignature::new("int run(int)"),
            params: vec![parse_variable("p")],
            is_static: true,
            is_abstract: false,
            body,
        }
    }
}

fn bench_cfg_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("cfg_construction");
    for size in inputs::SIZES {
        let method = inputs::generate_method(size);
        group.throughput(Throughput::Elements(method.body.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &method, |b, method| {
            b.iter(|| Cfg::new(black_box(method)))
        });
    }
    group.finish();
}

fn bench_solver_strategies(c: &mut Criterion) {
    for (name, strategy) in [
        ("worklist", SolverKind::WorkList),
        ("iterative", SolverKind::Iterative),
    ] {
        let mut group = c.benchmark_group(format!("solver_{}", name));
        for size in inputs::SIZES {
            let method = inputs::generate_method(size);
            let cfg = Cfg::new(&method);
            group.throughput(Throughput::Elements(method.body.len() as u64));
            group.bench_with_input(BenchmarkId::new("live_variables", size), &cfg, |b, cfg| {
                b.iter(|| compute_live_variables(black_box(cfg), strategy))
            });
            group.bench_with_input(
                BenchmarkId::new("constant_propagation", size),
                &cfg,
                |b, cfg| b.iter(|| compute_constants(black_box(cfg), strategy)),
            );
        }
        group.finish();
    }
}

criterion_group!(benches, bench_cfg_construction, bench_solver_strategies);
criterion_main!(benches);
