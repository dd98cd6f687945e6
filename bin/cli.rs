//! `langreach-cli` — a minimal demonstration binary over the
//! `langreach` library (spec.md §1 "the crate exposes a library plus a
//! minimal demonstration binary... it is not the interactive
//! console"). It is not the graph query DSL / scripting front end that
//! spec.md §1 places out of scope; it runs one query against the
//! library's own `two_cycles_graph` fixture and prints the result.

use std::env;

use langreach::{cfpq, cyk, rpq, two_cycles_graph, CfpqAlgorithm};
use tracing::info_span;

/// Initializes structured logging; level is controlled via `RUST_LOG`
/// (teacher's own `init_tracing` pattern).
fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init()
        .ok();
}

fn print_usage() {
    eprintln!(
        "Usage:\n  \
         langreach-cli rpq <regex>\n  \
         langreach-cli cfpq <hellings|matrix|tensor> <cfg-text> [start-var]\n  \
         langreach-cli cyk <cfg-text> <word>"
    );
}

fn main() {
    init_tracing();

    let mut args = env::args().skip(1);
    let Some(command) = args.next() else {
        print_usage();
        return;
    };

    match command.as_str() {
        "rpq" => {
            let Some(regex_text) = args.next() else {
                print_usage();
                return;
            };
            let span = info_span!("rpq", regex = %regex_text);
            let _guard = span.enter();

            let graph = two_cycles_graph(3, 2, ("a", "b"));
            match rpq(&graph, &regex_text, None, None) {
                Ok(pairs) => print_pairs(&pairs),
                Err(e) => eprintln!("error: {e}"),
            }
        }
        "cfpq" => {
            let Some(algo_name) = args.next() else {
                print_usage();
                return;
            };
            let Some(cfg_text) = args.next() else {
                print_usage();
                return;
            };
            let start_var = args.next();

            let algorithm = match algo_name.as_str() {
                "hellings" => CfpqAlgorithm::Hellings,
                "matrix" => CfpqAlgorithm::Matrix,
                "tensor" => CfpqAlgorithm::Tensor,
                other => {
                    eprintln!("unknown CFPQ algorithm '{other}'");
                    return;
                }
            };

            let span = info_span!("cfpq", algorithm = algo_name.as_str());
            let _guard = span.enter();

            let graph = two_cycles_graph(3, 2, ("a", "b"));
            match cfpq(
                &graph,
                &cfg_text,
                algorithm,
                None,
                None,
                start_var.as_deref(),
            ) {
                Ok(pairs) => print_pairs(&pairs),
                Err(e) => eprintln!("error: {e}"),
            }
        }
        "cyk" => {
            let Some(cfg_text) = args.next() else {
                print_usage();
                return;
            };
            let word = args.next().unwrap_or_default();

            let span = info_span!("cyk", word = %word);
            let _guard = span.enter();

            match cyk(&cfg_text, &word) {
                Ok(accepted) => println!("{accepted}"),
                Err(e) => eprintln!("error: {e}"),
            }
        }
        other => {
            eprintln!("unknown command '{other}'");
            print_usage();
        }
    }
}

fn print_pairs(pairs: &std::collections::BTreeSet<(u32, u32)>) {
    for (u, v) in pairs {
        println!("({u}, {v})");
    }
}
