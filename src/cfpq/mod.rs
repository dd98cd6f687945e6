//! The three interchangeable CFPQ kernels (spec.md §1, §4.6–§4.8) and
//! an enum-dispatched wrapper selecting between them (spec.md §9
//! "Dynamic dispatch across CFPQ algorithms").

pub mod common;
pub mod hellings;
pub mod matrix;
pub mod tensor;

use std::collections::BTreeSet;

use crate::errors::Error;
use crate::graph::Graph;

pub use hellings::hellings_cfpq;
pub use matrix::matrix_cfpq;
pub use tensor::tensor_cfpq;

/// Selects which CFPQ kernel [`cfpq`] dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CfpqAlgorithm {
    /// Hellings-style CYK-like worklist fixed point (spec.md §4.6).
    Hellings,
    /// Per-variable boolean-matrix fixed point (spec.md §4.7).
    Matrix,
    /// Tensor-product fixed point over an RSM (spec.md §4.8).
    Tensor,
}

/// Evaluates a context-free path query using the selected algorithm.
/// All three variants compute the same pair set for the same inputs
/// (spec.md §8, testable property 6, "agreement property").
///
/// # Errors
///
/// See [`hellings_cfpq`], [`matrix_cfpq`] and [`tensor_cfpq`].
pub fn cfpq(
    graph: &Graph,
    cfg_text: &str,
    algorithm: CfpqAlgorithm,
    start: Option<&BTreeSet<u32>>,
    final_: Option<&BTreeSet<u32>>,
    start_var: Option<&str>,
) -> Result<BTreeSet<(u32, u32)>, Error> {
    match algorithm {
        CfpqAlgorithm::Hellings => hellings_cfpq(graph, cfg_text, start, final_, start_var),
        CfpqAlgorithm::Matrix => matrix_cfpq(graph, cfg_text, start, final_, start_var),
        CfpqAlgorithm::Tensor => tensor_cfpq(graph, cfg_text, start, final_, start_var),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    #[test]
    fn test_cfpq_dispatch_agrees_across_algorithms() {
        let mut g = Graph::new(3);
        g.add_edge(0, "a", 1);
        g.add_edge(1, "a", 2);
        g.add_edge(2, "a", 0);
        let cfg_text = "A -> a A | epsilon";

        let h = cfpq(&g, cfg_text, CfpqAlgorithm::Hellings, None, None, Some("A")).unwrap();
        let m = cfpq(&g, cfg_text, CfpqAlgorithm::Matrix, None, None, Some("A")).unwrap();
        let t = cfpq(&g, cfg_text, CfpqAlgorithm::Tensor, None, None, Some("A")).unwrap();
        assert_eq!(h, m);
        assert_eq!(m, t);
    }
}
