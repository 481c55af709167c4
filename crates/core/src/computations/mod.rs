pub mod rects;
pub mod visibility;

pub use rects::RectsComputation;
pub use visibility::VisibilityReasonsComputation;

use crate::tree::HierarchyTreeNode;

/// A stateless, re-entrant pass over one snapshot's hierarchy tree.
///
/// Computations mutate the supplied tree in place and must run to
/// completion before any reader observes the annotated state. Order is
/// orchestrated externally (rects before visibility-dependent passes);
/// the trait only fixes the contract.
pub trait Computation {
    fn name(&self) -> &'static str;

    fn execute_in_place(&self, root: &mut HierarchyTreeNode);
}

/// Apply computations to one tree in the given order.
pub fn run_pipeline(computations: &[&dyn Computation], root: &mut HierarchyTreeNode) {
    for computation in computations {
        log::debug!("running {} computation", computation.name());
        computation.execute_in_place(root);
    }
}
