//! Sequential walk over one worker's block.

use crate::oracle::Verifier;
use crate::search::parallel::channel::{SearchContext, WorkerReport};
use crate::search::partition::WorkBlock;
use crate::search::space::SearchSpace;

/// Try every index of `block` against the oracle and report how the walk ended.
///
/// The cancellation flag is checked once per index, before the oracle call, so
/// after cancellation at most the in-flight call completes.
pub fn search_block<V: Verifier + ?Sized>(
    block: WorkBlock,
    space: &SearchSpace,
    verifier: &V,
    target: &str,
    context: &SearchContext,
) -> WorkerReport {
    let mut candidate = String::new();

    for i in block.start..block.finish {
        if context.is_cancelled() {
            return WorkerReport::Interrupted(i - block.start);
        }
        if !space.write_candidate(i, &mut candidate) {
            // Blocks never extend past the space; treat it as the end of the walk.
            break;
        }
        match verifier.verify(target, &candidate) {
            Ok(Some(_)) => return WorkerReport::Found(candidate),
            Ok(None) => context.record_attempt(&candidate),
            Err(e) => return WorkerReport::Failed(e),
        }
    }
    WorkerReport::Exhausted
}
