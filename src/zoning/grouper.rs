//! Merges consecutive same-category transects into zone candidates.

use crate::types::{ClassifiedTransect, ZoneCandidate};

/// Grouper state between two input elements.
#[derive(Debug)]
enum RunState {
    Idle,
    Open(ZoneCandidate),
}

impl RunState {
    /// Advance by one classified transect, emitting the closed run if the category changes.
    fn step(self, item: &ClassifiedTransect<'_>, emitted: &mut Vec<ZoneCandidate>) -> RunState {
        let index = item.transect.position_index;
        match self {
            RunState::Open(mut run) if run.category == item.category => {
                run.extend_to(index);
                RunState::Open(run)
            }
            RunState::Open(run) => {
                emitted.push(run);
                RunState::Open(ZoneCandidate::open(item.category, index))
            }
            RunState::Idle => RunState::Open(ZoneCandidate::open(item.category, index)),
        }
    }

    fn close(self, emitted: &mut Vec<ZoneCandidate>) {
        if let RunState::Open(run) = self {
            emitted.push(run);
        }
    }
}

/// Group classified transects (in position order) into maximal runs.
///
/// Every transect lands in exactly one candidate and no two neighbouring
/// candidates share a category.
pub fn group(classified: &[ClassifiedTransect<'_>]) -> Vec<ZoneCandidate> {
    let (mut emitted, state) = classified.iter().fold(
        (Vec::new(), RunState::Idle),
        |(mut emitted, state), item| {
            let next = state.step(item, &mut emitted);
            (emitted, next)
        },
    );
    state.close(&mut emitted);
    emitted
}
