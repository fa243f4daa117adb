use crate::predecessors::Predecessors;
use netomata_data::Neighbourhood;

/// Builds the neighbourhood of `cell` from the frozen previous row.
///
/// `past` holds earlier full rows, oldest first; each is narrowed to the
/// cell's predecessors.
#[must_use]
pub fn assemble(
    predecessors: &Predecessors,
    previous: &[f64],
    cell: usize,
    past: &[&[f64]],
) -> Neighbourhood {
    let indices = predecessors.indices.as_slice();
    let activities = indices.iter().map(|&i| previous[i]).collect();

    let neighbourhood = Neighbourhood::new(
        activities,
        indices.to_vec(),
        predecessors.weights.clone(),
        previous[cell],
    );

    if past.is_empty() {
        return neighbourhood;
    }
    let past_activities = past
        .iter()
        .map(|row| indices.iter().map(|&i| row[i]).collect())
        .collect();
    neighbourhood.with_past_activities(past_activities)
}
