//! Policy vectors over the action space: training targets and move selection.

use tracing::trace;
use zhouse_core::Move;

use crate::codec::{self, ACTION_SPACE};
use crate::error::NetError;

/// Return a policy target with 1.0 at `index` and 0.0 elsewhere.
pub fn one_hot(index: usize) -> Result<Vec<f32>, NetError> {
    if index >= ACTION_SPACE {
        return Err(NetError::IndexOutOfRange { index });
    }
    let mut pi = vec![0.0; ACTION_SPACE];
    pi[index] = 1.0;
    Ok(pi)
}

/// Look up each candidate's probability in `policy`.
fn candidate_probabilities(policy: &[f32], candidates: &[Move]) -> Result<Vec<(Move, f32)>, NetError> {
    candidates
        .iter()
        .map(|&mv| {
            let index = codec::encode(mv)?;
            let p = policy
                .get(index)
                .copied()
                .ok_or(NetError::IndexOutOfRange { index })?;
            Ok((mv, p))
        })
        .collect()
}

/// Pick the candidate the policy rates highest.
///
/// `candidates` are the playable moves supplied by the caller. Ties keep the
/// earliest candidate. Returns `Ok(None)` for an empty candidate list.
pub fn best_candidate(policy: &[f32], candidates: &[Move]) -> Result<Option<(Move, f32)>, NetError> {
    let scored = candidate_probabilities(policy, candidates)?;
    let best = scored.into_iter().fold(None, |best: Option<(Move, f32)>, (mv, p)| match best {
        Some((_, q)) if q >= p => best,
        _ => Some((mv, p)),
    });
    if let Some((mv, p)) = best {
        trace!(mv = %mv, p, "best candidate");
    }
    Ok(best)
}

/// Renormalize the policy over `candidates`.
///
/// Negative entries count as zero. If the candidates carry no mass at all,
/// every candidate gets an equal share.
pub fn masked_distribution(policy: &[f32], candidates: &[Move]) -> Result<Vec<(Move, f32)>, NetError> {
    let mut scored = candidate_probabilities(policy, candidates)?;
    for (_, p) in &mut scored {
        *p = p.max(0.0);
    }

    let total: f32 = scored.iter().map(|&(_, p)| p).sum();
    if total > 0.0 {
        for (_, p) in &mut scored {
            *p /= total;
        }
    } else if !scored.is_empty() {
        let share = 1.0 / scored.len() as f32;
        for (_, p) in &mut scored {
            *p = share;
        }
    }
    Ok(scored)
}
