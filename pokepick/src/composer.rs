use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{ExtendedDetail, TeamMember};
use crate::team::TeamStore;

pub const MOVES_PER_MEMBER: usize = 4;

/// Up to four picked moves, in the order they were picked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveSelection {
    moves: Vec<String>,
}

impl MoveSelection {
    /// Add or remove `name`. Adding past the cap is a no-op; returns whether
    /// anything changed.
    pub fn toggle(&mut self, name: &str) -> bool {
        if let Some(index) = self.moves.iter().position(|picked| picked == name) {
            self.moves.remove(index);
            return true;
        }
        if self.moves.len() >= MOVES_PER_MEMBER {
            return false;
        }
        self.moves.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.moves.iter().any(|picked| picked == name)
    }

    pub fn moves(&self) -> &[String] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.moves.len() == MOVES_PER_MEMBER
    }
}

/// Build a team member from exactly four distinct moves the creature knows.
pub fn compose(detail: &ExtendedDetail, moves: &[String]) -> Result<TeamMember> {
    if moves.len() != MOVES_PER_MEMBER {
        return Err(Error::Validation(format!(
            "Select exactly {MOVES_PER_MEMBER} moves."
        )));
    }
    for (index, name) in moves.iter().enumerate() {
        if moves[..index].contains(name) {
            return Err(Error::Validation(format!("{name} is selected twice.")));
        }
        if !detail.moves.contains(name) {
            return Err(Error::Validation(format!(
                "{} cannot learn {name}.",
                detail.detail.name
            )));
        }
    }
    Ok(TeamMember {
        detail: detail.detail.clone(),
        moves: moves.to_vec(),
    })
}

/// Compose and hand the member to the team store. Store errors pass through.
pub async fn submit(
    store: &dyn TeamStore,
    detail: &ExtendedDetail,
    moves: &[String],
) -> Result<Vec<TeamMember>> {
    let member = compose(detail, moves)?;
    tracing::info!(id = member.id(), name = %member.detail.name, "adding team member");
    store.add(member).await
}
