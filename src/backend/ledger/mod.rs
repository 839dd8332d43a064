//! Position Ledger
//!
//! Computes the sibling shifts needed to move an item to a new index inside an
//! ordered sibling group, or between two groups, so that positions stay
//! exactly `0..n` after the move. Planning is pure; [`apply_plan`] turns a plan
//! into one `shift_range` call per affected range.
//!
//! The moving item's own row is never covered by a shift. Callers write it
//! after the shifts, inside the same unit of work.

use thiserror::Error;
use uuid::Uuid;

use crate::backend::storage::{SiblingScope, StorageError, UnitOfWork};

/// Rejected relocation requests
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("position {0} cannot be negative")]
    NegativePosition(i32),

    #[error("position {position} is outside a group of {count}")]
    OutOfRange { position: i32, count: usize },

    #[error("item {0} is not part of the sibling group")]
    UnknownMember(Uuid),

    #[error("item {id} is at position {actual}, not {claimed}")]
    StalePosition { id: Uuid, claimed: i32, actual: i32 },
}

/// Position change for one sibling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionDelta {
    pub id: Uuid,
    pub delta: i32,
}

/// One atomic range update: add `delta` to every position in `from..=to`
/// (`from..` when `to` is `None`) within `scope`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeShift {
    pub scope: SiblingScope,
    pub from: i32,
    pub to: Option<i32>,
    pub delta: i32,
}

impl RangeShift {
    pub fn covers(&self, position: i32) -> bool {
        position >= self.from && self.to.map_or(true, |to| position <= to)
    }
}

/// Shifts to apply plus the final index of the moving item
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    pub shifts: Vec<RangeShift>,
    /// Index the moving item ends up at, after clamping
    pub target: i32,
    noop: bool,
}

impl RelocationPlan {
    /// True when the item already sits at its target in the same group
    pub fn is_noop(&self) -> bool {
        self.noop
    }
}

fn non_negative(position: i32) -> Result<(), LedgerError> {
    if position < 0 {
        return Err(LedgerError::NegativePosition(position));
    }
    Ok(())
}

fn last_index(count: usize) -> i32 {
    i32::try_from(count).unwrap_or(i32::MAX).saturating_sub(1)
}

/// `(from, to, delta)` for a same-group move, `None` when nothing shifts.
fn within_range(old: i32, new: i32) -> Option<(i32, i32, i32)> {
    if new > old {
        Some((old + 1, new, -1))
    } else if new < old {
        Some((new, old - 1, 1))
    } else {
        None
    }
}

/// Pure form of a same-group move: the delta of every sibling whose position
/// changes, the moving item included. `new` past the end lands on the last
/// index.
pub fn relocate(
    members: &[(Uuid, i32)],
    moving_id: Uuid,
    old: i32,
    new: i32,
) -> Result<Vec<PositionDelta>, LedgerError> {
    non_negative(old)?;
    non_negative(new)?;
    let &(_, actual) = members
        .iter()
        .find(|(id, _)| *id == moving_id)
        .ok_or(LedgerError::UnknownMember(moving_id))?;
    if actual != old {
        return Err(LedgerError::StalePosition { id: moving_id, claimed: old, actual });
    }

    let new = new.min(last_index(members.len()));
    let Some((from, to, delta)) = within_range(old, new) else {
        return Ok(Vec::new());
    };

    let mut deltas: Vec<PositionDelta> = members
        .iter()
        .filter(|(id, position)| *id != moving_id && *position >= from && *position <= to)
        .map(|(id, _)| PositionDelta { id: *id, delta })
        .collect();
    deltas.push(PositionDelta { id: moving_id, delta: new - old });
    Ok(deltas)
}

/// Plan a move inside one group of `count` siblings (the moving item included).
pub fn plan_within(
    scope: SiblingScope,
    count: usize,
    old: i32,
    new: i32,
) -> Result<RelocationPlan, LedgerError> {
    non_negative(old)?;
    non_negative(new)?;
    if old > last_index(count) {
        return Err(LedgerError::OutOfRange { position: old, count });
    }

    let target = new.min(last_index(count));
    let shifts = within_range(old, target)
        .map(|(from, to, delta)| RangeShift { scope, from, to: Some(to), delta })
        .into_iter()
        .collect();
    Ok(RelocationPlan {
        shifts,
        target,
        noop: target == old,
    })
}

/// Plan a move from `source` (which holds `source_count` siblings including
/// the moving item) into `dest` (which holds `dest_count`). The source gap is
/// closed with an open-ended −1 shift, room is made in the destination with an
/// open-ended +1 shift. `new` past the end appends.
pub fn plan_across(
    source: SiblingScope,
    source_count: usize,
    old: i32,
    dest: SiblingScope,
    dest_count: usize,
    new: i32,
) -> Result<RelocationPlan, LedgerError> {
    if source == dest {
        return plan_within(source, source_count, old, new);
    }
    non_negative(old)?;
    non_negative(new)?;
    if old > last_index(source_count) {
        return Err(LedgerError::OutOfRange { position: old, count: source_count });
    }

    let target = new.min(last_index(dest_count) + 1);
    let mut shifts = Vec::with_capacity(2);
    if old < last_index(source_count) {
        shifts.push(RangeShift { scope: source, from: old + 1, to: None, delta: -1 });
    }
    if target <= last_index(dest_count) {
        shifts.push(RangeShift { scope: dest, from: target, to: None, delta: 1 });
    }
    Ok(RelocationPlan { shifts, target, noop: false })
}

/// Plan an insertion into a group of `count`. Without a requested index the
/// item is appended; otherwise it lands at `min(requested, count)`.
pub fn plan_insert(
    scope: SiblingScope,
    count: usize,
    requested: Option<i32>,
) -> Result<RelocationPlan, LedgerError> {
    let end = last_index(count) + 1;
    let target = match requested {
        Some(position) => {
            non_negative(position)?;
            position.min(end)
        }
        None => end,
    };
    let shifts = if target < end {
        vec![RangeShift { scope, from: target, to: None, delta: 1 }]
    } else {
        Vec::new()
    };
    Ok(RelocationPlan { shifts, target, noop: false })
}

/// Plan closing the gap left by removing the item at `position`.
pub fn plan_remove(scope: SiblingScope, position: i32) -> Result<RelocationPlan, LedgerError> {
    non_negative(position)?;
    Ok(RelocationPlan {
        shifts: vec![RangeShift { scope, from: position + 1, to: None, delta: -1 }],
        target: position,
        noop: false,
    })
}

/// Drive every shift of `plan` through the unit of work, one range update per
/// shift. Returns the number of sibling rows moved.
pub async fn apply_plan(
    uow: &mut dyn UnitOfWork,
    plan: &RelocationPlan,
) -> Result<usize, StorageError> {
    let mut touched = 0;
    for shift in &plan.shifts {
        touched += uow
            .shift_range(shift.scope, shift.from, shift.to, shift.delta)
            .await?;
    }
    tracing::trace!("[Ledger] Applied {} shifts, {} rows moved", plan.shifts.len(), touched);
    Ok(touched)
}
