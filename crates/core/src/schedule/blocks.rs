use super::Interval;
use crate::{
    errors::{AdmissionError, TurnoError, TurnoResult},
    models::block::{CreateBlockRequest, NewScheduleBlock, ScheduleBlock},
};

/// Validates a block request against the blocks already stored for its date.
///
/// Only one full-day block may exist per date, and once it exists nothing else
/// can be added. Partial blocks need a non-empty range and must not overlap
/// another partial block. Existing appointments are not consulted.
pub fn admit(
    request: &CreateBlockRequest,
    existing: &[ScheduleBlock],
) -> TurnoResult<NewScheduleBlock> {
    let same_day = || existing.iter().filter(|block| block.date == request.date);

    if same_day().any(|block| block.is_full_day) {
        return Err(AdmissionError::DuplicateFullDayBlock(request.date).into());
    }

    let reason = request
        .reason
        .as_deref()
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .map(str::to_string);

    if request.is_full_day {
        return Ok(NewScheduleBlock::FullDay {
            date: request.date,
            reason,
        });
    }

    let (start, end) = match (request.start, request.end) {
        (Some(start), Some(end)) => (start, end),
        _ => {
            return Err(TurnoError::InvalidRange(
                "a partial block needs both start and end".to_string(),
            ));
        }
    };
    let interval = Interval::new(request.date, start, end)?;

    if let Some(clash) = same_day().find(|block| {
        block
            .interval()
            .is_some_and(|blocked| blocked.overlaps(&interval))
    }) {
        return Err(AdmissionError::OverlappingBlock {
            block_id: Some(clash.id),
        }
        .into());
    }

    Ok(NewScheduleBlock::Partial { interval, reason })
}
