mod comingout;
mod divine;
mod vote;

pub use comingout::{ComingoutSchedule, ReportQueue};
pub use divine::choose_divination_target;
pub use vote::{
    VoteDecider, VoteDecision, VoteInput, VoteSource, contradicting_reporters, fake_seers,
    is_still_valid, reported_wolves, village_candidates,
};
