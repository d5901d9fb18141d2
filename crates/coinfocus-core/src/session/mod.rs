mod plan;
mod scheduler;
mod settlement;

pub use plan::{minutes_to_secs, RoundPlan, SessionPlan};
pub use scheduler::{SessionPhase, SessionScheduler, SessionSnapshot};
pub use settlement::{SettlementReceipt, SettlementSink};

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn rounds_cover_the_total_exactly(total in 1u64..100_000, round in 1u64..10_000) {
            let plan = RoundPlan::from_secs(total, round);
            prop_assert_eq!(u64::from(plan.total_rounds), total.div_ceil(round));
            prop_assert_eq!(
                u64::from(plan.total_rounds - 1) * round + plan.last_round_duration_secs,
                total
            );
            prop_assert!(plan.last_round_duration_secs >= 1);
            prop_assert!(plan.last_round_duration_secs <= round);
            prop_assert_eq!(plan.durations().iter().sum::<u64>(), total);
        }

        #[test]
        fn focused_seconds_never_exceed_round_lengths(
            total_secs in 1u64..400,
            round_secs in 1u64..120,
            ticks in 0usize..600,
        ) {
            let mut s = SessionScheduler::with_rewards(
                crate::storage::SessionConfig { rest_duration_secs: 2, ..Default::default() },
                crate::reward::RewardCalculator::seeded(5),
            );
            s.create_session("p", total_secs as f64 / 60.0, round_secs as f64 / 60.0).unwrap();
            let mut last = 0;
            for _ in 0..ticks {
                s.tick();
                if s.phase() == SessionPhase::Resting && !s.rest_timer().is_active() {
                    s.finish_rest();
                }
                let now = s.total_focused_seconds();
                prop_assert!(now >= last);
                last = now;
            }
            prop_assert!(s.total_focused_seconds() <= total_secs);
        }
    }
}
