// Daily trigger at a fixed wall-clock time
use crate::config::ScheduleConfig;
use chrono::{DateTime, Duration, FixedOffset, NaiveTime, Utc};
use std::future::Future;
use tokio::time::sleep;
use tracing::info;

#[derive(Debug, Clone, Copy)]
pub struct DailySchedule {
    time: NaiveTime,
    offset: FixedOffset,
}

impl DailySchedule {
    /// `None` when the config holds an impossible time or offset.
    pub fn from_config(cfg: &ScheduleConfig) -> Option<Self> {
        Some(Self {
            time: NaiveTime::from_hms_opt(cfg.hour, cfg.minute, 0)?,
            offset: FixedOffset::east_opt(cfg.utc_offset_hours * 3600)?,
        })
    }

    /// First trigger strictly after `now`.
    pub fn next_run_after(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let local_now = now.with_timezone(&self.offset);
        let local_today = local_now.date_naive().and_time(self.time);
        let utc_offset = Duration::seconds(i64::from(self.offset.local_minus_utc()));

        let mut next = (local_today - utc_offset).and_utc();
        if next <= now {
            next += Duration::days(1);
        }
        next
    }
}

/// Runs `job` at every daily trigger, forever. Each run is awaited before
/// the next trigger is computed, so runs never overlap.
pub async fn run_daily<F, Fut>(schedule: &DailySchedule, mut job: F)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    loop {
        let now = Utc::now();
        let next = schedule.next_run_after(now);
        let wait = (next - now).to_std().unwrap_or_default();
        info!(
            "🕘 Next run at {} (in {}h {}m)",
            next.with_timezone(&schedule.offset).format("%Y-%m-%d %H:%M:%S %:z"),
            wait.as_secs() / 3600,
            (wait.as_secs() % 3600) / 60
        );

        sleep(wait).await;
        job().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn nine_am_vietnam() -> DailySchedule {
        DailySchedule::from_config(&ScheduleConfig::default()).unwrap()
    }

    #[test]
    fn before_trigger_fires_same_day() {
        // 01:30 UTC = 08:30 +07
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 1, 30, 0).unwrap();
        let next = nine_am_vietnam().next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 1, 2, 0, 0).unwrap());
    }

    #[test]
    fn after_trigger_fires_next_day() {
        // 03:00 UTC = 10:00 +07
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 3, 0, 0).unwrap();
        let next = nine_am_vietnam().next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap());
    }

    #[test]
    fn exactly_at_trigger_waits_a_full_day() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 2, 0, 0).unwrap();
        let next = nine_am_vietnam().next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap());
    }

    #[test]
    fn local_date_differs_from_utc_date() {
        // 20:00 UTC on the 1st is already 03:00 on the 2nd in +07
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 20, 0, 0).unwrap();
        let next = nine_am_vietnam().next_run_after(now);
        assert_eq!(next, Utc.with_ymd_and_hms(2025, 6, 2, 2, 0, 0).unwrap());
    }

    #[test]
    fn negative_offsets_work() {
        let schedule = DailySchedule::from_config(&ScheduleConfig {
            hour: 23,
            minute: 30,
            utc_offset_hours: -5,
        })
        .unwrap();
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        assert_eq!(
            schedule.next_run_after(now),
            Utc.with_ymd_and_hms(2025, 6, 2, 4, 30, 0).unwrap()
        );
    }

    #[test]
    fn rejects_impossible_config() {
        let bad = ScheduleConfig {
            hour: 25,
            minute: 0,
            utc_offset_hours: 7,
        };
        assert!(DailySchedule::from_config(&bad).is_none());
    }
}
