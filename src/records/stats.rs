//! Monthly activity counts

use super::models::*;

/// A checked item with no recorded count still counts once.
pub(crate) fn at_least_once(count: u32) -> u32 {
    if count == 0 { 1 } else { count }
}

/// Counts come from hand-entered forms and stop at `u32::MAX`.
pub(crate) fn bump(total: &mut u32, by: u32) {
    *total = total.saturating_add(by);
}

/// Saturating sum of counts.
pub(crate) fn total<I: IntoIterator<Item = u32>>(counts: I) -> u32 {
    counts.into_iter().fold(0, u32::saturating_add)
}

pub fn calculate_stats(
    daily_logs: &[DailyLog],
    weekly_records: &[WeeklyRecord],
    monthly_records: &[MonthlyRecord],
) -> InspectionStats {
    let mut stats = InspectionStats::default();

    for log in daily_logs {
        let scenes = &log.three_scenes;
        let checked = [&scenes.labor, &scenes.living, &scenes.study]
            .iter()
            .filter(|scene| scene.checked)
            .count() as u32;
        bump(&mut stats.three_scene_checks, checked);

        if log.monitor_check.checked {
            bump(&mut stats.monitor_checks, at_least_once(log.monitor_check.count));
        }
    }

    for record in weekly_records {
        if record.hospital_check.hospital_checked {
            bump(&mut stats.key_location_checks, 1);
        }
        if record.hospital_check.confinement_checked {
            bump(&mut stats.key_location_checks, 1);
        }

        bump(
            &mut stats.total_talks,
            u32::try_from(record.talk_records.len()).unwrap_or(u32::MAX),
        );
        for talk in &record.talk_records {
            match talk.kind {
                TalkKind::NewPrisoner => bump(&mut stats.new_admission_talks, 1),
                TalkKind::Evil => bump(&mut stats.evil_talks, 1),
                TalkKind::Injury => bump(&mut stats.injury_talks, 1),
                TalkKind::Confinement => bump(&mut stats.confinement_talks, 1),
                TalkKind::Release | TalkKind::Other => {}
            }
        }

        bump(&mut stats.mailbox_opens, record.mailbox.open_count);
        bump(&mut stats.letters_received, record.mailbox.received_count);
    }

    for record in monthly_records {
        if record.visit_check.checked {
            bump(
                &mut stats.visit_checks,
                at_least_once(record.visit_check.visit_count),
            );
        }
    }

    stats
}
