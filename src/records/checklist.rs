//! The sixteen-item monthly inspection checklist

use super::models::*;
use super::stats::{at_least_once, total};
use crate::template::NamedValues;

pub const CHECKLIST_ITEMS: u32 = 16;

const NO_EVENTS: &str = "本月无此类事件";

/// Unit named on a checklist whose period carries no prison name.
pub const DEFAULT_PRISON_NAME: &str = "女子监狱";

/// How often a checklist item has to be inspected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Immediate,
    PerBatch,
    Daily,
    Weekly,
    Monthly,
}

impl Frequency {
    pub fn label(self) -> &'static str {
        match self {
            Frequency::Immediate => "及时",
            Frequency::PerBatch => "每批次",
            Frequency::Daily => "每日",
            Frequency::Weekly => "每周",
            Frequency::Monthly => "每月",
        }
    }

    /// Whether the month has any record of the kind this frequency is
    /// inspected with. Batch items have no record kind of their own.
    pub fn is_covered(self, records: &RecordBundle) -> bool {
        match self {
            Frequency::Immediate => !records.immediate_events.is_empty(),
            Frequency::PerBatch => false,
            Frequency::Daily => !records.daily_logs.is_empty(),
            Frequency::Weekly => !records.weekly_records.is_empty(),
            Frequency::Monthly => !records.monthly_records.is_empty(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: u32,
    pub name: &'static str,
    pub frequency: Frequency,
}

const fn item(id: u32, name: &'static str, frequency: Frequency) -> ChecklistItem {
    ChecklistItem {
        id,
        name,
        frequency,
    }
}

pub const CHECKLIST: [ChecklistItem; CHECKLIST_ITEMS as usize] = [
    item(1, "监狱发生罪犯脱逃、自伤自残、自杀死亡、重大疫情、重大生产安全事故的情况报告", Frequency::Immediate),
    item(2, "罪犯死亡事件调查及处理报告", Frequency::Immediate),
    item(3, "监狱开展重大监管改造业务活动的情况报告", Frequency::Immediate),
    item(4, "监狱民警受到党纪行政处罚情况", Frequency::Immediate),
    item(5, "监狱新任职领导情况列表", Frequency::Immediate),
    item(6, "监狱提请罪犯减刑、假释、暂予监外执行花名册", Frequency::PerBatch),
    item(7, "抽查重点时段、重点环节监控录像发现的情况", Frequency::Daily),
    item(8, "对监狱医院禁闭室检察情况", Frequency::Weekly),
    item(9, "罪犯外伤检察", Frequency::Weekly),
    item(10, "对刑释前罪犯和新入监罪犯谈话情况", Frequency::Weekly),
    item(11, "开启检察官信箱或检察中发现具有价值的案件线索", Frequency::Weekly),
    item(12, "检查发现罪犯私藏使用违禁品的情况", Frequency::Weekly),
    item(13, "对监狱会见场所检察情况", Frequency::Monthly),
    item(14, "参加监狱犯情分析会情况", Frequency::Monthly),
    item(15, "记过以上处分的监督情况", Frequency::Monthly),
    item(16, "狱内勤杂岗位和辅助生产岗位罪犯每月增减情况", Frequency::Monthly),
];

/// Immediate-event categories for checklist items 1 to 6, matched by
/// substring of the event type.
const EVENT_CATEGORIES: [&[&str]; 6] = [
    &["脱逃", "自伤", "自杀", "疫情", "安全事故"],
    &["死亡"],
    &["重大活动"],
    &["处罚", "处分"],
    &["领导"],
    &["减刑", "假释", "监外执行"],
];

fn event_entry(id: u32, events: &[&ImmediateEvent]) -> ChecklistEntry {
    if events.is_empty() {
        return ChecklistEntry {
            id,
            content: NO_EVENTS.to_string(),
            situation: NO_EVENTS.to_string(),
        };
    }

    ChecklistEntry {
        id,
        content: events
            .iter()
            .map(|e| e.title.as_str())
            .collect::<Vec<_>>()
            .join("；"),
        situation: format!("已检察 {} 次", events.len()),
    }
}

fn entry(id: u32, situation: String, content: String) -> ChecklistEntry {
    ChecklistEntry {
        id,
        content,
        situation,
    }
}

/// Derive all sixteen checklist entries from a month of records.
pub fn build_checklist(
    daily_logs: &[DailyLog],
    weekly_records: &[WeeklyRecord],
    monthly_records: &[MonthlyRecord],
    events: &[ImmediateEvent],
) -> Vec<ChecklistEntry> {
    let mut entries = Vec::with_capacity(CHECKLIST_ITEMS as usize);

    for (index, keywords) in EVENT_CATEGORIES.iter().enumerate() {
        let matching: Vec<&ImmediateEvent> = events
            .iter()
            .filter(|e| keywords.iter().any(|k| e.type_label().contains(k)))
            .collect();
        entries.push(event_entry(index as u32 + 1, &matching));
    }

    // 7. Monitor spot checks
    let monitored: Vec<&DailyLog> = daily_logs.iter().filter(|l| l.monitor_check.checked).collect();
    entries.push(if monitored.is_empty() {
        entry(7, "未检察".into(), "本月未进行监控抽查".into())
    } else {
        let spot_checks = total(monitored.iter().map(|l| at_least_once(l.monitor_check.count)));
        entry(
            7,
            format!("已检察 {} 次", monitored.len()),
            format!("本月共抽查监控 {spot_checks} 次"),
        )
    });

    // 8. Hospital and confinement rooms
    let hospital = weekly_records
        .iter()
        .filter(|r| r.hospital_check.checked)
        .count();
    entries.push(if hospital == 0 {
        entry(8, "未检察".into(), "本月未进行医院禁闭室检察".into())
    } else {
        entry(
            8,
            format!("已检察 {hospital} 次"),
            format!("检察医院禁闭室 {hospital} 次，重点查看警械使用、严管禁闭适用情况"),
        )
    });

    let talks: Vec<&TalkRecord> = weekly_records.iter().flat_map(|r| &r.talk_records).collect();
    let count_kind = |kind: TalkKind| talks.iter().filter(|t| t.kind == kind).count();

    // 9. Injuries
    let injuries = count_kind(TalkKind::Injury);
    entries.push(if injuries == 0 {
        entry(9, "未发现外伤".into(), "本月未发现外伤".into())
    } else {
        entry(
            9,
            format!("发现外伤 {injuries} 人次"),
            format!("本月发现外伤 {injuries} 人次，已核实并上传谈话笔录"),
        )
    });

    // 10. Talks
    entries.push(if talks.is_empty() {
        entry(10, "未谈话".into(), "本月未进行谈话".into())
    } else {
        entry(
            10,
            format!("已谈话 {} 人次", talks.len()),
            format!(
                "本月谈话 {} 人次，其中新入监 {} 人，刑释前 {} 人",
                talks.len(),
                count_kind(TalkKind::NewPrisoner),
                count_kind(TalkKind::Release)
            ),
        )
    });

    // 11. Prosecutor mailbox
    let opens = total(weekly_records.iter().map(|r| r.mailbox.open_count));
    let letters = total(weekly_records.iter().map(|r| r.mailbox.received_count));
    entries.push(if opens == 0 {
        entry(11, "未开启".into(), "本月未开启检察官信箱".into())
    } else {
        entry(
            11,
            format!("开启 {opens} 次，收到信件 {letters} 封"),
            format!("本月开启检察官信箱 {opens} 次，收到信件 {letters} 封"),
        )
    });

    // 12. Contraband sweeps
    let sweeps = weekly_records.iter().filter(|r| r.contraband.checked).count();
    let found_records = weekly_records.iter().filter(|r| r.contraband.found).count();
    let found = total(
        weekly_records
            .iter()
            .filter(|r| r.contraband.found)
            .map(|r| r.contraband.found_count),
    );
    let situation = if found_records > 0 {
        format!("发现违禁品 {found} 次")
    } else {
        "未发现违禁品".to_string()
    };
    let content = if sweeps == 0 {
        "本月未进行违禁品排查".to_string()
    } else if found_records > 0 {
        format!("本月排查 {sweeps} 次，发现违禁品 {found} 次")
    } else {
        format!("本月排查 {sweeps} 次，未发现违禁品")
    };
    entries.push(entry(12, situation, content));

    // 13. Visiting rooms
    let visit_records = monthly_records.iter().filter(|r| r.visit_check.checked).count();
    let visits = total(monthly_records.iter().map(|r| r.visit_check.visit_count));
    entries.push(if visit_records == 0 {
        entry(13, "未检察".into(), "本月未进行会见场所检察".into())
    } else {
        entry(
            13,
            format!("已检察 {visits} 次"),
            format!("本月检察会见场所 {visits} 次"),
        )
    });

    // 14. Situation analysis meetings
    let meetings = total(
        monthly_records
            .iter()
            .filter(|r| r.meeting.participated)
            .map(|r| at_least_once(r.meeting.count)),
    );
    entries.push(if meetings == 0 {
        entry(14, "未参加".into(), "本月未参加犯情分析会".into())
    } else {
        entry(
            14,
            format!("已参加 {meetings} 次"),
            format!("本月参加犯情分析会 {meetings} 次"),
        )
    });

    // 15. Demerits and confinement
    let punished = monthly_records.iter().filter(|r| r.punishment.exists);
    let (demerits, confined) = punished.fold((0u32, 0u32), |(d, c), r| {
        (
            d.saturating_add(r.punishment.record_count),
            c.saturating_add(r.punishment.confinement_count),
        )
    });
    entries.push(if demerits == 0 && confined == 0 {
        entry(15, "本月无记过处分".into(), "本月无记过处分".into())
    } else {
        entry(
            15,
            format!("记过 {demerits} 人，禁闭 {confined} 人"),
            format!("本月记过 {demerits} 人，禁闭 {confined} 人"),
        )
    });

    // 16. Work posts, latest record with position stats wins
    let latest = monthly_records
        .iter()
        .filter_map(|r| r.position_stats.as_ref())
        .last();
    let (increase, decrease) = latest.map_or((0, 0), |s| {
        (
            s.miscellaneous_increase.saturating_add(s.production_increase),
            s.miscellaneous_decrease.saturating_add(s.production_decrease),
        )
    });
    entries.push(if increase == 0 && decrease == 0 {
        entry(
            16,
            "无异常变动".into(),
            "本月勤杂岗位和辅助生产岗位无异常变动".into(),
        )
    } else {
        entry(
            16,
            format!("增加 {increase} 人，减少 {decrease} 人"),
            format!("本月勤杂岗位和辅助生产岗位增加 {increase} 人，减少 {decrease} 人"),
        )
    });

    entries
}

/// Template values for the checklist; ids missing from `entries` render blank
/// and a blank unit name becomes [`DEFAULT_PRISON_NAME`].
pub fn checklist_values(period: &ArchivePeriod, entries: &[ChecklistEntry]) -> NamedValues {
    let mut values = NamedValues::new();
    let prison_name = match period.prison_name.trim() {
        "" => DEFAULT_PRISON_NAME,
        name => name,
    };
    values.insert("prison_name".to_string(), prison_name.to_string());
    values.insert("year".to_string(), period.year.to_string());
    values.insert("month".to_string(), period.month.to_string());

    for id in 1..=CHECKLIST_ITEMS {
        let found = entries.iter().find(|e| e.id == id);
        values.insert(
            format!("content{id}"),
            found.map(|e| e.content.clone()).unwrap_or_default(),
        );
        values.insert(
            format!("status{id}"),
            found.map(|e| e.situation.clone()).unwrap_or_default(),
        );
    }
    values
}
