//! Plain-text digest of extracted statistics

use anyhow::Result;
use std::fmt::Write;

use super::models::*;

fn yes_no(flag: bool) -> &'static str {
    if flag { "有" } else { "无" }
}

fn count(value: Option<u32>) -> String {
    value.map_or_else(|| "-".to_string(), |n| n.to_string())
}

pub fn generate_summary(stats: &ReportStatistics) -> Result<String> {
    let p = &stats.prisoners;
    let d = &stats.discipline;
    let s = &stats.security;
    let month = stats
        .month
        .map_or_else(|| "*".to_string(), |m| m.to_string());

    let mut out = String::new();
    writeln!(
        out,
        "【{} {}月犯情动态统计】",
        stats.prison.as_deref().unwrap_or("XX监狱"),
        month
    )?;

    out.push_str("\n一、监管安全情况\n");
    writeln!(out, "  ✓ 罪犯脱逃: {}", yes_no(s.has_escape))?;
    writeln!(out, "  ✓ 重大案件: {}", yes_no(s.has_major_case))?;
    writeln!(out, "  ✓ 安全事故: {}", yes_no(s.has_safety_accident))?;
    writeln!(out, "  ✓ 卫生事件: {}", yes_no(s.has_health_event))?;
    writeln!(out, "  ✓ 狱内发案: {}", yes_no(s.has_internal_case))?;
    writeln!(out, "  ✓ 预谋案件: {}", yes_no(s.has_premeditated_case))?;

    out.push_str("\n二、罪犯违纪统计\n");
    writeln!(out, "  • 违规人数: {}", count(d.violation_count))?;
    writeln!(out, "  • 禁闭人数: {}", count(d.confinement_count))?;
    writeln!(out, "  • 警告人数: {}", count(d.warning_count))?;

    out.push_str("\n三、罪犯构成情况\n");
    for (label, value) in [
        ("在押罪犯总数", p.total),
        ("重大刑事犯", p.major_criminal),
        ("死缓犯", p.death_suspended),
        ("无期犯", p.life_sentence),
        ("涉黑罪犯", p.gang_related),
        ("涉恶罪犯", p.evil_related),
        ("涉毒犯", p.drug_related),
        ("新收押罪犯", p.newly_admitted),
    ] {
        writeln!(out, "  • {label}: {}", count(value))?;
    }

    writeln!(
        out,
        "\n四、防范措施案例: {}起",
        stats.preventive_measures.len()
    )?;

    Ok(out)
}
