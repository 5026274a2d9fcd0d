//! Label-anchored patterns used by the report extractor
//!
//! Each rule pairs one regular expression with the field it fills. The
//! tables are evaluated in declaration order and the first match of a rule
//! wins; rules never aggregate repeated occurrences.

use once_cell::sync::Lazy;
use regex::Regex;

use super::models::{DisciplineCounts, PrisonerComposition, ReportSection};

/// Digit run that may contain spaces, full-width spaces or thousands commas.
const DIGITS: &str = r"([0-9](?:[0-9\s,]*[0-9])?)";

pub(crate) type CountSetter<T> = fn(&mut T, u32);

pub(crate) struct CountRule<T> {
    pub(crate) regex: Regex,
    pub(crate) set: CountSetter<T>,
}

fn count_rule<T>(pattern: &str, set: CountSetter<T>) -> CountRule<T> {
    let pattern = pattern.replace("{N}", DIGITS);
    CountRule {
        regex: Regex::new(&pattern).unwrap(),
        set,
    }
}

pub(crate) static PRISON_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"([^\s]+省[^\s]+监狱)").unwrap());
pub(crate) static PERIOD: Lazy<Regex> = Lazy::new(|| Regex::new(r"第\s*(\d+)\s*期").unwrap());
pub(crate) static MONTH: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*月犯情动态").unwrap());
pub(crate) static REPORT_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4})\s*年\s*(\d{1,2})\s*月\s*(\d{1,2})\s*日").unwrap());

/// Canned sentences whose presence rules an incident out.
pub const NO_ESCAPE: &str = "无罪犯脱逃";
pub const NO_MAJOR_CASE: &str = "无在全国全省有重大影响的狱内案件";
pub const NO_SAFETY_ACCIDENT: &str = "无重大安全生产事故";
pub const NO_HEALTH_EVENT: &str = "无重大公共卫生安全事件";
pub const NO_INTERNAL_CASE: &str = "无狱内发案";
pub const NO_PREMEDITATED_CASE: &str = "未发生预谋案件";

pub(crate) static DISCIPLINE_RULES: Lazy<Vec<CountRule<DisciplineCounts>>> = Lazy::new(|| {
    vec![
        count_rule(r"{N}\s*名罪犯在担任.*?期间[违反规]", |d: &mut DisciplineCounts, n| d.violation_count = Some(n)),
        count_rule(r"撤销\s*{N}\s*人狱内勤杂岗位", |d: &mut DisciplineCounts, n| d.dismissed_count = Some(n)),
        count_rule(r"禁闭\s*{N}\s*人", |d: &mut DisciplineCounts, n| d.confinement_count = Some(n)),
        count_rule(r"警告\s*{N}\s*人", |d: &mut DisciplineCounts, n| d.warning_count = Some(n)),
    ]
});

pub(crate) static PRISONER_RULES: Lazy<Vec<CountRule<PrisonerComposition>>> = Lazy::new(|| {
    vec![
        count_rule(r"在押罪犯\s*{N}\s*人", |p: &mut PrisonerComposition, n| p.total = Some(n)),
        count_rule(r"重大刑事犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.major_criminal = Some(n)),
        count_rule(r"死缓犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.death_suspended = Some(n)),
        count_rule(r"无期犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.life_sentence = Some(n)),
        count_rule(r"二次以上判刑罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.multiple_convictions = Some(n)),
        count_rule(r"外籍犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.foreign = Some(n)),
        count_rule(r"含港澳台\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.hong_kong_macao_taiwan = Some(n)),
        count_rule(r"精神病犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.mental_illness = Some(n)),
        count_rule(r"原地厅以上罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.former_provincial = Some(n)),
        count_rule(r"原县团级以上罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.former_county = Some(n)),
        count_rule(r#"["“]法轮功["”][^0-9]*?{N}\s*名"#, |p: &mut PrisonerComposition, n| p.falun_gong = Some(n)),
        count_rule(r"有吸毒史罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.drug_history = Some(n)),
        count_rule(r"涉毒犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.drug_related = Some(n)),
        count_rule(r"新收押罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.newly_admitted = Some(n)),
        count_rule(r"未成年女犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.juvenile_female = Some(n)),
        count_rule(r"涉黑罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.gang_related = Some(n)),
        count_rule(r"涉恶罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.evil_related = Some(n)),
        count_rule(r"危安罪犯\s*{N}\s*名", |p: &mut PrisonerComposition, n| p.dangerous_security = Some(n)),
    ]
});

/// One case narrative: area, name, (gender, age, origin, crime, original
/// sentence, ... remaining sentence), ... measure taken.
pub(crate) static PREVENTIVE_MEASURE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"([^监区\s]+监区)罪犯([^（(]+)[（(]",
        r"([^，,]+)[，,]",
        r"(\d+)\s*岁[，,]",
        r"([^，,]+)[，,]",
        r"([^，,]+)[，,]",
        r"原判\s*([^，,]+)[，,]",
        r".*?余刑\s*([^）)]+)[）)]",
        r".*?对其采取([^。]+)",
    ))
    .unwrap()
});

/// Section headings and the marker that ends each section.
pub(crate) static SECTION_RULES: Lazy<Vec<(ReportSection, Regex)>> = Lazy::new(|| {
    vec![
        (
            ReportSection::Security,
            Regex::new(r"一、监管安全情况([\s\S]*?)(?:二、|$)").unwrap(),
        ),
        (
            ReportSection::Features,
            Regex::new(r"二、主要犯情及特点([\s\S]*?)(?:三、|$)").unwrap(),
        ),
        (
            ReportSection::Overall,
            Regex::new(r"三、整体狱情情况([\s\S]*?)(?:四、|$)").unwrap(),
        ),
        (
            ReportSection::Measures,
            Regex::new(r"四、下一步工作措施([\s\S]*?)(?:\d{4}年|$)").unwrap(),
        ),
    ]
});
