use serde::Serialize;

/// Section purposes and vocabulary that every generated article follows.
#[derive(Debug, Clone, Serialize)]
pub struct StyleGuide {
    pub writing_template: Vec<TemplateEntry>,
    pub vocabulary: Vocabulary,
}

#[derive(Debug, Clone, Serialize)]
pub struct TemplateEntry {
    pub section: &'static str,
    pub purpose: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Vocabulary {
    pub positive: &'static [&'static str],
    pub negative: &'static [&'static str],
    pub neutral: &'static [&'static str],
    pub technical: &'static [&'static str],
    pub tactical: &'static [&'static str],
}

const WRITING_TEMPLATE: &[(&str, &str)] = &[
    ("opening", "分析开场，介绍比赛基本信息"),
    ("recent_form", "近期表现分析，包含具体战绩"),
    ("h2h", "历史交锋分析，统计数据支撑"),
    ("injuries", "伤病和人员情况"),
    ("odds_analysis", "赔率和盘口分析"),
    ("prediction", "比分预测和投注建议"),
    ("closing", "总结和风险提示"),
];

pub fn style_guide() -> StyleGuide {
    StyleGuide {
        writing_template: WRITING_TEMPLATE
            .iter()
            .map(|&(section, purpose)| TemplateEntry { section, purpose })
            .collect(),
        vocabulary: Vocabulary {
            positive: &["状态出色", "优势明显", "值得信赖", "表现稳定", "实力占优"],
            negative: &["状态低迷", "表现不佳", "难以信任", "起伏较大", "实力下滑"],
            neutral: &["有待观察", "表现一般", "互有胜负", "难分伯仲", "势均力敌"],
            technical: &["亚盘", "大小球", "让球", "水位", "盘口", "欧赔", "返还率"],
            tactical: &["防守反击", "高位逼抢", "控球率", "射门效率", "定位球"],
        },
    }
}
