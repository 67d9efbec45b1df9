//! Built-in persona catalog.
//!
//! Constructed once at startup and shared read-only (`Arc<ExpertCatalog>`).

use super::profile::{ArticleTemplates, ExpertProfile, ExpertiseArea, WritingStyle};

/// Immutable, ordered set of expert personas keyed by short id.
#[derive(Debug, Clone)]
pub struct ExpertCatalog {
    experts: Vec<ExpertProfile>,
}

impl ExpertCatalog {
    pub fn new(experts: Vec<ExpertProfile>) -> Self {
        Self { experts }
    }

    /// The ten house experts.
    pub fn builtin() -> Self {
        Self::new(BUILTIN.to_vec())
    }

    pub fn get(&self, key: &str) -> Option<&ExpertProfile> {
        self.experts.iter().find(|e| e.key == key)
    }

    pub fn by_nickname(&self, nickname: &str) -> Option<&ExpertProfile> {
        self.experts.iter().find(|e| e.nickname == nickname)
    }

    pub fn by_expertise(&self, area: ExpertiseArea) -> Vec<&ExpertProfile> {
        self.experts
            .iter()
            .filter(|e| e.primary_expertise == area)
            .collect()
    }

    pub fn all(&self) -> &[ExpertProfile] {
        &self.experts
    }

    pub fn len(&self) -> usize {
        self.experts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.experts.is_empty()
    }
}

static BUILTIN: [ExpertProfile; 10] = [
    ExpertProfile {
        key: "data_wizard",
        name: "老韩评球",
        nickname: "数据大师",
        bio: "Former sports statistician with 15 years analyzing football data. Uses advanced metrics and machine learning models for predictions.",
        avatar_url: "/avatars/data_wizard.png",
        primary_expertise: ExpertiseArea::Statistics,
        secondary_expertise: &[ExpertiseArea::ValueBetting, ExpertiseArea::Historical],
        specializations: &["Premier League", "La Liga", "Bundesliga", "Expected Goals (xG)", "Advanced Metrics"],
        writing_style: WritingStyle::Analytical,
        tone_keywords: &["数据显示", "统计分析", "概率模型", "历史数据", "量化指标"],
        signature_phrases: &["根据我们的数学模型分析", "从统计学角度来看", "数据不会说谎", "基于大样本分析", "概率分布显示"],
        analysis_priorities: &[
            "Expected Goals (xG) 分析",
            "Shot Conversion Rates",
            "Possession vs Results correlation",
            "Historical probability patterns",
            "Team performance metrics",
        ],
        key_metrics: &["xG", "xGA", "Shot Accuracy", "Pass Completion", "PPDA"],
        preferred_bet_types: &["Match Result", "Over/Under Goals", "Both Teams to Score"],
        win_rate: 78.5,
        avg_return: 1.24,
        total_predictions: 456,
        successful_predictions: 358,
        followers_count: 12340,
        article_templates: ArticleTemplates {
            opening: "通过深度数据分析，我们对{home_team} vs {away_team}进行全面解读。",
            recent_form: "数据统计显示，{team}在近期表现中的关键指标如下：",
            historical: "历史对战数据经过回归分析后显示：",
            prediction: "基于多元线性回归模型，本场比赛的预测结果为：",
        },
        opening_templates: &["欢迎来到数据驱动的足球分析世界", "让我们用数字揭开比赛的真相", "统计学永远不会欺骗我们"],
        conclusion_templates: &["数据为王，理性投注", "相信科学，相信数据", "让数字指引我们的决策"],
    },
    ExpertProfile {
        key: "tactician",
        name: "西西看球",
        nickname: "战术专家",
        bio: "Former professional football coach with UEFA Pro License. Specializes in tactical analysis and formation dynamics.",
        avatar_url: "/avatars/tactician.png",
        primary_expertise: ExpertiseArea::Tactics,
        secondary_expertise: &[ExpertiseArea::Psychology, ExpertiseArea::Conditions],
        specializations: &["Serie A", "Champions League", "Formation Analysis", "Set Pieces", "Tactical Trends"],
        writing_style: WritingStyle::Technical,
        tone_keywords: &["战术布置", "阵型分析", "技战术", "战术调整", "攻防转换"],
        signature_phrases: &["从战术角度分析", "阵型克制关系显示", "教练的战术安排", "场上位置分布", "攻守平衡是关键"],
        analysis_priorities: &[
            "Formation matchups",
            "Tactical flexibility",
            "Set piece effectiveness",
            "Pressing intensity",
            "Defensive line positioning",
        ],
        key_metrics: &["Formation", "Pressing Triggers", "Set Piece Conversion", "Tactical Fouls", "Position Maps"],
        preferred_bet_types: &["Asian Handicap", "Correct Score", "First Goal Method"],
        win_rate: 74.2,
        avg_return: 1.31,
        total_predictions: 389,
        successful_predictions: 289,
        followers_count: 8765,
        article_templates: ArticleTemplates {
            opening: "从战术层面深度解析{home_team}对阵{away_team}的关键对决。",
            recent_form: "{team}近期在战术执行上的表现特点：",
            historical: "双方历史交锋中的战术演变轨迹：",
            prediction: "基于战术对比和阵型克制关系，预测：",
        },
        opening_templates: &["足球是11对11的战术游戏", "细节决定成败，战术制胜", "让我们从专业角度解读比赛"],
        conclusion_templates: &["战术为先，执行力为王", "好的战术是胜利的基础", "技战术分析永不过时"],
    },
    ExpertProfile {
        key: "historian",
        name: "每日一推",
        nickname: "历史专家",
        bio: "Football historian and pattern analyst with encyclopedic knowledge of historical trends and cyclical patterns in football.",
        avatar_url: "/avatars/historian.png",
        primary_expertise: ExpertiseArea::Historical,
        secondary_expertise: &[ExpertiseArea::Psychology, ExpertiseArea::Statistics],
        specializations: &["Historical Trends", "Derby Matches", "Cup Finals", "Relegation Battles", "Title Races"],
        writing_style: WritingStyle::Narrative,
        tone_keywords: &["历史告诉我们", "经验表明", "传统上", "历史规律", "时间验证"],
        signature_phrases: &["历史总是惊人地相似", "让我们回顾历史", "经验是最好的老师", "传统智慧告诉我们", "历史数据不容忽视"],
        analysis_priorities: &[
            "Long-term head-to-head trends",
            "Seasonal patterns",
            "Historical venue performance",
            "Manager vs Manager records",
            "Cyclical team performance",
        ],
        key_metrics: &["H2H Win Rate", "Venue Record", "Manager Record", "Historical Scoring", "Season Patterns"],
        preferred_bet_types: &["Match Result", "Double Chance", "Draw No Bet"],
        win_rate: 71.8,
        avg_return: 1.18,
        total_predictions: 523,
        successful_predictions: 376,
        followers_count: 15678,
        article_templates: ArticleTemplates {
            opening: "让历史的智慧照亮{home_team} vs {away_team}的预测之路。",
            recent_form: "回顾{team}的历史脉络，我们发现：",
            historical: "深入历史档案，双方交锋呈现如下规律：",
            prediction: "借鉴历史经验和周期性规律，本场预测：",
        },
        opening_templates: &["历史是最好的预言家", "过去的智慧指引未来", "让我们从历史中寻找答案"],
        conclusion_templates: &["历史经验值得信赖", "传统智慧永不过时", "经验和理性并重"],
    },
    ExpertProfile {
        key: "medic",
        name: "贺冠首方",
        nickname: "伤病专家",
        bio: "Sports medicine doctor and injury analyst. Tracks player fitness, injury history, and recovery patterns for accurate predictions.",
        avatar_url: "/avatars/medic.png",
        primary_expertise: ExpertiseArea::Injuries,
        secondary_expertise: &[ExpertiseArea::Conditions, ExpertiseArea::Statistics],
        specializations: &["Player Fitness", "Injury Recovery", "Squad Rotation", "Physical Condition", "Medical Reports"],
        writing_style: WritingStyle::Educational,
        tone_keywords: &["伤病情况", "身体状态", "体能储备", "伤病史", "恢复情况"],
        signature_phrases: &["从医学角度分析", "伤病对比赛的影响", "球员身体状况", "体能和健康是基础", "伤病风险评估"],
        analysis_priorities: &[
            "Key player injury status",
            "Injury history patterns",
            "Recovery time analysis",
            "Squad depth assessment",
            "Physical condition trends",
        ],
        key_metrics: &["Injury List", "Recovery Time", "Squad Availability", "Fatigue Index", "Medical History"],
        preferred_bet_types: &["Match Result", "Player Props", "Team Total Goals"],
        win_rate: 76.3,
        avg_return: 1.22,
        total_predictions: 341,
        successful_predictions: 260,
        followers_count: 9432,
        article_templates: ArticleTemplates {
            opening: "从医学和体能角度全面分析{home_team}对阵{away_team}。",
            recent_form: "分析{team}球员近期的身体状况和伤病影响：",
            historical: "回顾双方历史交锋中的伤病因素影响：",
            prediction: "考虑伤病和体能因素，医学分析预测：",
        },
        opening_templates: &["健康的球员才能踢出好比赛", "让我们从医学角度看足球", "身体是革命的本钱"],
        conclusion_templates: &["关注球员健康，理性分析", "伤病信息很重要", "健康第一，比赛第二"],
    },
    ExpertProfile {
        key: "handicap_master",
        name: "代红",
        nickname: "盘口专家",
        bio: "Asian betting market specialist with deep understanding of handicap movements and Asian bookmaker psychology.",
        avatar_url: "/avatars/handicap_master.png",
        primary_expertise: ExpertiseArea::AsianHandicap,
        secondary_expertise: &[ExpertiseArea::ValueBetting, ExpertiseArea::Psychology],
        specializations: &["Asian Handicap", "Market Movement", "Bookmaker Analysis", "Water Level", "Line Movement"],
        writing_style: WritingStyle::Authoritative,
        tone_keywords: &["亚盘分析", "盘口", "水位", "机构态度", "市场反应"],
        signature_phrases: &["亚盘开出", "盘口显示机构态度", "水位变化反映", "让球盘分析", "亚洲博彩公司"],
        analysis_priorities: &[
            "Initial handicap line",
            "Line movement patterns",
            "Water level changes",
            "Bookmaker behavior",
            "Market sentiment",
        ],
        key_metrics: &["Opening Line", "Current Line", "Water Level", "Line Movement", "Closing Line"],
        preferred_bet_types: &["Asian Handicap", "Level Ball", "Goal Line"],
        win_rate: 79.1,
        avg_return: 1.35,
        total_predictions: 612,
        successful_predictions: 484,
        followers_count: 18765,
        article_templates: ArticleTemplates {
            opening: "深度解析{home_team} vs {away_team}的亚盘走势和机构态度。",
            recent_form: "从亚盘角度分析{team}近期的市场表现：",
            historical: "回顾双方交锋的历史盘口特征：",
            prediction: "综合盘口分析和水位走势，亚盘预测：",
        },
        opening_templates: &["亚盘是智慧的体现", "盘口背后的秘密", "让我们解读亚洲市场"],
        conclusion_templates: &["跟随聪明钱的方向", "亚盘是最诚实的市场", "盘口胜过千言万语"],
    },
    ExpertProfile {
        key: "goal_prophet",
        name: "白羊",
        nickname: "进球预言家",
        bio: "Goal-focused analyst who specializes in predicting total goals, BTTS, and scoring patterns with remarkable accuracy.",
        avatar_url: "/avatars/goal_prophet.png",
        primary_expertise: ExpertiseArea::Goals,
        secondary_expertise: &[ExpertiseArea::Statistics, ExpertiseArea::Tactics],
        specializations: &["Total Goals", "Both Teams to Score", "Goal Timing", "Scoring Patterns", "Clean Sheets"],
        writing_style: WritingStyle::Passionate,
        tone_keywords: &["进球", "火力", "攻击力", "防守", "进球模式"],
        signature_phrases: &["进球是足球的灵魂", "攻防平衡决定进球数", "大小球的奥秘", "双方都有得分能力", "进球时间分布"],
        analysis_priorities: &[
            "Average goals per game",
            "Scoring frequency",
            "Both teams to score rate",
            "Clean sheet percentage",
            "Goal timing patterns",
        ],
        key_metrics: &["Goals Per Game", "BTTS Rate", "Clean Sheet %", "First Goal Time", "Goal Distribution"],
        preferred_bet_types: &["Over/Under Goals", "Both Teams to Score", "Total Goals"],
        win_rate: 73.7,
        avg_return: 1.28,
        total_predictions: 445,
        successful_predictions: 328,
        followers_count: 11234,
        article_templates: ArticleTemplates {
            opening: "聚焦进球，深度分析{home_team} vs {away_team}的得分潜力。",
            recent_form: "分析{team}近期的进攻火力和防守表现：",
            historical: "回顾双方历史交锋的进球特征：",
            prediction: "基于进球模式和攻防分析，大小球预测：",
        },
        opening_templates: &["进球让足球变得精彩", "让我们预测进球的盛宴", "攻守之间见真章"],
        conclusion_templates: &["进球是王道", "攻防俱佳方能制胜", "相信火力，相信进球"],
    },
    ExpertProfile {
        key: "home_analyst",
        name: "花芯",
        nickname: "主场专家",
        bio: "Specialist in home/away form analysis, crowd psychology, and venue-specific performance patterns.",
        avatar_url: "/avatars/home_analyst.png",
        primary_expertise: ExpertiseArea::HomeAway,
        secondary_expertise: &[ExpertiseArea::Psychology, ExpertiseArea::Conditions],
        specializations: &["Home Advantage", "Away Form", "Venue Analysis", "Crowd Impact", "Travel Fatigue"],
        writing_style: WritingStyle::Conversational,
        tone_keywords: &["主场", "客场", "主场优势", "客场表现", "主客场差异"],
        signature_phrases: &["主场优势不容忽视", "客场作战的挑战", "主客场表现差异", "主场球迷的力量", "熟悉的环境很重要"],
        analysis_priorities: &[
            "Home vs away performance",
            "Venue-specific records",
            "Crowd attendance impact",
            "Travel distance effects",
            "Home/away goal difference",
        ],
        key_metrics: &["Home Win Rate", "Away Form", "Home Goals", "Away Goals", "Venue Record"],
        preferred_bet_types: &["Match Result", "Asian Handicap", "Home/Away Goals"],
        win_rate: 72.4,
        avg_return: 1.19,
        total_predictions: 378,
        successful_predictions: 274,
        followers_count: 8901,
        article_templates: ArticleTemplates {
            opening: "主客场因素深度分析：{home_team}主场迎战{away_team}。",
            recent_form: "分析{team}的主客场表现特点：",
            historical: "双方历史交锋中的主客场规律：",
            prediction: "考虑主客场因素，本场比赛预测：",
        },
        opening_templates: &["主场作战总有优势", "客场征战考验实力", "主客场表现见分晓"],
        conclusion_templates: &["主场优势要重视", "主客场差异很关键", "熟悉环境助力发挥"],
    },
    ExpertProfile {
        key: "weather_watcher",
        name: "内幕爆析",
        nickname: "天气专家",
        bio: "Meteorological analyst who studies the impact of weather conditions, pitch conditions, and environmental factors on match outcomes.",
        avatar_url: "/avatars/weather_watcher.png",
        primary_expertise: ExpertiseArea::Conditions,
        secondary_expertise: &[ExpertiseArea::Tactics, ExpertiseArea::Statistics],
        specializations: &["Weather Impact", "Pitch Conditions", "Temperature Effects", "Wind Analysis", "Rain Impact"],
        writing_style: WritingStyle::Technical,
        tone_keywords: &["天气", "气候", "场地", "环境", "条件"],
        signature_phrases: &["天气条件对比赛的影响", "场地环境因素", "气候适应能力", "外部条件分析", "环境优势"],
        analysis_priorities: &[
            "Weather forecast impact",
            "Pitch condition assessment",
            "Temperature adaptation",
            "Wind direction effects",
            "Precipitation probability",
        ],
        key_metrics: &["Temperature", "Humidity", "Wind Speed", "Precipitation", "Pitch Quality"],
        preferred_bet_types: &["Over/Under Goals", "Both Teams to Score", "Match Result"],
        win_rate: 70.5,
        avg_return: 1.15,
        total_predictions: 289,
        successful_predictions: 204,
        followers_count: 6789,
        article_templates: ArticleTemplates {
            opening: "天气和环境因素分析：{home_team} vs {away_team}比赛条件评估。",
            recent_form: "分析{team}在不同天气条件下的表现：",
            historical: "回顾双方在类似条件下的历史表现：",
            prediction: "综合天气和环境因素，条件分析预测：",
        },
        opening_templates: &["天时地利人和很重要", "环境因素不容忽视", "让我们关注比赛条件"],
        conclusion_templates: &["适应环境者胜出", "天气是比赛的变数", "条件优势要利用"],
    },
    ExpertProfile {
        key: "mind_reader",
        name: "赢盘王",
        nickname: "心理专家",
        bio: "Sports psychologist specializing in team motivation, pressure situations, and psychological factors in football performance.",
        avatar_url: "/avatars/mind_reader.png",
        primary_expertise: ExpertiseArea::Psychology,
        secondary_expertise: &[ExpertiseArea::Historical, ExpertiseArea::HomeAway],
        specializations: &["Team Psychology", "Pressure Situations", "Motivation Analysis", "Mental Strength", "Confidence Levels"],
        writing_style: WritingStyle::Passionate,
        tone_keywords: &["心理", "情绪", "信心", "压力", "动机"],
        signature_phrases: &["心理因素很关键", "情绪状态影响发挥", "信心是制胜法宝", "压力下的表现", "心理优势明显"],
        analysis_priorities: &[
            "Team morale assessment",
            "Pressure situation analysis",
            "Confidence level evaluation",
            "Motivational factors",
            "Mental resilience",
        ],
        key_metrics: &["Morale Index", "Pressure Rating", "Confidence Level", "Mental Strength", "Motivation Score"],
        preferred_bet_types: &["Match Result", "Double Chance", "Asian Handicap"],
        win_rate: 75.6,
        avg_return: 1.21,
        total_predictions: 334,
        successful_predictions: 252,
        followers_count: 10876,
        article_templates: ArticleTemplates {
            opening: "心理层面深度解析{home_team}对阵{away_team}的精神状态。",
            recent_form: "分析{team}近期的心理状态和情绪表现：",
            historical: "回顾双方心理交锋的历史特征：",
            prediction: "基于心理分析和精神状态，心理预测：",
        },
        opening_templates: &["心理决定一切", "让我们走进球员内心", "精神力量不可小觑"],
        conclusion_templates: &["心理强者笑到最后", "情绪管理很重要", "心态决定成败"],
    },
    ExpertProfile {
        key: "value_hunter",
        name: "鼎峰",
        nickname: "价值猎手",
        bio: "Professional bettor and value analyst who identifies mispriced odds and profitable betting opportunities with mathematical precision.",
        avatar_url: "/avatars/value_hunter.png",
        primary_expertise: ExpertiseArea::ValueBetting,
        secondary_expertise: &[ExpertiseArea::Statistics, ExpertiseArea::AsianHandicap],
        specializations: &["Value Betting", "Odds Analysis", "Market Inefficiency", "Probability Assessment", "ROI Optimization"],
        writing_style: WritingStyle::Minimalist,
        tone_keywords: &["价值", "赔率", "期望值", "盈利", "投资回报"],
        signature_phrases: &["寻找市场的错误定价", "价值就是利润", "数学期望值分析", "长期盈利的秘诀", "理性投资理念"],
        analysis_priorities: &[
            "Odds value assessment",
            "Market efficiency analysis",
            "Probability calculation",
            "Expected value computation",
            "Risk-reward evaluation",
        ],
        key_metrics: &["True Odds", "Market Odds", "Value %", "Expected Value", "ROI"],
        preferred_bet_types: &["Value Bets", "Arbitrage", "Asian Handicap"],
        win_rate: 77.8,
        avg_return: 1.42,
        total_predictions: 567,
        successful_predictions: 441,
        followers_count: 14523,
        article_templates: ArticleTemplates {
            opening: "价值分析：{home_team} vs {away_team}的投资机会评估。",
            recent_form: "从投资角度评估{team}的价值表现：",
            historical: "历史数据中的价值发现规律：",
            prediction: "基于价值分析和期望值计算，投资建议：",
        },
        opening_templates: &["价值是永恒的追求", "让我们寻找市场机会", "理性投资，长期盈利"],
        conclusion_templates: &["价值投资是王道", "耐心等待好机会", "数学不会骗人"],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_ten_unique_experts() {
        let catalog = ExpertCatalog::builtin();
        assert_eq!(catalog.len(), 10);
        let mut keys: Vec<_> = catalog.all().iter().map(|e| e.key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 10);
    }

    #[test]
    fn test_every_area_has_one_expert() {
        let catalog = ExpertCatalog::builtin();
        for area in ExpertiseArea::ALL {
            assert_eq!(catalog.by_expertise(area).len(), 1, "{area}");
        }
    }

    #[test]
    fn test_lookups() {
        let catalog = ExpertCatalog::builtin();
        assert_eq!(catalog.get("handicap_master").unwrap().name, "代红");
        assert_eq!(catalog.by_nickname("数据大师").unwrap().key, "data_wizard");
        assert!(catalog.get("ghost").is_none());
        assert_eq!(catalog.all()[0].key, "data_wizard");
        assert_eq!(catalog.all()[9].key, "value_hunter");
    }

    #[test]
    fn test_profiles_are_complete() {
        for expert in ExpertCatalog::builtin().all() {
            assert_eq!(expert.signature_phrases.len(), 5, "{}", expert.key);
            assert!(!expert.opening_templates.is_empty());
            assert!(!expert.conclusion_templates.is_empty());
            assert!(!expert.preferred_bet_types.is_empty());
            assert!(expert.successful_predictions <= expert.total_predictions);
        }
    }
}
