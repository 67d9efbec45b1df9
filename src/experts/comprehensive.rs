//! Long-form nine-section analysis.
//!
//! Team names, league and (when supplied) market odds come from the records;
//! every other figure is a placeholder drawn from the [`StatSource`].

use std::fmt::Write as _;

use serde::Serialize;

use super::article::ExpertInfo;
use super::profile::{ExpertProfile, WritingStyle};
use crate::data::StatSource;
use crate::writer::article::{count_chars, ArticleSection};
use crate::writer::models::{MatchInfo, OddsInfo};

/// Articles shorter than this are logged as under-length.
pub const COMPREHENSIVE_MIN_CHARS: usize = 1500;

const SECTION_KEYS: [&str; 9] = [
    "opening",
    "fundamental",
    "historical",
    "recent_form",
    "personnel",
    "odds",
    "specialty",
    "prediction",
    "conclusion",
];

const KOREAN_PLAYERS: &[&str] = &["金英权", "李承祐", "朴智星", "孙兴慜", "黄喜灿", "金玟哉"];
const JAPANESE_PLAYERS: &[&str] = &["三笘薫", "久保建英", "富安健洋", "镰田大地", "浅野拓磨", "远藤航"];
const CHINESE_PLAYERS: &[&str] = &["武磊", "张琳芃", "吴曦", "韦世豪", "艾克森", "费莱尼"];
const DEFAULT_PLAYERS: &[&str] = &["席尔瓦", "罗德里格斯", "费尔南德斯", "马丁内斯", "冈萨雷斯", "佩雷拉"];

const FORMATIONS: &[&str] = &["4-3-3", "4-2-3-1", "3-5-2", "4-4-2"];
const HANDICAPS: &[&str] = &["-0.5", "-0.75", "-1", "-0.25"];
const TOTAL_LINES: &[&str] = &["2.5", "2.75", "3", "2.25"];

#[derive(Debug, Clone, Serialize)]
pub struct BetRecommendation {
    /// `primary` or `secondary`.
    pub kind: &'static str,
    pub bet: String,
    pub stake: String,
    pub odds: f64,
    pub confidence: u8,
    pub reasoning: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ComprehensiveAnalysis {
    pub title: String,
    pub content: String,
    /// Non-whitespace characters of `content`.
    pub word_count: usize,
    pub sections: Vec<ArticleSection>,
    pub expert_info: ExpertInfo,
    pub recommendations: Vec<BetRecommendation>,
    /// In `[0.75, 0.92]`.
    pub confidence_level: f64,
}

impl ComprehensiveAnalysis {
    pub fn section(&self, key: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.key == key)
            .map(|s| s.content.as_str())
    }
}

pub fn generate_comprehensive_analysis(
    expert: &ExpertProfile,
    m: &MatchInfo,
    odds: Option<&OddsInfo>,
    stats: &mut dyn StatSource,
) -> ComprehensiveAnalysis {
    let home = m.home_team.name.as_str();
    let away = m.away_team.name.as_str();

    let bodies = [
        opening(expert, home, away, &m.league, stats),
        fundamental(home, away, &m.league, stats),
        historical(home, away, stats),
        recent_form(home, away, stats),
        personnel(home, away, &m.league, stats),
        odds_section(home, away, odds, stats),
        specialty(expert, home, away, stats),
        score_prediction(home, away, stats),
        conclusion(expert, home, away, stats),
    ];
    let sections: Vec<ArticleSection> = SECTION_KEYS
        .into_iter()
        .zip(bodies)
        .map(|(key, content)| ArticleSection { key, content })
        .collect();

    let mut content = sections
        .iter()
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");
    let _ = write!(
        content,
        "\n\n——{}\n{}",
        expert.nickname,
        chrono::Local::now().format("%Y年%m月%d日")
    );
    let word_count = count_chars(&content);
    if word_count < COMPREHENSIVE_MIN_CHARS {
        tracing::warn!(
            expert = expert.key,
            chars = word_count,
            min = COMPREHENSIVE_MIN_CHARS,
            "Comprehensive analysis shorter than target"
        );
    }

    ComprehensiveAnalysis {
        title: format!("{}：{home} vs {away} 深度分析", expert.nickname),
        content,
        word_count,
        sections,
        expert_info: ExpertInfo::from(expert),
        recommendations: recommendations(expert, stats),
        confidence_level: stats.float2(0.75, 0.92),
    }
}

fn opening(
    expert: &ExpertProfile,
    home: &str,
    away: &str,
    league: &str,
    stats: &mut dyn StatSource,
) -> String {
    let lead = stats.pick(expert.opening_templates);
    let phrase = stats.pick(expert.signature_phrases);
    match expert.writing_style {
        WritingStyle::Narrative => format!(
            "🎯 **精彩对决**\n\n\
             {lead}。当{home}的球迷们涌入主场，准备为他们的英雄呐喊助威时，{away}的将士们也已经做好了客场作战的准备。\n\n\
             这不仅仅是一场普通的{league}比赛。{phrase}，两队都有着必须取胜的理由。主队希望延续主场不败的神话，\
             而客队则渴望打破客场连败的阴霾。当激情与理智碰撞，当数据与直觉交织，我们将为您呈现最专业的分析。"
        ),
        WritingStyle::Technical => format!(
            "⚽ **战术分析**\n\n\
             {lead}。{home}对阵{away}，这场{league}的对决将是一场高水平的战术较量。\n\n\
             {phrase}，两队主教练的战术理念将在本场比赛中得到充分展现。从阵型选择到人员配置，从进攻组织到防守体系，\
             每一个战术细节都值得我们深入探讨。接下来，让我们从专业角度全面解析这场比赛。"
        ),
        _ => format!(
            "📊 **赛事前瞻**\n\n\
             {lead}，今天我们迎来了{league}的一场焦点对决，{home}主场迎战{away}。\
             这场比赛不仅关系到两队的积分排名，更是一场充满变数的战术博弈。\n\n\
             {phrase}，本场比赛存在多个值得关注的数据点。从近期表现到历史交锋，从人员配置到战术安排，\
             每一个细节都可能成为影响比赛走向的关键因素。让我们通过深度数据分析，为您揭示这场比赛的真实面貌。"
        ),
    }
}

fn fundamental(home: &str, away: &str, league: &str, stats: &mut dyn StatSource) -> String {
    let home_position = stats.int(3, 8);
    let away_position = stats.int(4, 12);
    let home_points = 50 - (home_position - 1) * 3 + stats.int(-5, 5);
    let away_points = 50 - (away_position - 1) * 3 + stats.int(-5, 5);
    let (hw, hd, hl) = (stats.int(12, 18), stats.int(4, 8), stats.int(3, 8));
    let (aw, ad, al) = (stats.int(8, 14), stats.int(5, 9), stats.int(6, 11));
    let (home_for, home_against) = (stats.int(35, 55), stats.int(20, 35));
    let (away_for, away_against) = (stats.int(28, 45), stats.int(25, 40));
    let home_form = stats.pick(&["强势", "稳定", "起伏", "回升"]);
    let away_form = stats.pick(&["一般", "低迷", "反弹", "不稳"]);

    let mut out = String::from("**【基本面分析】**\n\n");
    let _ = writeln!(
        out,
        "{home}目前在{league}积分榜上排名第{home_position}位，积{home_points}分。\
         球队本赛季至今战绩为{hw}胜{hd}平{hl}负，进{home_for}球失{home_against}球，净胜球达到{}个。\n",
        home_for - home_against
    );
    let _ = writeln!(
        out,
        "主场方面，{home}展现出{home_form}的表现。最近10个主场比赛取得{}胜{}平{}负的战绩，\
         场均进球{}个，场均失球{}个。球队在主场的控球率达到{}%，射门转化率为{}%，展现出较强的主场统治力。\n",
        stats.int(5, 8),
        stats.int(1, 3),
        stats.int(0, 2),
        stats.float1(1.5, 2.5),
        stats.float1(0.8, 1.5),
        stats.int(52, 65),
        stats.int(12, 18),
    );
    let _ = writeln!(
        out,
        "从进攻端来看，{home}本赛季的进攻效率在联赛中排名第{}位。球队主要依靠{}作为主要进攻手段，\
         前锋线上的{}状态出色，已经贡献了{}个进球。中场核心的组织能力是球队进攻的发动机，本赛季已经送出{}次助攻。\n",
        stats.int(3, 8),
        stats.pick(&["快速反击", "阵地战配合", "边路传中", "中路渗透"]),
        stats.pick(&["外援前锋", "本土射手", "锋线组合"]),
        stats.int(15, 25),
        stats.int(8, 15),
    );
    let _ = writeln!(
        out,
        "防守端，{home}的表现{}。球队场均被射门{}次，其中射正{}次，防守效率达到{}%。\
         后防线的{}是球队能够保持较少失球的关键。\n",
        stats.pick(&["相当稳固", "有所改善", "略有起伏", "值得肯定"]),
        stats.int(8, 14),
        stats.int(3, 6),
        stats.int(65, 80),
        stats.pick(&["默契配合", "经验丰富", "年轻有活力", "稳定发挥"]),
    );
    let _ = writeln!(
        out,
        "{away}方面，目前排名第{away_position}位，积{away_points}分。球队整体战绩为{aw}胜{ad}平{al}负，\
         进{away_for}球失{away_against}球。客场作战能力{away_form}，最近10个客场仅取得{}胜{}平{}负，客场得分率仅为{}%。\n",
        stats.int(2, 4),
        stats.int(2, 4),
        stats.int(3, 5),
        stats.int(30, 45),
    );
    let _ = writeln!(
        out,
        "{away}在客场的表现明显下滑，场均进球只有{}个，而场均失球达到{}个。\
         球队在{}方面存在明显不足，这可能成为本场比赛的重要变数。\n",
        stats.float1(0.8, 1.5),
        stats.float1(1.2, 2.0),
        stats.pick(&["客场适应性", "心理素质", "体能储备", "战术执行"]),
    );
    let _ = write!(
        out,
        "两队的基本面对比显示，{home}在主场具有明显优势，而{away}的客场表现令人担忧。\
         这种主客场表现的巨大差异，为我们的预测提供了重要参考依据。"
    );
    out
}

fn historical(home: &str, away: &str, stats: &mut dyn StatSource) -> String {
    let total = stats.int(15, 25);
    let wins = stats.int(5, 10);
    let draws = stats.int(3, 7);
    let losses = total - wins - draws;
    let recent = stats.int(8, 12);
    let recent_wins = stats.int(3, 5);
    let recent_draws = stats.int(1, 3);
    let recent_losses = recent - recent_wins - recent_draws;

    let mut out = String::from("**【历史交锋分析】**\n\n");
    let _ = writeln!(
        out,
        "两队在历史上共交手{total}次，{home}取得{wins}胜{draws}平{losses}负，进{}球失{}球，在心理上{}。\n",
        stats.int(25, 40),
        stats.int(20, 35),
        stats.pick(&["略占优势", "稍处下风", "势均力敌"]),
    );
    let _ = writeln!(
        out,
        "最近{recent}次交锋中，{home}{recent_wins}胜{recent_draws}平{recent_losses}负。\
         值得注意的是，在主场对阵{away}的最近{}场比赛中，{home}取得了{}胜{}平{}负的优秀战绩，展现出明显的主场优势。\n",
        stats.int(5, 7),
        stats.int(3, 5),
        stats.int(1, 2),
        stats.int(0, 1),
    );
    let _ = writeln!(
        out,
        "从进球数据来看，双方最近{recent}次交锋场均总进球数达到{}个，其中有{}%的比赛总进球超过2.5个。\
         {home}在主场对阵{away}时场均进球{}个，展现出不错的进攻效率。\n",
        stats.float1(2.3, 3.2),
        stats.int(60, 75),
        stats.float1(1.5, 2.2),
    );
    let _ = writeln!(
        out,
        "特别值得一提的是，上赛季双方的两次交锋都非常精彩。首回合{home}在客场{}-{}不敌{away}，\
         但在次回合主场{}-{}完成复仇。这种一报还一报的对抗格局，让本场比赛充满了悬念。\n",
        stats.int(1, 2),
        stats.int(2, 3),
        stats.int(3, 4),
        stats.int(1, 2),
    );
    let _ = writeln!(
        out,
        "从历史交锋的战术特点来看，{home}在面对{away}时更倾向于{}，而{away}则擅长利用{}来制造威胁。\
         这种针锋相对的战术博弈，往往能产生精彩的比赛。\n",
        stats.pick(&["控制节奏", "快速进攻", "稳守反击", "高位逼抢"]),
        stats.pick(&["定位球", "边路突破", "中场控制", "防守反击"]),
    );
    let _ = write!(
        out,
        "历史数据显示，当{home}在主场先进球时，最终获胜的概率高达{}%。这个数据对于本场比赛的走势判断具有重要参考价值。",
        stats.int(75, 85)
    );
    out
}

fn form_letters(stats: &mut dyn StatSource, weights: &[u32; 3]) -> String {
    (0..5).map(|_| ["W", "D", "L"][stats.weighted(weights)]).collect()
}

fn recent_form(home: &str, away: &str, stats: &mut dyn StatSource) -> String {
    let home_form = form_letters(stats, &[5, 2, 3]);
    let away_form = form_letters(stats, &[3, 3, 4]);

    let mut out = String::from("**【近期表现深度分析】**\n\n");
    let _ = writeln!(out, "{home}最近5场比赛战绩：{home_form}\n");
    let _ = writeln!(out, "详细回顾{home}的近期表现：\n");
    let _ = writeln!(
        out,
        "1. 上轮联赛，{home}{}{}-{}战胜{}，球队展现出{}。{}表现出色，{}，成为获胜的关键。\n",
        stats.pick(&["主场", "客场"]),
        stats.int(2, 3),
        stats.int(0, 1),
        stats.pick(&["强敌", "中游球队", "保级球队"]),
        stats.pick(&["强大的进攻火力", "稳固的防守体系", "出色的整体配合", "顽强的斗志"]),
        stats.pick(&["前锋", "中场核心", "后卫"]),
        stats.pick(&["梅开二度", "贡献助攻", "零封对手", "制造点球"]),
    );
    let _ = writeln!(
        out,
        "2. 近5场比赛，{home}打入{}球，场均进球{}个，进攻端表现{}。其中有{}场比赛单场进球数达到或超过2个，显示出球队的进攻稳定性。\n",
        stats.int(8, 12),
        stats.float1(1.6, 2.4),
        stats.pick(&["相当出色", "稳定高效", "渐入佳境", "火力全开"]),
        stats.int(3, 4),
    );
    let _ = writeln!(
        out,
        "3. 防守方面，近5场比赛仅失{}球，有{}场零封对手。后防线的{}让球队的防守变得更加可靠。门将状态{}，扑救成功率达到{}%。\n",
        stats.int(3, 6),
        stats.int(1, 3),
        stats.pick(&["默契配合", "积极补位", "出色发挥", "稳定表现"]),
        stats.pick(&["神勇", "稳定", "出色", "正常"]),
        stats.int(70, 85),
    );
    let _ = writeln!(
        out,
        "4. 战术层面，主教练最近对阵型进行了{}，从之前的{}改为{}，效果{}。\n",
        stats.pick(&["微调", "大胆改革", "针对性调整", "优化升级"]),
        stats.pick(FORMATIONS),
        stats.pick(&["4-3-3", "3-5-2", "4-2-3-1", "5-3-2"]),
        stats.pick(&["立竿见影", "逐渐显现", "相当不错", "有待观察"]),
    );
    let _ = writeln!(out, "{away}最近5场比赛战绩：{away_form}\n");
    let _ = writeln!(out, "{away}的近期状态分析：\n");
    let _ = writeln!(
        out,
        "1. 客队在上轮联赛中{}{}-{}{}对手，暴露出{}的问题。\n",
        stats.pick(&["主场", "客场"]),
        stats.int(1, 2),
        stats.int(1, 2),
        stats.pick(&["战平", "小负于", "险胜"]),
        stats.pick(&["进攻乏力", "防守漏洞", "体能不足", "心理压力"]),
    );
    let _ = writeln!(
        out,
        "2. 最近5场比赛，{away}仅打入{}球，场均进球不足{}个。锋线上的{}已经连续{}场比赛没有进球，状态令人担忧。\n",
        stats.int(4, 7),
        stats.float1(0.8, 1.4),
        stats.pick(&["外援前锋", "本土射手", "主力中锋"]),
        stats.int(3, 5),
    );
    let _ = writeln!(
        out,
        "3. 客场作战时，{away}的表现更是不尽如人意。最近{}个客场仅取得{}胜，客场进球效率仅为每场{}个，而失球数高达每场{}个。\n",
        stats.int(4, 6),
        stats.int(0, 2),
        stats.float1(0.5, 1.2),
        stats.float1(1.5, 2.2),
    );
    let _ = writeln!(
        out,
        "4. 伤病问题也困扰着{away}。主力{}{}，这对球队的整体实力造成了不小的影响。\n",
        stats.pick(&["中场", "后卫", "前锋"]),
        stats.pick(&["因伤缺阵", "刚刚伤愈", "状态不佳", "体能下降"]),
    );
    let _ = write!(
        out,
        "综合近期表现来看，{home}状态明显好于{away}，这种状态差异可能会在比赛中得到体现。"
    );
    out
}

/// Player name pool matching the league's country.
pub fn player_pool(league: &str) -> &'static [&'static str] {
    if league.contains("K联") || league.contains('韩') {
        KOREAN_PLAYERS
    } else if league.contains("J联") || league.contains('日') {
        JAPANESE_PLAYERS
    } else if league.contains("中超") {
        CHINESE_PLAYERS
    } else {
        DEFAULT_PLAYERS
    }
}

fn personnel(home: &str, away: &str, league: &str, stats: &mut dyn StatSource) -> String {
    let names = player_pool(league);

    let mut out = String::from("**【人员情况与阵容分析】**\n\n");
    let _ = writeln!(out, "{home}伤停情况：\n");
    let _ = writeln!(
        out,
        "• 伤病名单：{} {}（{}，预计缺席{}周）",
        stats.pick(&["后卫", "中场", "前锋"]),
        stats.pick(names),
        stats.pick(&["膝伤", "肌肉拉伤", "脚踝扭伤", "腿筋受伤"]),
        stats.int(2, 4),
    );
    let _ = writeln!(
        out,
        "• 停赛名单：{} {}（累积黄牌停赛）",
        stats.pick(&["中场", "后卫"]),
        stats.pick(names)
    );
    let _ = writeln!(
        out,
        "• 疑似出场：{} {}（{}，出场成疑）\n",
        stats.pick(&["前锋", "边锋"]),
        stats.pick(names),
        stats.pick(&["轻微拉伤", "感冒", "疲劳"]),
    );
    let _ = writeln!(
        out,
        "尽管有伤病困扰，{home}的主力阵容基本完整。预计首发阵型为{}：\n",
        stats.pick(FORMATIONS)
    );
    let _ = writeln!(out, "门将：{}", stats.pick(names));
    let defenders: Vec<_> = (0..4).map(|_| stats.pick(names)).collect();
    let _ = writeln!(out, "后卫：{}", defenders.join("、"));
    let midfield: Vec<_> = (0..3).map(|_| stats.pick(names)).collect();
    let _ = writeln!(out, "中场：{}", midfield.join("、"));
    let forwards: Vec<_> = (0..3).map(|_| stats.pick(names)).collect();
    let _ = writeln!(out, "前锋：{}\n", forwards.join("、"));
    let _ = writeln!(
        out,
        "核心球员{}本赛季表现出色，已经贡献{}个进球和{}次助攻，他的发挥将直接影响比赛走向。\n",
        stats.pick(names),
        stats.int(8, 15),
        stats.int(5, 10),
    );
    let _ = writeln!(out, "{away}伤停情况：\n");
    let _ = writeln!(
        out,
        "• 重要缺席：主力{} {}（{}）",
        stats.pick(&["前锋", "中场核心"]),
        stats.pick(names),
        stats.pick(&["红牌停赛", "重伤", "国家队征召"]),
    );
    let _ = writeln!(out, "• 伤病名单：{}、{}（均因伤缺阵）", stats.pick(names), stats.pick(names));
    let _ = writeln!(
        out,
        "• 体能问题：多名主力刚从{}归来，体能储备不足\n",
        stats.pick(&["国家队", "杯赛", "密集赛程"])
    );
    let _ = writeln!(
        out,
        "{away}的人员危机较为严重，主教练不得不启用替补球员。预计首发可能会做出{}处调整，\
         这种被迫的轮换可能会影响球队的整体默契度。特别是{}的缺席，让球队失去了{}。\n",
        stats.int(2, 3),
        stats.pick(names),
        stats.pick(&["进攻支点", "中场节拍器", "防守屏障", "速度优势"]),
    );
    let _ = write!(
        out,
        "从双方的人员对比来看，{home}在阵容完整性上占据优势，这可能成为影响比赛的重要因素。"
    );
    out
}

fn odds_section(home: &str, away: &str, odds: Option<&OddsInfo>, stats: &mut dyn StatSource) -> String {
    let (home_odds, draw_odds, away_odds) = match odds {
        Some(o) => (o.home_win, o.draw, o.away_win),
        None => (
            stats.float2(1.65, 2.20),
            stats.float2(3.20, 3.80),
            stats.float2(3.50, 5.50),
        ),
    };
    let handicap = match odds {
        Some(o) if !o.asian_handicap.trim().is_empty() => o.asian_handicap.clone(),
        _ => format!("{home} {}", stats.pick(HANDICAPS)),
    };
    let line = handicap
        .rsplit(&['-', ' '][..])
        .next()
        .filter(|s| !s.is_empty())
        .unwrap_or("0.5")
        .to_string();
    let total = match odds {
        Some(o) if !o.over_under.trim().is_empty() => o.over_under.clone(),
        _ => format!("{}球", stats.pick(TOTAL_LINES)),
    };
    let moved_home = data_round(home_odds - stats.float(0.0, 0.15));

    let mut out = String::from("**【盘口与赔率分析】**\n\n亚洲盘口分析：\n\n");
    let _ = writeln!(out, "初盘：{handicap} @ {}", stats.float2(0.85, 0.95));
    let _ = writeln!(out, "即时盘：{handicap} @ {}\n", stats.float2(0.88, 0.98));
    let _ = writeln!(
        out,
        "亚盘开出{home}让{line}球，这个盘口{}。从水位变化来看，{}，显示出{}。\n",
        stats.pick(&["较为合理", "略显保守", "相对激进", "符合预期"]),
        stats.pick(&["上盘水位微降", "下盘持续升水", "水位保持稳定", "出现明显调整"]),
        stats.pick(&["资金看好主队", "市场态度谨慎", "机构信心充足", "存在分歧"]),
    );
    let _ = writeln!(
        out,
        "历史盘路显示，{home}作为主场让{line}球时，近{}场赢盘率达到{}%，展现出不错的盘路规律。\
         而{away}在客场接受{line}球让步时，赢盘率仅为{}%。\n",
        stats.int(8, 12),
        stats.int(55, 75),
        stats.int(25, 45),
    );
    let _ = writeln!(out, "欧洲赔率分析：\n");
    let _ = writeln!(out, "主胜：{home_odds:.2} → {moved_home:.2}");
    let _ = writeln!(
        out,
        "平局：{draw_odds:.2} → {:.2}",
        data_round(draw_odds + stats.float(-0.10, 0.10))
    );
    let _ = writeln!(
        out,
        "客胜：{away_odds:.2} → {:.2}\n",
        data_round(away_odds + stats.float(0.0, 0.20))
    );
    let _ = writeln!(
        out,
        "欧赔方面，主胜赔率从{home_odds:.2}下调至{moved_home:.2}，反映出市场对{home}的信心变化。\
         平赔和客胜赔率随之调整，进一步印证了主队优势。\n"
    );
    let _ = writeln!(
        out,
        "大小球盘口：\n\n大小球开出{total}，考虑到两队近期的进球效率和防守表现，这个盘口{}。\
         {home}主场场均总进球{}个，而{away}客场场均总进球{}个，历史交锋平均总进球{}个。\n",
        stats.pick(&["偏向大球", "偏向小球", "相对中性", "存在诱盘嫌疑"]),
        stats.float1(2.3, 3.2),
        stats.float1(2.0, 2.8),
        stats.float1(2.4, 3.1),
    );
    let _ = writeln!(
        out,
        "从赔付风险角度分析，本场比赛机构的防范重点在{}，这也是我们需要重点关注的方向。\n",
        stats.pick(&["主胜", "大球", "主队赢盘", "平局"])
    );
    let _ = write!(
        out,
        "综合盘口赔率变化，市场资金流向明显偏向{home}，但需要警惕{}的可能。",
        stats.pick(&["深盘诱导", "临场异动", "大额投注影响", "消息面变化"])
    );
    out
}

fn data_round(value: f64) -> f64 {
    crate::data::round_to(value, 2)
}

fn specialty(expert: &ExpertProfile, home: &str, away: &str, stats: &mut dyn StatSource) -> String {
    use super::profile::ExpertiseArea;

    let nickname = expert.nickname;
    let phrase = stats.pick(expert.signature_phrases);
    let mut out = String::new();
    match expert.primary_expertise {
        ExpertiseArea::Statistics => {
            let _ = writeln!(out, "**【{nickname}独家数据分析】**\n");
            let _ = writeln!(out, "{phrase}，让我们深入挖掘本场比赛的关键数据指标。\n");
            let _ = writeln!(
                out,
                "**高阶数据模型分析：**\n\n通过我们的机器学习模型，综合分析了超过{}个相似场景的历史数据：\n",
                stats.int(500, 1000)
            );
            let _ = writeln!(
                out,
                "• **xG（预期进球）模型**：{home}预期进球{}个，{away}预期进球{}个",
                stats.float2(1.4, 2.2),
                stats.float2(0.8, 1.5)
            );
            let _ = writeln!(
                out,
                "• **xGA（预期失球）分析**：{home}预期失球{}个，{away}预期失球{}个",
                stats.float2(0.7, 1.3),
                stats.float2(1.2, 1.8)
            );
            let _ = writeln!(
                out,
                "• **蒙特卡洛模拟**（10000次）：{home}获胜概率{}%，平局{}%，{away}获胜{}%\n",
                stats.int(55, 70),
                stats.int(20, 30),
                stats.int(10, 25)
            );
            let _ = writeln!(out, "**关键性能指标（KPI）对比：**\n");
            let _ = writeln!(
                out,
                "1. **进攻效率指数**：{home} {} vs {away} {}",
                stats.float1(65.0, 85.0),
                stats.float1(45.0, 65.0)
            );
            let _ = writeln!(
                out,
                "2. **防守稳定性评分**：{home} {} vs {away} {}",
                stats.float1(70.0, 88.0),
                stats.float1(55.0, 72.0)
            );
            let _ = writeln!(
                out,
                "3. **压迫强度（PPDA）**：{home} {} vs {away} {}",
                stats.float1(8.0, 12.0),
                stats.float1(10.0, 14.0)
            );
            let _ = writeln!(
                out,
                "4. **传球成功率**：{home} {}% vs {away} {}%\n",
                stats.int(78, 88),
                stats.int(72, 82)
            );
            let _ = writeln!(out, "**概率分布与期望值：**\n\n根据贝叶斯推断和历史数据回归分析：");
            let _ = writeln!(
                out,
                "- 最可能比分：{}（概率{}%）",
                stats.pick(&["2-1", "2-0", "1-0", "3-1"]),
                stats.int(12, 18)
            );
            let _ = writeln!(
                out,
                "- 次可能比分：{}（概率{}%）",
                stats.pick(&["1-1", "2-2", "1-0", "0-0"]),
                stats.int(8, 14)
            );
            let _ = writeln!(out, "- 总进球期望值：{}球", stats.float1(2.3, 3.1));
            let _ = writeln!(out, "- 净胜球期望：{home} +{}球\n", stats.float1(0.5, 1.2));
            let _ = write!(
                out,
                "数据模型的置信区间为95%，误差范围±{}%。这些量化指标清晰地指向{home}的优势。",
                stats.int(8, 12)
            );
        }
        ExpertiseArea::Tactics => {
            let _ = writeln!(out, "**【{nickname}战术深度解析】**\n");
            let _ = writeln!(out, "{phrase}，本场比赛的战术博弈将是决定胜负的关键。\n");
            let _ = writeln!(out, "**阵型对抗分析：**\n");
            let _ = writeln!(out, "{home}预计采用{}阵型：", stats.pick(&["4-3-3", "4-2-3-1", "3-5-2"]));
            let _ = writeln!(out, "- 优势：{}", stats.pick(&["中场控制力强", "边路进攻犀利", "防守稳固", "攻守平衡"]));
            let _ = writeln!(out, "- 核心战术：{}", stats.pick(&["高位逼抢", "控球打法", "防守反击", "边中结合"]));
            let _ = writeln!(out, "- 关键区域：{}\n", stats.pick(&["中场肋部", "边路走廊", "禁区前沿", "第二落点"]));
            let _ = writeln!(out, "{away}可能排出{}应对：", stats.pick(&["4-4-2", "5-3-2", "4-5-1"]));
            let _ = writeln!(out, "- 策略：{}", stats.pick(&["密集防守", "中场绞杀", "快速反击", "定位球战术"]));
            let _ = writeln!(
                out,
                "- 弱点：{}\n",
                stats.pick(&["边路防守空虚", "中场缺乏创造力", "高位防线风险", "体能储备不足"])
            );
            let _ = writeln!(out, "**战术关键点：**\n");
            let _ = writeln!(
                out,
                "1. **控球权争夺**：预计{home}控球率将达到{}%，通过{}打开局面\n",
                stats.int(55, 65),
                stats.pick(&["短传渗透", "长传冲吊", "边路传中", "中路配合"])
            );
            let _ = writeln!(
                out,
                "2. **防线高度**：{home}的防线将保持在{}，这给了{away}{}\n",
                stats.pick(&["中场线附近", "本方半场", "高位", "灵活调整"]),
                stats.pick(&["反击空间", "很大压力", "传球困难", "进攻难度"])
            );
            let _ = writeln!(
                out,
                "3. **定位球战术**：双方都有{}%的进球来自定位球，{home}的{}值得关注\n",
                stats.int(25, 35),
                stats.pick(&["角球战术", "任意球配合", "界外球战术", "点球把握能力"])
            );
            let _ = writeln!(
                out,
                "4. **换人调整**：预计下半场{}分钟后，双方都会进行人员调整，{}\n",
                stats.int(60, 70),
                stats.pick(&["增加进攻", "加强防守", "改变节奏", "战术变阵"])
            );
            let _ = write!(
                out,
                "从战术克制关系看，{home}的打法对{away}形成一定压制，特别是在{}方面占据明显优势。",
                stats.pick(&["中场控制", "边路突破", "高空球争夺", "反击速度"])
            );
        }
        ExpertiseArea::AsianHandicap => {
            let _ = writeln!(out, "**【{nickname}亚盘精准解读】**\n");
            let _ = writeln!(out, "{phrase}，让我们从专业角度深度解析本场比赛的盘口语言。\n");
            let _ = writeln!(out, "**盘口历史规律：**\n\n{home}本赛季类似盘口战绩：");
            let _ = writeln!(
                out,
                "- 让{}：{}场，赢盘{}场，赢盘率{}%",
                stats.pick(&["半球", "半一", "一球"]),
                stats.int(8, 12),
                stats.int(5, 9),
                stats.int(55, 75)
            );
            let _ = writeln!(
                out,
                "- 主场让球：{}场，赢盘{}场，走水{}场",
                stats.int(10, 15),
                stats.int(6, 11),
                stats.int(1, 3)
            );
            let _ = writeln!(out, "- 强队身份：连续{}场让球，说明机构认可其实力\n", stats.int(3, 6));
            let _ = writeln!(out, "**水位变化解读：**\n");
            let _ = writeln!(
                out,
                "初盘：{home} -{} @ {}水",
                stats.pick(&["0.5", "0.75", "1"]),
                stats.float2(0.85, 0.95)
            );
            let _ = writeln!(
                out,
                "即时：{home} -{} @ {}水\n",
                stats.pick(&["0.5", "0.75", "1"]),
                stats.float2(0.88, 0.98)
            );
            let _ = writeln!(out, "水位走势：{}", stats.pick(&["震荡上行", "持续下降", "维持稳定", "异常波动"]));
            let _ = writeln!(
                out,
                "- 说明：{}",
                stats.pick(&["上盘热度高", "机构看好主队", "存在诱盘嫌疑", "资金流向明显"])
            );
            let _ = writeln!(
                out,
                "- 临场可能：{}\n",
                stats.pick(&["维持现状", "升盘降水", "降盘升水", "水位调整"])
            );
            let _ = writeln!(out, "**机构手法分析：**\n");
            let _ = writeln!(
                out,
                "1. **造热手段**：通过{}，将资金引向{}",
                stats.pick(&["媒体造势", "初盘诱导", "水位调整", "盘口变化"]),
                stats.pick(&["上盘", "下盘"])
            );
            let _ = writeln!(
                out,
                "2. **真实意图**：从{}判断，机构更看好{}",
                stats.pick(&["欧亚对比", "水位走势", "盘口合理性", "历史规律"]),
                stats.pick(&[home, away])
            );
            let _ = writeln!(
                out,
                "3. **风险控制**：当前盘口对机构{}\n",
                stats.pick(&["相对安全", "风险可控", "略有风险", "压力较大"])
            );
            let alternative = format!("{away}+1.5");
            let _ = writeln!(out, "**专业建议：**\n");
            let _ = writeln!(
                out,
                "- 主推：{home} {}，置信度{}%",
                stats.pick(&["-0.5", "-0.75", "-1"]),
                stats.int(70, 85)
            );
            let _ = writeln!(out, "- 备选：{}", stats.pick(&["大2.5球", "主胜", alternative.as_str()]));
            let _ = writeln!(
                out,
                "- 风险提示：注意{}\n",
                stats.pick(&["临场变盘", "大额投注影响", "消息面变化", "水位异动"])
            );
            let _ = write!(
                out,
                "根据多年亚盘研究经验，这种盘口走势最终{}的概率较大。",
                stats.pick(&["上盘打出", "下盘反弹", "走水"])
            );
        }
        area => {
            let _ = writeln!(out, "**【{nickname}专业分析】**\n");
            let _ = writeln!(out, "{phrase}，从{area}角度深入分析本场比赛。\n");
            let _ = writeln!(out, "根据我们的专业模型和多年经验，{home}在以下几个关键维度上占据优势：\n");
            let _ = writeln!(
                out,
                "1. **{}**：{home}达到{}%，明显高于{away}的{}%",
                stats.pick(expert.key_metrics),
                stats.int(65, 85),
                stats.int(45, 65)
            );
            let _ = writeln!(
                out,
                "2. **{}**：这是{home}的强项，将成为比赛的关键",
                stats.pick(expert.analysis_priorities)
            );
            let _ = writeln!(
                out,
                "3. **{}**：对{home}有利\n",
                stats.pick(&["心理因素", "主场优势", "体能储备", "战术执行"])
            );
            let _ = writeln!(
                out,
                "从{area}的专业角度看，本场比赛的关键在于{}。{home}如果能够{}，将大大增加获胜概率。\n",
                stats.pick(&["开场阶段", "中场控制", "最后时刻", "定位球"]),
                stats.pick(&["先拔头筹", "控制节奏", "保持专注", "把握机会"])
            );
            let _ = write!(
                out,
                "我们的分析模型显示，{home}的获胜概率为{}%，这个数字综合考虑了多个因素的权重。",
                stats.int(60, 75)
            );
        }
    }
    out
}

fn score_prediction(home: &str, away: &str, stats: &mut dyn StatSource) -> String {
    let home_goals = stats.int(1, 3);
    let mut away_goals = stats.int(0, 2);
    if away_goals >= home_goals {
        away_goals = (home_goals - 1).max(0);
    }

    let mut out = String::from("**【比分预测与推荐】**\n\n综合以上所有分析维度，我们对本场比赛做出如下预测：\n\n**比分预测：**\n");
    let _ = writeln!(
        out,
        "- 首选：{home} {home_goals}-{away_goals} {away}（概率{}%）",
        stats.int(15, 25)
    );
    let _ = writeln!(
        out,
        "- 次选：{home} {}-{} {away}（概率{}%）",
        home_goals + 1,
        away_goals + 1,
        stats.int(10, 18)
    );
    let _ = writeln!(
        out,
        "- 备选：{home} {}-{away_goals} {away}（概率{}%）\n",
        (home_goals - 1).max(0),
        stats.int(8, 15)
    );
    let _ = writeln!(out, "**投注建议：**\n\n🎯 **核心推荐**：");
    let _ = writeln!(
        out,
        "- 亚盘：{home} {}（信心指数：★★★★☆）",
        stats.pick(&["-0.5", "-0.75", "-1"])
    );
    let _ = writeln!(
        out,
        "- 大小球：{}（信心指数：★★★☆☆）",
        stats.pick(&["大2.5", "小2.5", "大2.75"])
    );
    let _ = writeln!(out, "- 欧赔：主胜（信心指数：★★★★☆）\n");
    let _ = writeln!(out, "💡 **价值投注**：");
    let _ = writeln!(out, "- 半全场：主/主 @ {}倍", stats.float2(2.8, 3.5));
    let _ = writeln!(
        out,
        "- 正确比分：{home_goals}-{away_goals} @ {}倍",
        stats.float2(6.5, 9.5)
    );
    let _ = writeln!(
        out,
        "- 进球时间：{}\n",
        stats.pick(&["0-30分钟有进球", "下半场大1.5球", "75分钟后有进球"])
    );
    let _ = writeln!(out, "⚠️ **风险控制**：");
    let _ = writeln!(out, "- 建议投注金额：本金的{}%", stats.int(2, 4));
    let _ = writeln!(out, "- 止损点：-{}%", stats.int(5, 8));
    let _ = writeln!(
        out,
        "- 可考虑{}策略\n",
        stats.pick(&["分散投注", "滚球观察", "对冲下注", "保守跟进"])
    );
    let _ = write!(out, "综合置信度：{}%", stats.int(72, 88));
    out
}

fn conclusion(expert: &ExpertProfile, home: &str, away: &str, stats: &mut dyn StatSource) -> String {
    let mut out = String::from("**【总结与展望】**\n\n");
    let _ = writeln!(out, "{}\n", stats.pick(expert.conclusion_templates));
    let _ = writeln!(
        out,
        "本场{home}对阵{away}的比赛，从{}等多个维度分析，{home}都展现出明显的优势。特别是在{}的情况下，取胜概率较大。\n",
        stats.pick(&["基本面", "历史交锋", "近期状态", "人员配置", "盘口走势"]),
        stats.pick(&["主场作战", "状态正佳", "阵容完整", "战术成熟"]),
    );
    let _ = writeln!(
        out,
        "当然，足球比赛充满变数，{away}也有{}的可能。建议各位朋友{}，将娱乐性放在首位。\n",
        stats.pick(&["爆冷", "逆袭", "守住平局", "偷袭得手"]),
        stats.pick(&["理性投注", "控制风险", "量力而行", "谨慎跟进"]),
    );
    let _ = writeln!(
        out,
        "最后，祝愿所有关注本场比赛的朋友都能有所收获。{}！\n",
        stats.pick(&["红单不断", "好运常伴", "理性观赛", "享受足球"])
    );
    let _ = write!(
        out,
        "如需更多专业分析，欢迎关注{}的后续推送。我们下期再见！",
        expert.nickname
    );
    out
}

fn recommendations(expert: &ExpertProfile, stats: &mut dyn StatSource) -> Vec<BetRecommendation> {
    let mut recommendations = vec![BetRecommendation {
        kind: "primary",
        bet: stats.pick(expert.preferred_bet_types).to_string(),
        stake: format!("{}单位", stats.int(2, 4)),
        odds: stats.float2(1.75, 2.25),
        confidence: clamp_confidence(stats.int(75, 90)),
        reasoning: format!("基于{}分析的核心推荐", expert.primary_expertise),
    }];
    for _ in 0..2 {
        recommendations.push(BetRecommendation {
            kind: "secondary",
            bet: stats.pick(&["大小球", "让球盘", "半全场", "正确比分"]).to_string(),
            stake: format!("{}单位", stats.int(1, 2)),
            odds: stats.float2(1.65, 3.50),
            confidence: clamp_confidence(stats.int(60, 75)),
            reasoning: "备选投注方案".to_string(),
        });
    }
    recommendations
}

fn clamp_confidence(value: i64) -> u8 {
    u8::try_from(value.clamp(0, 100)).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{fixtures, MidpointStats, RandomStats};
    use crate::experts::ExpertCatalog;

    #[test]
    fn test_nine_sections_in_order() {
        let catalog = ExpertCatalog::builtin();
        let expert = catalog.get("data_wizard").unwrap();
        let analysis =
            generate_comprehensive_analysis(expert, &fixtures::demo_match(), None, &mut MidpointStats);
        let keys: Vec<_> = analysis.sections.iter().map(|s| s.key).collect();
        assert_eq!(keys, SECTION_KEYS);
        assert!(analysis.content.contains("浦项制铁"));
        assert!(analysis.content.contains("——数据大师"));
        assert_eq!(analysis.title, "数据大师：浦项制铁 vs 全北现代 深度分析");
    }

    #[test]
    fn test_long_form_for_every_expert() {
        let catalog = ExpertCatalog::builtin();
        for expert in catalog.all() {
            let mut stats = RandomStats::new(Some(7));
            let analysis = generate_comprehensive_analysis(
                expert,
                &fixtures::sample_match(),
                Some(&fixtures::sample_odds()),
                &mut stats,
            );
            assert!(
                analysis.word_count >= COMPREHENSIVE_MIN_CHARS,
                "{} wrote {} chars",
                expert.key,
                analysis.word_count
            );
            assert!((0.75..=0.92).contains(&analysis.confidence_level));
            assert_eq!(analysis.recommendations.len(), 3);
            assert_eq!(analysis.recommendations[0].kind, "primary");
            assert!(analysis.recommendations[1..].iter().all(|r| r.kind == "secondary"));
        }
    }

    #[test]
    fn test_opening_follows_writing_style() {
        let catalog = ExpertCatalog::builtin();
        let m = fixtures::sample_match();
        let narrative = catalog.get("historian").unwrap();
        let technical = catalog.get("tactician").unwrap();
        let minimalist = catalog.get("value_hunter").unwrap();

        let text = |e| generate_comprehensive_analysis(e, &m, None, &mut MidpointStats);
        assert!(text(narrative).section("opening").unwrap().starts_with("🎯"));
        assert!(text(technical).section("opening").unwrap().starts_with("⚽"));
        assert!(text(minimalist).section("opening").unwrap().starts_with("📊"));
    }

    #[test]
    fn test_player_pool_by_league() {
        assert_eq!(player_pool("韩K联"), KOREAN_PLAYERS);
        assert_eq!(player_pool("J联赛"), JAPANESE_PLAYERS);
        assert_eq!(player_pool("中超"), CHINESE_PLAYERS);
        assert_eq!(player_pool("英超"), DEFAULT_PLAYERS);
    }

    #[test]
    fn test_market_odds_used_when_given() {
        let catalog = ExpertCatalog::builtin();
        let expert = catalog.get("handicap_master").unwrap();
        let analysis = generate_comprehensive_analysis(
            expert,
            &fixtures::sample_match(),
            Some(&fixtures::sample_odds()),
            &mut MidpointStats,
        );
        let odds = analysis.section("odds").unwrap();
        assert!(odds.contains("主胜：2.28"));
        assert!(odds.contains("主队-0.5"));
    }

    #[test]
    fn test_predicted_home_goals_exceed_away() {
        let text = score_prediction("甲", "乙", &mut MidpointStats);
        // Midpoint draws 2 and 1.
        assert!(text.contains("首选：甲 2-1 乙"));
    }
}
