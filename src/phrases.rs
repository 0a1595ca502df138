// AI 短语匹配模块
// 将自由文本与固定的 AI 套话词库做大小写无关的包含匹配

/// AI 生成文本常见套话词库（全小写，固定顺序）
/// 前半部分是通用过渡语和套话，后半部分是游记场景里 AI 偏爱的陈词滥调
pub const PHRASE_LEXICON: &[&str] = &[
    "delve into",
    "dive into the world of",
    "it's important to note",
    "it is important to note",
    "it's worth noting that",
    "in conclusion,",
    "in summary,",
    "furthermore,",
    "moreover,",
    "on the other hand,",
    "a tapestry of",
    "a testament to",
    "the realm of",
    "embark on a journey",
    "in today's fast-paced world",
    "in the ever-evolving",
    "plays a crucial role",
    "plays a pivotal role",
    "underscores the importance",
    "highlights the importance",
    "a myriad of",
    "seamlessly blend",
    "cutting-edge",
    "game-changer",
    "revolutionize the way",
    "foster a sense of",
    "cannot be overstated",
    "shed light on",
    "paves the way",
    "at the forefront of",
    "holistic approach",
    "unlock the secrets",
    "unleash the power",
    "treasure trove",
    "vibrant tapestry",
    "nestled in the heart of",
    "a must-visit",
    "hidden gem",
    "culinary delights",
    "breathtaking vistas",
    "bustling streets",
    "rich cultural heritage",
];

/// 扫描文本，返回命中的词库短语
/// 结果按词库顺序排列，每条短语至多出现一次；纯函数，可并发调用
pub fn scan_phrases(text: &str) -> Vec<String> {
    let lower = text.to_lowercase();
    PHRASE_LEXICON
        .iter()
        .filter(|phrase| lower.contains(*phrase))
        .map(|phrase| phrase.to_string())
        .collect()
}
