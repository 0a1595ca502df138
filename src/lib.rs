// aigc-check - 游记内容真实性检测引擎
// 纯计算库：组合图片元数据、键入/粘贴行为、AI 短语三路信号，
// 产出结构化警告和发布确认门；不做 I/O，不依赖任何 Web 框架

mod metadata;
mod models;
mod phrases;
mod session;
mod tracker;
mod verdict;

pub use metadata::scan_image_metadata;
pub use models::{ImageMetadataReport, SuspicionVerdict, TypingPasteState};
pub use phrases::{scan_phrases, PHRASE_LEXICON};
pub use session::ComposerSession;
pub use tracker::{
    TypingPasteTracker, LARGE_PASTE_CHARS, MIN_CHARS_FOR_RATIO, PASTE_RATIO_THRESHOLD,
    PHRASE_WARNING_COUNT,
};
pub use verdict::aggregate;
