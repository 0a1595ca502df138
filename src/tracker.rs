// 输入行为跟踪模块
// 统计键入与粘贴的字符数，维护警告确认状态机
//
// 一个实例只服务一个编辑会话，由调用方独占持有，不做内部加锁

use crate::models::TypingPasteState;
use crate::phrases;

/// 评估粘贴比例前要求的最小总字符数，避免短文本误报
pub const MIN_CHARS_FOR_RATIO: u64 = 100;
/// 触发粘贴警告的比例阈值
pub const PASTE_RATIO_THRESHOLD: f64 = 0.7;
/// 单次粘贴达到该长度时无条件重新激活警告
pub const LARGE_PASTE_CHARS: usize = 50;
/// 视为真实按键的最大长度增量，更大的增量按粘贴/自动补全处理
const MAX_KEYSTROKE_DELTA: usize = 2;
/// 触发短语警告所需的命中条数
pub const PHRASE_WARNING_COUNT: usize = 3;

/// 键入/粘贴行为跟踪器
/// 生命周期与一次编辑会话一致：会话开始时创建，结束时丢弃
#[derive(Debug, Default)]
pub struct TypingPasteTracker {
    typed_chars: u64,
    pasted_chars: u64,
    paste_acknowledged: bool,
    phrase_matches: Vec<String>,
    phrase_acknowledged: bool,
}

impl TypingPasteTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次粘贴事件
    /// 大段粘贴（≥ LARGE_PASTE_CHARS）无条件重新激活警告；
    /// 小段粘贴只在警告从无到有越过阈值时重新激活
    pub fn record_paste(&mut self, pasted_len: usize) {
        let was_warning = self.has_paste_warning();
        self.pasted_chars += pasted_len as u64;

        if pasted_len >= LARGE_PASTE_CHARS {
            self.paste_acknowledged = false;
        } else if !was_warning && self.has_paste_warning() {
            self.paste_acknowledged = false;
        }
    }

    /// 记录一次文本长度变化
    /// 只把 1-2 个字符的增量计为键入；更大的增量交给粘贴事件统计，
    /// 避免同一批字符被重复计数；长度减少则忽略
    pub fn record_typed_delta(&mut self, new_len: usize, previous_len: usize) {
        let diff = new_len.saturating_sub(previous_len);
        if diff == 0 || diff > MAX_KEYSTROKE_DELTA {
            return;
        }
        let was_warning = self.has_paste_warning();
        self.typed_chars += diff as u64;
        // 键入不会抬高比例，但可能把总量推过评估门槛使警告首次生效
        if !was_warning && self.has_paste_warning() {
            self.paste_acknowledged = false;
        }
    }

    /// 用最新全文重新扫描 AI 短语，完全替换上次的命中列表
    /// 命中数从阈值以下越到以上时强制取消已有确认
    pub fn rescan_phrases(&mut self, text: &str) {
        let was_warning = self.has_phrase_warning();
        self.phrase_matches = phrases::scan_phrases(text);
        if !was_warning && self.has_phrase_warning() {
            self.phrase_acknowledged = false;
        }
    }

    /// 用户确认粘贴警告（幂等）
    pub fn acknowledge_paste(&mut self) {
        self.paste_acknowledged = true;
    }

    /// 用户确认短语警告（幂等）
    pub fn acknowledge_phrases(&mut self) {
        self.phrase_acknowledged = true;
    }

    /// 清零所有计数和标志，用于开始全新的编辑会话
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// 粘贴字符占总输入的比例，无输入时为 0
    pub fn paste_ratio(&self) -> f64 {
        let total = self.typed_chars + self.pasted_chars;
        if total == 0 {
            0.0
        } else {
            self.pasted_chars as f64 / total as f64
        }
    }

    pub fn has_paste_warning(&self) -> bool {
        self.typed_chars + self.pasted_chars >= MIN_CHARS_FOR_RATIO
            && self.paste_ratio() >= PASTE_RATIO_THRESHOLD
    }

    pub fn has_phrase_warning(&self) -> bool {
        self.phrase_matches.len() >= PHRASE_WARNING_COUNT
    }

    /// 生成只读快照，派生字段在此一并计算
    pub fn snapshot(&self) -> TypingPasteState {
        TypingPasteState {
            typed_chars: self.typed_chars,
            pasted_chars: self.pasted_chars,
            paste_acknowledged: self.paste_acknowledged,
            phrase_matches: self.phrase_matches.clone(),
            phrase_acknowledged: self.phrase_acknowledged,
            paste_ratio: self.paste_ratio(),
            has_paste_warning: self.has_paste_warning(),
            has_phrase_warning: self.has_phrase_warning(),
        }
    }
}
