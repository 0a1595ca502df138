// 编辑会话模块
// 调用方独占持有的会话门面：组合行为跟踪器和最近一次图片报告
//
// 每个编辑界面持有一个实例，会话结束即丢弃；不跨会话共享

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::metadata;
use crate::models::{ImageMetadataReport, SuspicionVerdict, TypingPasteState};
use crate::tracker::TypingPasteTracker;
use crate::verdict;

/// 一次游记编辑会话
pub struct ComposerSession {
    /// 会话唯一标识
    id: String,
    /// 会话开始时间
    started_at: DateTime<Utc>,
    /// 键入/粘贴行为跟踪器
    tracker: TypingPasteTracker,
    /// 最近一次附图的扫描报告（每篇游记一张附图，新图覆盖旧图）
    image_report: Option<ImageMetadataReport>,
}

impl ComposerSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            tracker: TypingPasteTracker::new(),
            image_report: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// 记录一次文本长度变化（键入检测）
    pub fn record_typed(&mut self, new_len: usize, previous_len: usize) {
        self.tracker.record_typed_delta(new_len, previous_len);
    }

    /// 记录一次粘贴，按字符数而非字节数统计，避免多字节文本失真
    pub fn record_paste(&mut self, pasted_text: &str) {
        self.tracker.record_paste(pasted_text.chars().count());
    }

    /// 用当前全文做一次短语检查（编辑器定期或在发布前调用）
    pub fn check_text(&mut self, text: &str) {
        self.tracker.rescan_phrases(text);
    }

    /// 扫描附图并保留报告
    pub fn scan_image(&mut self, bytes: &[u8], declared_mime: &str) -> &ImageMetadataReport {
        let report = metadata::scan_image_metadata(bytes, declared_mime);
        if report.is_suspicious {
            log::debug!("会话 {} 的附图存在可疑迹象: {:?}", self.id, report.reasons);
        }
        self.image_report.insert(report)
    }

    pub fn image_report(&self) -> Option<&ImageMetadataReport> {
        self.image_report.as_ref()
    }

    pub fn acknowledge_paste(&mut self) {
        self.tracker.acknowledge_paste();
    }

    pub fn acknowledge_phrases(&mut self) {
        self.tracker.acknowledge_phrases();
    }

    /// 当前行为状态快照，供前端展示
    pub fn state(&self) -> TypingPasteState {
        self.tracker.snapshot()
    }

    /// 聚合当前所有信号，供发布前的确认门使用
    pub fn verdict(&self) -> SuspicionVerdict {
        verdict::aggregate(self.image_report.as_ref(), &self.tracker.snapshot())
    }

    /// 作为全新会话重新开始：清空状态、丢弃附图报告、换新标识
    pub fn restart(&mut self) {
        log::info!("编辑会话 {} 重新开始", self.id);
        self.id = Uuid::new_v4().to_string();
        self.started_at = Utc::now();
        self.tracker.reset();
        self.image_report = None;
    }
}

impl Default for ComposerSession {
    fn default() -> Self {
        Self::new()
    }
}
