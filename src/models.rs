// 数据模型定义
// 定义元数据报告、输入行为快照、可疑判定结果等核心数据结构

use serde::{Deserialize, Serialize};

/// 图片元数据扫描报告
/// 每张上传图片扫描一次，结果不可变
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageMetadataReport {
    /// 是否找到嵌入的元数据段（JPEG APP1/Exif 或 TIFF 头）
    pub has_metadata_segment: bool,
    /// 是否检测到相机厂商信息
    pub has_camera_info: bool,
    /// 检测到的相机厂商（仅在 has_camera_info 为 true 时存在）
    pub camera_make: Option<String>,
    /// 是否包含 GPS 定位信息
    pub has_gps: bool,
    /// 是否包含拍摄时间信息
    pub has_datetime: bool,
    /// Software 标签的内容（生成/编辑该图片的软件）
    pub software_tag: Option<String>,
    /// 是否存在可疑迹象（当且仅当 reasons 非空）
    pub is_suspicious: bool,
    /// 可疑原因列表，顺序即检测顺序
    pub reasons: Vec<String>,
}

impl ImageMetadataReport {
    /// 追加一条可疑原因并同步 is_suspicious 标志
    pub(crate) fn flag(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
        self.is_suspicious = true;
    }
}

/// 输入行为状态快照
/// 由 TypingPasteTracker 生成的只读视图，供前端展示警告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypingPasteState {
    /// 通过键盘逐字输入的字符数
    pub typed_chars: u64,
    /// 通过剪贴板粘贴的字符数
    pub pasted_chars: u64,
    /// 粘贴警告是否已被用户确认
    pub paste_acknowledged: bool,
    /// 最近一次短语扫描命中的短语列表
    pub phrase_matches: Vec<String>,
    /// 短语警告是否已被用户确认
    pub phrase_acknowledged: bool,
    /// 粘贴字符占总输入的比例（无输入时为 0）
    pub paste_ratio: f64,
    /// 是否触发粘贴比例警告
    pub has_paste_warning: bool,
    /// 是否触发 AI 短语警告
    pub has_phrase_warning: bool,
}

/// 可疑判定结果
/// 按需聚合图片、粘贴、短语三路信号得出，不持久化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuspicionVerdict {
    /// 警告文案列表，固定顺序：图片原因、粘贴警告、短语警告
    pub warnings: Vec<String>,
    /// 是否阻止发布（存在未确认的文本类警告）
    pub blocking: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_flag_keeps_invariant() {
        let mut report = ImageMetadataReport::default();
        assert!(!report.is_suspicious);
        assert!(report.reasons.is_empty());

        report.flag("No EXIF metadata found");
        assert!(report.is_suspicious);
        assert_eq!(report.reasons.len(), 1);
    }

    #[test]
    fn test_state_json_field_names() {
        // 前端依赖这些字段名，序列化格式属于对外契约
        let state = TypingPasteState {
            typed_chars: 30,
            pasted_chars: 400,
            paste_acknowledged: false,
            phrase_matches: vec!["delve into".to_string()],
            phrase_acknowledged: false,
            paste_ratio: 400.0 / 430.0,
            has_paste_warning: true,
            has_phrase_warning: false,
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["typed_chars"], 30);
        assert_eq!(json["pasted_chars"], 400);
        assert_eq!(json["has_paste_warning"], true);
        assert_eq!(json["phrase_matches"][0], "delve into");
    }

    #[test]
    fn test_verdict_json_field_names() {
        let verdict = SuspicionVerdict {
            warnings: vec!["No EXIF metadata found".to_string()],
            blocking: false,
        };
        let json = serde_json::to_value(&verdict).unwrap();
        assert_eq!(json["warnings"][0], "No EXIF metadata found");
        assert_eq!(json["blocking"], false);
    }
}
