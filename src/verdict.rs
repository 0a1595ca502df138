// 判定聚合模块
// 把图片报告、输入行为快照折叠成一份面向用户的可疑判定

use crate::models::{ImageMetadataReport, SuspicionVerdict, TypingPasteState};

/// 聚合三路信号生成判定结果
/// 只读操作，相同输入重复调用得到相同结果
///
/// 警告顺序固定：图片原因在前，其次粘贴警告，最后短语警告。
/// 图片可疑只提示不拦截，是否发布仍由文本类警告的确认状态决定
/// （沿用现行产品行为，是否应当拦截留待产品评审）。
pub fn aggregate(
    image_report: Option<&ImageMetadataReport>,
    state: &TypingPasteState,
) -> SuspicionVerdict {
    let mut warnings = Vec::new();

    if let Some(report) = image_report {
        if report.is_suspicious {
            warnings.extend(report.reasons.iter().cloned());
        }
    }

    if state.has_paste_warning {
        let percent = (state.paste_ratio * 100.0).round() as u64;
        warnings.push(format!(
            "Most of this entry was pasted rather than typed ({}% of input)",
            percent
        ));
    }

    if state.has_phrase_warning {
        warnings.push(format!(
            "Common AI-generated phrasing detected: {}",
            state.phrase_matches.join(", ")
        ));
    }

    let blocking = (state.has_paste_warning && !state.paste_acknowledged)
        || (state.has_phrase_warning && !state.phrase_acknowledged);

    SuspicionVerdict { warnings, blocking }
}
