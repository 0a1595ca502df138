// 图片元数据扫描模块
// 浅层扫描 JPEG/TIFF 字节流，提取相机、GPS、时间和生成软件线索
//
// 注意：这里有意不做完整的 TIFF/IFD 结构解析，只对字节做子串匹配。
// 对启发式判定来说足够快也足够准；如需更高精度，可在保持
// ImageMetadataReport 契约不变的前提下换成结构化 EXIF 解析器。

use crate::models::ImageMetadataReport;

/// JPEG 文件起始标记 (Start Of Image)
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
/// APP1 段标记，约定俗成用于存放 EXIF 数据
const APP1_MARKER: u8 = 0xE1;

/// 相机厂商子串及其规范写法
const CAMERA_MAKERS: &[(&str, &str)] = &[
    ("canon", "Canon"),
    ("nikon", "Nikon"),
    ("sony", "Sony"),
    ("fuji", "Fujifilm"),
    ("olympus", "Olympus"),
    ("panasonic", "Panasonic"),
    ("apple", "Apple"),
    ("samsung", "Samsung"),
    ("google", "Google"),
    ("huawei", "Huawei"),
    ("xiaomi", "Xiaomi"),
    ("oneplus", "OnePlus"),
    ("leica", "Leica"),
    ("hasselblad", "Hasselblad"),
    ("gopro", "GoPro"),
    ("dji", "DJI"),
];

/// AI 生成工具在 Software 标签中的特征子串（全小写）
const AI_TOOL_SIGNATURES: &[&str] = &[
    "dall-e",
    "midjourney",
    "stable diffusion",
    "novelai",
    "adobe firefly",
    "bing image creator",
    "openai",
    "stability.ai",
    "runway",
    "leonardo.ai",
    "ideogram",
    "playground ai",
];

/// 扫描图片字节流，生成元数据报告
/// 纯函数，对任意畸形输入都返回尽力而为的报告，绝不 panic
pub fn scan_image_metadata(bytes: &[u8], declared_mime: &str) -> ImageMetadataReport {
    let mut report = ImageMetadataReport::default();
    let mime = declared_mime.to_lowercase();

    // 非 JPEG/TIFF：PNG/WebP 是 AI 工具常见导出格式，标记可疑；
    // 其他没有相机元数据惯例的格式保持中性
    if !is_jpeg_mime(&mime) && !is_tiff_mime(&mime) {
        if mime.contains("png") || mime.contains("webp") {
            report.flag("Image format typically lacks camera metadata");
        }
        return report;
    }

    if is_tiff_mime(&mime) {
        // TIFF 本身就是 EXIF 的容器，字节序头有效即视为找到元数据段
        if bytes.len() >= 4 && (&bytes[..4] == b"II*\0" || &bytes[..4] == b"MM\0*") {
            report.has_metadata_segment = true;
            parse_exif_payload(bytes, &mut report);
            apply_post_checks(&mut report);
        } else {
            log::debug!("TIFF 字节序头无效，按无结论处理");
        }
        return report;
    }

    // 畸形 JPEG 属于无结论，不构成 AI 生成的证据
    if bytes.len() < 2 || bytes[..2] != JPEG_SOI {
        log::debug!("缺少 JPEG SOI 标记，按无结论处理");
        return report;
    }

    if let Some(payload) = find_exif_segment(bytes) {
        report.has_metadata_segment = true;
        parse_exif_payload(payload, &mut report);
    }
    apply_post_checks(&mut report);
    report
}

/// 从偏移 2 开始遍历 JPEG 标记段，返回首个 APP1/Exif 段的载荷
fn find_exif_segment(bytes: &[u8]) -> Option<&[u8]> {
    let mut pos = 2;

    while pos + 4 <= bytes.len() {
        // 标记必须以 0xFF 开头，否则已进入非标记区域，停止扫描
        if bytes[pos] != 0xFF {
            break;
        }
        let marker = bytes[pos + 1];
        let seg_len = u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]) as usize;
        // 段长包含自身 2 字节，小于 2 说明数据已损坏
        if seg_len < 2 {
            break;
        }

        if marker == APP1_MARKER {
            let start = pos + 4;
            let end = (pos + 2 + seg_len).min(bytes.len());
            let payload = &bytes[start.min(end)..end];
            if payload.len() >= 4 && &payload[..4] == b"Exif" {
                log::debug!("在偏移 {} 处找到 APP1/Exif 段，载荷 {} 字节", pos, payload.len());
                return Some(payload);
            }
        }

        pos += 2 + seg_len;
    }

    None
}

/// 对 EXIF 载荷做宽松的文本化子串扫描
fn parse_exif_payload(payload: &[u8], report: &mut ImageMetadataReport) {
    let text = String::from_utf8_lossy(payload);
    let lower = text.to_lowercase();

    // 相机厂商：按固定表顺序取第一个命中的
    for (needle, display) in CAMERA_MAKERS {
        if lower.contains(needle) {
            report.has_camera_info = true;
            report.camera_make = Some((*display).to_string());
            break;
        }
    }

    if lower.contains("gps") {
        report.has_gps = true;
    }
    if lower.contains("datetime") {
        report.has_datetime = true;
    }

    if let Some(tag) = extract_software_tag(payload) {
        let tag_lower = tag.to_lowercase();
        if AI_TOOL_SIGNATURES.iter().any(|sig| tag_lower.contains(sig)) {
            report.flag(format!("AI tool signature detected: {}", tag));
        }
        report.software_tag = Some(tag);
    }
}

/// 定位 "Software" 标签后面的可打印 ASCII 串作为软件名
fn extract_software_tag(payload: &[u8]) -> Option<String> {
    let start = find_subsequence_ignore_case(payload, b"software")? + b"software".len();
    let rest = &payload[start..];

    // 跳过标签与值之间的分隔字节（结构字节、冒号、等号、空白）
    let value_start = rest
        .iter()
        .position(|&b| is_printable(b) && !matches!(b, b':' | b'=' | b' ' | b'\t'))?;
    let value_end = rest[value_start..]
        .iter()
        .position(|&b| !is_printable(b))
        .map(|i| value_start + i)
        .unwrap_or(rest.len());

    let value = String::from_utf8_lossy(&rest[value_start..value_end]);
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// 载荷扫描结束后的兜底检查
/// 两条规则互斥：第二条仅在找到元数据段时适用
fn apply_post_checks(report: &mut ImageMetadataReport) {
    if !report.has_metadata_segment {
        report.flag("No EXIF metadata found");
    } else if !report.has_camera_info && !report.has_datetime {
        report.flag("Missing camera and timestamp information");
    }
}

fn is_jpeg_mime(mime: &str) -> bool {
    mime.contains("jpeg") || mime.contains("jpg")
}

fn is_tiff_mime(mime: &str) -> bool {
    mime.contains("tiff") || mime.contains("tif")
}

fn is_printable(b: u8) -> bool {
    (0x20..=0x7E).contains(&b)
}

/// 在字节切片中查找子序列（忽略 ASCII 大小写）
fn find_subsequence_ignore_case(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window.eq_ignore_ascii_case(needle))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 构造一个带单个 APP1/Exif 段的合成 JPEG
    fn jpeg_with_exif(exif_text: &[u8]) -> Vec<u8> {
        let mut payload = b"Exif\0\0".to_vec();
        payload.extend_from_slice(exif_text);

        let seg_len = (payload.len() + 2) as u16;
        let mut bytes = vec![0xFF, 0xD8];
        bytes.extend_from_slice(&[0xFF, 0xE1]);
        bytes.extend_from_slice(&seg_len.to_be_bytes());
        bytes.extend_from_slice(&payload);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        bytes
    }

    #[test]
    fn test_invalid_soi_is_inconclusive() {
        let report = scan_image_metadata(b"not a jpeg at all", "image/jpeg");
        assert!(!report.has_metadata_segment);
        assert!(!report.is_suspicious);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_png_mime_is_flagged() {
        let report = scan_image_metadata(&[0x89, b'P', b'N', b'G'], "image/png");
        assert!(!report.has_metadata_segment);
        assert!(report.is_suspicious);
        assert_eq!(
            report.reasons,
            vec!["Image format typically lacks camera metadata".to_string()]
        );
    }

    #[test]
    fn test_unknown_format_stays_neutral() {
        let report = scan_image_metadata(b"GIF89a", "image/gif");
        assert!(!report.is_suspicious);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_camera_and_datetime_not_suspicious() {
        let jpeg = jpeg_with_exif(b"Canon EOS R5\0DateTimeOriginal 2024:05:01 10:00:00\0");
        let report = scan_image_metadata(&jpeg, "image/jpeg");
        assert!(report.has_metadata_segment);
        assert!(report.has_camera_info);
        assert_eq!(report.camera_make.as_deref(), Some("Canon"));
        assert!(report.has_datetime);
        assert!(!report.is_suspicious);
        assert!(report.reasons.is_empty());
    }

    #[test]
    fn test_ai_software_tag_is_flagged() {
        let jpeg = jpeg_with_exif(b"Software\0Midjourney v6\0DateTime 2024:05:01\0");
        let report = scan_image_metadata(&jpeg, "image/jpeg");
        assert_eq!(report.software_tag.as_deref(), Some("Midjourney v6"));
        assert!(report.is_suspicious);
        assert_eq!(
            report.reasons,
            vec!["AI tool signature detected: Midjourney v6".to_string()]
        );
    }

    #[test]
    fn test_missing_app1_segment() {
        // 合法 SOI 但没有任何 APP1 段
        let bytes = vec![0xFF, 0xD8, 0xFF, 0xDB, 0x00, 0x04, 0x01, 0x02, 0xFF, 0xD9];
        let report = scan_image_metadata(&bytes, "image/jpeg");
        assert!(!report.has_metadata_segment);
        assert!(report.is_suspicious);
        assert_eq!(report.reasons, vec!["No EXIF metadata found".to_string()]);
    }

    #[test]
    fn test_segment_without_camera_or_datetime() {
        let jpeg = jpeg_with_exif(b"GPSLatitude 12.34 GPSLongitude 56.78\0");
        let report = scan_image_metadata(&jpeg, "image/jpeg");
        assert!(report.has_metadata_segment);
        assert!(report.has_gps);
        assert_eq!(
            report.reasons,
            vec!["Missing camera and timestamp information".to_string()]
        );
    }

    #[test]
    fn test_truncated_segment_degrades_gracefully() {
        // 声明段长远超实际数据，载荷被截断但不应 panic 或误报
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1, 0xFF, 0xFF];
        bytes.extend_from_slice(b"Exif\0\0Sony A7\0DateTime\0");
        let report = scan_image_metadata(&bytes, "image/jpeg");
        assert!(report.has_metadata_segment);
        assert_eq!(report.camera_make.as_deref(), Some("Sony"));
        assert!(report.has_datetime);
        assert!(!report.is_suspicious);
    }

    #[test]
    fn test_tiff_header_counts_as_metadata() {
        let mut bytes = b"II*\0".to_vec();
        bytes.extend_from_slice(b"Nikon Z8\0DateTimeOriginal\0");
        let report = scan_image_metadata(&bytes, "image/tiff");
        assert!(report.has_metadata_segment);
        assert_eq!(report.camera_make.as_deref(), Some("Nikon"));
        assert!(!report.is_suspicious);
    }

    #[test]
    fn test_non_exif_app1_is_skipped() {
        // APP1 段存在但载荷是 XMP 而非 Exif，应继续向后并最终判定无 EXIF
        let xmp = b"http://ns.adobe.com/xap/1.0/\0";
        let seg_len = (xmp.len() + 2) as u16;
        let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE1];
        bytes.extend_from_slice(&seg_len.to_be_bytes());
        bytes.extend_from_slice(xmp);
        bytes.extend_from_slice(&[0xFF, 0xD9]);
        let report = scan_image_metadata(&bytes, "image/jpeg");
        assert!(!report.has_metadata_segment);
        assert_eq!(report.reasons, vec!["No EXIF metadata found".to_string()]);
    }
}
