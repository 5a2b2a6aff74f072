/// Library-version block of the status log.
///
/// junifer logs its dependency versions between two banner lines:
///
/// ```text
/// ... - INFO - ===== Lib Versions =====
/// ... - INFO - numpy: 1.26.0
/// ... - INFO - ========================
/// ```
///
/// The banners may be bare lines or the tail of a formatted log line.
use super::record::ExtractedRecord;
use regex::Regex;
use std::sync::LazyLock;

pub const BEGIN_MARKER: &str = "===== Lib Versions =====";
pub const END_MARKER: &str = "========================";

static VERSION_PAIR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\S+):\s(\S+)").unwrap());

/// The text strictly between the begin and end banners, or `None` when
/// either banner is absent.
pub fn version_block(text: &str) -> Option<&str> {
    let mut offset = 0;
    let mut start = None;
    for line in text.split_inclusive('\n') {
        let content = line.trim_end();
        match start {
            None if content.ends_with(BEGIN_MARKER) => start = Some(offset + line.len()),
            Some(begin) if content.ends_with(END_MARKER) => return Some(&text[begin..offset]),
            _ => {}
        }
        offset += line.len();
    }
    None
}

/// Every `name: version` pair of the block, in order of appearance.
pub fn parse_versions(block: &str) -> Vec<(&str, &str)> {
    block
        .lines()
        .flat_map(|line| VERSION_PAIR.captures_iter(line))
        .filter_map(|caps| Some((caps.get(1)?.as_str(), caps.get(2)?.as_str())))
        .collect()
}

/// One field per library found in the version block. A status log without
/// a complete block contributes nothing.
pub fn extract_versions(text: &str) -> ExtractedRecord {
    let mut record = ExtractedRecord::new();
    let Some(block) = version_block(text) else {
        tracing::debug!("no library version block");
        return record;
    };
    for (name, version) in parse_versions(block) {
        record.set(name, Some(version.to_string()));
    }
    if record.is_empty() {
        tracing::debug!("library version block is empty");
    }
    record
}
