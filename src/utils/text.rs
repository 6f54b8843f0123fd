/// 截取前 `max_chars` 个字符用于日志
pub fn preview(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_respects_char_boundaries() {
        assert_eq!(preview("élévation", 3), "élé");
        assert_eq!(preview("ok", 50), "ok");
    }
}
