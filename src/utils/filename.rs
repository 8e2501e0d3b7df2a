use regex::Regex;

/// 清理文件名，移除非法字符并限制长度
pub fn sanitize_filename(filename: &str, max_length: usize) -> String {
    let illegal = Regex::new(r#"[<>:"/\\|?*]"#).unwrap();
    let cleaned = illegal.replace_all(filename, "_");
    cleaned.chars().take(max_length).collect()
}

/// 生成结局图片文件名：{id:08}_{english_name}.jpg
pub fn ending_image_filename(id: i64, english_name: &str, max_length: usize) -> String {
    format!("{:08}_{}.jpg", id, sanitize_filename(english_name, max_length))
}
