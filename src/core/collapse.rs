/// 移除緊接重複的指定行
///
/// 當第 `i` 行與第 `i+1` 行去除前後空白後都等於 `literal`，保留第 `i` 行並跳過
/// 第 `i+1` 行，接著從第 `i+2` 行重新判斷。因此連續 n 行只會留下 `ceil(n/2)` 行。
/// 其他行原樣保留（包含換行字元）。回傳保留的行與移除的行數。
pub fn collapse_consecutive_duplicates<'a>(lines: &[&'a str], literal: &str) -> (Vec<&'a str>, usize) {
    let target = literal.trim();
    let mut kept = Vec::with_capacity(lines.len());
    let mut removed = 0;
    let mut skip_next = false;

    for (i, line) in lines.iter().enumerate() {
        if skip_next {
            skip_next = false;
            removed += 1;
            continue;
        }

        let is_pair = line.trim() == target
            && lines.get(i + 1).is_some_and(|next| next.trim() == target);

        kept.push(*line);
        if is_pair {
            skip_next = true;
        }
    }

    (kept, removed)
}

/// 對整份文字執行 [`collapse_consecutive_duplicates`]
///
/// 換行字元原樣保留：CRLF 檔案寫回後仍是 CRLF，不會像文字模式讀寫那樣轉成 LF。
pub fn collapse_text(text: &str, literal: &str) -> (String, usize) {
    let lines: Vec<&str> = text.split_inclusive('\n').collect();
    let (kept, removed) = collapse_consecutive_duplicates(&lines, literal);
    (kept.concat(), removed)
}
