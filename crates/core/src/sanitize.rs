use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LabelError {
    #[error("名前が空です")]
    Empty,
    #[error("ファイル名に使用できない文字が含まれています: {0}")]
    IllegalCharacter(char),
}

pub fn normalize_label(raw: &str) -> Result<String, LabelError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(LabelError::Empty);
    }
    if let Some(ch) = trimmed.chars().find(|ch| is_disallowed_char(*ch)) {
        return Err(LabelError::IllegalCharacter(ch));
    }
    Ok(trimmed.to_uppercase())
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
        || ch == '\0'
        || ch.is_control()
}
