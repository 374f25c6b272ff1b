use crate::errors::AppError;

/// Trims, bounds by character count, then HTML-escapes user text.
pub fn sanitize_text(raw: &str, max_chars: usize) -> Result<String, AppError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".into()));
    }

    let count = trimmed.chars().count();
    if count > max_chars {
        return Err(AppError::BadRequest(format!(
            "Message is {} characters, the limit is {}",
            count, max_chars
        )));
    }

    Ok(html_escape::encode_text(trimmed).to_string())
}
