//! Helpers for `data:` URLs returned by the renderer and the crop service

/// Return the payload after the first comma of a data URL.
///
/// Strings without a comma carry no transport prefix and are returned whole.
pub fn strip_data_url_prefix(data_url: &str) -> &str {
    match data_url.find(',') {
        Some(idx) => &data_url[idx + 1..],
        None => data_url,
    }
}

/// MIME type of a `data:<mime>[;base64],<payload>` URL
pub fn data_url_mime(data_url: &str) -> Option<&str> {
    let header = data_url.strip_prefix("data:")?;
    let header = &header[..header.find(',')?];
    let mime = header.split(';').next().unwrap_or_default();
    if mime.is_empty() { None } else { Some(mime) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_prefix() {
        assert_eq!(strip_data_url_prefix("data:image/jpeg;base64,/9j/4AAQ"), "/9j/4AAQ");
        assert_eq!(strip_data_url_prefix("/9j/4AAQ"), "/9j/4AAQ");
        assert_eq!(strip_data_url_prefix("data:,"), "");
    }

    #[test]
    fn test_mime() {
        assert_eq!(data_url_mime("data:image/png;base64,AA"), Some("image/png"));
        assert_eq!(data_url_mime("data:,AA"), None);
        assert_eq!(data_url_mime("image/png;base64,AA"), None);
        assert_eq!(data_url_mime("data:image/png"), None);
    }
}
