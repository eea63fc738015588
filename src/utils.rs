/// Show only the ends of a secret, e.g. `sk-proj...a1b2c3`
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    let len = chars.len();
    if len <= 15 {
        // Too short to safely show, just show dots
        return "•".repeat(len);
    }

    let first: String = chars[..7].iter().collect();
    let last: String = chars[len - 6..].iter().collect();
    format!("{first}...{last}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mask_long_token() {
        assert_eq!(mask_token("sk-proj-abcdefghijklmnop123456"), "sk-proj...123456");
    }

    #[test]
    fn test_mask_short_token() {
        assert_eq!(mask_token("short"), "•••••");
        assert_eq!(mask_token(""), "");
    }
}
