/// Identity form of an entity or predicate label: surrounding whitespace removed, lower-cased.
///
/// Every dedup decision (restructuring a pass, merging into the accumulated state,
/// keying edges) goes through this function.
pub fn canonicalize(label: &str) -> String {
    label.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_lowercases() {
        assert_eq!(canonicalize("  Paris "), "paris");
        assert_eq!(canonicalize("PARIS"), canonicalize("paris"));
    }

    #[test]
    fn keeps_inner_whitespace() {
        assert_eq!(canonicalize(" New  York\t"), "new  york");
    }

    #[test]
    fn handles_non_ascii() {
        assert_eq!(canonicalize("ÉCOLE"), "école");
        assert_eq!(canonicalize("   "), "");
    }
}
