//! Content hashing utilities.

use xxhash_rust::xxh3::Xxh3;

/// Stable 128-bit identifier over a sequence of byte slices, as 32 lowercase
/// hex digits. Part boundaries are hashed too, so `["ab", "c"]` and
/// `["a", "bc"]` differ.
#[must_use]
pub fn document_id(parts: &[&[u8]]) -> String {
    let mut hasher = Xxh3::new();
    for part in parts {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part);
    }
    format!("{:032x}", hasher.digest128())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(parts: &[&str]) -> String {
        let bytes: Vec<&[u8]> = parts.iter().map(|p| p.as_bytes()).collect();
        document_id(&bytes)
    }

    #[test]
    fn test_document_id_shape() {
        let first = id(&["page one", "page two"]);
        assert_eq!(first.len(), 32);
        assert!(first.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(first, id(&["page one", "page two"]));
    }

    #[test]
    fn test_document_id_respects_boundaries() {
        assert_ne!(id(&["ab", "c"]), id(&["a", "bc"]));
        assert_ne!(id(&[]), id(&[""]));
    }
}
