use super::AttributeError;
use std::fmt;
use std::str::FromStr;

/// Attribute type path.
///
/// A top-level attribute is addressed by its single wire type octet
/// (`1` is User-Name). Attributes found inside containers are addressed by
/// appending the container discriminants to the parent path:
///
/// ```text
/// 26.9.1        VSA, vendor 9 (Cisco), vendor type 1
/// 241.1         Extended-Attribute-1, extended type 1 (Frag-Status)
/// 241.26.9.1    EVS inside Extended-Attribute-1, vendor 9, vendor type 1
/// 241.9.1.2     TLV child 2 of TLV child 1 of 241.9
/// ```
///
/// The first segment always fits in a single octet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeType(Vec<u32>);

impl AttributeType {
    /// Top-level attribute type.
    pub fn new(head: u8) -> Self {
        AttributeType(vec![u32::from(head)])
    }

    /// Build a type from an explicit path.
    pub fn from_path(path: &[u32]) -> Result<Self, AttributeError> {
        match path.first() {
            None => Err(AttributeError::InvalidType("empty path".to_string())),
            Some(&head) if head > u32::from(u8::MAX) => Err(AttributeError::InvalidType(
                format!("first segment {} exceeds 255", head),
            )),
            Some(_) => Ok(AttributeType(path.to_vec())),
        }
    }

    /// Type of a child nested one level below `parent`.
    pub fn child(parent: &AttributeType, segment: u32) -> Self {
        parent.with(&[segment])
    }

    /// New type with `segments` appended.
    pub fn with(&self, segments: &[u32]) -> Self {
        let mut path = Vec::with_capacity(self.0.len() + segments.len());
        path.extend_from_slice(&self.0);
        path.extend_from_slice(segments);
        AttributeType(path)
    }

    /// The top-level wire type.
    pub fn head(&self) -> u8 {
        // Guarded by the constructors.
        self.0[0] as u8
    }

    pub fn last(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    /// Number of path segments (1 for a top-level attribute).
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn is_top_level(&self) -> bool {
        self.0.len() == 1
    }

    pub fn segments(&self) -> &[u32] {
        &self.0
    }

    /// Path with the last `count` segments removed, if anything remains.
    pub fn ancestor(&self, count: usize) -> Option<AttributeType> {
        if count >= self.0.len() {
            return None;
        }
        Some(AttributeType(self.0[..self.0.len() - count].to_vec()))
    }
}

impl From<u8> for AttributeType {
    fn from(head: u8) -> Self {
        AttributeType::new(head)
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{}", segment)?;
        }
        Ok(())
    }
}

impl FromStr for AttributeType {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s
            .split('.')
            .map(|part| {
                part.trim()
                    .parse::<u32>()
                    .map_err(|_| AttributeError::InvalidType(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        AttributeType::from_path(&path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_with_appends_segments() {
        let vsa = AttributeType::new(26);
        let cisco = vsa.with(&[9, 1]);
        assert_eq!(cisco.segments(), &[26, 9, 1]);
        assert_eq!(cisco.head(), 26);
        assert_eq!(cisco.last(), 1);
        assert_eq!(cisco.depth(), 3);
        // The original is untouched
        assert_eq!(vsa.depth(), 1);
    }

    #[test]
    fn test_child_and_ancestor() {
        let ext = AttributeType::new(241);
        let frag = AttributeType::child(&ext, 1);
        assert_eq!(frag.to_string(), "241.1");
        assert_eq!(frag.ancestor(1), Some(ext));
        assert_eq!(frag.ancestor(2), None);
    }

    #[test]
    fn test_structural_equality_and_hash() {
        let a: AttributeType = "241.26.9.1".parse().unwrap();
        let b = AttributeType::new(241).with(&[26, 9, 1]);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(set.contains(&b));
        assert!(!set.contains(&AttributeType::new(241).with(&[26, 9])));
    }

    #[test]
    fn test_invalid_paths() {
        assert!(AttributeType::from_path(&[]).is_err());
        assert!(AttributeType::from_path(&[256]).is_err());
        assert!("26.x".parse::<AttributeType>().is_err());
        assert!("".parse::<AttributeType>().is_err());
        // Nested segments may exceed one octet (vendor ids)
        assert!(AttributeType::from_path(&[26, 311, 1]).is_ok());
    }
}
