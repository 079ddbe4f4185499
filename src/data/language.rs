//! Language family tree dataset

use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Attestation status of a language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageStatus {
    /// Known only by comparative reconstruction
    #[display(fmt = "reconstructed")]
    Reconstructed,
    #[display(fmt = "extinct")]
    Extinct,
    #[display(fmt = "living")]
    Living,
    /// Lost its native speakers and was brought back
    #[display(fmt = "revived")]
    Revived,
}

impl LanguageStatus {
    /// Living and revived languages get the status dot and pulse ring
    pub fn is_spoken(&self) -> bool {
        matches!(self, Self::Living | Self::Revived)
    }
}

/// A node of the immutable language tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguageNode {
    pub name: String,
    pub status: LanguageStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speakers: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LanguageNode>,
}

impl LanguageNode {
    pub fn new(name: impl Into<String>, status: LanguageStatus) -> Self {
        Self {
            name: name.into(),
            status,
            period: None,
            region: None,
            speakers: None,
            note: None,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<LanguageNode>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Total number of nodes in this subtree, including self
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(LanguageNode::count).sum::<usize>()
    }

    /// Names that appear more than once in this subtree
    pub fn duplicate_names(&self) -> Vec<String> {
        let mut seen = ahash::AHashSet::new();
        let mut duplicates = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if !seen.insert(node.name.as_str()) && !duplicates.contains(&node.name) {
                duplicates.push(node.name.clone());
            }
            stack.extend(node.children.iter().rev());
        }
        duplicates
    }

    /// Label as shown on the tree: reconstructed forms carry an asterisk
    pub fn display_name(&self) -> String {
        match self.status {
            LanguageStatus::Reconstructed => format!("*{}", self.name),
            _ => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parses_lowercase() {
        let node: LanguageNode =
            serde_json::from_str(r#"{"name": "Manx", "status": "revived"}"#).unwrap();
        assert_eq!(node.status, LanguageStatus::Revived);
        assert!(node.is_leaf());
        assert_eq!(node.status.to_string(), "revived");
    }

    #[test]
    fn test_duplicate_names_found() {
        let tree = LanguageNode::new("Root", LanguageStatus::Reconstructed).with_children(vec![
            LanguageNode::new("A", LanguageStatus::Living)
                .with_children(vec![LanguageNode::new("X", LanguageStatus::Living)]),
            LanguageNode::new("X", LanguageStatus::Extinct),
        ]);
        assert_eq!(tree.count(), 4);
        assert_eq!(tree.duplicate_names(), vec!["X".to_string()]);
    }

    #[test]
    fn test_display_name_marks_reconstructions() {
        let pie = LanguageNode::new("Proto-Indo-European", LanguageStatus::Reconstructed);
        assert_eq!(pie.display_name(), "*Proto-Indo-European");
    }
}
