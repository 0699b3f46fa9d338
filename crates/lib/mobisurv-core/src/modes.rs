use indexmap::IndexMap;
use serde::Deserialize;

/// Trims and lowercases a raw survey mode label.
pub fn normalize_mode(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Standard travel modes and the raw survey labels that belong to each of them. The order of
/// the groups is the column order of every distribution written out.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(from = "IndexMap<String, Vec<String>>")]
pub struct ModeGroups {
    groups: IndexMap<String, Vec<String>>,
}

impl Default for ModeGroups {
    fn default() -> Self {
        let mut groups = IndexMap::new();
        groups.insert("car".to_string(), vec!["car".to_string()]);
        groups.insert(
            "pedestrian".to_string(),
            vec!["ped".to_string(), "walk".to_string()],
        );
        groups.insert(
            "public_transit".to_string(),
            vec!["bus".to_string(), "train".to_string(), "link".to_string()],
        );
        groups.insert("bike".to_string(), vec!["bike".to_string()]);
        Self::new(groups)
    }
}

impl From<IndexMap<String, Vec<String>>> for ModeGroups {
    fn from(groups: IndexMap<String, Vec<String>>) -> Self {
        Self::new(groups)
    }
}

impl ModeGroups {
    pub fn new(groups: IndexMap<String, Vec<String>>) -> Self {
        let groups = groups
            .into_iter()
            .map(|(name, labels)| {
                let labels = labels.iter().map(|label| normalize_mode(label)).collect();
                (name, labels)
            })
            .collect();
        Self { groups }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// The group a raw label belongs to, if any.
    pub fn group_of(&self, raw_mode: &str) -> Option<&str> {
        let mode = normalize_mode(raw_mode);
        self.groups
            .iter()
            .find(|(_, labels)| labels.iter().any(|label| *label == mode))
            .map(|(name, _)| name.as_str())
    }

    /// Group name when the label is known, the normalized label otherwise.
    pub fn merge_label(&self, raw_mode: &str) -> String {
        match self.group_of(raw_mode) {
            Some(group) => group.to_string(),
            None => normalize_mode(raw_mode),
        }
    }

    pub fn contains(&self, group: &str, raw_mode: &str) -> bool {
        self.group_of(raw_mode) == Some(group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_groups() {
        let groups = ModeGroups::default();
        assert_eq!(groups.group_of(" Bus "), Some("public_transit"));
        assert_eq!(groups.group_of("ped"), Some("pedestrian"));
        assert_eq!(groups.group_of("scooter"), None);
        assert_eq!(
            groups.names().collect::<Vec<_>>(),
            vec!["car", "pedestrian", "public_transit", "bike"]
        );
    }

    #[test]
    fn test_merge_keeps_unknown_labels() {
        let groups = ModeGroups::default();
        assert_eq!(groups.merge_label("LINK"), "public_transit");
        assert_eq!(groups.merge_label(" Scooter"), "scooter");
    }
}
