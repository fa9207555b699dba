//! In-memory tack document and its wire mapping.
//!
//! # Responsibility
//! - Own the ordered directory groups and their ordered tacks.
//! - Map groups to and from `{"tacks": {"<dir>": [...]}}`.
//!
//! # Invariants
//! - Group order follows file order on load; new groups are appended.
//! - No group is empty: empty lists are dropped on load and on removal.
//! - Duplicate directory keys in a file are merged in order of appearance.

use crate::model::tack::{LocatedTack, Tack, TackId};
use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Formatter;

/// Tacks pinned to one directory, in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryGroup {
    directory: String,
    tacks: Vec<Tack>,
}

impl DirectoryGroup {
    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn tacks(&self) -> &[Tack] {
        &self.tacks
    }
}

/// Whole contents of the tack file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TackDocument {
    groups: Vec<DirectoryGroup>,
}

impl TackDocument {
    pub fn groups(&self) -> &[DirectoryGroup] {
        &self.groups
    }

    pub fn group(&self, directory: &str) -> Option<&DirectoryGroup> {
        self.groups.iter().find(|group| group.directory == directory)
    }

    /// Directories holding at least one tack, in document order.
    pub fn directories(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(|group| group.directory.as_str())
    }

    pub fn tack_count(&self) -> usize {
        self.groups.iter().map(|group| group.tacks.len()).sum()
    }

    /// Appends `tack` to the group for `directory`, creating it if absent.
    pub fn push(&mut self, directory: &str, tack: Tack) {
        match self
            .groups
            .iter_mut()
            .find(|group| group.directory == directory)
        {
            Some(group) => group.tacks.push(tack),
            None => self.groups.push(DirectoryGroup {
                directory: directory.to_string(),
                tacks: vec![tack],
            }),
        }
    }

    /// First tack with `id`, scanning groups then tacks in order.
    pub fn find(&self, id: &TackId) -> Option<(&str, &Tack)> {
        let (group_idx, tack_idx) = self.position(id)?;
        let group = &self.groups[group_idx];
        Some((group.directory.as_str(), &group.tacks[tack_idx]))
    }

    pub fn find_mut(&mut self, id: &TackId) -> Option<(&str, &mut Tack)> {
        let (group_idx, tack_idx) = self.position(id)?;
        let group = &mut self.groups[group_idx];
        Some((group.directory.as_str(), &mut group.tacks[tack_idx]))
    }

    /// Removes the first tack with `id`, keeping the order of the rest.
    pub fn take(&mut self, id: &TackId) -> Option<LocatedTack> {
        let (group_idx, tack_idx) = self.position(id)?;
        let tack = self.groups[group_idx].tacks.remove(tack_idx);
        let directory = if self.groups[group_idx].tacks.is_empty() {
            self.groups.remove(group_idx).directory
        } else {
            self.groups[group_idx].directory.clone()
        };
        Some(LocatedTack { directory, tack })
    }

    fn position(&self, id: &TackId) -> Option<(usize, usize)> {
        self.groups.iter().enumerate().find_map(|(group_idx, group)| {
            group
                .tacks
                .iter()
                .position(|tack| &tack.id == id)
                .map(|tack_idx| (group_idx, tack_idx))
        })
    }
}

struct GroupsAsMap<'a>(&'a [DirectoryGroup]);

impl Serialize for GroupsAsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.directory, &group.tacks)?;
        }
        map.end()
    }
}

impl Serialize for TackDocument {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("TackDocument", 1)?;
        state.serialize_field("tacks", &GroupsAsMap(&self.groups))?;
        state.end()
    }
}

/// Ordered directory groups read from a JSON object.
struct GroupList(Vec<DirectoryGroup>);

impl<'de> Deserialize<'de> for GroupList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(GroupListVisitor)
    }
}

struct GroupListVisitor;

impl<'de> Visitor<'de> for GroupListVisitor {
    type Value = GroupList;

    fn expecting(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("a map from directory path to a list of tacks")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut document = TackDocument::default();
        while let Some((directory, tacks)) = access.next_entry::<String, Vec<Tack>>()? {
            for tack in tacks {
                document.push(&directory, tack);
            }
        }
        Ok(GroupList(document.groups))
    }
}

#[derive(Deserialize)]
struct RawDocument {
    #[serde(default)]
    tacks: Option<GroupList>,
}

impl<'de> Deserialize<'de> for TackDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawDocument::deserialize(deserializer)?;
        Ok(Self {
            groups: raw.tacks.map(|list| list.0).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::TackDocument;
    use crate::model::tack::{Tack, TackId, TackKind};
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn tack(id: &str, kind: TackKind, message: &str) -> Tack {
        let created = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        Tack::new(TackId::parse(id).unwrap(), kind, message, created)
    }

    #[test]
    fn serializes_groups_as_directory_map() {
        let mut document = TackDocument::default();
        document.push("/b", tack("0001", TackKind::Pin, "first"));
        document.push("/a", tack("0002", TackKind::Todo, "second"));

        let json = serde_json::to_value(&document).unwrap();
        assert_eq!(json["tacks"]["/b"][0]["message"], "first");
        assert_eq!(json["tacks"]["/a"][0]["kind"], "todo");
        assert!(json["tacks"]["/a"][0].get("done").is_none());
        assert!(json["tacks"]["/a"][0].get("done_at").is_none());
        assert!(json["tacks"]["/a"][0].get("directory").is_none());
    }

    #[test]
    fn load_keeps_file_order_and_drops_empty_groups() {
        let source = r#"{
          "tacks": {
            "/zeta": [
              {"id": "aaaa", "kind": "pin", "message": "z", "created_at": "2026-01-01T10:00:00-07:00"}
            ],
            "/empty": [],
            "/alpha": [
              {"id": "bbbb", "kind": "todo", "message": "a", "done": true,
               "created_at": "2026-01-01T10:00:00Z", "done_at": "2026-01-02T10:00:00Z"}
            ]
          }
        }"#;

        let document: TackDocument = serde_json::from_str(source).unwrap();
        let directories: Vec<&str> = document.directories().collect();
        assert_eq!(directories, vec!["/zeta", "/alpha"]);

        let (directory, pin) = document.find(&TackId::parse("aaaa").unwrap()).unwrap();
        assert_eq!(directory, "/zeta");
        assert_eq!(
            pin.created_at,
            Utc.with_ymd_and_hms(2026, 1, 1, 17, 0, 0).unwrap()
        );

        let (_, todo) = document.find(&TackId::parse("bbbb").unwrap()).unwrap();
        assert!(todo.done);
        assert!(todo.done_at.is_some());
    }

    #[test]
    fn null_tacks_loads_as_empty() {
        let document: TackDocument = serde_json::from_str(r#"{"tacks": null}"#).unwrap();
        assert_eq!(document.tack_count(), 0);
    }

    #[test]
    fn take_preserves_order_and_drops_emptied_group() {
        let mut document = TackDocument::default();
        document.push("/a", tack("0001", TackKind::Pin, "one"));
        document.push("/a", tack("0002", TackKind::Pin, "two"));
        document.push("/a", tack("0003", TackKind::Pin, "three"));
        document.push("/b", tack("0004", TackKind::Warn, "only"));

        let removed = document.take(&TackId::parse("0002").unwrap()).unwrap();
        assert_eq!(removed.directory, "/a");
        let remaining: Vec<&str> = document
            .group("/a")
            .unwrap()
            .tacks()
            .iter()
            .map(|tack| tack.message.as_str())
            .collect();
        assert_eq!(remaining, vec!["one", "three"]);

        document.take(&TackId::parse("0004").unwrap()).unwrap();
        assert!(document.group("/b").is_none());
        assert_eq!(document.directories().collect::<Vec<_>>(), vec!["/a"]);
    }

    #[test]
    fn duplicate_ids_resolve_to_first_in_document_order() {
        let mut document = TackDocument::default();
        document.push("/first", tack("abcd", TackKind::Pin, "winner"));
        document.push("/second", tack("abcd", TackKind::Pin, "shadowed"));

        let (directory, found) = document.find(&TackId::parse("abcd").unwrap()).unwrap();
        assert_eq!(directory, "/first");
        assert_eq!(found.message, "winner");
    }
}
