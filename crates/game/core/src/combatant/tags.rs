//! Side and role tags carried by combatants.

bitflags::bitflags! {
    /// Set of tags describing which side a combatant fights on.
    ///
    /// Serialized as a list of tag names (`["player"]`, `["nemico", "ostile"]`).
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Tags: u8 {
        const PLAYER = 1 << 0;
        const ENEMY = 1 << 1;
        const HOSTILE = 1 << 2;
        const ALLY = 1 << 3;
    }
}

impl Tags {
    const NAMES: [(&'static str, Tags); 4] = [
        ("player", Tags::PLAYER),
        ("nemico", Tags::ENEMY),
        ("ostile", Tags::HOSTILE),
        ("alleato", Tags::ALLY),
    ];

    /// Looks up a tag by its wire name.
    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(tag_name, _)| *tag_name == name)
            .map(|(_, tag)| *tag)
    }

    /// Wire names of the tags in this set, in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::NAMES
            .iter()
            .filter(|(_, tag)| self.contains(*tag))
            .map(|(name, _)| *name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        Self::from_wire_name(name).is_some_and(|tag| self.contains(tag))
    }

    /// Tagged `nemico` or `ostile`.
    pub fn is_opponent(&self) -> bool {
        self.intersects(Tags::ENEMY | Tags::HOSTILE)
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Tags {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.names())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Tags {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let names: Vec<String> = serde::Deserialize::deserialize(deserializer)?;
        names.iter().try_fold(Tags::empty(), |tags, name| {
            Tags::from_wire_name(name)
                .map(|tag| tags | tag)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown tag `{name}`")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opponents_are_enemy_or_hostile() {
        assert!(Tags::ENEMY.is_opponent());
        assert!(Tags::HOSTILE.is_opponent());
        assert!(!Tags::PLAYER.is_opponent());
        assert!(!(Tags::PLAYER | Tags::ALLY).is_opponent());
    }

    #[test]
    fn names_follow_wire_format() {
        let tags = Tags::PLAYER | Tags::HOSTILE;
        assert_eq!(tags.names().collect::<Vec<_>>(), vec!["player", "ostile"]);
        assert!(tags.has_tag("ostile"));
        assert!(!tags.has_tag("nemico"));
        assert!(!tags.has_tag("drago"));
    }

    #[test]
    fn wire_names_are_not_constant_names() {
        assert_eq!(Tags::from_wire_name("nemico"), Some(Tags::ENEMY));
        assert_eq!(Tags::from_wire_name("alleato"), Some(Tags::ALLY));
        assert_eq!(Tags::from_wire_name("PLAYER"), None);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_as_name_list() {
        let json = serde_json::to_string(&(Tags::ENEMY | Tags::HOSTILE)).unwrap();
        assert_eq!(json, r#"["nemico","ostile"]"#);
        let back: Tags = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Tags::ENEMY | Tags::HOSTILE);
        assert!(serde_json::from_str::<Tags>(r#"["drago"]"#).is_err());
    }
}
