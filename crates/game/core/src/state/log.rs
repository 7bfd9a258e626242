/// Append-only narrative log of an encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct MessageLog {
    entries: Vec<String>,
}

impl MessageLog {
    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    /// The last `window` messages, oldest first.
    pub fn recent(&self, window: usize) -> &[String] {
        let start = self.entries.len().saturating_sub(window);
        &self.entries[start..]
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
