use crate::types::PingId;

/// Ping ids the user has expanded, in the order they were activated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivationSet {
    ids: Vec<PingId>,
}

impl ActivationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id`; no-op if already present.
    pub fn activate(&mut self, id: PingId) {
        if !self.contains(id) {
            self.ids.push(id);
        }
    }

    /// Remove every occurrence of `id`.
    pub fn deactivate(&mut self, id: PingId) {
        self.ids.retain(|&existing| existing != id);
    }

    pub fn toggle(&mut self, id: PingId) {
        if self.contains(id) {
            self.deactivate(id);
        } else {
            self.activate(id);
        }
    }

    pub fn contains(&self, id: PingId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = PingId> + '_ {
        self.ids.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

impl FromIterator<PingId> for ActivationSet {
    fn from_iter<I: IntoIterator<Item = PingId>>(iter: I) -> Self {
        let mut set = Self::new();
        for id in iter {
            set.activate(id);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_is_idempotent() {
        let mut set = ActivationSet::new();
        set.activate(3);
        set.activate(3);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insertion_order() {
        let set: ActivationSet = [9, 2, 9, 5].into_iter().collect();
        assert_eq!(set.iter().collect::<Vec<_>>(), vec![9, 2, 5]);
    }

    #[test]
    fn test_toggle_and_deactivate() {
        let mut set = ActivationSet::new();
        set.toggle(6);
        assert!(set.contains(6));
        set.toggle(6);
        assert!(!set.contains(6));
        assert!(set.is_empty());

        set.deactivate(42);
        assert!(set.is_empty());

        set.activate(1);
        set.activate(2);
        set.clear();
        assert!(set.is_empty());
    }
}
