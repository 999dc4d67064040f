use super::wire::WireId;

slotmap::new_key_type! {
    /// Unique identifier for a net in the wire store.
    pub struct NetId;
}

/// A set of wires forming one electrical net.
///
/// The member list mirrors each wire's `net` back-reference; both are
/// updated together by the store.
#[derive(Debug, Clone, Default)]
pub struct Net {
    name: String,
    wires: Vec<WireId>,
    highlighted: bool,
}

impl Net {
    /// Creates an empty, unnamed net.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty net with a name.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Returns the member wires in insertion order.
    #[must_use]
    pub fn wires(&self) -> &[WireId] {
        &self.wires
    }

    /// Returns `true` if `wire` is a member.
    #[must_use]
    pub fn contains(&self, wire: WireId) -> bool {
        self.wires.contains(&wire)
    }

    /// Returns the number of member wires.
    #[must_use]
    pub fn len(&self) -> usize {
        self.wires.len()
    }

    /// Returns `true` if the net has no wires.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.wires.is_empty()
    }

    /// Returns the highlight flag.
    #[must_use]
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) -> bool {
        let changed = self.highlighted != highlighted;
        self.highlighted = highlighted;
        changed
    }

    /// Returns `true` if both nets belong to the same global net.
    ///
    /// Names compare case-insensitively; an empty name never groups.
    #[must_use]
    pub fn shares_global_net_with(&self, other: &Net) -> bool {
        !self.name.is_empty()
            && !other.name.is_empty()
            && self.name.to_lowercase() == other.name.to_lowercase()
    }

    pub(crate) fn add_wire(&mut self, wire: WireId) -> bool {
        if self.contains(wire) {
            return false;
        }
        self.wires.push(wire);
        true
    }

    pub(crate) fn remove_wire(&mut self, wire: WireId) -> bool {
        let before = self.wires.len();
        self.wires.retain(|&w| w != wire);
        self.wires.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn membership_is_a_set() {
        let mut keys: SlotMap<WireId, ()> = SlotMap::with_key();
        let a = keys.insert(());
        let b = keys.insert(());

        let mut net = Net::new();
        assert!(net.add_wire(a));
        assert!(!net.add_wire(a));
        assert!(net.add_wire(b));
        assert_eq!(net.wires(), &[a, b]);

        assert!(net.remove_wire(a));
        assert!(!net.remove_wire(a));
        assert_eq!(net.len(), 1);
        assert!(!net.is_empty());
    }

    #[test]
    fn global_net_grouping_ignores_case() {
        assert!(Net::named("VCC").shares_global_net_with(&Net::named("vcc")));
        assert!(!Net::named("VCC").shares_global_net_with(&Net::named("GND")));
        assert!(!Net::new().shares_global_net_with(&Net::new()));
        assert!(!Net::named("VCC").shares_global_net_with(&Net::new()));
    }

    #[test]
    fn highlight_reports_changes() {
        let mut net = Net::named("CLK");
        assert!(net.set_highlighted(true));
        assert!(!net.set_highlighted(true));
        assert!(net.is_highlighted());
    }
}
