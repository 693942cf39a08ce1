use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

/// Per-node capability mask. Each bit disables one operation; a disabled
/// operation is a no-op that reports no change (`read`) or success (`load`/`store`).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Flags(u8);

impl Flags {
    pub const NONE: Flags = Flags(0);
    pub const DISABLE_READ: Flags = Flags(0x01);
    pub const DISABLE_WRITE: Flags = Flags(0x02);
    /// Both document directions.
    pub const DISABLE_SYNC: Flags = Flags(0x01 | 0x02);
    pub const DISABLE_LOAD: Flags = Flags(0x10);
    pub const DISABLE_STORE: Flags = Flags(0x20);
    /// Both store directions.
    pub const DISABLE_PERSISTENCE: Flags = Flags(0x10 | 0x20);

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: Flags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn union(self, other: Flags) -> Flags {
        Flags(self.0 | other.0)
    }

    pub const fn can_read(self) -> bool {
        !self.contains(Flags::DISABLE_READ)
    }

    pub const fn can_write(self) -> bool {
        !self.contains(Flags::DISABLE_WRITE)
    }

    pub const fn can_load(self) -> bool {
        !self.contains(Flags::DISABLE_LOAD)
    }

    pub const fn can_store(self) -> bool {
        !self.contains(Flags::DISABLE_STORE)
    }
}

impl BitOr for Flags {
    type Output = Flags;

    fn bitor(self, rhs: Flags) -> Flags {
        self.union(rhs)
    }
}

impl BitOrAssign for Flags {
    fn bitor_assign(&mut self, rhs: Flags) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Flags {
    type Output = Flags;

    fn bitand(self, rhs: Flags) -> Flags {
        Flags(self.0 & rhs.0)
    }
}

impl fmt::Debug for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(Flags, &str); 4] = [
            (Flags::DISABLE_READ, "DISABLE_READ"),
            (Flags::DISABLE_WRITE, "DISABLE_WRITE"),
            (Flags::DISABLE_LOAD, "DISABLE_LOAD"),
            (Flags::DISABLE_STORE, "DISABLE_STORE"),
        ];

        let set: Vec<&str> = NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect();
        if set.is_empty() {
            write!(f, "Flags(NONE)")
        } else {
            write!(f, "Flags({})", set.join(" | "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_cover_both_directions() {
        assert!(Flags::DISABLE_SYNC.contains(Flags::DISABLE_READ));
        assert!(Flags::DISABLE_SYNC.contains(Flags::DISABLE_WRITE));
        assert!(Flags::DISABLE_PERSISTENCE.contains(Flags::DISABLE_LOAD));
        assert!(Flags::DISABLE_PERSISTENCE.contains(Flags::DISABLE_STORE));
        assert!(!Flags::DISABLE_SYNC.contains(Flags::DISABLE_LOAD));
    }

    #[test]
    fn capability_checks() {
        let flags = Flags::DISABLE_WRITE | Flags::DISABLE_LOAD;
        assert!(flags.can_read());
        assert!(!flags.can_write());
        assert!(!flags.can_load());
        assert!(flags.can_store());
        assert!(Flags::NONE.can_read() && Flags::NONE.can_store());
    }

    #[test]
    fn debug_lists_set_bits() {
        assert_eq!(format!("{:?}", Flags::NONE), "Flags(NONE)");
        assert_eq!(
            format!("{:?}", Flags::DISABLE_PERSISTENCE),
            "Flags(DISABLE_LOAD | DISABLE_STORE)"
        );
    }
}
