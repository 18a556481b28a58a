//! Produced and required cargo helpers.

use crate::object::{IndustryFlags, ObjectId};
use crate::IndustryObject;

impl IndustryObject<'_> {
    /// Resolved produced cargo ids, in slot order.
    pub fn produced_cargo(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.produced_cargo_type.iter().flatten().copied()
    }

    /// Resolved required cargo ids, in slot order.
    pub fn required_cargo(&self) -> impl Iterator<Item = ObjectId> + '_ {
        self.required_cargo_type.iter().flatten().copied()
    }

    pub fn produces_cargo(&self) -> bool {
        self.produced_cargo().next().is_some()
    }

    pub fn requires_cargo(&self) -> bool {
        self.required_cargo().next().is_some()
    }

    /// Produced cargo names joined with " and ".
    pub fn produced_cargo_description(&self, name_of: impl Fn(ObjectId) -> String) -> String {
        join_cargo_names(self.produced_cargo(), " and ", name_of)
    }

    /// Required cargo names joined with " and " when every cargo is needed,
    /// otherwise with " or ".
    pub fn required_cargo_description(&self, name_of: impl Fn(ObjectId) -> String) -> String {
        let separator = if self.flags.contains(IndustryFlags::REQUIRES_ALL_CARGO) {
            " and "
        } else {
            " or "
        };
        join_cargo_names(self.required_cargo(), separator, name_of)
    }
}

fn join_cargo_names(
    cargo: impl Iterator<Item = ObjectId>,
    separator: &str,
    name_of: impl Fn(ObjectId) -> String,
) -> String {
    cargo.map(name_of).collect::<Vec<_>>().join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cargo_name(id: ObjectId) -> String {
        match id {
            3 => "Coal".to_string(),
            5 => "Iron Ore".to_string(),
            7 => "Steel".to_string(),
            _ => format!("cargo #{id}"),
        }
    }

    #[test]
    fn test_no_cargo() {
        let object = IndustryObject::default();
        assert!(!object.produces_cargo());
        assert!(!object.requires_cargo());
        assert_eq!(object.produced_cargo_description(cargo_name), "");
    }

    #[test]
    fn test_unresolved_slots_are_skipped() {
        let object = IndustryObject {
            produced_cargo_type: [None, Some(7)],
            required_cargo_type: [Some(3), None, Some(5)],
            ..IndustryObject::default()
        };

        assert!(object.produces_cargo());
        assert!(object.requires_cargo());
        assert_eq!(object.produced_cargo().collect::<Vec<_>>(), vec![7]);
        assert_eq!(object.required_cargo().collect::<Vec<_>>(), vec![3, 5]);
        assert_eq!(object.produced_cargo_description(cargo_name), "Steel");
    }

    #[test]
    fn test_required_cargo_separator() {
        let mut object = IndustryObject {
            required_cargo_type: [Some(3), None, Some(5)],
            ..IndustryObject::default()
        };
        assert_eq!(object.required_cargo_description(cargo_name), "Coal or Iron Ore");

        object.flags |= IndustryFlags::REQUIRES_ALL_CARGO;
        assert_eq!(object.required_cargo_description(cargo_name), "Coal and Iron Ore");
    }
}
