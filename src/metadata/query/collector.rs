//! Collectors selecting types and members by their attributes.
//!
//! Collectors are inherent methods of the containers they scan: [`Assembly`] for types,
//! built on [`Assembly::query_types`], and [`CilType`] for members. They return lazy iterators in the container's enumeration
//! order, except [`CilType::members_with_attributes_map`] which materializes its result.

use crate::metadata::{
    assembly::Assembly,
    customattributes::{AttributeType, CustomAttributeRc},
    members::{BindingFlags, EnumValue, Member, MemberKinds, MetadataEnum},
    query::{AttributePredicates, HasCustomAttributes},
    typesystem::{CilType, CilTypeRc},
};

impl Assembly {
    /// The declared types carrying an attribute of class `kind` (or derived from it)
    ///
    /// ## Arguments
    /// * 'kind' - The attribute class to look for
    pub fn types_with_attribute<'a>(
        &'a self,
        kind: &'a CilTypeRc,
    ) -> impl Iterator<Item = CilTypeRc> + 'a {
        self.query_types().defined().with_attribute(kind).into_iter()
    }

    /// The declared types carrying an attribute of class `K::FULLNAME` (or derived from it)
    pub fn types_with_attribute_of<'a, K: AttributeType + 'a>(
        &'a self,
    ) -> impl Iterator<Item = CilTypeRc> + 'a {
        self.query_types().defined().with_attribute_of::<K>().into_iter()
    }

    /// The first attribute `K` on the declaration of the enum constant `value`
    ///
    /// The enumeration is looked up by `E::FULLNAME` among the declared types, the constant
    /// by its symbolic name. Anything that does not resolve yields `None`.
    ///
    /// ## Arguments
    /// * 'value' - The Rust-side enum value
    pub fn enum_value_attribute<E: MetadataEnum, K: AttributeType>(&self, value: &E) -> Option<K> {
        let Some(enum_type) = self.get_type(E::FULLNAME) else {
            tracing::debug!(enum_type = E::FULLNAME, "enumeration is not declared");
            return None;
        };

        EnumValue::named(&enum_type, value.variant_name()).custom_attribute::<K>()
    }
}

impl CilType {
    /// The members selected by `kinds` and `bindings` that carry an attribute matching at
    /// least one of `attributes`
    ///
    /// An empty `attributes` applies no attribute filter at all: every selected member is
    /// returned.
    ///
    /// ## Arguments
    /// * 'kinds'      - The member kinds to include
    /// * 'bindings'   - Visibility / scope filter
    /// * 'attributes' - Attribute classes to look for
    pub fn members_with_attribute<'a>(
        &'a self,
        kinds: MemberKinds,
        bindings: BindingFlags,
        attributes: &'a [CilTypeRc],
    ) -> impl Iterator<Item = Member> + 'a {
        self.members(kinds, bindings).filter(move |member| {
            attributes.is_empty() || member.has_any_custom_attribute(attributes)
        })
    }

    /// The fields and properties carrying an attribute matching at least one of
    /// `attributes`, over every visibility and scope
    ///
    /// ## Arguments
    /// * 'attributes' - Attribute classes to look for, empty for all fields and properties
    pub fn fields_and_properties_with_attribute<'a>(
        &'a self,
        attributes: &'a [CilTypeRc],
    ) -> impl Iterator<Item = Member> + 'a {
        self.members_with_attribute(
            MemberKinds::FIELD | MemberKinds::PROPERTY,
            BindingFlags::default(),
            attributes,
        )
    }

    /// Every selected member paired with its attributes matching `attributes`
    ///
    /// Members without a matching attribute are left out, so no entry is empty. With an
    /// empty `attributes` every member carrying any attribute is listed with all of them.
    ///
    /// ## Arguments
    /// * 'kinds'      - The member kinds to include
    /// * 'bindings'   - Visibility / scope filter
    /// * 'attributes' - Attribute classes to look for
    pub fn members_with_attributes_map(
        &self,
        kinds: MemberKinds,
        bindings: BindingFlags,
        attributes: &[CilTypeRc],
    ) -> MemberAttributeMap {
        let mut map = MemberAttributeMap::default();
        for member in self.members(kinds, bindings) {
            let matching: Vec<CustomAttributeRc> = member.custom_attributes(attributes).collect();
            if !matching.is_empty() && !map.contains_key(&member) {
                map.entries.push((member, matching));
            }
        }
        map
    }
}

/// Members with their matching attributes, in discovery order
///
/// Holds one entry per distinct member, and every entry holds at least one attribute.
#[derive(Debug, Clone, Default)]
pub struct MemberAttributeMap {
    entries: Vec<(Member, Vec<CustomAttributeRc>)>,
}

impl MemberAttributeMap {
    /// Number of members
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no member matched
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The matching attributes of `member`
    pub fn get(&self, member: &Member) -> Option<&[CustomAttributeRc]> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == member)
            .map(|(_, attributes)| attributes.as_slice())
    }

    /// Returns true if `member` has an entry
    pub fn contains_key(&self, member: &Member) -> bool {
        self.get(member).is_some()
    }

    /// The members, in discovery order
    pub fn keys(&self) -> impl Iterator<Item = &Member> {
        self.entries.iter().map(|(member, _)| member)
    }

    /// The entries, in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&Member, &[CustomAttributeRc])> {
        self.entries
            .iter()
            .map(|(member, attributes)| (member, attributes.as_slice()))
    }
}

impl IntoIterator for MemberAttributeMap {
    type Item = (Member, Vec<CustomAttributeRc>);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::TypeBuilder;

    struct Exported;

    impl AttributeType for Exported {
        const FULLNAME: &'static str = "Plugins.ExportedAttribute";

        fn from_attribute(_: &CustomAttributeRc) -> Self {
            Exported
        }
    }

    #[test]
    fn test_types_with_attribute() {
        let assembly = Assembly::new("Plugins").unwrap();
        let registry = assembly.registry();
        let exported = TypeBuilder::new(registry)
            .attribute_class("Plugins", "ExportedAttribute")
            .build()
            .unwrap();
        TypeBuilder::new(registry)
            .class("Plugins", "A")
            .attribute(&exported)
            .build()
            .unwrap();
        TypeBuilder::new(registry).class("Plugins", "B").build().unwrap();

        let found: Vec<String> = assembly
            .types_with_attribute(&exported)
            .map(|t| t.fullname())
            .collect();
        assert_eq!(found, vec!["Plugins.A"]);
        assert_eq!(assembly.types_with_attribute_of::<Exported>().count(), 1);
    }

    #[test]
    fn test_empty_assembly() {
        let assembly = Assembly::new("Empty").unwrap();
        let attribute = assembly.registry().attribute_type();

        assert_eq!(assembly.types_with_attribute(&attribute).count(), 0);
        assert_eq!(assembly.types_with_attribute_of::<Exported>().count(), 0);
    }

    #[test]
    fn test_members_with_attribute_filters() {
        let registry = crate::metadata::typesystem::TypeRegistry::new("Members").unwrap();
        let required = TypeBuilder::new(&registry)
            .attribute_class("Validation", "RequiredAttribute")
            .build()
            .unwrap();
        let shape = TypeBuilder::new(&registry)
            .class("Geometry", "Shape")
            .field("radius", |f| f.public().attribute(&required))
            .field("label", |f| f.public())
            .method("Area", |m| m.public().attribute(&required))
            .build()
            .unwrap();

        let kinds = [required.clone()];
        let names = |members: Vec<Member>| -> Vec<String> {
            members.iter().map(Member::name).collect()
        };

        assert_eq!(
            names(shape.members_with_attribute(MemberKinds::ALL, BindingFlags::default(), &kinds).collect()),
            vec!["radius", "Area"]
        );
        assert_eq!(
            names(shape.members_with_attribute(MemberKinds::FIELD, BindingFlags::default(), &kinds).collect()),
            vec!["radius"]
        );
        assert_eq!(
            names(shape.members_with_attribute(MemberKinds::FIELD, BindingFlags::default(), &[]).collect()),
            vec!["radius", "label"]
        );
        assert_eq!(
            shape
                .members_with_attribute(MemberKinds::empty(), BindingFlags::default(), &kinds)
                .count(),
            0
        );
    }

    #[test]
    fn test_members_with_attributes_map() {
        let registry = crate::metadata::typesystem::TypeRegistry::new("Members").unwrap();
        let required = TypeBuilder::new(&registry)
            .attribute_class("Validation", "RequiredAttribute")
            .build()
            .unwrap();
        let note = TypeBuilder::new(&registry)
            .attribute_class("Docs", "NoteAttribute")
            .build()
            .unwrap();
        let shape = TypeBuilder::new(&registry)
            .class("Geometry", "Shape")
            .field("radius", |f| f.public().attribute(&required).attribute(&note).attribute(&required))
            .field("label", |f| f.public().attribute(&note))
            .field("plain", |f| f.public())
            .build()
            .unwrap();

        let map = shape.members_with_attributes_map(
            MemberKinds::FIELD,
            BindingFlags::default(),
            &[required.clone()],
        );
        assert_eq!(map.len(), 1);
        let (radius, attributes) = map.iter().next().unwrap();
        assert_eq!(radius.name(), "radius");
        assert_eq!(attributes.len(), 2);
        assert!(attributes.iter().all(|a| a.is_kind(&required)));
        assert!(map.contains_key(radius));

        let everything =
            shape.members_with_attributes_map(MemberKinds::FIELD, BindingFlags::default(), &[]);
        let names: Vec<String> = everything.keys().map(Member::name).collect();
        assert_eq!(names, vec!["radius", "label"]);
        assert!(everything.iter().all(|(_, attributes)| !attributes.is_empty()));

        let label = everything.keys().nth(1).unwrap().clone();
        assert_eq!(everything.get(&label).map(<[_]>::len), Some(1));

        let none = shape.members_with_attributes_map(
            MemberKinds::METHOD,
            BindingFlags::default(),
            &[required.clone()],
        );
        assert!(none.is_empty());
        assert_eq!(everything.into_iter().count(), 2);
    }
}
