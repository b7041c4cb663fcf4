//! Attribute access on annotatable elements.
//!
//! [`HasCustomAttributes`] is implemented by every element of the metadata model that can
//! carry custom attributes. Only [`HasCustomAttributes::custom_attribute_list`] is
//! element-specific; all lookups are provided methods reading that list.
//!
//! Every lookup creates a fresh iterator over the live list. Nothing is cached, dropping an
//! iterator early needs no cleanup.

use std::marker::PhantomData;

use crate::metadata::{
    customattributes::{AttributeType, CustomAttribute, CustomAttributeList, CustomAttributeRc},
    members::{EnumValue, Event, Field, Member, Method, Property},
    typesystem::{CilType, CilTypeRc},
};

/// Which attribute instances an iterator yields
#[derive(Clone, Copy)]
enum KindFilter<'a> {
    /// Every instance
    Any,
    /// Instances matching at least one of the kinds
    Kinds(&'a [CilTypeRc]),
    /// Instances whose kind is named so, or derives from a type named so
    Named(&'static str),
}

impl<'a> KindFilter<'a> {
    fn from_kinds(kinds: &'a [CilTypeRc]) -> Self {
        if kinds.is_empty() {
            KindFilter::Any
        } else {
            KindFilter::Kinds(kinds)
        }
    }

    fn accepts(&self, attribute: &CustomAttribute) -> bool {
        match self {
            KindFilter::Any => true,
            KindFilter::Kinds(kinds) => kinds.iter().any(|kind| attribute.is_kind(kind)),
            KindFilter::Named(fullname) => attribute.is_kind_named(fullname),
        }
    }
}

/// Lazy iterator over the attributes of one element, see
/// [`HasCustomAttributes::custom_attributes`]
pub struct CustomAttributeIter<'a> {
    list: Option<&'a CustomAttributeList>,
    filter: KindFilter<'a>,
    index: usize,
}

impl<'a> CustomAttributeIter<'a> {
    fn new(list: Option<&'a CustomAttributeList>, filter: KindFilter<'a>) -> Self {
        CustomAttributeIter {
            list,
            filter,
            index: 0,
        }
    }
}

impl Iterator for CustomAttributeIter<'_> {
    type Item = CustomAttributeRc;

    fn next(&mut self) -> Option<Self::Item> {
        let list = self.list?;
        while self.index < list.count() {
            let slot = list.get(self.index);
            self.index += 1;

            if let Some(attribute) = slot {
                if self.filter.accepts(attribute) {
                    return Some(attribute.clone());
                }
            }
        }
        None
    }
}

/// Lazy iterator decoding the matching attributes of one element into `K`, see
/// [`HasCustomAttributes::custom_attributes_of`]
pub struct TypedAttributeIter<'a, K> {
    inner: CustomAttributeIter<'a>,
    _kind: PhantomData<fn() -> K>,
}

impl<K: AttributeType> Iterator for TypedAttributeIter<'_, K> {
    type Item = K;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next().map(|attribute| K::from_attribute(&attribute))
    }
}

/// An element of the metadata model that custom attributes can be attached to.
///
/// Kind filters follow the class hierarchy: querying with kind `Q` yields the instances
/// whose attribute class is `Q` or derives from `Q`. Results are in attachment order.
///
/// # Examples
///
/// ```rust
/// use attrscope::metadata::{
///     query::HasCustomAttributes,
///     typesystem::{TypeBuilder, TypeRegistry},
/// };
///
/// let registry = TypeRegistry::new("Sample")?;
/// let obsolete = TypeBuilder::new(&registry)
///     .attribute_class("System", "ObsoleteAttribute")
///     .build()?;
/// let legacy = TypeBuilder::new(&registry)
///     .class("Sample", "Legacy")
///     .attribute(&obsolete)
///     .build()?;
///
/// assert_eq!(legacy.custom_attributes(&[obsolete.clone()]).count(), 1);
/// assert!(legacy.first_custom_attribute_of_kind(&obsolete).is_some());
/// # Ok::<(), attrscope::Error>(())
/// ```
pub trait HasCustomAttributes {
    /// The attribute storage of this element, `None` if the element has none
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList>;

    /// The attributes matching at least one of `kinds`, every attribute if `kinds` is empty
    ///
    /// ## Arguments
    /// * 'kinds' - Attribute classes to filter by
    fn custom_attributes<'a>(&'a self, kinds: &'a [CilTypeRc]) -> CustomAttributeIter<'a> {
        CustomAttributeIter::new(self.custom_attribute_list(), KindFilter::from_kinds(kinds))
    }

    /// Every attribute attached to this element
    fn all_custom_attributes(&self) -> CustomAttributeIter<'_> {
        CustomAttributeIter::new(self.custom_attribute_list(), KindFilter::Any)
    }

    /// The attributes of class `K::FULLNAME` (or derived from it), decoded into `K`
    fn custom_attributes_of<K: AttributeType>(&self) -> TypedAttributeIter<'_, K> {
        TypedAttributeIter {
            inner: CustomAttributeIter::new(
                self.custom_attribute_list(),
                KindFilter::Named(K::FULLNAME),
            ),
            _kind: PhantomData,
        }
    }

    /// The first attribute attached to this element
    fn first_custom_attribute(&self) -> Option<CustomAttributeRc> {
        self.all_custom_attributes().next()
    }

    /// The first attribute of class `kind` (or derived from it)
    ///
    /// ## Arguments
    /// * 'kind' - The attribute class to look for
    fn first_custom_attribute_of_kind(&self, kind: &CilTypeRc) -> Option<CustomAttributeRc> {
        self.custom_attributes(std::slice::from_ref(kind)).next()
    }

    /// The first attribute of class `K::FULLNAME` (or derived from it), decoded into `K`
    fn first_custom_attribute_of<K: AttributeType>(&self) -> Option<K> {
        self.custom_attributes_of::<K>().next()
    }
}

impl HasCustomAttributes for CilType {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        Some(&self.custom_attributes)
    }
}

impl HasCustomAttributes for Field {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        Some(&self.custom_attributes)
    }
}

impl HasCustomAttributes for Method {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        Some(&self.custom_attributes)
    }
}

impl HasCustomAttributes for Property {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        Some(&self.custom_attributes)
    }
}

impl HasCustomAttributes for Event {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        Some(&self.custom_attributes)
    }
}

impl HasCustomAttributes for Member {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        Some(match self {
            Member::Field(field) => &field.custom_attributes,
            Member::Constructor(method) | Member::Method(method) => &method.custom_attributes,
            Member::Property(property) => &property.custom_attributes,
            Member::Event(event) => &event.custom_attributes,
            Member::NestedType(nested) => &nested.custom_attributes,
        })
    }
}

/// An enum value carries the attributes of its declaring literal field; a value that does
/// not resolve carries none.
impl HasCustomAttributes for EnumValue {
    fn custom_attribute_list(&self) -> Option<&CustomAttributeList> {
        self.resolve().map(|field| &field.custom_attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        customattributes::{CustomAttributeArgument, CustomAttributeValue},
        typesystem::{TypeBuilder, TypeRegistry},
    };

    struct Range {
        min: i64,
        max: i64,
    }

    impl AttributeType for Range {
        const FULLNAME: &'static str = "Validation.RangeAttribute";

        fn from_attribute(attribute: &CustomAttributeRc) -> Self {
            Range {
                min: attribute
                    .fixed_arg(0)
                    .and_then(CustomAttributeArgument::as_i64)
                    .unwrap_or_default(),
                max: attribute
                    .fixed_arg(1)
                    .and_then(CustomAttributeArgument::as_i64)
                    .unwrap_or(i64::MAX),
            }
        }
    }

    struct Fixture {
        registry: TypeRegistry,
        constraint: CilTypeRc,
        range: CilTypeRc,
        note: CilTypeRc,
        target: CilTypeRc,
    }

    fn fixture() -> Fixture {
        let registry = TypeRegistry::new("Accessor").unwrap();
        let constraint = TypeBuilder::new(&registry)
            .attribute_class("Validation", "ConstraintAttribute")
            .build()
            .unwrap();
        let range = TypeBuilder::new(&registry)
            .attribute_class("Validation", "RangeAttribute")
            .extends(&constraint)
            .build()
            .unwrap();
        let note = TypeBuilder::new(&registry)
            .attribute_class("Docs", "NoteAttribute")
            .build()
            .unwrap();
        let target = TypeBuilder::new(&registry)
            .class("Sample", "Target")
            .attribute(&note)
            .attribute_with(
                &range,
                CustomAttributeValue::default()
                    .fixed(CustomAttributeArgument::I4(1))
                    .fixed(CustomAttributeArgument::I4(5)),
            )
            .attribute(&constraint)
            .attribute(&range)
            .build()
            .unwrap();

        Fixture {
            registry,
            constraint,
            range,
            note,
            target,
        }
    }

    fn kind_names(attributes: impl Iterator<Item = CustomAttributeRc>) -> Vec<String> {
        attributes
            .map(|a| a.kind_fullname().unwrap_or_default())
            .collect()
    }

    #[test]
    fn test_unfiltered_yields_attachment_order() {
        let f = fixture();

        assert_eq!(
            kind_names(f.target.custom_attributes(&[])),
            vec![
                "Docs.NoteAttribute",
                "Validation.RangeAttribute",
                "Validation.ConstraintAttribute",
                "Validation.RangeAttribute",
            ]
        );
        assert_eq!(f.target.all_custom_attributes().count(), 4);
        assert_eq!(
            f.target.first_custom_attribute().unwrap().kind_fullname().as_deref(),
            Some("Docs.NoteAttribute")
        );
    }

    #[test]
    fn test_filter_includes_subtypes() {
        let f = fixture();

        assert_eq!(f.target.custom_attributes(&[f.constraint.clone()]).count(), 3);
        assert_eq!(f.target.custom_attributes(&[f.range.clone()]).count(), 2);
        assert_eq!(
            f.target
                .custom_attributes(&[f.note.clone(), f.range.clone()])
                .count(),
            3
        );
        assert_eq!(
            f.target
                .custom_attributes(&[f.registry.attribute_type()])
                .count(),
            4
        );
    }

    #[test]
    fn test_filter_is_subset_of_unfiltered() {
        let f = fixture();
        let kinds = [f.range.clone()];

        let all: Vec<CustomAttributeRc> = f.target.all_custom_attributes().collect();
        let filtered: Vec<CustomAttributeRc> = f.target.custom_attributes(&kinds).collect();
        let expected: Vec<CustomAttributeRc> = all
            .iter()
            .filter(|a| a.is_kind(&f.range))
            .cloned()
            .collect();

        assert_eq!(filtered.len(), expected.len());
        for (got, want) in filtered.iter().zip(&expected) {
            assert!(std::sync::Arc::ptr_eq(got, want));
        }
    }

    #[test]
    fn test_first_of_kind() {
        let f = fixture();

        let first = f.target.first_custom_attribute_of_kind(&f.constraint).unwrap();
        assert_eq!(first.kind_fullname().as_deref(), Some("Validation.RangeAttribute"));
        assert!(f.constraint.first_custom_attribute_of_kind(&f.note).is_none());
    }

    #[test]
    fn test_typed_queries() {
        let f = fixture();

        let ranges: Vec<Range> = f.target.custom_attributes_of::<Range>().collect();
        assert_eq!(ranges.len(), 2);
        assert_eq!((ranges[0].min, ranges[0].max), (1, 5));
        assert_eq!((ranges[1].min, ranges[1].max), (0, i64::MAX));

        let first = f.target.first_custom_attribute_of::<Range>().unwrap();
        assert_eq!(first.max, 5);

        let raw: Vec<CustomAttributeRc> =
            f.target.custom_attributes_of::<CustomAttributeRc>().collect();
        assert_eq!(raw.len(), 4);
        assert!(f.note.first_custom_attribute_of::<Range>().is_none());
    }

    #[test]
    fn test_fresh_iterator_per_call() {
        let f = fixture();
        let kinds = [f.constraint.clone()];

        let mut first = f.target.custom_attributes(&kinds);
        first.next();
        assert_eq!(f.target.custom_attributes(&kinds).count(), 3);
        assert_eq!(first.count(), 2);
    }

    #[test]
    fn test_members_and_enum_values() {
        let registry = TypeRegistry::new("Accessor").unwrap();
        let hidden = TypeBuilder::new(&registry)
            .attribute_class("Ui", "HiddenAttribute")
            .build()
            .unwrap();
        let color = TypeBuilder::new(&registry)
            .enumeration("Paint", "Color")
            .variant("Red", 0, |v| v)
            .variant("Green", 1, |v| v.attribute(&hidden))
            .build()
            .unwrap();
        let widget = TypeBuilder::new(&registry)
            .class("Ui", "Widget")
            .method("Draw", |m| m.public().attribute(&hidden))
            .property("Title", |p| p.public().attribute(&hidden))
            .event("Clicked", |e| e.public().attribute(&hidden))
            .build()
            .unwrap();

        assert!(EnumValue::named(&color, "Green")
            .first_custom_attribute_of_kind(&hidden)
            .is_some());
        assert!(EnumValue::named(&color, "Red").first_custom_attribute().is_none());
        assert!(EnumValue::named(&color, "Blue").custom_attribute_list().is_none());
        assert_eq!(EnumValue::named(&color, "Blue").all_custom_attributes().count(), 0);

        let (_, draw) = widget.methods.iter().next().unwrap();
        assert_eq!(draw.custom_attributes(&[hidden.clone()]).count(), 1);
        let (_, title) = widget.properties.iter().next().unwrap();
        assert_eq!(title.all_custom_attributes().count(), 1);
        let getter = title.fn_getter.as_ref().unwrap();
        assert_eq!(getter.all_custom_attributes().count(), 0);
        let (_, clicked) = widget.events.iter().next().unwrap();
        assert!(Member::Event(clicked.clone()).first_custom_attribute().is_some());
    }
}
