use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};

use crate::{
    metadata::{
        records::{
            AnnotationKey, ClassRecordRc, ConstructorParameterRecordRc, MemberScope, MethodRecord,
            MethodRecordRc, ParameterRecordRc, PropertyRecordRc,
        },
        typesystem::TypeHandle,
    },
    Result,
};

/// A reference-counted pointer to an `AnnotationRegistry`
pub type AnnotationRegistryRc = Arc<AnnotationRegistry>;

/// All decoration records of exactly one annotated type.
///
/// Records are stored in append-only collections in arrival order. Method-level and
/// parameter-level annotations are merged into a single [`MethodRecord`] per member name,
/// regardless of which of the two arrives first.
///
/// # Thread Safety
///
/// Insertions are lock-free for class, constructor and property records. Method upserts hold
/// the member's index entry while a new record is created, so concurrent first sightings of
/// the same member still produce one record, and a new record is published only after the
/// triggering annotation has been applied to it.
pub struct AnnotationRegistry {
    target: TypeHandle,
    classes: boxcar::Vec<ClassRecordRc>,
    constructors: boxcar::Vec<ConstructorParameterRecordRc>,
    properties: boxcar::Vec<PropertyRecordRc>,
    methods: boxcar::Vec<MethodRecordRc>,
    methods_by_name: DashMap<String, MethodRecordRc>,
}

impl AnnotationRegistry {
    /// Create an empty registry for `target`
    #[must_use]
    pub fn new(target: TypeHandle) -> Self {
        AnnotationRegistry {
            target,
            classes: boxcar::Vec::new(),
            constructors: boxcar::Vec::new(),
            properties: boxcar::Vec::new(),
            methods: boxcar::Vec::new(),
            methods_by_name: DashMap::new(),
        }
    }

    /// The type this registry belongs to
    #[must_use]
    pub fn target(&self) -> &TypeHandle {
        &self.target
    }

    /// Store a class-level record
    pub fn add_class(&self, record: ClassRecordRc) {
        self.classes.push(record);
    }

    /// Store a constructor parameter record
    pub fn add_constructor_parameter(&self, record: ConstructorParameterRecordRc) {
        self.constructors.push(record);
    }

    /// Store a property record
    pub fn add_property(&self, record: PropertyRecordRc) {
        self.properties.push(record);
    }

    /// Merge the facts of a method-level annotation into the member's record.
    ///
    /// `declared` is the detached record built for this one annotation; descriptor, options,
    /// return and parameter types of the member's record are replaced by its values. Parameter
    /// annotations already attached to the member are kept.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the member record's lock is poisoned.
    pub fn add_method(&self, declared: &MethodRecord) -> Result<MethodRecordRc> {
        self.upsert_method(&declared.member, declared.scope(), |record| {
            record.apply_declaration(declared)
        })
    }

    /// Attach a parameter annotation to the record of its owning method.
    ///
    /// # Errors
    /// Returns [`crate::Error::LockError`] if the member record's lock is poisoned.
    pub fn add_method_parameter(&self, parameter: ParameterRecordRc) -> Result<MethodRecordRc> {
        let member = parameter.member.clone();
        let scope = parameter.scope;
        self.upsert_method(&member, scope, move |record| {
            record.add_parameter(parameter);
            Ok(())
        })
    }

    /// Find the record for `member`, creating an empty one if absent, then apply `apply`.
    ///
    /// A newly created record becomes visible only after `apply` succeeded.
    fn upsert_method<F>(&self, member: &str, scope: MemberScope, apply: F) -> Result<MethodRecordRc>
    where
        F: FnOnce(&MethodRecord) -> Result<()>,
    {
        match self.methods_by_name.entry(member.to_string()) {
            Entry::Occupied(entry) => {
                let record = entry.get().clone();
                drop(entry);

                apply(&record)?;
                Ok(record)
            }
            Entry::Vacant(entry) => {
                let record = Arc::new(MethodRecord::placeholder(
                    member.to_string(),
                    self.target.clone(),
                    scope,
                ));
                apply(&record)?;

                self.methods.push(record.clone());
                entry.insert(record.clone());
                Ok(record)
            }
        }
    }

    /// Snapshot of all class-level records, in arrival order
    #[must_use]
    pub fn classes(&self) -> Vec<ClassRecordRc> {
        self.classes.iter().map(|(_, record)| record.clone()).collect()
    }

    /// Snapshot of all constructor parameter records, in arrival order
    #[must_use]
    pub fn constructors(&self) -> Vec<ConstructorParameterRecordRc> {
        self.constructors
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Snapshot of all property records, in arrival order
    #[must_use]
    pub fn properties(&self) -> Vec<PropertyRecordRc> {
        self.properties
            .iter()
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Snapshot of all method records, in order of first sighting
    #[must_use]
    pub fn methods(&self) -> Vec<MethodRecordRc> {
        self.methods.iter().map(|(_, record)| record.clone()).collect()
    }

    /// The record of method `member`, if any annotation touched it
    #[must_use]
    pub fn method(&self, member: &str) -> Option<MethodRecordRc> {
        self.methods_by_name
            .get(member)
            .map(|record| record.value().clone())
    }

    /// Class-level records carrying `key`
    #[must_use]
    pub fn classes_with_key(&self, key: &AnnotationKey) -> Vec<ClassRecordRc> {
        self.classes
            .iter()
            .filter(|(_, record)| &record.key == key)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Property records of `member`, in arrival order
    #[must_use]
    pub fn property(&self, member: &str) -> Vec<PropertyRecordRc> {
        self.properties
            .iter()
            .filter(|(_, record)| record.member == member)
            .map(|(_, record)| record.clone())
            .collect()
    }

    /// Returns true if no annotation was recorded for this type
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.count() == 0
            && self.constructors.count() == 0
            && self.properties.count() == 0
            && self.methods.count() == 0
    }
}

impl std::fmt::Debug for AnnotationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationRegistry")
            .field("target", &self.target)
            .field("classes", &self.classes.count())
            .field("constructors", &self.constructors.count())
            .field("properties", &self.properties.count())
            .field("methods", &self.methods.count())
            .finish()
    }
}
