use alloc::collections::BTreeMap;

use crate::{
    any::{BindingKey, TypeInfo},
    errors::ResolveErrorKind,
    value::BoxCloneValue,
};

pub(crate) struct Entry {
    pub(crate) type_info: TypeInfo,
    pub(crate) value: BoxCloneValue,
}

#[derive(Default)]
pub(crate) struct Registry {
    entries: BTreeMap<BindingKey, Entry>,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, key: BindingKey, entry: Entry) {
        self.entries.insert(key, entry);
    }

    pub(crate) fn get(&self, key: &BindingKey) -> Result<&Entry, ResolveErrorKind> {
        self.entries.get(key).ok_or_else(|| ResolveErrorKind::NotFound { key: key.clone() })
    }

    #[must_use]
    pub(crate) fn contains(&self, key: &BindingKey) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::{Entry, Registry};
    use crate::{
        any::{BindingKey, TypeInfo},
        errors::ResolveErrorKind,
        value::BoxCloneValue,
    };

    use alloc::string::{String, ToString as _};

    #[test]
    fn test_insert_get() {
        let mut registry = Registry::new();
        registry.insert(
            BindingKey::of::<i32>(),
            Entry {
                type_info: TypeInfo::of::<i32>(),
                value: BoxCloneValue::new(1_i32),
            },
        );

        assert!(registry.contains(&BindingKey::of::<i32>()));
        assert_eq!(registry.get(&BindingKey::of::<i32>()).unwrap().type_info, TypeInfo::of::<i32>());
    }

    #[test]
    fn test_name_and_type_keys_disjoint() {
        let mut registry = Registry::new();
        registry.insert(
            BindingKey::Name("primary".into()),
            Entry {
                type_info: TypeInfo::of::<String>(),
                value: BoxCloneValue::new(String::from("dsn")),
            },
        );

        assert!(registry.contains(&BindingKey::Name("primary".into())));
        assert!(!registry.contains(&BindingKey::of::<String>()));
    }

    #[test]
    fn test_not_found() {
        let registry = Registry::new();

        let err = registry.get(&BindingKey::Name("primary".into())).map(|_| ()).unwrap_err();
        assert!(matches!(err, ResolveErrorKind::NotFound { .. }));
        assert_eq!(err.to_string(), "dependency 'primary' not found");
    }
}
